//! Backend implementations
//!
//! `scalar` and `portable` compile everywhere and expose safe functions. The
//! instruction-set backends expose `unsafe fn` entry points compiled with
//! `#[target_feature]`; the caller must have confirmed the CPU supports them.
//!
//! | module   | width   | i32/f32 lanes | u16 lanes | loads     |
//! |----------|---------|---------------|-----------|-----------|
//! | avx2     | 256-bit | 8             | 16        | aligned   |
//! | sse4     | 128-bit | 4             | 8         | unaligned |
//! | sse2     | 128-bit | 4             | 8         | unaligned |
//! | neon     | 128-bit | 4             | 8         | unaligned |
//! | portable | wide    | 8             | 8         | unaligned |
//! | scalar   | -       | 1             | 1         | -         |

// Always available
pub mod portable;
pub mod scalar;

// x86 / x86_64
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod avx2;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod sse2;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod sse4;

// aarch64
#[cfg(target_arch = "aarch64")]
pub mod neon;
