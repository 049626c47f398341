//! SSSE3 / SSE4.1 backend (x86 / x86-64)
//!
//! Same 128-bit layout as [`super::sse2`], with the collapse and the minimum
//! swapped for the newer instructions: `phaddd`/`haddps`/`phaddw` for the
//! horizontal sum (SSSE3), `pminsd`/`pminuw` for the lane minimum and
//! `phminposuw` for the u16 horizontal minimum (SSE4.1). Loads, stores and
//! additions are delegated to the SSE2 wrappers.
//!
//! The sum entry points only need SSSE3 and the minimum entry points need
//! SSE4.1, so a CPU with SSSE3 but not SSE4.1 can still use the faster sum.

use super::sse2::{Sse2F32, Sse2I32, Sse2U16};
use crate::kernels;
use crate::traits::LaneVector;

#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

#[cfg(target_arch = "x86")]
use core::arch::x86::*;

#[derive(Copy, Clone)]
#[repr(transparent)]
pub(crate) struct Sse4I32(Sse2I32);

#[derive(Copy, Clone)]
#[repr(transparent)]
pub(crate) struct Sse4F32(Sse2F32);

#[derive(Copy, Clone)]
#[repr(transparent)]
pub(crate) struct Sse4U16(Sse2U16);

impl LaneVector for Sse4I32 {
    type Elem = i32;
    const LANES: usize = 4;

    #[inline(always)]
    fn zero() -> Self {
        Sse4I32(Sse2I32::zero())
    }

    #[inline(always)]
    fn load(chunk: &[i32]) -> Self {
        Sse4I32(Sse2I32::load(chunk))
    }

    #[inline(always)]
    fn store(self, out: &mut [i32]) {
        self.0.store(out)
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Sse4I32(self.0.add(rhs.0))
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        unsafe { Sse4I32(Sse2I32(_mm_min_epi32(self.0 .0, rhs.0 .0))) }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> i32 {
        unsafe {
            let v = _mm_hadd_epi32(self.0 .0, self.0 .0);
            let v = _mm_hadd_epi32(v, v);
            _mm_cvtsi128_si32(v)
        }
    }

    #[inline(always)]
    fn horizontal_min(self) -> i32 {
        unsafe {
            let v = self.0 .0;
            let v = _mm_min_epi32(v, _mm_shuffle_epi32(v, 0x4E));
            let v = _mm_min_epi32(v, _mm_shuffle_epi32(v, 0xB1));
            _mm_cvtsi128_si32(v)
        }
    }
}

impl LaneVector for Sse4F32 {
    type Elem = f32;
    const LANES: usize = 4;

    #[inline(always)]
    fn zero() -> Self {
        Sse4F32(Sse2F32::zero())
    }

    #[inline(always)]
    fn load(chunk: &[f32]) -> Self {
        Sse4F32(Sse2F32::load(chunk))
    }

    #[inline(always)]
    fn store(self, out: &mut [f32]) {
        self.0.store(out)
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Sse4F32(self.0.add(rhs.0))
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Sse4F32(self.0.min(rhs.0))
    }

    #[inline(always)]
    fn horizontal_sum(self) -> f32 {
        unsafe {
            let v = _mm_hadd_ps(self.0 .0, self.0 .0);
            let v = _mm_hadd_ps(v, v);
            _mm_cvtss_f32(v)
        }
    }

    #[inline(always)]
    fn horizontal_min(self) -> f32 {
        self.0.horizontal_min()
    }
}

impl LaneVector for Sse4U16 {
    type Elem = u16;
    const LANES: usize = 8;

    #[inline(always)]
    fn zero() -> Self {
        Sse4U16(Sse2U16::zero())
    }

    #[inline(always)]
    fn load(chunk: &[u16]) -> Self {
        Sse4U16(Sse2U16::load(chunk))
    }

    #[inline(always)]
    fn store(self, out: &mut [u16]) {
        self.0.store(out)
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Sse4U16(self.0.add(rhs.0))
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        unsafe { Sse4U16(Sse2U16(_mm_min_epu16(self.0 .0, rhs.0 .0))) }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> u16 {
        unsafe {
            let v = _mm_hadd_epi16(self.0 .0, self.0 .0);
            let v = _mm_hadd_epi16(v, v);
            let v = _mm_hadd_epi16(v, v);
            _mm_cvtsi128_si32(v) as u16
        }
    }

    #[inline(always)]
    fn horizontal_min(self) -> u16 {
        // phminposuw: minimum in bits 0..16, its index in bits 16..19
        unsafe { _mm_cvtsi128_si32(_mm_minpos_epu16(self.0 .0)) as u16 }
    }
}

/// Sum of `i32` lanes with a `phaddd` collapse
///
/// # Safety
///
/// The CPU must support SSSE3.
#[target_feature(enable = "ssse3")]
pub unsafe fn sum_i32(data: &[i32]) -> i32 {
    kernels::sum::<Sse4I32>(data)
}

/// Sum of `f32` lanes with a `haddps` collapse
///
/// # Safety
///
/// The CPU must support SSSE3.
#[target_feature(enable = "ssse3")]
pub unsafe fn sum_f32(data: &[f32]) -> f32 {
    kernels::sum::<Sse4F32>(data)
}

/// Sum of `u16` lanes with a `phaddw` collapse
///
/// # Safety
///
/// The CPU must support SSSE3.
#[target_feature(enable = "ssse3")]
pub unsafe fn sum_u16(data: &[u16]) -> u16 {
    kernels::sum::<Sse4U16>(data)
}

/// Minimum of a non-empty `i32` slice using `pminsd`
///
/// # Safety
///
/// The CPU must support SSE4.1.
///
/// # Panics
///
/// Panics if `data` is empty.
#[target_feature(enable = "sse4.1")]
pub unsafe fn min_i32(data: &[i32]) -> i32 {
    kernels::min::<Sse4I32>(data)
}

/// Minimum of a non-empty `u16` slice using `pminuw` and `phminposuw`
///
/// # Safety
///
/// The CPU must support SSE4.1.
///
/// # Panics
///
/// Panics if `data` is empty.
#[target_feature(enable = "sse4.1")]
pub unsafe fn min_u16(data: &[u16]) -> u16 {
    kernels::min::<Sse4U16>(data)
}
