//! NEON backend (aarch64)
//!
//! 128-bit registers: 4 lanes of i32/f32, 8 lanes of u16. NEON is mandatory on
//! aarch64, and AArch64 has across-vector reductions (`addv`, `sminv`,
//! `uminv`, `faddp`/`fminv`), so the horizontal collapse is one instruction.
//!
//! `fmin` returns NaN when either operand is NaN, unlike `minps`; float
//! minimum is only specified for NaN-free input.

use crate::kernels;
use crate::traits::LaneVector;

use core::arch::aarch64::*;

#[derive(Copy, Clone)]
#[repr(transparent)]
pub(crate) struct NeonI32(int32x4_t);

#[derive(Copy, Clone)]
#[repr(transparent)]
pub(crate) struct NeonF32(float32x4_t);

#[derive(Copy, Clone)]
#[repr(transparent)]
pub(crate) struct NeonU16(uint16x8_t);

impl LaneVector for NeonI32 {
    type Elem = i32;
    const LANES: usize = 4;

    #[inline(always)]
    fn zero() -> Self {
        unsafe { NeonI32(vdupq_n_s32(0)) }
    }

    #[inline(always)]
    fn load(chunk: &[i32]) -> Self {
        assert!(chunk.len() >= Self::LANES, "Slice too short for NEON load");
        unsafe { NeonI32(vld1q_s32(chunk.as_ptr())) }
    }

    #[inline(always)]
    fn store(self, out: &mut [i32]) {
        assert!(out.len() >= Self::LANES, "Slice too short for NEON store");
        unsafe { vst1q_s32(out.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { NeonI32(vaddq_s32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        unsafe { NeonI32(vminq_s32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> i32 {
        unsafe { vaddvq_s32(self.0) }
    }

    #[inline(always)]
    fn horizontal_min(self) -> i32 {
        unsafe { vminvq_s32(self.0) }
    }
}

impl LaneVector for NeonF32 {
    type Elem = f32;
    const LANES: usize = 4;

    #[inline(always)]
    fn zero() -> Self {
        unsafe { NeonF32(vdupq_n_f32(0.0)) }
    }

    #[inline(always)]
    fn load(chunk: &[f32]) -> Self {
        assert!(chunk.len() >= Self::LANES, "Slice too short for NEON load");
        unsafe { NeonF32(vld1q_f32(chunk.as_ptr())) }
    }

    #[inline(always)]
    fn store(self, out: &mut [f32]) {
        assert!(out.len() >= Self::LANES, "Slice too short for NEON store");
        unsafe { vst1q_f32(out.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { NeonF32(vaddq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        unsafe { NeonF32(vminq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> f32 {
        unsafe { vaddvq_f32(self.0) }
    }

    #[inline(always)]
    fn horizontal_min(self) -> f32 {
        unsafe { vminvq_f32(self.0) }
    }
}

impl LaneVector for NeonU16 {
    type Elem = u16;
    const LANES: usize = 8;

    #[inline(always)]
    fn zero() -> Self {
        unsafe { NeonU16(vdupq_n_u16(0)) }
    }

    #[inline(always)]
    fn load(chunk: &[u16]) -> Self {
        assert!(chunk.len() >= Self::LANES, "Slice too short for NEON load");
        unsafe { NeonU16(vld1q_u16(chunk.as_ptr())) }
    }

    #[inline(always)]
    fn store(self, out: &mut [u16]) {
        assert!(out.len() >= Self::LANES, "Slice too short for NEON store");
        unsafe { vst1q_u16(out.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { NeonU16(vaddq_u16(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        unsafe { NeonU16(vminq_u16(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> u16 {
        unsafe { vaddvq_u16(self.0) }
    }

    #[inline(always)]
    fn horizontal_min(self) -> u16 {
        unsafe { vminvq_u16(self.0) }
    }
}

/// Sum of `i32` lanes (wrapping)
///
/// # Safety
///
/// The CPU must support NEON.
#[target_feature(enable = "neon")]
pub unsafe fn sum_i32(data: &[i32]) -> i32 {
    kernels::sum::<NeonI32>(data)
}

/// Sum of `f32` lanes
///
/// # Safety
///
/// The CPU must support NEON.
#[target_feature(enable = "neon")]
pub unsafe fn sum_f32(data: &[f32]) -> f32 {
    kernels::sum::<NeonF32>(data)
}

/// Sum of `u16` lanes (wrapping)
///
/// # Safety
///
/// The CPU must support NEON.
#[target_feature(enable = "neon")]
pub unsafe fn sum_u16(data: &[u16]) -> u16 {
    kernels::sum::<NeonU16>(data)
}

/// Minimum of a non-empty `i32` slice
///
/// # Safety
///
/// The CPU must support NEON.
///
/// # Panics
///
/// Panics if `data` is empty.
#[target_feature(enable = "neon")]
pub unsafe fn min_i32(data: &[i32]) -> i32 {
    kernels::min::<NeonI32>(data)
}

/// Minimum of a non-empty `f32` slice
///
/// # Safety
///
/// The CPU must support NEON.
///
/// # Panics
///
/// Panics if `data` is empty.
#[target_feature(enable = "neon")]
pub unsafe fn min_f32(data: &[f32]) -> f32 {
    kernels::min::<NeonF32>(data)
}

/// Minimum of a non-empty `u16` slice
///
/// # Safety
///
/// The CPU must support NEON.
///
/// # Panics
///
/// Panics if `data` is empty.
#[target_feature(enable = "neon")]
pub unsafe fn min_u16(data: &[u16]) -> u16 {
    kernels::min::<NeonU16>(data)
}

/// Elementwise `i32` addition (wrapping)
///
/// # Safety
///
/// The CPU must support NEON.
///
/// # Panics
///
/// Panics if the three slices differ in length.
#[target_feature(enable = "neon")]
pub unsafe fn add_i32(a: &[i32], b: &[i32], out: &mut [i32]) {
    kernels::add::<NeonI32>(a, b, out)
}

/// Elementwise `f32` addition
///
/// # Safety
///
/// The CPU must support NEON.
///
/// # Panics
///
/// Panics if the three slices differ in length.
#[target_feature(enable = "neon")]
pub unsafe fn add_f32(a: &[f32], b: &[f32], out: &mut [f32]) {
    kernels::add::<NeonF32>(a, b, out)
}

/// Elementwise `u16` addition (wrapping)
///
/// # Safety
///
/// The CPU must support NEON.
///
/// # Panics
///
/// Panics if the three slices differ in length.
#[target_feature(enable = "neon")]
pub unsafe fn add_u16(a: &[u16], b: &[u16], out: &mut [u16]) {
    kernels::add::<NeonU16>(a, b, out)
}
