//! SSE2 backend (x86 / x86-64)
//!
//! 128-bit registers: 4 lanes of i32/f32, 8 lanes of u16. SSE2 has no
//! horizontal instructions, so the collapse is done with two lane shuffles
//! (`0x4E` swaps the 64-bit halves, `0xB1` swaps adjacent 32-bit lanes). SSE2
//! also lacks `pminsd`/`pminuw`; signed minimum uses compare-and-select and
//! unsigned 16-bit minimum uses `a - sat_sub(a, b)`.

use crate::kernels;
use crate::traits::LaneVector;

#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

#[cfg(target_arch = "x86")]
use core::arch::x86::*;

/// Four `i32` lanes in an `__m128i`
#[derive(Copy, Clone)]
#[repr(transparent)]
pub(crate) struct Sse2I32(pub(crate) __m128i);

/// Four `f32` lanes in an `__m128`
#[derive(Copy, Clone)]
#[repr(transparent)]
pub(crate) struct Sse2F32(pub(crate) __m128);

/// Eight `u16` lanes in an `__m128i`
#[derive(Copy, Clone)]
#[repr(transparent)]
pub(crate) struct Sse2U16(pub(crate) __m128i);

impl LaneVector for Sse2I32 {
    type Elem = i32;
    const LANES: usize = 4;

    #[inline(always)]
    fn zero() -> Self {
        unsafe { Sse2I32(_mm_setzero_si128()) }
    }

    #[inline(always)]
    fn load(chunk: &[i32]) -> Self {
        assert!(chunk.len() >= Self::LANES, "Slice too short for SSE2 load");
        unsafe { Sse2I32(_mm_loadu_si128(chunk.as_ptr() as *const __m128i)) }
    }

    #[inline(always)]
    fn store(self, out: &mut [i32]) {
        assert!(out.len() >= Self::LANES, "Slice too short for SSE2 store");
        unsafe { _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, self.0) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Sse2I32(_mm_add_epi32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        unsafe {
            let lt = _mm_cmplt_epi32(self.0, rhs.0);
            Sse2I32(_mm_or_si128(
                _mm_and_si128(lt, self.0),
                _mm_andnot_si128(lt, rhs.0),
            ))
        }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> i32 {
        unsafe {
            let v = self.0;
            let v = _mm_add_epi32(v, _mm_shuffle_epi32(v, 0x4E));
            let v = _mm_add_epi32(v, _mm_shuffle_epi32(v, 0xB1));
            _mm_cvtsi128_si32(v)
        }
    }

    #[inline(always)]
    fn horizontal_min(self) -> i32 {
        unsafe {
            let v = self.min(Sse2I32(_mm_shuffle_epi32(self.0, 0x4E)));
            let v = v.min(Sse2I32(_mm_shuffle_epi32(v.0, 0xB1)));
            _mm_cvtsi128_si32(v.0)
        }
    }
}

impl LaneVector for Sse2F32 {
    type Elem = f32;
    const LANES: usize = 4;

    #[inline(always)]
    fn zero() -> Self {
        unsafe { Sse2F32(_mm_setzero_ps()) }
    }

    #[inline(always)]
    fn load(chunk: &[f32]) -> Self {
        assert!(chunk.len() >= Self::LANES, "Slice too short for SSE2 load");
        unsafe { Sse2F32(_mm_loadu_ps(chunk.as_ptr())) }
    }

    #[inline(always)]
    fn store(self, out: &mut [f32]) {
        assert!(out.len() >= Self::LANES, "Slice too short for SSE2 store");
        unsafe { _mm_storeu_ps(out.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Sse2F32(_mm_add_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        unsafe { Sse2F32(_mm_min_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> f32 {
        unsafe {
            // [a+c, b+d, ..] then lane 0 + lane 1
            let v = _mm_add_ps(self.0, _mm_movehl_ps(self.0, self.0));
            let v = _mm_add_ss(v, _mm_shuffle_ps(v, v, 0x55));
            _mm_cvtss_f32(v)
        }
    }

    #[inline(always)]
    fn horizontal_min(self) -> f32 {
        unsafe {
            let v = _mm_min_ps(self.0, _mm_movehl_ps(self.0, self.0));
            let v = _mm_min_ss(v, _mm_shuffle_ps(v, v, 0x55));
            _mm_cvtss_f32(v)
        }
    }
}

impl LaneVector for Sse2U16 {
    type Elem = u16;
    const LANES: usize = 8;

    #[inline(always)]
    fn zero() -> Self {
        unsafe { Sse2U16(_mm_setzero_si128()) }
    }

    #[inline(always)]
    fn load(chunk: &[u16]) -> Self {
        assert!(chunk.len() >= Self::LANES, "Slice too short for SSE2 load");
        unsafe { Sse2U16(_mm_loadu_si128(chunk.as_ptr() as *const __m128i)) }
    }

    #[inline(always)]
    fn store(self, out: &mut [u16]) {
        assert!(out.len() >= Self::LANES, "Slice too short for SSE2 store");
        unsafe { _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, self.0) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Sse2U16(_mm_add_epi16(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        // min(a, b) = a - max(a - b, 0)
        unsafe { Sse2U16(_mm_sub_epi16(self.0, _mm_subs_epu16(self.0, rhs.0))) }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> u16 {
        unsafe {
            let v = self.0;
            let v = _mm_add_epi16(v, _mm_shuffle_epi32(v, 0x4E));
            let v = _mm_add_epi16(v, _mm_shuffle_epi32(v, 0xB1));
            let v = _mm_add_epi16(v, _mm_srli_epi32(v, 16));
            _mm_cvtsi128_si32(v) as u16
        }
    }

    #[inline(always)]
    fn horizontal_min(self) -> u16 {
        unsafe {
            let v = self.min(Sse2U16(_mm_shuffle_epi32(self.0, 0x4E)));
            let v = v.min(Sse2U16(_mm_shuffle_epi32(v.0, 0xB1)));
            let v = v.min(Sse2U16(_mm_srli_epi32(v.0, 16)));
            _mm_cvtsi128_si32(v.0) as u16
        }
    }
}

/// Sum of `i32` lanes (wrapping)
///
/// # Safety
///
/// The CPU must support SSE2.
#[target_feature(enable = "sse2")]
pub unsafe fn sum_i32(data: &[i32]) -> i32 {
    kernels::sum::<Sse2I32>(data)
}

/// Sum of `f32` lanes
///
/// # Safety
///
/// The CPU must support SSE2.
#[target_feature(enable = "sse2")]
pub unsafe fn sum_f32(data: &[f32]) -> f32 {
    kernels::sum::<Sse2F32>(data)
}

/// Sum of `u16` lanes (wrapping)
///
/// # Safety
///
/// The CPU must support SSE2.
#[target_feature(enable = "sse2")]
pub unsafe fn sum_u16(data: &[u16]) -> u16 {
    kernels::sum::<Sse2U16>(data)
}

/// Minimum of a non-empty `i32` slice
///
/// # Safety
///
/// The CPU must support SSE2.
///
/// # Panics
///
/// Panics if `data` is empty.
#[target_feature(enable = "sse2")]
pub unsafe fn min_i32(data: &[i32]) -> i32 {
    kernels::min::<Sse2I32>(data)
}

/// Minimum of a non-empty `f32` slice
///
/// # Safety
///
/// The CPU must support SSE2.
///
/// # Panics
///
/// Panics if `data` is empty.
#[target_feature(enable = "sse2")]
pub unsafe fn min_f32(data: &[f32]) -> f32 {
    kernels::min::<Sse2F32>(data)
}

/// Minimum of a non-empty `u16` slice
///
/// # Safety
///
/// The CPU must support SSE2.
///
/// # Panics
///
/// Panics if `data` is empty.
#[target_feature(enable = "sse2")]
pub unsafe fn min_u16(data: &[u16]) -> u16 {
    kernels::min::<Sse2U16>(data)
}

/// Elementwise `i32` addition (wrapping)
///
/// # Safety
///
/// The CPU must support SSE2.
///
/// # Panics
///
/// Panics if the three slices differ in length.
#[target_feature(enable = "sse2")]
pub unsafe fn add_i32(a: &[i32], b: &[i32], out: &mut [i32]) {
    kernels::add::<Sse2I32>(a, b, out)
}

/// Elementwise `f32` addition
///
/// # Safety
///
/// The CPU must support SSE2.
///
/// # Panics
///
/// Panics if the three slices differ in length.
#[target_feature(enable = "sse2")]
pub unsafe fn add_f32(a: &[f32], b: &[f32], out: &mut [f32]) {
    kernels::add::<Sse2F32>(a, b, out)
}

/// Elementwise `u16` addition (wrapping)
///
/// # Safety
///
/// The CPU must support SSE2.
///
/// # Panics
///
/// Panics if the three slices differ in length.
#[target_feature(enable = "sse2")]
pub unsafe fn add_u16(a: &[u16], b: &[u16], out: &mut [u16]) {
    kernels::add::<Sse2U16>(a, b, out)
}
