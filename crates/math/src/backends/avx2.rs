//! AVX2 backend (x86 / x86-64)
//!
//! 256-bit registers: 8 lanes of i32/f32, 16 lanes of u16. Reductions use the
//! aligned-load kernels: a scalar prefix brings the pointer to a 32-byte
//! boundary, the body is read with `vmovdqa`/`vmovaps`, and the sum runs four
//! independent accumulators.
//!
//! The horizontal collapse first folds the upper 128-bit half onto the lower
//! one and then finishes in 128-bit registers. `vphaddd` and friends only add
//! within each 128-bit half, so skipping the fold would drop half the lanes.

use crate::kernels;
use crate::traits::LaneVector;

#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

#[cfg(target_arch = "x86")]
use core::arch::x86::*;

const ALIGN: usize = 32;

#[derive(Copy, Clone)]
#[repr(transparent)]
pub(crate) struct Avx2I32(__m256i);

#[derive(Copy, Clone)]
#[repr(transparent)]
pub(crate) struct Avx2F32(__m256);

#[derive(Copy, Clone)]
#[repr(transparent)]
pub(crate) struct Avx2U16(__m256i);

#[inline(always)]
fn debug_assert_aligned<T>(chunk: &[T]) {
    debug_assert_eq!(
        chunk.as_ptr() as usize % ALIGN,
        0,
        "AVX2 aligned load from a misaligned address"
    );
}

/// Lower and upper 128-bit halves of an integer register
#[inline(always)]
fn halves(v: __m256i) -> (__m128i, __m128i) {
    unsafe { (_mm256_castsi256_si128(v), _mm256_extracti128_si256(v, 1)) }
}

impl LaneVector for Avx2I32 {
    type Elem = i32;
    const LANES: usize = 8;

    #[inline(always)]
    fn zero() -> Self {
        unsafe { Avx2I32(_mm256_setzero_si256()) }
    }

    #[inline(always)]
    fn load(chunk: &[i32]) -> Self {
        assert!(chunk.len() >= Self::LANES, "Slice too short for AVX2 load");
        unsafe { Avx2I32(_mm256_loadu_si256(chunk.as_ptr() as *const __m256i)) }
    }

    #[inline(always)]
    fn load_aligned(chunk: &[i32]) -> Self {
        assert!(chunk.len() >= Self::LANES, "Slice too short for AVX2 load");
        debug_assert_aligned(chunk);
        unsafe { Avx2I32(_mm256_load_si256(chunk.as_ptr() as *const __m256i)) }
    }

    #[inline(always)]
    fn store(self, out: &mut [i32]) {
        assert!(out.len() >= Self::LANES, "Slice too short for AVX2 store");
        unsafe { _mm256_storeu_si256(out.as_mut_ptr() as *mut __m256i, self.0) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Avx2I32(_mm256_add_epi32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        unsafe { Avx2I32(_mm256_min_epi32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> i32 {
        unsafe {
            let (lo, hi) = halves(self.0);
            let v = _mm_add_epi32(lo, hi);
            let v = _mm_hadd_epi32(v, v);
            let v = _mm_hadd_epi32(v, v);
            _mm_cvtsi128_si32(v)
        }
    }

    #[inline(always)]
    fn horizontal_min(self) -> i32 {
        unsafe {
            let (lo, hi) = halves(self.0);
            let v = _mm_min_epi32(lo, hi);
            let v = _mm_min_epi32(v, _mm_shuffle_epi32(v, 0x4E));
            let v = _mm_min_epi32(v, _mm_shuffle_epi32(v, 0xB1));
            _mm_cvtsi128_si32(v)
        }
    }
}

impl LaneVector for Avx2F32 {
    type Elem = f32;
    const LANES: usize = 8;

    #[inline(always)]
    fn zero() -> Self {
        unsafe { Avx2F32(_mm256_setzero_ps()) }
    }

    #[inline(always)]
    fn load(chunk: &[f32]) -> Self {
        assert!(chunk.len() >= Self::LANES, "Slice too short for AVX2 load");
        unsafe { Avx2F32(_mm256_loadu_ps(chunk.as_ptr())) }
    }

    #[inline(always)]
    fn load_aligned(chunk: &[f32]) -> Self {
        assert!(chunk.len() >= Self::LANES, "Slice too short for AVX2 load");
        debug_assert_aligned(chunk);
        unsafe { Avx2F32(_mm256_load_ps(chunk.as_ptr())) }
    }

    #[inline(always)]
    fn store(self, out: &mut [f32]) {
        assert!(out.len() >= Self::LANES, "Slice too short for AVX2 store");
        unsafe { _mm256_storeu_ps(out.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Avx2F32(_mm256_add_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        unsafe { Avx2F32(_mm256_min_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> f32 {
        unsafe {
            let lo = _mm256_castps256_ps128(self.0);
            let v = _mm_add_ps(lo, _mm256_extractf128_ps(self.0, 1));
            let v = _mm_hadd_ps(v, v);
            let v = _mm_hadd_ps(v, v);
            _mm_cvtss_f32(v)
        }
    }

    #[inline(always)]
    fn horizontal_min(self) -> f32 {
        unsafe {
            let lo = _mm256_castps256_ps128(self.0);
            let v = _mm_min_ps(lo, _mm256_extractf128_ps(self.0, 1));
            let v = _mm_min_ps(v, _mm_movehl_ps(v, v));
            let v = _mm_min_ss(v, _mm_shuffle_ps(v, v, 0x55));
            _mm_cvtss_f32(v)
        }
    }
}

impl LaneVector for Avx2U16 {
    type Elem = u16;
    const LANES: usize = 16;

    #[inline(always)]
    fn zero() -> Self {
        unsafe { Avx2U16(_mm256_setzero_si256()) }
    }

    #[inline(always)]
    fn load(chunk: &[u16]) -> Self {
        assert!(chunk.len() >= Self::LANES, "Slice too short for AVX2 load");
        unsafe { Avx2U16(_mm256_loadu_si256(chunk.as_ptr() as *const __m256i)) }
    }

    #[inline(always)]
    fn load_aligned(chunk: &[u16]) -> Self {
        assert!(chunk.len() >= Self::LANES, "Slice too short for AVX2 load");
        debug_assert_aligned(chunk);
        unsafe { Avx2U16(_mm256_load_si256(chunk.as_ptr() as *const __m256i)) }
    }

    #[inline(always)]
    fn store(self, out: &mut [u16]) {
        assert!(out.len() >= Self::LANES, "Slice too short for AVX2 store");
        unsafe { _mm256_storeu_si256(out.as_mut_ptr() as *mut __m256i, self.0) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Avx2U16(_mm256_add_epi16(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        unsafe { Avx2U16(_mm256_min_epu16(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> u16 {
        unsafe {
            let (lo, hi) = halves(self.0);
            let v = _mm_add_epi16(lo, hi);
            let v = _mm_hadd_epi16(v, v);
            let v = _mm_hadd_epi16(v, v);
            let v = _mm_hadd_epi16(v, v);
            _mm_cvtsi128_si32(v) as u16
        }
    }

    #[inline(always)]
    fn horizontal_min(self) -> u16 {
        unsafe {
            let (lo, hi) = halves(self.0);
            let v = _mm_min_epu16(lo, hi);
            _mm_cvtsi128_si32(_mm_minpos_epu16(v)) as u16
        }
    }
}

/// Sum of `i32` lanes (wrapping), aligned loads and four accumulators
///
/// # Safety
///
/// The CPU must support AVX2.
#[target_feature(enable = "avx2")]
pub unsafe fn sum_i32(data: &[i32]) -> i32 {
    kernels::sum_aligned_pipelined::<Avx2I32>(data)
}

/// Sum of `f32` lanes, aligned loads and four accumulators
///
/// # Safety
///
/// The CPU must support AVX2.
#[target_feature(enable = "avx2")]
pub unsafe fn sum_f32(data: &[f32]) -> f32 {
    kernels::sum_aligned_pipelined::<Avx2F32>(data)
}

/// Sum of `u16` lanes (wrapping), aligned loads and four accumulators
///
/// # Safety
///
/// The CPU must support AVX2.
#[target_feature(enable = "avx2")]
pub unsafe fn sum_u16(data: &[u16]) -> u16 {
    kernels::sum_aligned_pipelined::<Avx2U16>(data)
}

/// Minimum of a non-empty `i32` slice
///
/// # Safety
///
/// The CPU must support AVX2.
///
/// # Panics
///
/// Panics if `data` is empty.
#[target_feature(enable = "avx2")]
pub unsafe fn min_i32(data: &[i32]) -> i32 {
    kernels::min_aligned::<Avx2I32>(data)
}

/// Minimum of a non-empty `f32` slice
///
/// # Safety
///
/// The CPU must support AVX2.
///
/// # Panics
///
/// Panics if `data` is empty.
#[target_feature(enable = "avx2")]
pub unsafe fn min_f32(data: &[f32]) -> f32 {
    kernels::min_aligned::<Avx2F32>(data)
}

/// Minimum of a non-empty `u16` slice
///
/// # Safety
///
/// The CPU must support AVX2.
///
/// # Panics
///
/// Panics if `data` is empty.
#[target_feature(enable = "avx2")]
pub unsafe fn min_u16(data: &[u16]) -> u16 {
    kernels::min_aligned::<Avx2U16>(data)
}

/// Elementwise `i32` addition (wrapping)
///
/// # Safety
///
/// The CPU must support AVX2.
///
/// # Panics
///
/// Panics if the three slices differ in length.
#[target_feature(enable = "avx2")]
pub unsafe fn add_i32(a: &[i32], b: &[i32], out: &mut [i32]) {
    kernels::add::<Avx2I32>(a, b, out)
}

/// Elementwise `f32` addition
///
/// # Safety
///
/// The CPU must support AVX2.
///
/// # Panics
///
/// Panics if the three slices differ in length.
#[target_feature(enable = "avx2")]
pub unsafe fn add_f32(a: &[f32], b: &[f32], out: &mut [f32]) {
    kernels::add::<Avx2F32>(a, b, out)
}

/// Elementwise `u16` addition (wrapping)
///
/// # Safety
///
/// The CPU must support AVX2.
///
/// # Panics
///
/// Panics if the three slices differ in length.
#[target_feature(enable = "avx2")]
pub unsafe fn add_u16(a: &[u16], b: &[u16], out: &mut [u16]) {
    kernels::add::<Avx2U16>(a, b, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn avx2() -> bool {
        std::is_x86_feature_detected!("avx2")
    }

    #[repr(C, align(64))]
    struct Aligned<T, const N: usize>([T; N]);

    #[test]
    fn test_sum_includes_upper_half() {
        if !avx2() {
            return;
        }
        // All weight in lanes 4..8 of an aligned register
        let buf = Aligned([0, 0, 0, 0, 1, 2, 3, 4i32]);
        assert_eq!(unsafe { sum_i32(&buf.0) }, 10);
        let buf = Aligned([0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0f32]);
        assert_eq!(unsafe { sum_f32(&buf.0) }, 10.0);
    }

    #[test]
    fn test_min_in_upper_half() {
        if !avx2() {
            return;
        }
        let mut buf = Aligned([9u16; 16]);
        buf.0[13] = 2;
        assert_eq!(unsafe { min_u16(&buf.0) }, 2);
        let buf = Aligned([5, 6, 7, 8, 9, -1, 3, 4i32]);
        assert_eq!(unsafe { min_i32(&buf.0) }, -1);
    }

    #[test]
    fn test_every_offset_matches_scalar() {
        if !avx2() {
            return;
        }
        let mut buf = Aligned([0i32; 200]);
        for (i, x) in buf.0.iter_mut().enumerate() {
            *x = ((i * 7919) % 100) as i32 - 50;
        }
        for offset in 0..8 {
            for len in [1, 7, 8, 9, 31, 32, 33, 100, 192] {
                let slice = &buf.0[offset..offset + len];
                let sum: i32 = slice.iter().sum();
                let min = *slice.iter().min().unwrap();
                assert_eq!(unsafe { sum_i32(slice) }, sum, "offset {offset} len {len}");
                assert_eq!(unsafe { min_i32(slice) }, min, "offset {offset} len {len}");
            }
        }
    }

    #[test]
    fn test_u16_long_prefix() {
        if !avx2() {
            return;
        }
        // One element in, the prefix is 15 elements long
        let mut buf = Aligned([1u16; 64]);
        buf.0[1] = 0;
        assert_eq!(unsafe { min_u16(&buf.0[1..]) }, 0);
        assert_eq!(unsafe { sum_u16(&buf.0[1..]) }, 62);
    }

    #[test]
    fn test_add_matches_scalar() {
        if !avx2() {
            return;
        }
        let a: Vec<u16> = (0..35).map(|i| i * 1000).collect();
        let b: Vec<u16> = (0..35).map(|i| i * 900).collect();
        let mut out = vec![0u16; 35];
        unsafe { add_u16(&a, &b, &mut out) };
        for i in 0..35 {
            assert_eq!(out[i], a[i].wrapping_add(b[i]));
        }
    }
}
