//! Portable fixed-width backend built on the `wide` crate
//!
//! `wide` picks the best lowering for the compile target (SSE/AVX, NEON,
//! simd128, or plain arrays), so this tier works on any architecture without
//! runtime detection. Lanes are spilled to an array for the horizontal
//! collapse, which uses the same pairwise tree as the register backends.

use wide::{f32x8, i32x8, u16x8};

use crate::horizontal::fold_pairwise;
use crate::kernels;
use crate::traits::{Element, LaneVector};

/// Eight `i32` lanes
#[derive(Copy, Clone, Debug)]
pub struct PortableI32(i32x8);

/// Eight `f32` lanes
#[derive(Copy, Clone, Debug)]
pub struct PortableF32(f32x8);

/// Eight `u16` lanes
#[derive(Copy, Clone, Debug)]
pub struct PortableU16(u16x8);

impl LaneVector for PortableI32 {
    type Elem = i32;
    const LANES: usize = 8;

    #[inline(always)]
    fn zero() -> Self {
        Self(i32x8::splat(0))
    }

    #[inline(always)]
    fn load(chunk: &[i32]) -> Self {
        let mut lanes = [0i32; 8];
        lanes.copy_from_slice(&chunk[..Self::LANES]);
        Self(i32x8::new(lanes))
    }

    #[inline(always)]
    fn store(self, out: &mut [i32]) {
        out[..Self::LANES].copy_from_slice(&self.0.to_array());
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Self(self.0.min(rhs.0))
    }

    #[inline(always)]
    fn horizontal_sum(self) -> i32 {
        fold_pairwise(self.0.to_array(), i32::lane_add)
    }

    #[inline(always)]
    fn horizontal_min(self) -> i32 {
        fold_pairwise(self.0.to_array(), i32::lane_min)
    }
}

impl LaneVector for PortableF32 {
    type Elem = f32;
    const LANES: usize = 8;

    #[inline(always)]
    fn zero() -> Self {
        Self(f32x8::splat(0.0))
    }

    #[inline(always)]
    fn load(chunk: &[f32]) -> Self {
        let mut lanes = [0.0f32; 8];
        lanes.copy_from_slice(&chunk[..Self::LANES]);
        Self(f32x8::new(lanes))
    }

    #[inline(always)]
    fn store(self, out: &mut [f32]) {
        out[..Self::LANES].copy_from_slice(&self.0.to_array());
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Self(self.0.min(rhs.0))
    }

    #[inline(always)]
    fn horizontal_sum(self) -> f32 {
        fold_pairwise(self.0.to_array(), f32::lane_add)
    }

    #[inline(always)]
    fn horizontal_min(self) -> f32 {
        fold_pairwise(self.0.to_array(), f32::lane_min)
    }
}

impl LaneVector for PortableU16 {
    type Elem = u16;
    const LANES: usize = 8;

    #[inline(always)]
    fn zero() -> Self {
        Self(u16x8::splat(0))
    }

    #[inline(always)]
    fn load(chunk: &[u16]) -> Self {
        let mut lanes = [0u16; 8];
        lanes.copy_from_slice(&chunk[..Self::LANES]);
        Self(u16x8::new(lanes))
    }

    #[inline(always)]
    fn store(self, out: &mut [u16]) {
        out[..Self::LANES].copy_from_slice(&self.0.to_array());
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Self(self.0.min(rhs.0))
    }

    #[inline(always)]
    fn horizontal_sum(self) -> u16 {
        fold_pairwise(self.0.to_array(), u16::lane_add)
    }

    #[inline(always)]
    fn horizontal_min(self) -> u16 {
        fold_pairwise(self.0.to_array(), u16::lane_min)
    }
}

/// Sum of `i32` lanes (wrapping)
pub fn sum_i32(data: &[i32]) -> i32 {
    kernels::sum::<PortableI32>(data)
}

/// Sum of `f32` lanes
pub fn sum_f32(data: &[f32]) -> f32 {
    kernels::sum::<PortableF32>(data)
}

/// Sum of `u16` lanes (wrapping)
pub fn sum_u16(data: &[u16]) -> u16 {
    kernels::sum::<PortableU16>(data)
}

/// Minimum of a non-empty `i32` slice
pub fn min_i32(data: &[i32]) -> i32 {
    kernels::min::<PortableI32>(data)
}

/// Minimum of a non-empty `f32` slice
pub fn min_f32(data: &[f32]) -> f32 {
    kernels::min::<PortableF32>(data)
}

/// Minimum of a non-empty `u16` slice
pub fn min_u16(data: &[u16]) -> u16 {
    kernels::min::<PortableU16>(data)
}

/// Elementwise `i32` addition (wrapping)
pub fn add_i32(a: &[i32], b: &[i32], out: &mut [i32]) {
    kernels::add::<PortableI32>(a, b, out)
}

/// Elementwise `f32` addition
pub fn add_f32(a: &[f32], b: &[f32], out: &mut [f32]) {
    kernels::add::<PortableF32>(a, b, out)
}

/// Elementwise `u16` addition (wrapping)
pub fn add_u16(a: &[u16], b: &[u16], out: &mut [u16]) {
    kernels::add::<PortableU16>(a, b, out)
}
