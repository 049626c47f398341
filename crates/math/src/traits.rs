//! Core lane abstractions
//!
//! [`Element`] describes the scalar types the engine can reduce. [`LaneVector`]
//! is implemented by every register wrapper (SSE2, SSE4, AVX2, NEON, portable)
//! so the strided loops only have to be written once.

use core::fmt::Debug;

/// Scalar element stored in one lane
///
/// Integer addition wraps on overflow in every backend, matching the native
/// behaviour of the packed-add instructions. Lane minimum follows the
/// `minps` convention for floats: `a.lane_min(b)` is `a` when `a < b`, else `b`.
pub trait Element: Copy + PartialOrd + Debug + Send + Sync + 'static {
    /// Additive identity
    const ZERO: Self;

    /// Lane addition (wrapping for integers)
    fn lane_add(self, rhs: Self) -> Self;

    /// Lane minimum
    fn lane_min(self, rhs: Self) -> Self;
}

impl Element for i32 {
    const ZERO: Self = 0;

    #[inline(always)]
    fn lane_add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }

    #[inline(always)]
    fn lane_min(self, rhs: Self) -> Self {
        Ord::min(self, rhs)
    }
}

impl Element for u16 {
    const ZERO: Self = 0;

    #[inline(always)]
    fn lane_add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }

    #[inline(always)]
    fn lane_min(self, rhs: Self) -> Self {
        Ord::min(self, rhs)
    }
}

impl Element for f32 {
    const ZERO: Self = 0.0;

    #[inline(always)]
    fn lane_add(self, rhs: Self) -> Self {
        self + rhs
    }

    #[inline(always)]
    fn lane_min(self, rhs: Self) -> Self {
        if self < rhs {
            self
        } else {
            rhs
        }
    }
}

/// Register-sized vector of `LANES` elements
///
/// Implementations wrap one SIMD register (or an array for the portable
/// backend). The methods are only meaningful on a CPU that supports the
/// wrapper's instruction set; the SIMD wrappers are private to this crate and
/// are used exclusively inside `#[target_feature]` entry points.
///
/// Loads and stores take slices and panic if the slice is shorter than
/// `LANES`, so strided access stays length-checked.
pub trait LaneVector: Copy {
    /// Scalar type held in each lane
    type Elem: Element;

    /// Number of lanes (4 for 128-bit i32/f32, 8 for 256-bit i32/f32, ...)
    const LANES: usize;

    /// All lanes set to zero
    fn zero() -> Self;

    /// Unaligned load of the first `LANES` elements of `chunk`
    fn load(chunk: &[Self::Elem]) -> Self;

    /// Load from a chunk whose start address is aligned to the register width
    ///
    /// Backends without an aligned-load instruction fall back to [`LaneVector::load`].
    #[inline(always)]
    fn load_aligned(chunk: &[Self::Elem]) -> Self {
        Self::load(chunk)
    }

    /// Store all lanes into the first `LANES` elements of `out`
    fn store(self, out: &mut [Self::Elem]);

    /// Lane-wise addition
    fn add(self, rhs: Self) -> Self;

    /// Lane-wise minimum
    fn min(self, rhs: Self) -> Self;

    /// Collapse all lanes into one sum
    fn horizontal_sum(self) -> Self::Elem;

    /// Collapse all lanes into their minimum
    fn horizontal_min(self) -> Self::Elem;
}
