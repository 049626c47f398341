//! Horizontal collapse for array-backed vectors
//!
//! Register backends collapse with shuffles or dedicated instructions; the
//! portable backend spills its lanes to an array and folds them here with the
//! same pairwise tree shape.

use crate::traits::Element;

/// Fold `N` lanes into one by combining the upper half into the lower half
/// until a single lane remains
///
/// # Panics
///
/// Panics if `N` is not a power of two.
///
/// # Example
///
/// ```rust
/// use vreduce_math::horizontal::fold_pairwise;
/// use vreduce_math::Element;
///
/// let lanes = [1, 2, 3, 4, 5, 6, 7, 8];
/// assert_eq!(fold_pairwise(lanes, i32::lane_add), 36);
/// assert_eq!(fold_pairwise(lanes, i32::lane_min), 1);
/// ```
#[inline(always)]
pub fn fold_pairwise<T: Element, const N: usize>(
    mut lanes: [T; N],
    combine: impl Fn(T, T) -> T,
) -> T {
    assert!(N.is_power_of_two(), "lane count must be a power of two");
    let mut width = N;
    while width > 1 {
        width /= 2;
        for i in 0..width {
            lanes[i] = combine(lanes[i], lanes[i + width]);
        }
    }
    lanes[0]
}
