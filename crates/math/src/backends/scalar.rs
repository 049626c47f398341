//! Scalar backend
//!
//! Plain loops, always available. These functions are also the tail loops of
//! every vector kernel, so they keep strict index order: the sum is unrolled
//! by four but feeds a single accumulator, which makes it the reference
//! left-to-right order for floating-point comparisons.

use crate::traits::Element;

/// Left-to-right sum; zero for an empty slice
#[inline]
pub fn sum<T: Element>(data: &[T]) -> T {
    sum_from(T::ZERO, data)
}

/// Continue a running sum over `data` in index order
#[inline]
pub fn sum_from<T: Element>(init: T, data: &[T]) -> T {
    let mut total = init;
    let mut quads = data.chunks_exact(4);
    for quad in &mut quads {
        total = total.lane_add(quad[0]);
        total = total.lane_add(quad[1]);
        total = total.lane_add(quad[2]);
        total = total.lane_add(quad[3]);
    }
    for &x in quads.remainder() {
        total = total.lane_add(x);
    }
    total
}

/// Minimum of a non-empty slice
///
/// # Panics
///
/// Panics if `data` is empty.
#[inline]
pub fn min<T: Element>(data: &[T]) -> T {
    assert!(!data.is_empty(), "minimum of an empty slice");
    min_from(data[0], &data[1..])
}

/// Fold `data` into a running minimum
#[inline]
pub fn min_from<T: Element>(init: T, data: &[T]) -> T {
    data.iter().fold(init, |best, &x| best.lane_min(x))
}

/// Elementwise `out[i] = a[i] + b[i]`
///
/// # Panics
///
/// Panics if the three slices differ in length.
#[inline]
pub fn add<T: Element>(a: &[T], b: &[T], out: &mut [T]) {
    assert_eq!(a.len(), b.len(), "Input slices must have the same length");
    assert_eq!(
        a.len(),
        out.len(),
        "Input and output slices must have the same length"
    );
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = x.lane_add(y);
    }
}
