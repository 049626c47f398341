//! Public reduction and elementwise entry points
//!
//! Each function forwards to the element type's cached [`Kernels`] table, so
//! the only per-call cost over a direct kernel call is one indirect jump.
//!
//! [`Kernels`]: crate::Kernels

use crate::dispatcher::DispatchElement;
use crate::error::Result;

/// Sum of all elements, computed with the widest supported kernel
///
/// Returns zero for an empty buffer. Integer sums wrap on overflow. Float sums
/// are reassociated by the vector lanes, so they can differ from a
/// left-to-right loop in the last bits.
///
/// # Example
///
/// ```rust
/// let data: Vec<i32> = (1..=10).collect();
/// assert_eq!(vreduce::reduce_sum(&data), 55);
/// assert_eq!(vreduce::reduce_sum::<f32>(&[]), 0.0);
/// ```
#[inline]
pub fn reduce_sum<T: DispatchElement>(data: &[T]) -> T {
    T::dispatched().sum(data)
}

/// Minimum element
///
/// # Errors
///
/// [`ReduceError::EmptyInput`](crate::ReduceError::EmptyInput) if `data` is empty.
///
/// # Example
///
/// ```rust
/// let data: [u16; 8] = [24, 56, 798, 12567, 8, 1887, 1, 7];
/// assert_eq!(vreduce::reduce_min(&data), Ok(1));
/// assert!(vreduce::reduce_min::<i32>(&[]).is_err());
/// ```
#[inline]
pub fn reduce_min<T: DispatchElement>(data: &[T]) -> Result<T> {
    T::dispatched().min(data)
}

/// Elementwise `a[i] + b[i]` into a newly allocated vector
///
/// # Errors
///
/// [`ReduceError::LengthMismatch`](crate::ReduceError::LengthMismatch) if the
/// inputs differ in length.
///
/// # Example
///
/// ```rust
/// let sum = vreduce::add(&[1.0f32, 2.0, 3.0], &[10.0, 20.0, 30.0]).unwrap();
/// assert_eq!(sum, vec![11.0, 22.0, 33.0]);
/// ```
pub fn add<T: DispatchElement>(a: &[T], b: &[T]) -> Result<Vec<T>> {
    T::dispatched().add(a, b)
}

/// Elementwise `out[i] = a[i] + b[i]` into a caller-owned buffer
///
/// # Errors
///
/// [`ReduceError::LengthMismatch`](crate::ReduceError::LengthMismatch) if the
/// inputs differ in length,
/// [`ReduceError::OutputLengthMismatch`](crate::ReduceError::OutputLengthMismatch)
/// if `out` does not match them.
#[inline]
pub fn add_into<T: DispatchElement>(a: &[T], b: &[T], out: &mut [T]) -> Result<()> {
    T::dispatched().add_into(a, b, out)
}
