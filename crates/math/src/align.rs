//! Alignment planning
//!
//! Aligned-load kernels split a slice into a scalar prefix that walks up to the
//! next register-width boundary, a body of whole vectors, and a scalar suffix.
//! The prefix is derived from the slice's absolute address, never from its
//! length.

use core::mem::size_of;

/// Returned by [`plan_alignment`] when no prefix can reach the boundary
///
/// This happens when the address is not a multiple of the element size. Any
/// plan built from it covers the whole slice with the scalar prefix.
pub const UNREACHABLE: usize = usize::MAX;

/// Number of leading elements to skip before `ptr` is `lane_width_bytes`-aligned
///
/// # Panics
///
/// Panics if `lane_width_bytes` is not a power of two.
///
/// # Example
///
/// ```rust
/// use vreduce_math::plan_alignment;
///
/// // 0x1004 is 4 bytes past a 16-byte boundary: three i32s reach 0x1010
/// assert_eq!(plan_alignment(0x1004 as *const i32, 16), 3);
/// assert_eq!(plan_alignment(0x1010 as *const i32, 16), 0);
/// ```
#[inline]
pub fn plan_alignment<T>(ptr: *const T, lane_width_bytes: usize) -> usize {
    let elem = size_of::<T>();
    if elem == 0 {
        return 0;
    }
    assert!(
        lane_width_bytes.is_power_of_two(),
        "lane width must be a power of two, got {lane_width_bytes}"
    );

    let misalignment = (ptr as usize) & (lane_width_bytes - 1);
    if misalignment == 0 {
        return 0;
    }

    let gap = lane_width_bytes - misalignment;
    if gap % elem != 0 {
        return UNREACHABLE;
    }
    gap / elem
}

/// Per-call decomposition of a slice: `prefix + body + suffix == len`
///
/// `body` is always a multiple of the lane count. Plans are cheap values built
/// at the start of a kernel and dropped at its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReductionPlan {
    /// Leading elements handled scalarly to reach alignment
    pub prefix: usize,
    /// Elements covered by whole vectors
    pub body: usize,
    /// Trailing elements that do not fill a vector
    pub suffix: usize,
}

impl ReductionPlan {
    /// Plan for unaligned-load kernels: no prefix, `len % lanes` suffix
    #[inline]
    pub fn unaligned(len: usize, lanes: usize) -> Self {
        assert!(lanes > 0, "lane count must be non-zero");
        let body = len - len % lanes;
        Self {
            prefix: 0,
            body,
            suffix: len - body,
        }
    }

    /// Plan for aligned-load kernels over `data` with `lanes` elements per vector
    ///
    /// The register width is `lanes * size_of::<T>()` bytes. When the prefix
    /// would reach past the end of the slice the whole slice becomes prefix and
    /// the vector phase is skipped.
    #[inline]
    pub fn aligned<T>(data: &[T], lanes: usize) -> Self {
        assert!(lanes > 0, "lane count must be non-zero");
        let len = data.len();
        let prefix = plan_alignment(data.as_ptr(), lanes * size_of::<T>()).min(len);
        let rest = len - prefix;
        let body = rest - rest % lanes;
        Self {
            prefix,
            body,
            suffix: rest - body,
        }
    }

    /// Total number of elements covered
    #[inline]
    pub fn len(&self) -> usize {
        self.prefix + self.body + self.suffix
    }

    /// True if the plan covers no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the prefix, body and suffix of `data`
    ///
    /// # Panics
    ///
    /// Panics if the plan was built for a slice of a different length.
    #[inline]
    pub fn split<'a, T>(&self, data: &'a [T]) -> (&'a [T], &'a [T], &'a [T]) {
        assert_eq!(
            self.len(),
            data.len(),
            "reduction plan does not cover the slice"
        );
        let (prefix, rest) = data.split_at(self.prefix);
        let (body, suffix) = rest.split_at(self.body);
        (prefix, body, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C, align(64))]
    struct Aligned([i32; 64]);

    #[test]
    fn test_aligned_address_needs_no_prefix() {
        let buf = Aligned([0; 64]);
        assert_eq!(plan_alignment(buf.0.as_ptr(), 32), 0);
        assert_eq!(plan_alignment(buf.0.as_ptr(), 16), 0);
    }

    #[test]
    fn test_prefix_follows_address_not_length() {
        let buf = Aligned([0; 64]);
        for offset in 0..8 {
            let ptr = buf.0[offset..].as_ptr();
            let expected = (8 - offset) % 8;
            assert_eq!(plan_alignment(ptr, 32), expected, "offset {offset}");
            assert_eq!(plan_alignment(ptr, 16), (4 - offset % 4) % 4, "offset {offset}");
        }
    }

    #[test]
    fn test_unreachable_when_address_not_element_aligned() {
        assert_eq!(plan_alignment(0x1001 as *const i32, 16), UNREACHABLE);
        assert_eq!(plan_alignment(0x1003 as *const u16, 32), UNREACHABLE);
    }

    #[test]
    fn test_zero_sized_elements_never_need_prefix() {
        assert_eq!(plan_alignment(0x1001 as *const (), 32), 0);
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn test_rejects_non_power_of_two_width() {
        plan_alignment(0x1000 as *const i32, 24);
    }

    #[test]
    fn test_unaligned_plan_splits_tail() {
        let plan = ReductionPlan::unaligned(10, 4);
        assert_eq!(
            plan,
            ReductionPlan {
                prefix: 0,
                body: 8,
                suffix: 2
            }
        );
        assert_eq!(plan.len(), 10);
    }

    #[test]
    fn test_aligned_plan_invariant_for_every_offset() {
        let buf = Aligned([0; 64]);
        for offset in 0..16 {
            for len in 0..(64 - offset) {
                let slice = &buf.0[offset..offset + len];
                let plan = ReductionPlan::aligned(slice, 8);
                assert_eq!(plan.len(), len);
                assert_eq!(plan.body % 8, 0);
                let (_, body, _) = plan.split(slice);
                if !body.is_empty() {
                    assert_eq!(body.as_ptr() as usize % 32, 0);
                }
            }
        }
    }

    #[test]
    fn test_prefix_longer_than_slice_skips_vector_phase() {
        let buf = Aligned([0; 64]);
        let slice = &buf.0[1..4];
        let plan = ReductionPlan::aligned(slice, 8);
        assert_eq!(plan.prefix, 3);
        assert_eq!(plan.body, 0);
        assert_eq!(plan.suffix, 0);
    }

    #[test]
    #[should_panic(expected = "does not cover")]
    fn test_split_rejects_foreign_slice() {
        let plan = ReductionPlan::unaligned(8, 4);
        plan.split(&[1, 2, 3]);
    }
}
