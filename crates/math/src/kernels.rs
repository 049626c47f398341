//! Strided slice kernels shared by every backend
//!
//! Each kernel is written once over [`LaneVector`] and marked
//! `#[inline(always)]` so it is compiled inside the calling entry point's
//! `#[target_feature]` context. Whole vectors are processed through the
//! register type; prefix and suffix elements go through the scalar backend in
//! index order.

use crate::align::ReductionPlan;
use crate::backends::scalar;
use crate::traits::{Element, LaneVector};

/// Sum with one accumulator and unaligned loads
#[inline(always)]
pub(crate) fn sum<V: LaneVector>(data: &[V::Elem]) -> V::Elem {
    let plan = ReductionPlan::unaligned(data.len(), V::LANES);
    let (_, body, suffix) = plan.split(data);

    let mut acc = V::zero();
    for chunk in body.chunks_exact(V::LANES) {
        acc = acc.add(V::load(chunk));
    }

    scalar::sum_from(acc.horizontal_sum(), suffix)
}

/// Sum with aligned loads and four independent accumulators
///
/// The accumulators are updated round-robin so consecutive adds do not wait on
/// each other, then combined as `(a0 + a1) + (a2 + a3)`. Whole vectors left
/// over after the last four-vector block go into `a0`.
#[cfg_attr(
    not(any(target_arch = "x86", target_arch = "x86_64")),
    allow(dead_code)
)]
#[inline(always)]
pub(crate) fn sum_aligned_pipelined<V: LaneVector>(data: &[V::Elem]) -> V::Elem {
    let plan = ReductionPlan::aligned(data, V::LANES);
    let (prefix, body, suffix) = plan.split(data);
    let head = scalar::sum(prefix);

    let lanes = V::LANES;
    let mut blocks = body.chunks_exact(lanes * 4);
    let (mut a0, mut a1, mut a2, mut a3) = (V::zero(), V::zero(), V::zero(), V::zero());

    for block in &mut blocks {
        a0 = a0.add(V::load_aligned(&block[..lanes]));
        a1 = a1.add(V::load_aligned(&block[lanes..2 * lanes]));
        a2 = a2.add(V::load_aligned(&block[2 * lanes..3 * lanes]));
        a3 = a3.add(V::load_aligned(&block[3 * lanes..]));
    }
    for chunk in blocks.remainder().chunks_exact(lanes) {
        a0 = a0.add(V::load_aligned(chunk));
    }

    let acc = a0.add(a1).add(a2.add(a3));
    scalar::sum_from(head.lane_add(acc.horizontal_sum()), suffix)
}

/// Minimum with unaligned loads; the accumulator is seeded from the first vector
///
/// # Panics
///
/// Panics if `data` is empty.
#[inline(always)]
pub(crate) fn min<V: LaneVector>(data: &[V::Elem]) -> V::Elem {
    assert!(!data.is_empty(), "minimum of an empty slice");
    let plan = ReductionPlan::unaligned(data.len(), V::LANES);
    let (_, body, suffix) = plan.split(data);

    let mut chunks = body.chunks_exact(V::LANES);
    let Some(first) = chunks.next() else {
        return scalar::min(suffix);
    };

    let mut acc = V::load(first);
    for chunk in chunks {
        acc = acc.min(V::load(chunk));
    }

    scalar::min_from(acc.horizontal_min(), suffix)
}

/// Minimum with aligned loads behind a scalar prefix
///
/// # Panics
///
/// Panics if `data` is empty.
#[cfg_attr(
    not(any(target_arch = "x86", target_arch = "x86_64")),
    allow(dead_code)
)]
#[inline(always)]
pub(crate) fn min_aligned<V: LaneVector>(data: &[V::Elem]) -> V::Elem {
    assert!(!data.is_empty(), "minimum of an empty slice");
    let plan = ReductionPlan::aligned(data, V::LANES);
    let (prefix, body, suffix) = plan.split(data);

    let mut chunks = body.chunks_exact(V::LANES);
    let Some(first) = chunks.next() else {
        return scalar::min(data);
    };

    let mut acc = V::load_aligned(first);
    for chunk in chunks {
        acc = acc.min(V::load_aligned(chunk));
    }

    let best = scalar::min_from(acc.horizontal_min(), prefix);
    scalar::min_from(best, suffix)
}

/// Elementwise `out[i] = a[i] + b[i]` in lane-width chunks plus a scalar tail
///
/// # Panics
///
/// Panics if the three slices differ in length.
#[inline(always)]
pub(crate) fn add<V: LaneVector>(a: &[V::Elem], b: &[V::Elem], out: &mut [V::Elem]) {
    assert_eq!(a.len(), b.len(), "Input slices must have the same length");
    assert_eq!(
        a.len(),
        out.len(),
        "Input and output slices must have the same length"
    );

    let body = ReductionPlan::unaligned(a.len(), V::LANES).body;
    let (a_body, a_tail) = a.split_at(body);
    let (b_body, b_tail) = b.split_at(body);
    let (out_body, out_tail) = out.split_at_mut(body);

    for ((ca, cb), co) in a_body
        .chunks_exact(V::LANES)
        .zip(b_body.chunks_exact(V::LANES))
        .zip(out_body.chunks_exact_mut(V::LANES))
    {
        V::load(ca).add(V::load(cb)).store(co);
    }

    scalar::add(a_tail, b_tail, out_tail);
}
