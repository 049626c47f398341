//! Edge cases and concrete scenarios through the public API


use test_utils::*;
use vreduce::{
    add, add_into, plan_alignment, reduce_min, reduce_sum, ReduceError, ReductionPlan, UNREACHABLE,
};

#[test]
fn test_sum_one_to_ten() {
    let data: Vec<i32> = (1..=10).collect();
    assert_eq!(reduce_sum(&data), 55);
    let data: Vec<f32> = (1..=10).map(|x| x as f32).collect();
    assert_eq!(reduce_sum(&data), 55.0);
    let data: Vec<u16> = (1..=10).collect();
    assert_eq!(reduce_sum(&data), 55);
}

#[test]
fn test_min_benchmark_vector() {
    let data: [u16; 8] = [24, 56, 798, 12567, 8, 1887, 1, 7];
    assert_eq!(reduce_min(&data), Ok(1));
    let data: [i32; 8] = [24, 56, 798, 12567, 8, 1887, 1, 7];
    assert_eq!(reduce_min(&data), Ok(1));
}

#[test]
fn test_add_example() {
    assert_eq!(add(&[1, 2, 3], &[10, 20, 30]), Ok(vec![11, 22, 33]));
}

#[test]
fn test_empty_inputs() {
    assert_eq!(reduce_sum::<i32>(&[]), 0);
    assert_eq!(reduce_sum::<f32>(&[]), 0.0);
    assert_eq!(reduce_min::<u16>(&[]), Err(ReduceError::EmptyInput));
    assert_eq!(add::<f32>(&[], &[]), Ok(vec![]));
}

#[test]
fn test_single_element() {
    assert_eq!(reduce_sum(&[-7]), -7);
    assert_eq!(reduce_min(&[-7]), Ok(-7));
    assert_eq!(reduce_min(&[3.5f32]), Ok(3.5));
}

#[test]
fn test_sum_wraps_on_overflow() {
    assert_eq!(reduce_sum(&[i32::MAX, 1]), i32::MIN);
    // Overflow inside vector lanes as well as in the tail
    let data = vec![i32::MAX; 1001];
    assert_eq!(reduce_sum(&data), ref_sum_i32(&data));
    let data = vec![u16::MAX; 1001];
    assert_eq!(reduce_sum(&data), ref_sum_u16(&data));
}

#[test]
fn test_min_in_tail_and_prefix_positions() {
    for len in [5usize, 17, 33, 100] {
        for pos in [0, len / 2, len - 1] {
            let mut data = vec![1000i32; len];
            data[pos] = -1;
            assert_eq!(reduce_min(&data), Ok(-1), "len {len} pos {pos}");
        }
    }
}

#[test]
fn test_min_extremes() {
    let data = [0, i32::MIN, i32::MAX, -1, 1, 2, 3, 4, 5];
    assert_eq!(reduce_min(&data), Ok(i32::MIN));
    let data = [u16::MAX; 40];
    assert_eq!(reduce_min(&data), Ok(u16::MAX));
    let data = [f32::INFINITY, 1.0, f32::NEG_INFINITY, 0.0, 2.0];
    assert_eq!(reduce_min(&data), Ok(f32::NEG_INFINITY));
}

#[test]
fn test_length_mismatch() {
    assert_eq!(
        add(&[1, 2, 3], &[1, 2]),
        Err(ReduceError::LengthMismatch { left: 3, right: 2 })
    );
    let mut out = [0.0f32; 3];
    assert_eq!(
        add_into(&[1.0], &[1.0, 2.0], &mut out),
        Err(ReduceError::LengthMismatch { left: 1, right: 2 })
    );
    assert_eq!(
        add_into(&[1.0, 2.0], &[1.0, 2.0], &mut out),
        Err(ReduceError::OutputLengthMismatch {
            expected: 2,
            actual: 3
        })
    );
}

#[test]
fn test_failed_add_into_leaves_output_untouched() {
    let mut out = [9u16; 4];
    assert!(add_into(&[1, 2, 3, 4], &[1, 2, 3], &mut out).is_err());
    assert_eq!(out, [9; 4]);
}

#[test]
fn test_planner_on_aligned_buffer() {
    let buf = Aligned([0i32; 64]);
    assert_eq!(plan_alignment(buf.0.as_ptr(), 32), 0);
    assert_eq!(plan_alignment(buf.0[1..].as_ptr(), 32), 7);
    assert_eq!(plan_alignment(buf.0[8..].as_ptr(), 32), 0);
    assert_eq!(plan_alignment(buf.0[3..].as_ptr(), 16), 1);
}

#[test]
fn test_planner_unreachable_boundary() {
    let bytes = Aligned([0u8; 64]);
    // An i32 pointer one byte past a boundary can never reach the next one
    let ptr = bytes.0[1..].as_ptr() as *const i32;
    assert_eq!(plan_alignment(ptr, 32), UNREACHABLE);
}

#[test]
fn test_plan_covers_buffer_exactly() {
    let buf = Aligned([0f32; 64]);
    for offset in 0..8 {
        for len in 0..(64 - offset) {
            let slice = &buf.0[offset..offset + len];
            let plan = ReductionPlan::aligned(slice, 8);
            assert_eq!(plan.prefix + plan.body + plan.suffix, len);
            assert_eq!(plan.body % 8, 0);
            assert!(plan.prefix <= len);
        }
    }
}

#[test]
fn test_large_buffer_sum_and_min() {
    let data: Vec<i32> = (0..1_000_003i64)
        .map(|i| ((i * 7919) % 100) as i32)
        .collect();
    assert_eq!(reduce_sum(&data), ref_sum_i32(&data));
    assert_eq!(reduce_min(&data), Ok(0));

    // Integer-valued floats whose partial sums stay below 2^24 add exactly in any order
    let floats: Vec<f32> = data[..100_003].iter().map(|&x| x as f32).collect();
    assert_eq!(reduce_sum(&floats), ref_sum_f32(&floats));
}
