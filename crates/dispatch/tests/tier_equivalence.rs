//! Property-based tier equivalence tests
//!
//! Every tier the running CPU supports must agree with the left-to-right
//! scalar reference: exactly for integers (wrapping) and for minimum, within a
//! tolerance scaled by the L1 norm for float sums.


use proptest::prelude::*;
use test_utils::*;
use vreduce::{reduce_min, reduce_sum, Kernels};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_sum_i32_all_tiers(data in i32_buffer(1200)) {
        let expected = ref_sum_i32(&data);
        for k in supported_kernels::<i32>() {
            prop_assert_eq!(k.sum(&data), expected, "tier {}", k.tier());
        }
    }

    #[test]
    fn test_sum_u16_all_tiers(data in u16_buffer(1200)) {
        let expected = ref_sum_u16(&data);
        for k in supported_kernels::<u16>() {
            prop_assert_eq!(k.sum(&data), expected, "tier {}", k.tier());
        }
    }

    #[test]
    fn test_sum_f32_all_tiers(data in f32_buffer(1200)) {
        for k in supported_kernels::<f32>() {
            assert_sum_close(k.sum(&data), &data, k.tier().name());
        }
    }

    #[test]
    fn test_min_i32_all_tiers(data in i32_buffer(1200)) {
        let expected = data.iter().copied().min();
        for k in supported_kernels::<i32>() {
            prop_assert_eq!(k.min(&data).ok(), expected, "tier {}", k.tier());
        }
    }

    #[test]
    fn test_min_u16_all_tiers(data in u16_buffer(1200)) {
        let expected = data.iter().copied().min();
        for k in supported_kernels::<u16>() {
            prop_assert_eq!(k.min(&data).ok(), expected, "tier {}", k.tier());
        }
    }

    #[test]
    fn test_min_f32_all_tiers(data in f32_buffer(1200)) {
        prop_assume!(!data.is_empty());
        let expected = ref_min_f32(&data);
        for k in supported_kernels::<f32>() {
            prop_assert_eq!(k.min(&data), Ok(expected), "tier {}", k.tier());
        }
    }

    #[test]
    fn test_add_all_tiers(
        (a, b) in (0usize..300).prop_flat_map(|n| (
            prop::collection::vec(any::<i32>(), n),
            prop::collection::vec(any::<i32>(), n),
        ))
    ) {
        let expected: Vec<i32> = a.iter().zip(&b).map(|(x, y)| x.wrapping_add(*y)).collect();
        for k in supported_kernels::<i32>() {
            let got = k.add(&a, &b);
            prop_assert_eq!(got.as_ref(), Ok(&expected), "tier {}", k.tier());
        }
    }

    #[test]
    fn test_add_f32_all_tiers(
        (a, b) in (0usize..300).prop_flat_map(|n| (
            prop::collection::vec(-1e6f32..1e6, n),
            prop::collection::vec(-1e6f32..1e6, n),
        ))
    ) {
        // Lane addition is a single IEEE add per element, so results are exact
        let expected: Vec<f32> = a.iter().zip(&b).map(|(x, y)| x + y).collect();
        for k in supported_kernels::<f32>() {
            let got = k.add(&a, &b);
            prop_assert_eq!(got.as_ref(), Ok(&expected), "tier {}", k.tier());
        }
    }

    #[test]
    fn test_lane_boundary_lengths(len in lane_boundary_len(), seed in any::<u16>()) {
        let data: Vec<u16> = (0..len)
            .map(|i| seed.wrapping_mul(31).wrapping_add(i as u16 * 7))
            .collect();
        for k in supported_kernels::<u16>() {
            prop_assert_eq!(k.sum(&data), ref_sum_u16(&data), "tier {} len {}", k.tier(), len);
            let expected = data.iter().copied().min();
            prop_assert_eq!(k.min(&data).ok(), expected, "tier {} len {}", k.tier(), len);
        }
    }

    #[test]
    fn test_public_api_matches_reference(data in i32_buffer(600)) {
        prop_assert_eq!(reduce_sum(&data), ref_sum_i32(&data));
        prop_assert_eq!(reduce_min(&data).ok(), data.iter().copied().min());
    }
}

#[test]
fn test_every_offset_from_aligned_boundary() {
    let mut buf = Aligned([0.0f32; 256]);
    for (i, x) in buf.0.iter_mut().enumerate() {
        *x = ((i * 7919) % 100) as f32 - 49.5;
    }
    let mut ints = Aligned([0i32; 256]);
    for (i, x) in ints.0.iter_mut().enumerate() {
        *x = ((i * 7919) % 100) as i32 - 50;
    }
    let mut words = Aligned([0u16; 256]);
    for (i, x) in words.0.iter_mut().enumerate() {
        *x = ((i * 7919) % 60_000) as u16;
    }

    for k in supported_kernels::<f32>() {
        for offset in 0..16 {
            for len in [0, 1, 7, 8, 9, 31, 32, 33, 100, 200] {
                let slice = &buf.0[offset..offset + len];
                let context = format!("tier {} offset {} len {}", k.tier(), offset, len);
                assert_sum_close(k.sum(slice), slice, &context);
                if !slice.is_empty() {
                    assert_eq!(k.min(slice), Ok(ref_min_f32(slice)), "{context}");
                }
            }
        }
    }

    for k in supported_kernels::<i32>() {
        for offset in 0..16 {
            for len in [1, 7, 8, 9, 31, 32, 33, 100, 200] {
                let slice = &ints.0[offset..offset + len];
                let context = format!("tier {} offset {offset} len {len}", k.tier());
                assert_eq!(k.sum(slice), ref_sum_i32(slice), "{context}");
                assert_eq!(k.min(slice).ok(), slice.iter().copied().min(), "{context}");
            }
        }
    }

    // 16 u16 lanes per AVX2 register: prefixes of up to 15 elements
    for k in supported_kernels::<u16>() {
        for offset in 0..16 {
            for len in [1, 15, 16, 17, 63, 64, 65, 100, 200] {
                let slice = &words.0[offset..offset + len];
                let context = format!("tier {} offset {offset} len {len}", k.tier());
                assert_eq!(k.sum(slice), ref_sum_u16(slice), "{context}");
                assert_eq!(k.min(slice).ok(), slice.iter().copied().min(), "{context}");
            }
        }
    }
}

#[test]
fn test_repeated_calls_are_bit_identical() {
    let data: Vec<f32> = (0..10_000)
        .map(|i| ((i * 7919) % 1000) as f32 * 0.001 - 0.5)
        .collect();
    for k in supported_kernels::<f32>() {
        let first = k.sum(&data).to_bits();
        for _ in 0..10 {
            assert_eq!(k.sum(&data).to_bits(), first, "tier {}", k.tier());
        }
    }
}

#[test]
fn test_scalar_tier_is_exact_reference_order() {
    let data: Vec<f32> = (0..1001)
        .map(|i| (i as f32).sqrt() * if i % 3 == 0 { -1.0 } else { 1.0 })
        .collect();
    let scalar = Kernels::<f32>::scalar();
    assert_eq!(scalar.sum(&data).to_bits(), ref_sum_f32(&data).to_bits());
}
