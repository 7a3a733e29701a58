use merging_tdigest::{Error, ScaleFunction, TDigest};

fn digest_from(values: &[f64]) -> TDigest {
    let mut digest = TDigest::default();
    for value in values {
        digest.insert(*value).unwrap();
    }
    digest
}

#[test]
fn example() {
    let mut digest = digest_from(&[1.0, 2.0, 3.0]);
    assert_eq!(digest.quantile(0.5), Ok(2.0));
}

#[test]
fn negative() {
    let mut digest = digest_from(&[-1.0, -2.0, -3.0]);
    assert_eq!(digest.quantile(0.5), Ok(-2.0));
    assert_eq!(digest.quantile(0.0), Ok(-3.0));
    assert_eq!(digest.quantile(1.0), Ok(-1.0));
}

#[test]
fn empty() {
    let mut digest = TDigest::default();
    for level in [0.0, 0.25, 0.5, 1.0] {
        assert!(digest.quantile(level).unwrap().is_nan());
    }
    assert!(digest.is_empty());
    assert_eq!(digest.min(), None);
    assert_eq!(digest.max(), None);
    assert!(digest.centroids().is_empty());
}

#[test]
fn single_sample() {
    let mut digest = TDigest::new(100.0).unwrap();
    digest.add(42.5, 3.0).unwrap();
    for level in [0.0, 0.001, 0.5, 0.999, 1.0] {
        assert_eq!(digest.quantile(level), Ok(42.5));
    }
}

#[test]
fn two_points() {
    let mut digest = TDigest::new(100.0).unwrap();
    digest.add(1.0, 1.0).unwrap();
    digest.add(3.0, 1.0).unwrap();
    assert_eq!(digest.quantile(0.5), Ok(2.0));
    assert_eq!(digest.quantile(0.0), Ok(1.0));
    assert_eq!(digest.quantile(1.0), Ok(3.0));
}

#[test]
fn digest_10() {
    let mut digest = digest_from(&(1u8..=10).map(f64::from).collect::<Vec<_>>());
    assert_eq!(digest.total_weight(), 10.0);

    for (level, expected) in [(0.0, 1.0), (0.1, 1.5), (0.5, 5.5), (0.9, 9.5), (1.0, 10.0)] {
        assert_eq!(digest.quantile(level), Ok(expected), "quantile {}", level);
    }
}

#[test]
fn extremes_follow_observed_range() {
    // Only positive values: the lower tail must not reach toward zero.
    let mut digest = digest_from(&[2.0, 3.0, 4.0, 5.0]);
    assert_eq!(digest.quantile(0.0), Ok(2.0));
    assert_eq!(digest.min(), Some(2.0));

    // Only negative values: the upper tail must not reach toward zero.
    let mut digest = digest_from(&[-5.0, -4.0, -3.0, -2.0]);
    assert_eq!(digest.quantile(1.0), Ok(-2.0));
    assert_eq!(digest.max(), Some(-2.0));
}

#[test]
fn weighted_samples() {
    let mut digest = TDigest::new(100.0).unwrap();
    digest.add(1.0, 1.0).unwrap();
    digest.add(2.0, 1.0).unwrap();
    digest.add(3.0, 2.0).unwrap();
    // Offset 2 sits between the middle of 2.0 (1.5) and the middle of 3.0 (3.0).
    let median = digest.quantile(0.5).unwrap();
    assert!((median - 7.0 / 3.0).abs() < 1e-12, "median {}", median);
}

#[test]
fn idempotent_flush() {
    let mut digest = TDigest::new(50.0).unwrap();
    for i in 0..1_000 {
        digest.add((i * 37 % 1_000) as f64, 1.0 + (i % 3) as f64).unwrap();
    }
    let first = digest.quantile(0.42).unwrap();
    let centroids = digest.centroids().to_vec();
    let second = digest.quantile(0.42).unwrap();
    assert_eq!(first, second);
    assert_eq!(centroids, digest.centroids());
}

#[test]
fn invalid_inputs() {
    let mut digest = TDigest::default();
    assert!(matches!(digest.add(f64::NAN, 1.0), Err(Error::InvalidValue(v)) if v.is_nan()));
    assert_eq!(digest.add(f64::INFINITY, 1.0), Err(Error::InvalidValue(f64::INFINITY)));
    assert_eq!(
        digest.add(f64::NEG_INFINITY, 1.0),
        Err(Error::InvalidValue(f64::NEG_INFINITY))
    );
    assert_eq!(digest.add(1.0, 0.0), Err(Error::InvalidWeight(0.0)));
    assert_eq!(digest.add(1.0, -2.0), Err(Error::InvalidWeight(-2.0)));
    assert!(matches!(digest.add(1.0, f64::NAN), Err(Error::InvalidWeight(_))));
    assert!(digest.is_empty());

    digest.insert(1.0).unwrap();
    assert_eq!(digest.quantile(-0.1), Err(Error::InvalidQuantile(-0.1)));
    assert_eq!(digest.quantile(1.1), Err(Error::InvalidQuantile(1.1)));
    assert_eq!(
        digest.quantile(f64::NEG_INFINITY),
        Err(Error::InvalidQuantile(f64::NEG_INFINITY))
    );
    assert!(matches!(digest.quantile(f64::NAN), Err(Error::InvalidQuantile(_))));
    assert_eq!(digest.quantiles().get(2.0), Err(Error::InvalidQuantile(2.0)));
}

#[test]
fn invalid_configuration() {
    for compression in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            TDigest::new(compression),
            Err(Error::InvalidCompression(_))
        ));
    }
    assert_eq!(
        TDigest::with_capacity(100.0, 0, 10),
        Err(Error::InvalidCapacity {
            name: "buffer_capacity",
            value: 0
        })
    );
    assert_eq!(
        TDigest::with_capacity(100.0, 10, 0),
        Err(Error::InvalidCapacity {
            name: "max_centroids",
            value: 0
        })
    );
}

#[test]
fn oversized_configuration() {
    for compression in [1e19, f64::MAX] {
        assert_eq!(
            TDigest::new(compression),
            Err(Error::InvalidCompression(compression))
        );
    }
    assert_eq!(
        TDigest::with_capacity(100.0, usize::MAX, 10),
        Err(Error::InvalidCapacity {
            name: "buffer_capacity",
            value: usize::MAX
        })
    );
    assert_eq!(
        TDigest::with_capacity(100.0, 10, usize::MAX),
        Err(Error::InvalidCapacity {
            name: "max_centroids",
            value: usize::MAX
        })
    );
}

#[test]
fn total_weight_stays_finite() {
    let mut digest = TDigest::new(100.0).unwrap();
    digest.add(1.0, 1e308).unwrap();
    assert_eq!(digest.add(2.0, 1e308), Err(Error::InvalidWeight(1e308)));
    assert_eq!(digest.total_weight(), 1e308);

    digest.flush();
    assert_eq!(digest.add(2.0, f64::MAX), Err(Error::InvalidWeight(f64::MAX)));
    assert_eq!(digest.quantile(0.5), Ok(1.0));
    assert_eq!(digest.centroids().len(), 1);
}

#[test]
fn extreme_magnitudes() {
    for scale_function in [ScaleFunction::WeightLimit, ScaleFunction::KScale] {
        let mut digest = TDigest::builder()
            .compression(10.0)
            .scale_function(scale_function)
            .build()
            .unwrap();
        for i in 0..2_000 {
            let value = if i % 2 == 0 { 1.5e308 } else { -1.5e308 };
            digest.insert(value).unwrap();
        }

        let mut prev = f64::NEG_INFINITY;
        for i in 0..=100 {
            let level = i as f64 / 100.0;
            let estimate = digest.quantile(level).unwrap();
            assert!(
                estimate.is_finite() && estimate.abs() <= 1.5e308 * (1.0 + 1e-12),
                "{:?}: quantile {} is {}",
                scale_function,
                level,
                estimate
            );
            assert!(estimate >= prev);
            prev = estimate;
        }
        assert_eq!(digest.quantile(0.0), Ok(-1.5e308));
        assert_eq!(digest.quantile(1.0), Ok(1.5e308));

        let centroids = digest.centroids();
        assert!(centroids.iter().all(|c| c.mean().is_finite()));
        assert!(centroids.windows(2).all(|pair| pair[0].mean() <= pair[1].mean()));
    }
}

#[test]
fn error_messages() {
    assert_eq!(
        Error::InvalidQuantile(1.5).to_string(),
        "quantile level must be in [0, 1], got 1.5"
    );
    assert_eq!(
        Error::InvalidCapacity {
            name: "max_centroids",
            value: 0
        }
        .to_string(),
        "max_centroids must be at least 1 and fit in memory, got 0"
    );
}

#[test]
fn default_capacities() {
    let digest = TDigest::default();
    assert_eq!(digest.compression(), 100.0);
    assert_eq!(digest.scale_function(), ScaleFunction::WeightLimit);
    assert_eq!(digest.buffer_capacity(), 500);
    assert_eq!(digest.max_centroids(), 210);

    let digest = TDigest::builder()
        .compression(33.3)
        .scale_function(ScaleFunction::KScale)
        .build()
        .unwrap();
    assert_eq!(digest.buffer_capacity(), 170);
    assert_eq!(digest.max_centroids(), 68);
}

#[test]
fn buffer_merges_when_full() {
    let mut digest = TDigest::with_capacity(100.0, 10, 210).unwrap();
    for i in 0..9 {
        digest.insert(i as f64).unwrap();
    }
    assert!(digest.centroids().is_empty());
    assert_eq!(digest.unmerged_weight(), 9.0);

    // The tenth sample would fill the last slot, so the first nine get merged.
    digest.insert(9.0).unwrap();
    assert_eq!(digest.centroids().len(), 9);
    assert_eq!(digest.unmerged_weight(), 1.0);
    assert_eq!(digest.total_weight(), 10.0);
}

#[test]
fn store_capacity_is_enforced() {
    let mut digest = TDigest::with_capacity(100.0, 1_000, 8).unwrap();
    for i in 0..100 {
        digest.insert(i as f64).unwrap();
    }
    let median = digest.quantile(0.5).unwrap();

    let centroids = digest.centroids();
    assert!(centroids.len() <= 8, "{} centroids", centroids.len());
    assert!(centroids.windows(2).all(|pair| pair[0].mean() <= pair[1].mean()));
    let sum: f64 = centroids.iter().map(|c| c.weight()).sum();
    assert!((sum - 100.0).abs() < 1e-9);
    assert!((30.0..70.0).contains(&median), "median {}", median);
    assert_eq!(digest.min(), Some(0.0));
    assert_eq!(digest.max(), Some(99.0));
}

#[test]
fn clear_keeps_configuration() {
    let mut digest = TDigest::builder()
        .compression(20.0)
        .scale_function(ScaleFunction::KScale)
        .build()
        .unwrap();
    for i in 0..500 {
        digest.insert(i as f64).unwrap();
    }
    digest.clear();
    assert!(digest.is_empty());
    assert_eq!(digest.total_weight(), 0.0);
    assert!(digest.quantile(0.5).unwrap().is_nan());
    assert_eq!(digest.compression(), 20.0);
    assert_eq!(digest.scale_function(), ScaleFunction::KScale);

    digest.insert(7.0).unwrap();
    assert_eq!(digest.quantile(0.9), Ok(7.0));
    assert_eq!(digest.min(), Some(7.0));
}

#[test]
fn quantiles_match_quantile() {
    let mut digest = TDigest::new(30.0).unwrap();
    for i in 0..10_000 {
        digest.add((i % 977) as f64, 0.5).unwrap();
    }
    let expected: Vec<f64> = (0..=20)
        .map(|i| digest.quantile(i as f64 / 20.0).unwrap())
        .collect();

    let quantiles = digest.quantiles();
    for (i, expected) in expected.into_iter().enumerate() {
        assert_eq!(quantiles.get(i as f64 / 20.0), Ok(expected));
    }
}
