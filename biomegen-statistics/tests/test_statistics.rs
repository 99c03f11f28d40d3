use biomegen_statistics::{percentile, OnlineStatistics};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[test]
fn online_statistics_match_direct_formulas() {

    let mut rng = SmallRng::seed_from_u64(0);
    let data: Vec<f64> = (0..1000).map(|_| rng.gen_range(-5.0..15.0)).collect();

    let mut stats = OnlineStatistics::new();
    for x in &data { stats.accumulate(*x); }

    let mean = data.iter().sum::<f64>() / data.len() as f64;
    let var = data.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (data.len() - 1) as f64;

    assert_eq!(stats.count(), data.len());
    assert!((stats.avg() - mean).abs() < 1e-9);
    assert!((stats.var() - var).abs() < 1e-9);
    assert!((stats.min() - data.iter().cloned().fold(f64::INFINITY, f64::min)).abs() < 1e-12);
    assert!((stats.max() - data.iter().cloned().fold(f64::NEG_INFINITY, f64::max)).abs() < 1e-12);
}

#[test]
fn degenerate_samples() {

    let empty = OnlineStatistics::new();
    assert_eq!(empty.count(), 0);
    assert_eq!(empty.var(), 0.0);

    let mut single = OnlineStatistics::new();
    single.accumulate(3.5);
    assert_eq!(single.avg(), 3.5);
    assert_eq!(single.var(), 0.0);
    assert_eq!(single.min(), 3.5);
    assert_eq!(single.max(), 3.5);
}

#[test]
fn percentiles_interpolate_linearly() {

    let data: Vec<f64> = (1..=10).map(|i| i as f64).collect();

    assert!((percentile(&data, 0.0) - 1.0).abs() < 1e-12);
    assert!((percentile(&data, 100.0) - 10.0).abs() < 1e-12);
    assert!((percentile(&data, 50.0) - 5.5).abs() < 1e-12);
    assert!((percentile(&data, 5.0) - 1.45).abs() < 1e-12);
    assert!((percentile(&data, 25.0) - 3.25).abs() < 1e-12);
    assert!((percentile(&data, 75.0) - 7.75).abs() < 1e-12);
    assert!((percentile(&data, 95.0) - 9.55).abs() < 1e-12);
}

#[test]
fn percentile_of_single_observation() {
    assert_eq!(percentile(&[42.0], 5.0), 42.0);
    assert_eq!(percentile(&[42.0], 95.0), 42.0);
}
