//! Tests for summary statistics.

use super::*;

// ---------------------------------------------------------------------------
// Moments
// ---------------------------------------------------------------------------

#[test]
fn test_sum_and_mean() {
    let values = [1.0, 2.0, 3.0, 6.0];
    assert!((sum(&values) - 12.0).abs() < 1e-12);
    assert!((mean(&values) - 3.0).abs() < 1e-12);
}

#[test]
fn test_standard_deviation_is_population() {
    let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    assert!((standard_deviation(&values) - 2.0).abs() < 1e-12);
}

#[test]
fn test_constant_values_have_zero_deviation() {
    let values = [0.5; 9];
    assert!(standard_deviation(&values).abs() < 1e-12);
}

#[test]
fn test_extrema() {
    let values = [0.25, -1.0, 3.5, 0.0];
    assert_eq!(minimum(&values), -1.0);
    assert_eq!(maximum(&values), 3.5);
}

#[test]
fn test_empty_input_is_nan() {
    assert!(mean(&[]).is_nan());
    assert!(standard_deviation(&[]).is_nan());
    assert!(minimum(&[]).is_nan());
    assert!(maximum(&[]).is_nan());
    assert!(median_mut(&mut []).is_nan());
    assert!(quantile_mut(&mut [], 0.5).is_nan());
}

// ---------------------------------------------------------------------------
// Order statistics
// ---------------------------------------------------------------------------

#[test]
fn test_median_odd() {
    let mut values = [1.0, 3.0, 2.0, 5.0, 4.0];
    assert!((median_mut(&mut values) - 3.0).abs() < 1e-12);
}

#[test]
fn test_median_even() {
    let mut values = [4.0, 1.0, 3.0, 2.0];
    assert!((median_mut(&mut values) - 2.5).abs() < 1e-12);
}

#[test]
fn test_quantiles_interpolate_linearly() {
    // numpy.quantile([1, 2, 3, 4], [0.25, 0.75]) == [1.75, 3.25]
    let mut values = [4.0, 2.0, 1.0, 3.0];
    assert!((quantile_mut(&mut values, 0.25) - 1.75).abs() < 1e-12);
    assert!((quantile_mut(&mut values, 0.75) - 3.25).abs() < 1e-12);
}

#[test]
fn test_quantile_endpoints() {
    let mut values = [0.3, 0.1, 0.9, 0.5];
    assert_eq!(quantile_mut(&mut values, 0.0), 0.1);
    assert_eq!(quantile_mut(&mut values, 1.0), 0.9);
    assert!((quantile_mut(&mut values, 0.5) - 0.4).abs() < 1e-12);
}

#[test]
fn test_quantile_single_value() {
    let mut values = [7.0];
    assert_eq!(quantile_mut(&mut values, 0.25), 7.0);
}

// ---------------------------------------------------------------------------
// MAD
// ---------------------------------------------------------------------------

#[test]
fn test_median_absolute_deviation_is_scaled() {
    // median 3, deviations [2, 1, 0, 1, 2] -> MAD 1
    let mut values = [1.0, 2.0, 3.0, 4.0, 5.0];
    let mad = median_absolute_deviation_mut(&mut values);
    assert!((mad - MAD_TO_SIGMA).abs() < 1e-12);
}

#[test]
fn test_median_absolute_deviation_uniform() {
    let mut values = [3.5; 6];
    assert!(median_absolute_deviation_mut(&mut values).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[test]
fn test_summary_matches_individual_statistics() {
    let values = vec![0.1, 0.7, 0.3, 0.3, 0.9, 0.0];
    let summary = Summary::of(values.clone());

    for statistic in Statistic::iter() {
        let mut data = values.clone();
        let expected = statistic.compute(&mut data);
        assert!(
            (summary.get(statistic) - expected).abs() < 1e-12,
            "{statistic}: {} != {expected}",
            summary.get(statistic)
        );
    }
}

#[test]
fn test_statistic_names() {
    assert_eq!(Statistic::MedianAbsoluteDeviation.to_string(), "median_absolute_deviation");
    assert_eq!(Statistic::Quantile1.to_string(), "quantile_1");
    assert_eq!(Statistic::StandardDeviation.to_string(), "standard_deviation");
}
