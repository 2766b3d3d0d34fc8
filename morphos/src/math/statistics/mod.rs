//! Summary statistics over pixel values: mean, deviation, median, quantiles, MAD.
//!
//! Functions suffixed `_mut` reorder their input (quickselect). Every function
//! returns NaN for an empty slice.

use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter};

/// MAD (Median Absolute Deviation) to standard deviation conversion factor.
///
/// For a normal distribution, σ ≈ 1.4826 × MAD.
pub const MAD_TO_SIGMA: f64 = 1.4826;

#[inline]
fn total_order(a: &f64, b: &f64) -> std::cmp::Ordering {
    a.total_cmp(b)
}

#[inline]
pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

#[inline]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    sum(values) / values.len() as f64
}

/// Population standard deviation (`ddof = 0`).
pub fn standard_deviation(values: &[f64]) -> f64 {
    let mean = mean(values);
    if mean.is_nan() {
        return mean;
    }
    let variance = values
        .iter()
        .map(|v| (v - mean) * (v - mean))
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

#[inline]
pub fn minimum(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(f64::NAN)
}

#[inline]
pub fn maximum(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(f64::NAN)
}

/// Median; the two middle values are averaged for even lengths.
pub fn median_mut(data: &mut [f64]) -> f64 {
    let len = data.len();
    if len == 0 {
        return f64::NAN;
    }
    let mid = len / 2;

    let (left_part, median, _) = data.select_nth_unstable_by(mid, total_order);
    let upper = *median;
    if len & 1 == 1 {
        return upper;
    }
    let lower = left_part.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (lower + upper) * 0.5
}

/// Quantile `q` in `[0, 1]` with linear interpolation between the closest ranks.
pub fn quantile_mut(data: &mut [f64], q: f64) -> f64 {
    debug_assert!((0.0..=1.0).contains(&q));
    let len = data.len();
    if len == 0 {
        return f64::NAN;
    }

    let position = q * (len - 1) as f64;
    let rank = position.floor() as usize;
    let fraction = position - rank as f64;

    let (_, lower, right_part) = data.select_nth_unstable_by(rank, total_order);
    let lower = *lower;
    if fraction == 0.0 || right_part.is_empty() {
        return lower;
    }
    let upper = right_part.iter().copied().fold(f64::INFINITY, f64::min);
    lower + (upper - lower) * fraction
}

/// Median absolute deviation, scaled by [`MAD_TO_SIGMA`].
///
/// Replaces the contents of `data` with absolute deviations from the median.
pub fn median_absolute_deviation_mut(data: &mut [f64]) -> f64 {
    let median = median_mut(data);
    for v in data.iter_mut() {
        *v = (*v - median).abs();
    }
    median_mut(data) * MAD_TO_SIGMA
}

/// A scalar summary of a set of pixel values.
#[derive(Debug, Display, EnumIter, EnumCountMacro, Copy, Clone, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum Statistic {
    Integrated,
    Maximum,
    Mean,
    MedianAbsoluteDeviation,
    Median,
    Minimum,
    #[strum(serialize = "quantile_1")]
    Quantile1,
    #[strum(serialize = "quantile_3")]
    Quantile3,
    StandardDeviation,
}

impl Statistic {
    /// Reduces `data`, which may be reordered or overwritten.
    pub fn compute(self, data: &mut [f64]) -> f64 {
        match self {
            Statistic::Integrated => sum(data),
            Statistic::Maximum => maximum(data),
            Statistic::Mean => mean(data),
            Statistic::MedianAbsoluteDeviation => median_absolute_deviation_mut(data),
            Statistic::Median => median_mut(data),
            Statistic::Minimum => minimum(data),
            Statistic::Quantile1 => quantile_mut(data, 0.25),
            Statistic::Quantile3 => quantile_mut(data, 0.75),
            Statistic::StandardDeviation => standard_deviation(data),
        }
    }
}

/// Every [`Statistic`] of one set of values, computed in a single pass over a
/// shared buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    values: [f64; Statistic::COUNT],
}

impl Summary {
    pub fn of(mut data: Vec<f64>) -> Self {
        let mut values = [f64::NAN; Statistic::COUNT];
        // MAD overwrites the buffer, so it goes last.
        for statistic in Statistic::iter().filter(|s| *s != Statistic::MedianAbsoluteDeviation) {
            values[statistic as usize] = statistic.compute(&mut data);
        }
        values[Statistic::MedianAbsoluteDeviation as usize] =
            Statistic::MedianAbsoluteDeviation.compute(&mut data);
        Self { values }
    }

    #[inline]
    pub fn get(&self, statistic: Statistic) -> f64 {
        self.values[statistic as usize]
    }
}

#[cfg(test)]
mod tests;
