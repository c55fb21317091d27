//! Descriptive statistics over sample columns.

use serde::{Deserialize, Serialize};

/// Bin count used by the distribution view
pub const DEFAULT_HISTOGRAM_BINS: usize = 35;

/// Location and spread of one sampled output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub mean: f64,
    pub median: f64,
    pub p5: f64,
    pub p95: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl SummaryStats {
    /// Summarize a column. Returns `None` for an empty column.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            mean: mean(samples),
            median: percentile_sorted(&sorted, 50.0),
            p5: percentile_sorted(&sorted, 5.0),
            p95: percentile_sorted(&sorted, 95.0),
            std_dev: std_dev(samples),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        })
    }
}

pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Population variance (divides by n)
pub fn variance(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let m = mean(samples);
    samples.iter().map(|x| (x - m).powi(2)).sum::<f64>() / samples.len() as f64
}

/// Population standard deviation (divides by n)
pub fn std_dev(samples: &[f64]) -> f64 {
    variance(samples).sqrt()
}

/// Linear-interpolated percentile of an ascending slice, `p` in [0, 100]
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = rank - lo as f64;
    sorted[lo] * (1.0 - frac) + sorted[hi] * frac
}

/// Equal-width histogram over `[min, max]` of the samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// `bins + 1` ascending bin edges
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Midpoint of each bin
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }
}

/// Bucket samples into `bins` equal-width bins. The last bin is closed on the right.
///
/// A column with zero range puts every sample in the first bin.
pub fn histogram(samples: &[f64], bins: usize) -> Histogram {
    let bins = bins.max(1);
    let (min, max) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });
    if samples.is_empty() {
        return Histogram {
            edges: vec![0.0; bins + 1],
            counts: vec![0; bins],
        };
    }

    let width = (max - min) / bins as f64;
    let edges = (0..=bins)
        .map(|i| if i == bins { max } else { min + width * i as f64 })
        .collect();
    let mut counts = vec![0; bins];
    for &x in samples {
        let idx = if width > 0.0 {
            (((x - min) / width) as usize).min(bins - 1)
        } else {
            0
        };
        counts[idx] += 1;
    }

    Histogram { edges, counts }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile_sorted(&sorted, 50.0), 3.0);
        assert_eq!(percentile_sorted(&sorted, 0.0), 1.0);
        assert_eq!(percentile_sorted(&sorted, 100.0), 5.0);
        assert!((percentile_sorted(&sorted, 5.0) - 1.2).abs() < 1e-12);
        assert_eq!(percentile_sorted(&[], 50.0), 0.0);
    }

    #[test]
    fn summary_of_known_column() {
        let summary = SummaryStats::from_samples(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(summary.mean, 5.0);
        assert_eq!(summary.std_dev, 2.0);
        assert_eq!(summary.median, 4.5);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 9.0);
        assert!(SummaryStats::from_samples(&[]).is_none());
    }

    #[test]
    fn histogram_counts_every_sample() {
        let samples: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let hist = histogram(&samples, DEFAULT_HISTOGRAM_BINS);
        assert_eq!(hist.bins(), 35);
        assert_eq!(hist.edges.len(), 36);
        assert_eq!(hist.total(), 100);
        assert_eq!(hist.edges[0], 0.0);
        assert_eq!(hist.edges[35], 99.0);
    }

    #[test]
    fn histogram_of_constant_column() {
        let hist = histogram(&[3.0; 10], 4);
        assert_eq!(hist.counts, vec![10, 0, 0, 0]);
    }
}
