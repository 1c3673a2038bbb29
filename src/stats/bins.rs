//! Automatic histogram binning.
//!
//! Bin count is the larger of the Sturges and Freedman–Diaconis estimates
//! (the same pairing numpy's `bins='auto'` takes), clamped to `[1, 512]`.
//! Edges are equal-width over the observed range; zero-range data gets one
//! unit-width bin centered on the value so downstream code never divides by a
//! zero width.

use crate::stats::summary::quantile;

const MAX_BINS: usize = 512;

/// Equal-width bin edges for `values`; `edges.len()` is bin count + 1.
///
/// Empty input yields an empty vector (callers reject empty columns earlier).
pub fn auto_bin_edges(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(min.is_finite() && max.is_finite()) {
        return Vec::new();
    }
    if max == min {
        return vec![min - 0.5, min + 0.5];
    }

    let bins = auto_bin_count(values, max - min).clamp(1, MAX_BINS);
    let width = (max - min) / bins as f64;

    let mut edges = Vec::with_capacity(bins + 1);
    for i in 0..=bins {
        edges.push(min + width * i as f64);
    }
    // Make the last edge exact so max lands inside the final bin.
    edges[bins] = max;
    edges
}

fn auto_bin_count(values: &[f64], range: f64) -> usize {
    let n = values.len();
    let sturges = (n as f64).log2().ceil() as usize + 1;

    let q1 = quantile(values, 0.25).unwrap_or(0.0);
    let q3 = quantile(values, 0.75).unwrap_or(0.0);
    let iqr = q3 - q1;
    let fd_width = 2.0 * iqr / (n as f64).cbrt();
    let fd = if fd_width > 0.0 {
        (range / fd_width).ceil() as usize
    } else {
        0
    };

    sturges.max(fd)
}

/// Index of the bin containing `v` (half-open bins, last bin closed).
pub fn bin_index(v: f64, edges: &[f64]) -> Option<usize> {
    if edges.len() < 2 {
        return None;
    }
    let lo = edges[0];
    let hi = edges[edges.len() - 1];
    if v < lo || v > hi {
        return None;
    }
    let bins = edges.len() - 1;
    let idx = ((v - lo) / (hi - lo) * bins as f64).floor() as usize;
    Some(idx.min(bins - 1))
}

/// Per-bin counts for `values` against `edges`.
pub fn histogram_counts(values: &[f64], edges: &[f64]) -> Vec<usize> {
    if edges.len() < 2 {
        return Vec::new();
    }
    let mut counts = vec![0usize; edges.len() - 1];
    for &v in values {
        if let Some(idx) = bin_index(v, edges) {
            counts[idx] += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_range_gets_one_unit_bin() {
        let edges = auto_bin_edges(&[7.0, 7.0, 7.0]);
        assert_eq!(edges, vec![6.5, 7.5]);
        assert_eq!(histogram_counts(&[7.0, 7.0, 7.0], &edges), vec![3]);
    }

    #[test]
    fn edges_cover_the_data_range() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let edges = auto_bin_edges(&values);
        assert!(edges.len() >= 2);
        assert_eq!(edges[0], 0.0);
        assert_eq!(*edges.last().unwrap(), 99.0);
        // Every value lands in a bin and the counts add up.
        let counts = histogram_counts(&values, &edges);
        assert_eq!(counts.iter().sum::<usize>(), values.len());
    }

    #[test]
    fn max_value_falls_in_last_bin() {
        let edges = vec![0.0, 1.0, 2.0];
        assert_eq!(bin_index(2.0, &edges), Some(1));
        assert_eq!(bin_index(0.99, &edges), Some(0));
        assert_eq!(bin_index(2.1, &edges), None);
    }
}
