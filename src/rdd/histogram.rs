//! Equal-width density histograms for the distribution panels.

use serde::{Deserialize, Serialize};

use crate::error::BinningError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub range_start: f64,
    pub range_end: f64,
    pub count: u64,
    /// `count / (n * width)`, so bar areas sum to one
    pub density: f64,
}

/// Equal-width bins over `[min, max]`, last bin closed. Non-finite values are skipped.
///
/// A constant input spreads the bins over `[v - 0.5, v + 0.5]`, so every value
/// falls in the middle bin.
pub fn density_histogram(values: &[f64], bins: usize) -> Result<Vec<HistogramBin>, BinningError> {
    if bins == 0 {
        return Err(BinningError::NoBins);
    }
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Ok(Vec::new());
    }
    let n = finite.len() as f64;
    let mut min = finite.iter().cloned().fold(f64::INFINITY, f64::min);
    let mut max = finite.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max - min < f64::EPSILON {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0u64; bins];
    for &v in &finite {
        let idx = ((v - min) / width) as usize;
        counts[idx.min(bins - 1)] += 1;
    }

    Ok(counts
        .iter()
        .enumerate()
        .map(|(i, &c)| HistogramBin {
            range_start: min + i as f64 * width,
            range_end: min + (i + 1) as f64 * width,
            count: c,
            density: c as f64 / (n * width),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_density_integrates_to_one() {
        let values: Vec<f64> = (0..97).map(|i| (i as f64 * 7.3) % 41.0 - 20.0).collect();
        let hist = density_histogram(&values, 30).unwrap();
        assert_eq!(hist.len(), 30);
        let area: f64 = hist
            .iter()
            .map(|b| b.density * (b.range_end - b.range_start))
            .sum();
        assert_relative_eq!(area, 1.0, epsilon = 1e-9);
        assert_eq!(hist.iter().map(|b| b.count).sum::<u64>(), 97);
    }

    #[test]
    fn test_max_lands_in_last_bin() {
        let hist = density_histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 4).unwrap();
        assert_eq!(
            hist.iter().map(|b| b.count).collect::<Vec<_>>(),
            vec![1, 1, 1, 2]
        );
        assert_relative_eq!(hist[3].range_end, 4.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(density_histogram(&[], 30).unwrap().is_empty());
        assert_eq!(density_histogram(&[1.0], 0), Err(BinningError::NoBins));

        let constant = density_histogram(&[3.0, 3.0, 3.0], 30).unwrap();
        assert_eq!(constant.len(), 30);
        assert_relative_eq!(constant[0].range_start, 2.5);
        assert_relative_eq!(constant[29].range_end, 3.5, epsilon = 1e-12);
        let filled: Vec<&HistogramBin> = constant.iter().filter(|b| b.count > 0).collect();
        assert_eq!(filled.len(), 1);
        assert_eq!(filled[0].count, 3);
        assert!(filled[0].range_start <= 3.0 && 3.0 < filled[0].range_end);
        assert_relative_eq!(filled[0].density, 30.0, epsilon = 1e-9);
    }
}
