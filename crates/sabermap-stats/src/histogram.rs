use std::ops::Range;

use serde::Serialize;

/// A fixed-width histogram.
///
/// Bins are half-open `[start, end)` except the last one, which also includes
/// the upper edge of the range so the maximum value is never dropped.
/// Values outside the range are ignored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

/// A single bin in a histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub range: Range<f32>,
    pub count: u64,
}

impl Histogram {
    /// Builds a histogram with `num_bins` equal-width bins.
    ///
    /// When `range` is `None` the data's own `[min, max]` is used. A degenerate
    /// range (all values equal) is widened by `0.5` on each side.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sabermap_stats::histogram::Histogram;
    /// let histogram = Histogram::new([0.0, 1.0, 1.5, 4.0], 4, Some(0.0..4.0));
    /// assert_eq!(histogram.counts(), vec![1, 2, 0, 1]);
    ///
    /// let empty = Histogram::new([], 4, None);
    /// assert!(empty.bins.is_empty());
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn new<I>(values: I, num_bins: usize, range: Option<Range<f32>>) -> Self
    where
        I: IntoIterator<Item = f32>,
    {
        let values = values
            .into_iter()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        if num_bins == 0 {
            return Self { bins: vec![] };
        }
        let range = match range {
            Some(range) => range,
            None => {
                if values.is_empty() {
                    return Self { bins: vec![] };
                }
                let min = values.iter().copied().fold(f32::INFINITY, f32::min);
                let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                min..max
            }
        };
        let (start, end) = if range.end - range.start < f32::EPSILON {
            (range.start - 0.5, range.start + 0.5)
        } else {
            (range.start, range.end)
        };
        let width = (end - start) / num_bins as f32;

        // Edges are computed from the start, never accumulated.
        let edge = |idx: usize| start + (end - start) * (idx as f32) / (num_bins as f32);
        let mut bins = (0..num_bins)
            .map(|idx| HistogramBin {
                range: edge(idx)..edge(idx + 1),
                count: 0,
            })
            .collect::<Vec<_>>();

        for value in values {
            if value < start || value > end {
                continue;
            }
            let idx = (((value - start) / width).floor() as usize).min(num_bins - 1);
            bins[idx].count += 1;
        }

        Self { bins }
    }

    #[must_use]
    pub fn counts(&self) -> Vec<u64> {
        self.bins.iter().map(|bin| bin.count).collect()
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_value_lands_in_last_bin() {
        let histogram = Histogram::new([0.0, 10.0], 5, None);
        assert_eq!(histogram.counts(), vec![1, 0, 0, 0, 1]);
        assert_eq!(histogram.bins[4].range.end, 10.0);
    }

    #[test]
    fn test_out_of_range_values_are_ignored() {
        let histogram = Histogram::new([-1.0, 0.5, 2.0, f32::NAN], 2, Some(0.0..1.0));
        assert_eq!(histogram.counts(), vec![0, 1]);
        assert_eq!(histogram.total(), 1);
    }

    #[test]
    fn test_degenerate_range_is_widened() {
        let histogram = Histogram::new([3.0, 3.0, 3.0], 2, None);
        assert_eq!(histogram.bins[0].range.start, 2.5);
        assert_eq!(histogram.total(), 3);
    }
}
