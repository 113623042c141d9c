use serde::Serialize;

/// Descriptive statistics summarizing a dataset.
///
/// Variance is the population variance (divided by `count`), so a single value
/// has variance zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    /// Upper median for even counts.
    pub median: f32,
    pub variance: f32,
    pub std_dev: f32,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// Returns `None` if the dataset is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sabermap_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.median, 3.0);
    /// assert!(DescriptiveStats::new([]).is_none());
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f32::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f32]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f32;
        let mean = sorted_values.iter().copied().sum::<f32>() / n;
        let median = sorted_values[count / 2];
        let variance = sorted_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f32>()
            / n;

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            variance,
            std_dev: variance.sqrt(),
        })
    }

    /// Returns `(mean, variance)`, or zeros for an empty dataset.
    ///
    /// ```
    /// # use sabermap_stats::descriptive::DescriptiveStats;
    /// assert_eq!(DescriptiveStats::mean_variance_or_zero([]), (0.0, 0.0));
    /// assert_eq!(DescriptiveStats::mean_variance_or_zero([1.0, 3.0]), (2.0, 1.0));
    /// ```
    #[must_use]
    pub fn mean_variance_or_zero<I>(values: I) -> (f32, f32)
    where
        I: IntoIterator<Item = f32>,
    {
        Self::new(values).map_or((0.0, 0.0), |stats| (stats.mean, stats.variance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_value_has_zero_spread() {
        let stats = DescriptiveStats::new([0.25]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 0.25);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_population_variance() {
        let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.variance, 4.0);
        assert_eq!(stats.std_dev, 2.0);
    }

    #[test]
    #[should_panic(expected = "values must be sorted")]
    fn test_from_sorted_rejects_unsorted() {
        let _ = DescriptiveStats::from_sorted(&[3.0, 1.0]);
    }
}
