use serde::Serialize;

/// Precomputed percentile values for a dataset.
///
/// # Examples
///
/// ```
/// use sabermap_stats::percentiles::Percentiles;
///
/// let values = [0.5, 0.25, 1.0, 0.5];
/// let percentiles = Percentiles::new(&values, &[50.0, 95.0]);
///
/// assert_eq!(percentiles.get(50.0), Some(0.5));
/// assert_eq!(percentiles.get(95.0), Some(1.0));
/// assert_eq!(percentiles.get(10.0), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Percentiles {
    /// `(percentile, value)` pairs in the order they were requested.
    values: Vec<(f32, f32)>,
}

impl Percentiles {
    /// Computes percentiles from unsorted values.
    ///
    /// An empty dataset produces an empty table rather than `NaN` entries.
    #[must_use]
    pub fn new(values: &[f32], percentile_points: &[f32]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f32::total_cmp);
        Self::from_sorted(&sorted, percentile_points)
    }

    /// Computes percentiles from values sorted in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f32], percentile_points: &[f32]) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );
        let values = percentile_points
            .iter()
            .filter_map(|&p| Some((p, compute_percentile(sorted_values, p)?)))
            .collect();
        Self { values }
    }

    /// Gets the value at a precomputed percentile.
    #[must_use]
    pub fn get(&self, percentile: f32) -> Option<f32> {
        self.values
            .iter()
            .find(|(p, _)| (*p - percentile).abs() < f32::EPSILON)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.values.iter().copied()
    }
}

/// Nearest-rank percentile of sorted data: the value at `floor(n * p / 100)`,
/// clamped to the last element.
///
/// ```
/// use sabermap_stats::percentiles::compute_percentile;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(compute_percentile(&values, 50.0), Some(3.0));
/// assert_eq!(compute_percentile(&values, 100.0), Some(5.0));
/// assert_eq!(compute_percentile(&[], 50.0), None);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f32], percentile: f32) -> Option<f32> {
    let last = sorted_values.len().checked_sub(1)?;
    let rank = (sorted_values.len() as f32 * percentile.clamp(0.0, 100.0) / 100.0) as usize;
    Some(sorted_values[rank.min(last)])
}
