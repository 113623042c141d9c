//! Count normalization and histogram similarity.

/// Turns a fixed-size count vector into fractions of its total.
///
/// An all-zero input yields an all-zero output instead of dividing by zero.
///
/// ```
/// use sabermap_stats::similarity::normalize_counts;
///
/// assert_eq!(normalize_counts(&[1, 3]), [0.25, 0.75]);
/// assert_eq!(normalize_counts(&[0, 0]), [0.0, 0.0]);
/// ```
#[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
#[must_use]
pub fn normalize_counts<const N: usize>(counts: &[u32; N]) -> [f32; N] {
    let total = counts.iter().map(|&c| u64::from(c)).sum::<u64>();
    if total == 0 {
        return [0.0; N];
    }
    counts.map(|c| (f64::from(c) / total as f64) as f32)
}

/// Zero-lag normalized cross-correlation of two non-negative histograms.
///
/// Computes `Σ a·b / sqrt(Σ a² · Σ b²)`, which lies in `[0, 1]` for
/// non-negative input. Returns `0.0` when either histogram is all zero.
///
/// ```
/// use sabermap_stats::similarity::normalized_cross_correlation;
///
/// assert_eq!(normalized_cross_correlation(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
/// assert_eq!(normalized_cross_correlation(&[0.0, 1.0], &[0.0, 1.0]), 1.0);
/// assert_eq!(normalized_cross_correlation(&[0.0, 0.0], &[0.0, 1.0]), 0.0);
/// ```
#[expect(clippy::cast_possible_truncation)]
#[must_use]
pub fn normalized_cross_correlation(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "histograms must have the same shape");
    // Accumulated in f64.
    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a <= 0.0 || norm_b <= 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b).sqrt()).clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_histograms_are_fully_correlated() {
        let a = [0.5, 0.25, 0.25];
        let b = [1.0, 0.5, 0.5];
        assert!((normalized_cross_correlation(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_partial_overlap() {
        let a = normalize_counts(&[1, 1, 0]);
        let b = normalize_counts(&[0, 1, 1]);
        assert!((normalized_cross_correlation(&a, &b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_normalized_counts_sum_to_one() {
        let fractions = normalize_counts(&[3, 1, 4, 1, 5, 9, 2, 6, 5]);
        let sum = fractions.iter().sum::<f32>();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(fractions.iter().all(|f| (0.0..=1.0).contains(f)));
    }
}
