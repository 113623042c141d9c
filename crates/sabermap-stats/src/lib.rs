//! Statistical helpers shared by the sabermap crates.
//!
//! - **Descriptive statistics**: mean, median, variance and spread of a dataset
//! - **Percentiles**: nearest-rank percentile lookup
//! - **Histograms**: fixed-width binning over an explicit or data-derived range
//! - **Similarity**: normalization of count vectors and histogram cross-correlation
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`percentiles`]: Percentile computation and storage
//! - [`histogram`]: Fixed-width histograms
//! - [`similarity`]: Count normalization and normalized cross-correlation
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use sabermap_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.variance, 2.0);
//! ```
//!
//! ## Comparing two histograms
//!
//! ```
//! use sabermap_stats::similarity::{normalize_counts, normalized_cross_correlation};
//!
//! let left = normalize_counts(&[2, 0, 2]);
//! let right = normalize_counts(&[1, 0, 1]);
//! assert!((normalized_cross_correlation(&left, &right) - 1.0).abs() < 1e-6);
//! ```

pub mod descriptive;
pub mod histogram;
pub mod percentiles;
pub mod similarity;
