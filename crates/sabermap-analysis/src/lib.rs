//! Feature extraction and statistics over validated maps.
//!
//! This crate turns a [`Beatmap`](sabermap_model::Beatmap) and its
//! [`ValidationReport`](sabermap_validator::ValidationReport) into data that
//! map generation and recommendation models can consume.
//!
//! # Modules
//!
//! - [`window`]: Fixed-length windows with a fixed-shape feature vector each
//!   ([`FeatureExtractor`], [`WindowFeatures`])
//! - [`summary`]: Whole-map and collection statistics ([`MapSummary`],
//!   [`CollectionSummary`])
//! - [`batch`]: Parallel analysis of many maps with per-map errors
//! - [`config`]: [`AnalysisConfig`], the thresholds of one analysis run
//!
//! # Data Flow
//!
//! ```text
//! JSON ──loader──> Beatmap ──validate──> ValidationReport
//!                     │                        │
//!                     └──────┬─────────────────┘
//!                            ↓
//!                     FeatureExtractor ──> WindowFeatures ──> [f32; FEATURE_DIM]
//! ```
//!
//! # Determinism
//!
//! Every computation here is a pure function of the map and the config.
//! Running the same analysis twice gives bit-identical results, and batch
//! results do not depend on the number of worker threads.

pub use self::{batch::*, config::*, summary::*, window::*};

pub mod batch;
pub mod config;
pub mod summary;
pub mod window;
