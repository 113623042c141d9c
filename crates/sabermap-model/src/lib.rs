//! Map model and grid geometry for sabermap.
//!
//! A [`Beatmap`] is built once, by [`BeatmapBuilder`] or by the JSON [`loader`],
//! and is immutable afterwards. Everything derived from it (validation reports,
//! feature windows, summaries) lives in other crates and refers to notes by
//! their index in [`Beatmap::notes`].
//!
//! # Example
//!
//! ```
//! use sabermap_model::{BeatmapBuilder, CutDirection, GridPosition, Note, Side};
//!
//! let map = BeatmapBuilder::new(120.0)
//!     .note(Note::new(0.0, GridPosition::new(1, 0)?, Side::Left, CutDirection::South))
//!     .note(Note::new(1.0, GridPosition::new(2, 0)?, Side::Right, CutDirection::South))
//!     .build()?;
//!
//! assert_eq!(map.notes_for_side(Side::Left).count(), 1);
//! assert_eq!(map.seconds_per_beat(), 0.5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::{error::*, geometry::*, model::*};

pub mod error;
pub mod geometry;
pub mod loader;
pub mod model;
