//! plotcheck figure model
//!
//! Leaf data types shared by every stage of chart verification.
//!
//! # Core Concepts
//!
//! - [`ChartKind`] / [`Variant`]: identify one rendered chart
//! - [`GoldenDataset`] / [`GoldenStore`]: expected data, one JSON record per pair
//! - [`FigureSnapshot`]: immutable copy of a rendered figure's object model
//! - [`ExtractedSeries`]: coordinates read out of a snapshot
//!
//! # Example
//!
//! ```rust,ignore
//! use plotcheck_figure::{ChartKind, GoldenStore, Variant};
//!
//! let store = GoldenStore::new("test_data");
//! let golden = store.load(&ChartKind::Line, Variant::new(1)?).await?;
//! println!("{} axes", golden.axis_count());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod axis;
mod golden;
mod kind;
mod series;
mod snapshot;

pub use axis::{AxisName, AxisPair};
pub use golden::{GoldenDataset, GoldenError, GoldenStore};
pub use kind::{ChartKind, KindError, Variant};
pub use series::{Alignment, ExtractedSeries};
pub use snapshot::{FigureSnapshot, SnapshotError, PRIMARY_SERIES};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
