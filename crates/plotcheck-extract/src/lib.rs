//! plotcheck extraction
//!
//! Chart-kind-specific rules for reading plotted coordinates out of a
//! [`FigureSnapshot`](plotcheck_figure::FigureSnapshot).
//!
//! # Strategies
//!
//! - [`DataSeriesStrategy`]: `(x, y)` rows of the primary data series
//! - [`PolarStrategy`]: `(theta, r)` rows of the primary data series
//! - [`ClosedPathStrategy`]: filled-region polygon, closing vertex dropped
//! - [`PresenceStrategy`]: fallback tier, only checks a non-empty primary series
//!
//! # Example
//!
//! ```rust
//! use plotcheck_extract::{ExtractionRegistry, StrategyName};
//! use plotcheck_figure::ChartKind;
//!
//! let mut registry = ExtractionRegistry::with_defaults();
//! registry.register_named(ChartKind::Custom("step_chart".into()), StrategyName::DataSeries);
//! assert!(registry.contains(&ChartKind::Area));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod registry;
mod strategies;
mod strategy;

pub use registry::{builtin, default_strategy, ExtractionRegistry};
pub use strategies::{ClosedPathStrategy, DataSeriesStrategy, PolarStrategy, PresenceStrategy};
pub use strategy::{ExtractError, Extraction, ExtractionStrategy, StrategyName};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
