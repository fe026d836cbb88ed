//! plotcheck core
//!
//! Verifies that rendered chart artifacts reproduce their golden datasets.
//!
//! # Pipeline
//!
//! For every (kind, variant) scenario of the configured matrix:
//!
//! 1. **Load**: open the artifact through an [`ArtifactOpener`]
//! 2. **Capture**: poll it for a ready figure ([`FigureAccessor`])
//! 3. **Extract**: read the plotted series with the kind's strategy
//! 4. **Compare**: check each axis against the golden dataset under a tolerance
//!
//! Each scenario ends in exactly one verdict. Scenario failures are verdicts;
//! only faults in the runner itself surface as [`RunError`].
//!
//! # Example
//!
//! ```rust,ignore
//! use plotcheck_core::{RunConfig, ScenarioRunner};
//!
//! let config = RunConfig::load("plotcheck.toml").await?;
//! let report = ScenarioRunner::new(&config)?.run().await?;
//! println!("{}", report.generate_text());
//! std::process::exit(report.exit_code());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod accessor;
mod artifact;
mod config;
mod error;
mod judge;
mod report;
mod runner;
mod scenario;

pub use accessor::FigureAccessor;
pub use artifact::{find_figure, ArtifactHandle, ArtifactOpener, HtmlArtifact, HtmlArtifactOpener};
pub use config::RunConfig;
pub use error::{ArtifactError, CaptureError, ConfigError, RunError, ScenarioError};
pub use judge::judge;
pub use report::{RunReport, ScenarioRecord};
pub use runner::ScenarioRunner;
pub use scenario::{allowed_transitions, validate_transition, Scenario, ScenarioState, StateTrace};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
