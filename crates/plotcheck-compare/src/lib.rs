//! plotcheck comparison
//!
//! Element-wise comparison of golden and rendered sequences under an
//! absolute-error bound, and the verdict vocabulary every scenario ends in.
//!
//! # Example
//!
//! ```rust
//! use plotcheck_compare::{Tolerance, Verdict};
//!
//! let verdict = Tolerance::default().compare(&[1.0, 2.0, 3.0], &[1.000_000_1, 2.0, 3.0]);
//! assert!(verdict.is_pass());
//!
//! let verdict = Tolerance::default().compare(&[1.0, 2.0, 3.0], &[1.0, 2.0]);
//! assert_eq!(verdict.fail_reason().map(|r| r.code()), Some("length-mismatch"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod tolerance;
mod verdict;

pub use tolerance::{Tolerance, ToleranceError};
pub use verdict::{Assurance, FailReason, Verdict};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
