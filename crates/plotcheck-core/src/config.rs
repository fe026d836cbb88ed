//! Run configuration
//!
//! The scenario matrix and every bound of a run are data, loaded from TOML:
//!
//! ```toml
//! kinds = ["line_chart", "area_chart", "polar_plot"]
//! variants = [1, 2]
//! artifact_dir = "output"
//! golden_dir = "test_data"
//! epsilon = 1e-5
//! snapshot_timeout_ms = 30000
//!
//! [strategies]
//! step_chart = "data-series"
//! ```

use crate::error::ConfigError;
use crate::scenario::Scenario;
use plotcheck_compare::Tolerance;
use plotcheck_extract::{ExtractionRegistry, StrategyName};
use plotcheck_figure::{ChartKind, Variant};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration of one verification run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Chart kinds, in report order
    pub kinds: Vec<ChartKind>,
    /// Variants verified for every kind
    pub variants: Vec<Variant>,
    /// Directory of rendered artifacts
    pub artifact_dir: PathBuf,
    /// Directory of golden records
    pub golden_dir: PathBuf,
    /// Absolute-error bound
    pub epsilon: f64,
    /// Deadline for an artifact to report loaded
    pub load_timeout_ms: u64,
    /// Deadline for a ready figure
    pub snapshot_timeout_ms: u64,
    /// Pause between figure polls
    pub poll_interval_ms: u64,
    /// Scenarios verified concurrently
    pub max_workers: usize,
    /// Extra kind to strategy bindings
    pub strategies: BTreeMap<ChartKind, StrategyName>,
}

impl RunConfig {
    /// Kinds the rendering pipeline produces by default
    pub const DEFAULT_KINDS: [ChartKind; 12] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::HorizontalBar,
        ChartKind::Pie,
        ChartKind::Scatter,
        ChartKind::Histogram,
        ChartKind::Box,
        ChartKind::Area,
        ChartKind::Stem,
        ChartKind::Heatmap,
        ChartKind::StackedBar,
        ChartKind::Polar,
    ];

    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// - `ConfigError::Parse` for invalid TOML or unknown keys
    /// - any error of [`RunConfig::validate`]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file cannot be read
    /// - any error of [`RunConfig::from_toml_str`]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded run configuration from {}", path.display());
        Ok(config)
    }

    /// Check the configuration describes a runnable matrix
    ///
    /// # Errors
    /// - `ConfigError::EmptyMatrix` if there are no kinds or no variants
    /// - `ConfigError::DuplicateKind` if a kind is listed twice
    /// - `ConfigError::ZeroWorkers` / `ConfigError::ZeroDuration`
    /// - `ConfigError::Tolerance` for an invalid epsilon
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kinds.is_empty() || self.variants.is_empty() {
            return Err(ConfigError::EmptyMatrix);
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = self.kinds.iter().find(|kind| !seen.insert(*kind)) {
            return Err(ConfigError::DuplicateKind(duplicate.to_string()));
        }

        if self.max_workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }

        for (field, value) in [
            ("load_timeout_ms", self.load_timeout_ms),
            ("snapshot_timeout_ms", self.snapshot_timeout_ms),
            ("poll_interval_ms", self.poll_interval_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroDuration(field));
            }
        }

        self.tolerance()?;
        Ok(())
    }

    /// Matrix in report order: kind-major, variants in listed order
    #[must_use]
    pub fn scenarios(&self) -> Vec<Scenario> {
        self.kinds
            .iter()
            .flat_map(|kind| {
                self.variants
                    .iter()
                    .map(move |variant| Scenario::new(kind.clone(), *variant))
            })
            .collect()
    }

    /// Comparator for the configured epsilon
    ///
    /// # Errors
    /// Returns `ConfigError::Tolerance` for a negative or non-finite epsilon
    pub fn tolerance(&self) -> Result<Tolerance, ConfigError> {
        Ok(Tolerance::new(self.epsilon)?)
    }

    /// Built-in registry plus the configured bindings
    #[must_use]
    pub fn registry(&self) -> ExtractionRegistry {
        let mut registry = ExtractionRegistry::with_defaults();
        for (kind, name) in &self.strategies {
            registry.register_named(kind.clone(), *name);
        }
        registry
    }

    /// Artifact load deadline
    #[inline]
    #[must_use]
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    /// Snapshot capture deadline
    #[inline]
    #[must_use]
    pub fn snapshot_timeout(&self) -> Duration {
        Duration::from_millis(self.snapshot_timeout_ms)
    }

    /// Pause between figure polls
    #[inline]
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// With chart kinds
    #[must_use]
    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = ChartKind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    /// With variants `1..=count`
    #[must_use]
    pub fn with_variant_count(mut self, count: u32) -> Self {
        self.variants = Variant::range(count).collect();
        self
    }

    /// With artifact directory
    #[inline]
    #[must_use]
    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = dir.into();
        self
    }

    /// With golden directory
    #[inline]
    #[must_use]
    pub fn with_golden_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.golden_dir = dir.into();
        self
    }

    /// With epsilon
    #[inline]
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// With max concurrent scenarios
    #[inline]
    #[must_use]
    pub fn with_max_workers(mut self, max: usize) -> Self {
        self.max_workers = max;
        self
    }

    /// With artifact load deadline
    #[inline]
    #[must_use]
    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With snapshot deadline
    #[inline]
    #[must_use]
    pub fn with_snapshot_timeout(mut self, timeout: Duration) -> Self {
        self.snapshot_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With poll interval
    #[inline]
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With an extra strategy binding
    #[must_use]
    pub fn with_strategy(mut self, kind: ChartKind, name: StrategyName) -> Self {
        self.strategies.insert(kind, name);
        self
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            kinds: Self::DEFAULT_KINDS.to_vec(),
            variants: Variant::range(2).collect(),
            artifact_dir: PathBuf::from("output"),
            golden_dir: PathBuf::from("test_data"),
            epsilon: Tolerance::DEFAULT_EPSILON,
            load_timeout_ms: 30_000,
            snapshot_timeout_ms: 30_000,
            poll_interval_ms: 100,
            max_workers: 4,
            strategies: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_pipeline() {
        let config = RunConfig::default();
        assert_eq!(config.kinds.len(), 12);
        assert_eq!(config.variants.iter().map(|v| v.get()).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(config.snapshot_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = RunConfig::from_toml_str(
            r#"
            kinds = ["line", "polar_plot", "step_chart"]
            variants = [3]
            epsilon = 0.001

            [strategies]
            step_chart = "data-series"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.kinds,
            vec![
                ChartKind::Line,
                ChartKind::Polar,
                ChartKind::Custom("step_chart".to_string())
            ]
        );
        assert_eq!(config.variants, vec![Variant::new(3).unwrap()]);
        assert_eq!(config.max_workers, 4);
        assert_eq!(config.artifact_dir, PathBuf::from("output"));
        assert!(config
            .registry()
            .contains(&ChartKind::Custom("step_chart".to_string())));
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = RunConfig::from_toml_str("kindz = []").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_variant_rejected() {
        assert!(RunConfig::from_toml_str("variants = [0]").is_err());
    }

    #[test]
    fn unknown_strategy_rejected() {
        let err = RunConfig::from_toml_str("[strategies]\nline_chart = \"pixels\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn validation_errors() {
        let empty = RunConfig::default().with_kinds([]);
        assert!(matches!(empty.validate(), Err(ConfigError::EmptyMatrix)));

        let duplicate = RunConfig::default().with_kinds([ChartKind::Line, ChartKind::Line]);
        assert!(matches!(duplicate.validate(), Err(ConfigError::DuplicateKind(_))));

        let workers = RunConfig::default().with_max_workers(0);
        assert!(matches!(workers.validate(), Err(ConfigError::ZeroWorkers)));

        let timeout = RunConfig::default().with_snapshot_timeout(Duration::ZERO);
        assert!(matches!(
            timeout.validate(),
            Err(ConfigError::ZeroDuration("snapshot_timeout_ms"))
        ));

        let epsilon = RunConfig::default().with_epsilon(-1.0);
        assert!(matches!(epsilon.validate(), Err(ConfigError::Tolerance(_))));
    }

    #[test]
    fn scenarios_are_kind_major() {
        let config = RunConfig::default()
            .with_kinds([ChartKind::Area, ChartKind::Line])
            .with_variant_count(2);
        let stems: Vec<String> = config.scenarios().iter().map(ToString::to_string).collect();
        assert_eq!(
            stems,
            vec!["area_chart_1", "area_chart_2", "line_chart_1", "line_chart_2"]
        );
    }

    #[tokio::test]
    async fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plotcheck.toml");
        tokio::fs::write(&path, "max_workers = 8\n").await.unwrap();

        let config = RunConfig::load(&path).await.unwrap();
        assert_eq!(config.max_workers, 8);

        let missing = RunConfig::load(dir.path().join("absent.toml")).await;
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
