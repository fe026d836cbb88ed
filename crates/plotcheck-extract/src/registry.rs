//! Strategy registry keyed by chart kind
//!
//! Provides [`ExtractionRegistry`] for dispatching a snapshot to the strategy
//! that knows its kind's layout.

use crate::strategies::{ClosedPathStrategy, DataSeriesStrategy, PolarStrategy, PresenceStrategy};
use crate::strategy::{ExtractError, Extraction, ExtractionStrategy, StrategyName};
use plotcheck_figure::{ChartKind, FigureSnapshot};
use std::collections::HashMap;
use std::sync::Arc;

/// Built-in strategy instance for a name
#[must_use]
pub fn builtin(name: StrategyName) -> Arc<dyn ExtractionStrategy> {
    match name {
        StrategyName::DataSeries => Arc::new(DataSeriesStrategy),
        StrategyName::Polar => Arc::new(PolarStrategy),
        StrategyName::ClosedPath => Arc::new(ClosedPathStrategy),
        StrategyName::Presence => Arc::new(PresenceStrategy),
    }
}

/// Default strategy for a built-in kind, `None` for custom kinds
///
/// # Selection
/// - line, scatter, stem → `data-series`
/// - area → `closed-path`
/// - polar → `polar`
/// - every other built-in kind → `presence`
#[must_use]
pub fn default_strategy(kind: &ChartKind) -> Option<StrategyName> {
    match kind {
        ChartKind::Line | ChartKind::Scatter | ChartKind::Stem => Some(StrategyName::DataSeries),
        ChartKind::Area => Some(StrategyName::ClosedPath),
        ChartKind::Polar => Some(StrategyName::Polar),
        ChartKind::Custom(_) => None,
        _ => Some(StrategyName::Presence),
    }
}

/// Chart kind to extraction strategy map
///
/// Open for new kinds: registering a kind never touches existing entries.
#[derive(Debug, Default, Clone)]
pub struct ExtractionRegistry {
    strategies: HashMap<ChartKind, Arc<dyn ExtractionStrategy>>,
}

impl ExtractionRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Create registry with every built-in kind bound to its default strategy
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for kind in ChartKind::BUILTIN {
            if let Some(name) = default_strategy(&kind) {
                registry.register_named(kind, name);
            }
        }
        registry
    }

    /// Bind a kind to a strategy, returning the one it replaces
    pub fn register(
        &mut self,
        kind: ChartKind,
        strategy: Arc<dyn ExtractionStrategy>,
    ) -> Option<Arc<dyn ExtractionStrategy>> {
        self.strategies.insert(kind, strategy)
    }

    /// Bind a kind to a built-in strategy by name
    pub fn register_named(
        &mut self,
        kind: ChartKind,
        name: StrategyName,
    ) -> Option<Arc<dyn ExtractionStrategy>> {
        self.register(kind, builtin(name))
    }

    /// Check if a kind has a strategy
    #[inline]
    #[must_use]
    pub fn contains(&self, kind: &ChartKind) -> bool {
        self.strategies.contains_key(kind)
    }

    /// Unbind a kind
    #[inline]
    pub fn remove(&mut self, kind: &ChartKind) -> bool {
        self.strategies.remove(kind).is_some()
    }

    /// Strategy bound to a kind
    #[must_use]
    pub fn strategy_for(&self, kind: &ChartKind) -> Option<&dyn ExtractionStrategy> {
        self.strategies.get(kind).map(AsRef::as_ref)
    }

    /// Registered kinds, sorted
    #[must_use]
    pub fn kinds(&self) -> Vec<&ChartKind> {
        let mut kinds: Vec<_> = self.strategies.keys().collect();
        kinds.sort();
        kinds
    }

    /// Get number of registered kinds
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Extract the plotted data of a snapshot for `kind`
    ///
    /// # Errors
    /// - `ExtractError::UnsupportedKind` if nothing is registered for `kind`
    /// - any error of the registered strategy
    pub fn extract(
        &self,
        kind: &ChartKind,
        snapshot: &FigureSnapshot,
    ) -> Result<Extraction, ExtractError> {
        let strategy = self
            .strategy_for(kind)
            .ok_or_else(|| ExtractError::UnsupportedKind(kind.to_string()))?;
        strategy.extract(snapshot)
    }
}
