//! Scenario runner
//!
//! Drives every (kind, variant) scenario of the matrix through
//! load → capture → extract → compare:
//! - Scenarios run concurrently, at most `max_workers` at a time
//! - Each scenario ends in exactly one verdict; failures never abort others
//! - Records are reported in matrix order, not completion order

use crate::accessor::FigureAccessor;
use crate::artifact::{ArtifactOpener, HtmlArtifactOpener};
use crate::config::RunConfig;
use crate::error::{millis, ArtifactError, CaptureError, ConfigError, RunError, ScenarioError};
use crate::judge::judge;
use crate::report::{RunReport, ScenarioRecord};
use crate::scenario::{Scenario, ScenarioState, StateTrace};
use plotcheck_compare::{FailReason, Tolerance, Verdict};
use plotcheck_extract::{ExtractError, ExtractionRegistry};
use plotcheck_figure::{GoldenError, GoldenStore};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Everything a scenario needs, shared read-only across workers
#[derive(Debug, Clone)]
struct ScenarioContext {
    opener: Arc<dyn ArtifactOpener>,
    registry: ExtractionRegistry,
    golden: GoldenStore,
    accessor: FigureAccessor,
    tolerance: Tolerance,
    load_timeout: Duration,
}

/// Why a scenario stopped early
enum Halt {
    /// Scenario-local, becomes a Fail verdict
    Fail(ScenarioError),
    /// Runner fault, aborts the run
    Fatal(RunError),
}

impl From<ScenarioError> for Halt {
    fn from(error: ScenarioError) -> Self {
        Self::Fail(error)
    }
}

impl From<ArtifactError> for Halt {
    fn from(error: ArtifactError) -> Self {
        Self::Fail(error.into())
    }
}

impl From<CaptureError> for Halt {
    fn from(error: CaptureError) -> Self {
        Self::Fail(error.into())
    }
}

impl From<ExtractError> for Halt {
    fn from(error: ExtractError) -> Self {
        Self::Fail(error.into())
    }
}

impl From<GoldenError> for Halt {
    fn from(error: GoldenError) -> Self {
        Self::Fail(error.into())
    }
}

impl ScenarioContext {
    async fn execute(&self, scenario: Scenario) -> Result<ScenarioRecord, RunError> {
        let started = Instant::now();
        let mut trace = StateTrace::new();
        tracing::debug!("Scenario {} started", scenario);

        let verdict = match self.verify(&scenario, &mut trace).await {
            Ok(verdict) => verdict,
            Err(Halt::Fail(error)) => Verdict::Fail(FailReason::from(error)),
            Err(Halt::Fatal(error)) => return Err(error),
        };
        trace.advance(ScenarioState::Done)?;

        match &verdict {
            Verdict::Pass(assurance) => {
                tracing::info!("Scenario {} passed ({})", scenario, assurance);
            }
            Verdict::Fail(reason) => {
                tracing::warn!("Scenario {} failed [{}]: {}", scenario, reason.code(), reason);
            }
        }

        Ok(ScenarioRecord {
            kind: scenario.kind,
            variant: scenario.variant,
            verdict,
            states: trace.into_states(),
            elapsed_ms: millis(started.elapsed()),
        })
    }

    async fn verify(&self, scenario: &Scenario, trace: &mut StateTrace) -> Result<Verdict, Halt> {
        advance(trace, ScenarioState::ArtifactLoading)?;
        // Opening and loading share one deadline
        let deadline = Instant::now() + self.load_timeout;
        let opened = tokio::time::timeout_at(deadline, async {
            let mut handle = self.opener.open(&scenario.kind, scenario.variant).await?;
            handle.load().await?;
            Ok::<_, ArtifactError>(handle)
        })
        .await;
        let handle = match opened {
            Ok(handle) => handle?,
            Err(_) => {
                return Err(Halt::from(ScenarioError::ArtifactTimeout {
                    elapsed: self.load_timeout,
                }))
            }
        };

        advance(trace, ScenarioState::SnapshotPending)?;
        let snapshot = self.accessor.capture(handle.as_ref()).await?;
        drop(handle);

        advance(trace, ScenarioState::Extracting)?;
        let extraction = self.registry.extract(&scenario.kind, &snapshot)?;
        let golden = self.golden.load(&scenario.kind, scenario.variant).await?;

        advance(trace, ScenarioState::Comparing)?;
        Ok(judge(&self.tolerance, &extraction, &golden))
    }
}

fn advance(trace: &mut StateTrace, to: ScenarioState) -> Result<(), Halt> {
    trace.advance(to).map_err(Halt::Fatal)
}

/// Runs the kind × variant matrix
#[derive(Debug)]
pub struct ScenarioRunner {
    context: ScenarioContext,
    scenarios: Vec<Scenario>,
    max_workers: usize,
}

impl ScenarioRunner {
    /// Create runner for a configuration, reading HTML artifacts from
    /// `artifact_dir`
    ///
    /// # Errors
    /// Returns the configuration's validation error
    pub fn new(config: &RunConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let context = ScenarioContext {
            opener: Arc::new(HtmlArtifactOpener::new(config.artifact_dir.clone())),
            registry: config.registry(),
            golden: GoldenStore::new(config.golden_dir.clone()),
            accessor: FigureAccessor::new(config.snapshot_timeout())
                .with_poll_interval(config.poll_interval()),
            tolerance: config.tolerance()?,
            load_timeout: config.load_timeout(),
        };
        Ok(Self {
            context,
            scenarios: config.scenarios(),
            max_workers: config.max_workers,
        })
    }

    /// With a different artifact opener (e.g. a browser driver)
    #[must_use]
    pub fn with_opener(mut self, opener: Arc<dyn ArtifactOpener>) -> Self {
        self.context.opener = opener;
        self
    }

    /// With a different registry, replacing the configured one
    #[must_use]
    pub fn with_registry(mut self, registry: ExtractionRegistry) -> Self {
        self.context.registry = registry;
        self
    }

    /// Matrix in report order
    #[inline]
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Registry used for extraction
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &ExtractionRegistry {
        &self.context.registry
    }

    /// Run every scenario to completion
    ///
    /// # Errors
    /// Returns `RunError` only for faults in the runner itself; scenario
    /// failures are verdicts in the report
    pub async fn run(&self) -> Result<RunReport, RunError> {
        self.run_until(std::future::pending()).await
    }

    /// Run every scenario, stopping early when `cancel` resolves
    ///
    /// On cancellation in-flight scenarios are aborted and the report holds
    /// only the scenarios that completed, with `cancelled` set.
    ///
    /// # Errors
    /// Returns `RunError` only for faults in the runner itself
    pub async fn run_until<F>(&self, cancel: F) -> Result<RunReport, RunError>
    where
        F: Future<Output = ()>,
    {
        let started = Instant::now();
        tracing::info!(
            "Running {} scenarios with {} workers",
            self.scenarios.len(),
            self.max_workers
        );

        let shared = Arc::new(self.context.clone());
        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let mut workers = JoinSet::new();
        for (index, scenario) in self.scenarios.iter().cloned().enumerate() {
            let context = Arc::clone(&shared);
            let semaphore = Arc::clone(&semaphore);
            workers.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| RunError::PoolClosed)?;
                let record = context.execute(scenario).await?;
                Ok::<_, RunError>((index, record))
            });
        }

        let mut slots: Vec<Option<ScenarioRecord>> = vec![None; self.scenarios.len()];
        let mut cancelled = false;
        tokio::pin!(cancel);

        loop {
            tokio::select! {
                biased;
                () = &mut cancel, if !cancelled && !workers.is_empty() => {
                    tracing::warn!("Run cancelled; aborting {} in-flight scenarios", workers.len());
                    cancelled = true;
                    workers.abort_all();
                }
                joined = workers.join_next() => match joined {
                    None => break,
                    Some(Ok(Ok((index, record)))) => slots[index] = Some(record),
                    Some(Ok(Err(error))) => {
                        tracing::error!("Run aborted: {}", error);
                        return Err(error);
                    }
                    Some(Err(join)) if join.is_cancelled() => {}
                    Some(Err(join)) => {
                        tracing::error!("Scenario worker failed: {}", join);
                        return Err(RunError::WorkerFailed(join.to_string()));
                    }
                },
            }
        }

        // A cancel that lands after the last scenario finished interrupted nothing
        let cancelled = cancelled && slots.iter().any(Option::is_none);
        let report = RunReport {
            records: slots.into_iter().flatten().collect(),
            cancelled,
            elapsed_ms: millis(started.elapsed()),
        };
        tracing::info!(
            "Run finished: {} passed, {} failed{}",
            report.pass_count(),
            report.records.len() - report.pass_count(),
            if cancelled { " (cancelled)" } else { "" }
        );
        Ok(report)
    }
}
