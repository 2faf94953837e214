//! Poll cycle scheduler.
//!
//! The scheduler is a two-state machine driven by a [`Timer`]:
//!
//! ```text
//!   +-----------+   cycle done    +--------+
//!   | Scraping  | --------------> |  Idle  |
//!   +-----------+                 +--------+
//!         ^      full interval slept   |
//!         +----------------------------+
//! ```
//!
//! Each call to [`Scheduler::step`] performs one transition. The idle phase
//! always sleeps the whole configured interval after a cycle finishes, so a
//! slow acquisition lengthens the gap instead of overlapping cycles.
//!
//! A cycle never fails as a whole. Acquisition errors end the cycle before
//! any write; persistence errors are logged and the remaining independent
//! steps still run. The next tick is the only retry.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use hubwatch_types::Entry;
use tracing::{error, info, warn};

use crate::aggregator;
use crate::config::HubwatchConfig;
use crate::meta::MetaHandle;
use crate::reconciler;
use crate::recorder;
use crate::report::{CycleOutcome, CycleReport, CycleStep, StepFailure};
use crate::source::{SnapshotSource, SourceError};
use crate::store::Store;

/// Digits of sub-second precision kept on a cycle's `now`.
///
/// Matches the microsecond resolution of `PostgreSQL` timestamps, so an
/// entry saved at `now` still compares equal to `now` after a round trip.
const NOW_SUBSEC_DIGITS: u16 = 6;

/// Source of the reference time for each cycle.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock [`Clock`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Sleeps between cycles.
pub trait Timer: Send + Sync {
    /// Wait for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// [`Timer`] backed by [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Timing parameters of the poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Sleep between the end of one cycle and the start of the next.
    pub poll_interval: Duration,
    /// Deadline for one snapshot acquisition.
    pub acquire_timeout: Duration,
    /// Maximum age of an unobserved entry before eviction.
    pub retention: TimeDelta,
}

impl From<&HubwatchConfig> for SchedulerConfig {
    fn from(config: &HubwatchConfig) -> Self {
        Self {
            poll_interval: config.scraper.poll_interval(),
            acquire_timeout: config.scraper.timeout(),
            retention: config.retention.window(),
        }
    }
}

/// Phase of the scheduler state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    /// Running a cycle.
    Scraping,
    /// Sleeping until the next cycle.
    Idle,
}

/// Drives the acquire → aggregate → persist → reconcile cycle.
#[derive(Debug)]
pub struct Scheduler<Src, St, C = SystemClock, T = TokioTimer> {
    source: Src,
    store: St,
    clock: C,
    timer: T,
    config: SchedulerConfig,
    meta: MetaHandle,
    phase: CyclePhase,
    cycles: u64,
}

impl<Src, St> Scheduler<Src, St>
where
    Src: SnapshotSource,
    St: Store,
{
    /// Create a scheduler on the wall clock and tokio timer.
    pub fn new(source: Src, store: St, config: SchedulerConfig, meta: MetaHandle) -> Self {
        Self::with_clock(source, store, SystemClock, TokioTimer, config, meta)
    }
}

impl<Src, St, C, T> Scheduler<Src, St, C, T>
where
    Src: SnapshotSource,
    St: Store,
    C: Clock,
    T: Timer,
{
    /// Create a scheduler with an explicit clock and timer.
    pub const fn with_clock(
        source: Src,
        store: St,
        clock: C,
        timer: T,
        config: SchedulerConfig,
        meta: MetaHandle,
    ) -> Self {
        Self {
            source,
            store,
            clock,
            timer,
            config,
            meta,
            phase: CyclePhase::Scraping,
            cycles: 0,
        }
    }

    /// Current phase.
    pub const fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// Number of cycles run so far.
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// The store this scheduler writes to.
    pub const fn store(&self) -> &St {
        &self.store
    }

    /// Perform one state transition.
    ///
    /// Returns the cycle report when the transition ran a cycle, `None`
    /// when it slept.
    pub async fn step(&mut self) -> Option<CycleReport> {
        match self.phase {
            CyclePhase::Scraping => {
                let report = self.run_cycle().await;
                self.cycles = self.cycles.saturating_add(1);
                self.phase = CyclePhase::Idle;
                Some(report)
            }
            CyclePhase::Idle => {
                self.timer.sleep(self.config.poll_interval).await;
                self.phase = CyclePhase::Scraping;
                None
            }
        }
    }

    /// Run the state machine for the lifetime of the process.
    pub async fn run(mut self) {
        info!(
            poll_interval_secs = self.config.poll_interval.as_secs(),
            acquire_timeout_secs = self.config.acquire_timeout.as_secs(),
            retention_hours = self.config.retention.num_hours(),
            "Scheduler starting"
        );
        loop {
            self.step().await;
        }
    }

    /// Run one complete cycle.
    pub async fn run_cycle(&self) -> CycleReport {
        let now = self.clock.now().trunc_subsecs(NOW_SUBSEC_DIGITS);
        let started = std::time::Instant::now();

        let snapshot = match self.acquire(now).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    error = %e,
                    elapsed_ms = started.elapsed().as_millis(),
                    "Snapshot acquisition failed, skipping cycle"
                );
                return CycleReport {
                    now,
                    outcome: CycleOutcome::AcquireFailed {
                        message: e.to_string(),
                    },
                };
            }
        };
        let (snapshot, impostors): (Vec<Entry>, Vec<Entry>) =
            snapshot.into_iter().partition(|entry| !entry.is_meta());
        if !impostors.is_empty() {
            warn!(
                dropped = impostors.len(),
                "Snapshot listed the meta title, dropping it"
            );
        }
        let observed = snapshot.len();
        let mut failures = Vec::new();

        let meta = aggregator::meta_entry(now, &snapshot);
        let meta_players = meta.players;
        self.meta.publish(meta.clone());

        let mut entries = snapshot;
        entries.push(meta);

        if let Err(e) = self.store.save_entries(&entries).await {
            error!(error = %e, count = entries.len(), "Error saving entries");
            failures.push(StepFailure {
                step: CycleStep::SaveSnapshot,
                message: e.to_string(),
            });
        }

        if let Err(e) = recorder::record(&self.store, now, &entries).await {
            error!(error = %e, "Error saving entry history");
            failures.push(StepFailure {
                step: CycleStep::AppendSnapshotHistory,
                message: e.to_string(),
            });
        }

        let (evicted, zeroed) =
            match reconciler::reconcile(&self.store, now, self.config.retention).await {
                Ok(reconciliation) => {
                    let applied = reconciler::apply(&self.store, now, &reconciliation).await;
                    failures.extend(applied.failures);
                    (applied.evicted, applied.zeroed)
                }
                Err(e) => {
                    error!(error = %e, "Error loading stored entries");
                    failures.push(StepFailure {
                        step: CycleStep::LoadStored,
                        message: e.to_string(),
                    });
                    (0, 0)
                }
            };

        info!(
            %now,
            observed,
            meta_players,
            evicted,
            zeroed,
            failures = failures.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "Cycle complete"
        );

        CycleReport {
            now,
            outcome: CycleOutcome::Completed {
                observed,
                meta_players,
                evicted,
                zeroed,
                failures,
            },
        }
    }

    async fn acquire(&self, now: DateTime<Utc>) -> Result<Vec<Entry>, SourceError> {
        let timeout = self.config.acquire_timeout;
        tokio::time::timeout(timeout, self.source.acquire(now))
            .await
            .map_err(|_elapsed| SourceError::Timeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            })?
    }
}
