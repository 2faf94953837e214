//! Test doubles shared by the unit tests in this crate.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use hubwatch_types::{Entry, EntryId, HistoryPoint};

use crate::memory::MemoryStore;
use crate::scheduler::{Clock, Timer};
use crate::source::{SnapshotSource, SourceError};
use crate::store::{Store, StoreError};

/// A store operation, as seen by [`FailingStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Load,
    Save,
    Delete,
    Append,
}

/// A [`MemoryStore`] wrapper that logs calls and fails selected operations.
#[derive(Debug, Default)]
pub struct FailingStore {
    pub inner: MemoryStore,
    failing: Vec<Op>,
    calls: Mutex<Vec<Op>>,
}

impl FailingStore {
    pub fn failing_on(ops: &[Op]) -> Self {
        Self {
            inner: MemoryStore::new(),
            failing: ops.to_vec(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Op> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn check(&self, op: Op) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(op);
        if self.failing.contains(&op) {
            Err(StoreError::backend(format!("injected {op:?} failure")))
        } else {
            Ok(())
        }
    }
}

impl Store for FailingStore {
    async fn load_entries(&self) -> Result<Vec<Entry>, StoreError> {
        self.check(Op::Load)?;
        self.inner.load_entries().await
    }

    async fn save_entries(&self, entries: &[Entry]) -> Result<(), StoreError> {
        self.check(Op::Save)?;
        self.inner.save_entries(entries).await
    }

    async fn delete_entries(&self, entries: &[Entry]) -> Result<(), StoreError> {
        self.check(Op::Delete)?;
        self.inner.delete_entries(entries).await
    }

    async fn append_history(&self, points: &[HistoryPoint]) -> Result<(), StoreError> {
        self.check(Op::Append)?;
        self.inner.append_history(points).await
    }

    async fn entry(&self, id: EntryId) -> Result<Option<Entry>, StoreError> {
        self.inner.entry(id).await
    }

    async fn history(
        &self,
        id: EntryId,
        since: DateTime<Utc>,
    ) -> Result<Vec<HistoryPoint>, StoreError> {
        self.inner.history(id, since).await
    }
}

/// A source replaying a script of results, one per call; the last result
/// repeats once the script is exhausted.
#[derive(Debug)]
pub struct ScriptedSource {
    script: Mutex<Vec<Result<Vec<(String, u32)>, SourceError>>>,
    calls: Mutex<Vec<DateTime<Utc>>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<Vec<(&str, u32)>, SourceError>>) -> Self {
        let script = script
            .into_iter()
            .map(|step| {
                step.map(|listings| {
                    listings
                        .into_iter()
                        .map(|(title, players)| (title.to_owned(), players))
                        .collect()
                })
            })
            .rev()
            .collect();
        Self {
            script: Mutex::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<DateTime<Utc>> {
        self.calls.lock().unwrap().clone()
    }
}

impl SnapshotSource for ScriptedSource {
    async fn acquire(&self, now: DateTime<Utc>) -> Result<Vec<Entry>, SourceError> {
        self.calls.lock().unwrap().push(now);
        let step = {
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop().unwrap()
            } else {
                script.last().cloned().unwrap()
            }
        };
        step.map(|listings| {
            listings
                .into_iter()
                .map(|(title, players)| Entry::new(title, "", "", now, players))
                .collect()
        })
    }
}

/// A source that never answers.
#[derive(Debug, Default)]
pub struct HangingSource;

impl SnapshotSource for HangingSource {
    async fn acquire(&self, _now: DateTime<Utc>) -> Result<Vec<Entry>, SourceError> {
        std::future::pending::<()>().await;
        Ok(Vec::new())
    }
}

/// A clock that advances by a fixed step on every read.
#[derive(Debug)]
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
    step: TimeDelta,
}

impl SteppingClock {
    pub const fn new(start: DateTime<Utc>, step: TimeDelta) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap();
        let now = *next;
        *next = now + self.step;
        now
    }
}

/// A timer that records requested sleeps and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingTimer {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingTimer {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Timer for RecordingTimer {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}
