//! A counting completion gate. The gate is sized when a generation is dispatched, every task
//! arrives exactly once (completed, aborted or faulted), and [Gate::wait] releases only when the
//! last one has.

use super::{Outcome, Report};
use crate::error::Error;
use std::{
    sync::{Condvar, Mutex, MutexGuard, PoisonError},
    thread,
};
use tracing::warn;

#[derive(Debug)]
struct Tally {
    pending: usize,
    report: Report,
}

#[derive(Debug)]
pub struct Gate {
    tally: Mutex<Tally>,
    released: Condvar,
}

impl Gate {
    pub fn new(count: usize) -> Self {
        Self {
            tally: Mutex::new(Tally {
                pending: count,
                report: Report::new(count),
            }),
            released: Condvar::new(),
        }
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, Tally> {
        self.tally.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A guard for task `idx` who arrives when dropped, so a task that unwinds still counts
    pub fn arrival(&self, idx: usize) -> Arrival<'_> {
        Arrival {
            gate: self,
            idx,
            outcome: None,
        }
    }

    pub fn arrive(&self, idx: usize, outcome: Outcome) {
        let mut tally = self.lock();
        if tally.pending == 0 {
            warn!(task = idx, "arrival at a released gate");
            return;
        }

        tally.report.record(idx, outcome);
        tally.pending -= 1;
        if tally.pending == 0 {
            self.released.notify_all();
        }
    }

    /// Tasks who have yet to arrive
    pub fn pending(&self) -> usize {
        self.lock().pending
    }

    /// Block until every task has arrived, then hand over what they reported
    pub fn wait(&self) -> Report {
        let mut tally = self
            .released
            .wait_while(self.lock(), |tally| tally.pending > 0)
            .unwrap_or_else(PoisonError::into_inner);
        let len = tally.report.len();
        std::mem::replace(&mut tally.report, Report::new(len))
    }
}

#[must_use = "an arrival reports as soon as it is dropped"]
pub struct Arrival<'g> {
    gate: &'g Gate,
    idx: usize,
    outcome: Option<Outcome>,
}

impl Arrival<'_> {
    pub fn complete(mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }
}

impl Drop for Arrival<'_> {
    fn drop(&mut self) {
        let outcome = self.outcome.take().unwrap_or_else(|| {
            Outcome::Faulted(Error::Fault(
                if thread::panicking() {
                    "task unwound before completing"
                } else {
                    "task abandoned before completing"
                }
                .to_string(),
            ))
        });
        self.gate.arrive(self.idx, outcome);
    }
}
