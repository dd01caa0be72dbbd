//! Debounced autosave coordination.
//!
//! The coordinator is a deterministic state machine driven by caller-supplied
//! time, matching the single-threaded event-loop model: the host arms timers
//! from [`AutosaveCoordinator::next_deadline`] and calls
//! [`AutosaveCoordinator::poll`] when they fire. Bursts of mutations coalesce
//! into one save reflecting only the latest state; only one save is ever in
//! flight, and a mutation arriving mid-save re-arms the timer so a follow-up
//! save picks up the newest state.

use std::time::{Duration, Instant};

use crate::config::DebouncePolicy;

/// Classifies a mutation for debounce-interval selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationClass {
    /// Canvas-size / object-geometry changes; settle quickly.
    Geometry,
    /// Freeform content edits; settle slowly.
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Pending { due: Instant },
    Saving,
}

/// What the host should do after a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveDirective {
    /// Nothing due yet.
    Wait,
    /// Serialize the document and start a save now, then report the result
    /// via [`AutosaveCoordinator::finish_save`].
    BeginSave,
}

#[derive(Debug)]
pub struct AutosaveCoordinator {
    policy: DebouncePolicy,
    phase: Phase,
    /// A mutation landed while a save was in flight; re-arm on completion.
    dirty_during_save: Option<MutationClass>,
}

impl AutosaveCoordinator {
    pub fn new(policy: DebouncePolicy) -> Self {
        Self {
            policy,
            phase: Phase::Idle,
            dirty_during_save: None,
        }
    }

    pub fn is_saving(&self) -> bool {
        matches!(self.phase, Phase::Saving)
    }

    pub fn has_pending_work(&self) -> bool {
        !matches!(self.phase, Phase::Idle) || self.dirty_during_save.is_some()
    }

    fn interval_for(&self, class: MutationClass) -> Duration {
        match class {
            MutationClass::Geometry => self.policy.geometry(),
            MutationClass::Content => self.policy.content(),
        }
    }

    /// Records a mutation. Restarts the debounce timer (last-write-wins
    /// coalescing); during an in-flight save it only marks the state dirty.
    pub fn note_mutation(&mut self, class: MutationClass, now: Instant) {
        match self.phase {
            Phase::Idle | Phase::Pending { .. } => {
                let due = now + self.interval_for(class);
                self.phase = Phase::Pending { due };
            }
            Phase::Saving => {
                self.dirty_during_save = Some(class);
            }
        }
    }

    /// Next point in time at which [`poll`](Self::poll) may return
    /// [`SaveDirective::BeginSave`], if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::Pending { due } => Some(due),
            Phase::Idle | Phase::Saving => None,
        }
    }

    /// Transitions `Pending -> Saving` once the debounce interval has
    /// elapsed. The host must follow a `BeginSave` with `finish_save`.
    pub fn poll(&mut self, now: Instant) -> SaveDirective {
        match self.phase {
            Phase::Pending { due } if now >= due => {
                self.phase = Phase::Saving;
                SaveDirective::BeginSave
            }
            _ => SaveDirective::Wait,
        }
    }

    /// Forces an immediate save: cancels any pending timer. Returns `false`
    /// while another save is in flight (the dirty flag guarantees a follow-up
    /// instead).
    pub fn save_now(&mut self) -> bool {
        match self.phase {
            Phase::Idle | Phase::Pending { .. } => {
                self.phase = Phase::Saving;
                true
            }
            Phase::Saving => {
                self.dirty_during_save = Some(MutationClass::Content);
                false
            }
        }
    }

    /// Reports save completion. Failures return to `Idle` without retrying;
    /// the next mutation (or a manual save) is the retry trigger. A mutation
    /// that arrived during the save re-arms the debounce timer so the final
    /// persisted state reflects it.
    pub fn finish_save(&mut self, success: bool, now: Instant) {
        debug_assert!(matches!(self.phase, Phase::Saving));
        self.phase = Phase::Idle;
        if let Some(class) = self.dirty_during_save.take() {
            self.note_mutation(class, now);
        } else if !success {
            tracing::debug!("autosave failed; awaiting next mutation before retrying");
        }
    }
}
