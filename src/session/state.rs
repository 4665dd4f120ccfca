use serde::Serialize;

use super::courier::Delivery;
use super::store::{StateKey, StateStore, encode};
use crate::core::{ScrapedRecord, Semester};
use crate::error::StoreError;

/// Week count assumed when a stored session predates `totalWeeks`
pub(crate) const DEFAULT_TOTAL_WEEKS: u32 = 13;

/// Everything a session carries between page loads
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionState {
    pub(crate) events: Vec<ScrapedRecord>,
    /// Weeks already processed
    pub(crate) forward: u32,
    pub(crate) total_weeks: u32,
    pub(crate) semester: Semester,
    pub(crate) year: i32,
}

impl SessionState {
    pub(crate) fn new(semester: Semester, year: i32, total_weeks: u32) -> Self {
        Self {
            events: Vec::new(),
            forward: 0,
            total_weeks,
            semester,
            year,
        }
    }

    /// Load the active session. `None` when no `events` key exists.
    pub(crate) fn load<S: StateStore>(store: &S) -> Result<Option<Self>, StoreError> {
        let Some(events) = store.get::<Vec<ScrapedRecord>>(StateKey::Events)? else {
            return Ok(None);
        };
        let semester = store
            .get::<Semester>(StateKey::Semester)?
            .unwrap_or(Semester::First);
        Ok(Some(Self {
            events,
            forward: store.get(StateKey::Forward)?.unwrap_or(0),
            total_weeks: store
                .get(StateKey::TotalWeeks)?
                .unwrap_or(DEFAULT_TOTAL_WEEKS),
            semester,
            year: store.get(StateKey::Year)?.unwrap_or_default(),
        }))
    }

    /// Write every session key in one batch
    pub(crate) fn save<S: StateStore>(&self, store: &mut S) -> Result<(), StoreError> {
        store.write(&[
            (StateKey::Events, encode(StateKey::Events, &self.events)?),
            (StateKey::Forward, encode(StateKey::Forward, &self.forward)?),
            (
                StateKey::TotalWeeks,
                encode(StateKey::TotalWeeks, &self.total_weeks)?,
            ),
            (StateKey::Semester, encode(StateKey::Semester, &self.semester)?),
            (StateKey::Year, encode(StateKey::Year, &self.year)?),
        ])
    }

    /// Persist the week cursor together with the records collected so far.
    /// Returns `false` when the session was cancelled in the meantime.
    pub(crate) fn save_progress<S: StateStore>(&self, store: &mut S) -> Result<bool, StoreError> {
        store.write_if_active(&[
            (StateKey::Events, encode(StateKey::Events, &self.events)?),
            (StateKey::Forward, encode(StateKey::Forward, &self.forward)?),
        ])
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.forward >= self.total_weeks
    }
}

/// How a finished session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Calendar handed to the courier; `delivery` is informational only
    Downloaded { events: usize, delivery: Delivery },
    NoClasses,
    SynthesisFailed,
}

/// Where the session stands after one page load
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Phase {
    Idle,
    Scraping(SessionState),
    Finalizing(SessionState),
    Terminated(Outcome),
}

impl Phase {
    /// Phase implied by the stored state
    pub(crate) fn of(state: Option<SessionState>) -> Self {
        match state {
            None => Phase::Idle,
            Some(state) if state.is_complete() => Phase::Finalizing(state),
            Some(state) => Phase::Scraping(state),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Scraping(_) => "scraping",
            Phase::Finalizing(_) => "finalizing",
            Phase::Terminated(_) => "terminated",
        }
    }
}
