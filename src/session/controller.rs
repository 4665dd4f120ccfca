//! The scraping session state machine
//!
//! Every page load calls [`SessionController::advance`] exactly once. All
//! state lives in the store between calls, so a controller can be dropped and
//! rebuilt (or run from another process) at any page boundary.

use chrono::Days;
use tracing::{debug, error, info, warn};

use super::courier::{Courier, Delivery, DownloadMessage};
use super::state::{Outcome, Phase, SessionState};
use super::store::{StateKey, StateStore};
use crate::browser::Browser;
use crate::core::Semester;
use crate::error::{SessionError, StoreError};
use crate::extract::{extract_week, read_week_start};
use crate::location::LocationResolve;
use crate::semester::{boundaries_for, semester_weeks};
use crate::synth::synthesize;
use crate::utils::format_input_date;

pub(crate) const NO_CLASSES_MESSAGE: &str = "No classes found for this semester.";
pub(crate) const SYNTH_FAILED_MESSAGE: &str = "Failed to generate the calendar file.";

pub(crate) struct SessionController<S, L, C> {
    store: S,
    resolver: L,
    courier: C,
}

impl<S: StateStore, L: LocationResolve, C: Courier> SessionController<S, L, C> {
    pub(crate) fn new(store: S, resolver: L, courier: C) -> Self {
        Self {
            store,
            resolver,
            courier,
        }
    }

    /// Begin a new session, replacing any existing one, and load its first week
    pub(crate) fn start<B: Browser>(
        &mut self,
        browser: &mut B,
        semester: Semester,
        year: i32,
        weeks: Option<u32>,
    ) -> Result<SessionState, SessionError> {
        let start = boundaries_for(year)
            .and_then(|dates| dates.start_date(semester))
            .ok_or(SessionError::NoBoundaries { year })?;
        let total_weeks = match weeks {
            Some(weeks) => weeks,
            None => semester_weeks(year, semester).ok_or(SessionError::NoBoundaries { year })?,
        };

        let state = SessionState::new(semester, year, total_weeks);
        self.store.clear()?;
        state.save(&mut self.store)?;
        info!(%semester, year, weeks = total_weeks, %start, "session started");

        browser.set_date_input(&format_input_date(start));
        browser.submit_filter()?;
        Ok(state)
    }

    /// Reload the week the stored cursor points at
    pub(crate) fn resume<B: Browser>(&mut self, browser: &mut B) -> Result<SessionState, SessionError> {
        let state = SessionState::load(&self.store)?.ok_or(SessionError::NoActiveSession)?;
        if state.is_complete() {
            debug!("all weeks processed, next advance finalizes");
            return Ok(state);
        }

        let start = boundaries_for(state.year)
            .and_then(|dates| dates.start_date(state.semester))
            .ok_or(SessionError::NoBoundaries { year: state.year })?;
        let week_start = start
            .checked_add_days(Days::new(7 * u64::from(state.forward)))
            .ok_or(SessionError::NoBoundaries { year: state.year })?;
        info!(week = state.forward + 1, of = state.total_weeks, %week_start, "resuming session");

        browser.set_date_input(&format_input_date(week_start));
        browser.submit_filter()?;
        Ok(state)
    }

    /// Run one step for the page the browser currently shows
    pub(crate) fn advance<B: Browser>(&mut self, browser: &mut B) -> Result<Phase, SessionError> {
        match Phase::of(SessionState::load(&self.store)?) {
            Phase::Idle => Ok(Phase::Idle),
            Phase::Scraping(state) => self.scrape(browser, state),
            Phase::Finalizing(state) => Ok(Phase::Terminated(self.finalize(browser, state)?)),
            terminated @ Phase::Terminated(_) => Ok(terminated),
        }
    }

    fn scrape<B: Browser>(&mut self, browser: &mut B, mut state: SessionState) -> Result<Phase, SessionError> {
        let week = state.forward + 1;
        let page = browser.page();
        let extracted = read_week_start(page).and_then(|week_start| {
            extract_week(page, week_start, &self.resolver).collect::<Result<Vec<_>, _>>()
        });

        match extracted {
            Ok(records) => {
                info!(week, of = state.total_weeks, classes = records.len(), "week scraped");
                state.events.extend(records);
            }
            Err(e) => warn!(week, error = %e, "week skipped"),
        }

        state.forward += 1;
        match state.save_progress(&mut self.store) {
            Ok(true) => {}
            Ok(false) => {
                info!(week, "session cancelled while the week was scraped");
                return Ok(Phase::Idle);
            }
            Err(e) => error!(week, error = %e, "failed to save session progress"),
        }

        browser.next_week()?;
        Ok(Phase::of(Some(state)))
    }

    fn finalize<B: Browser>(&mut self, browser: &mut B, state: SessionState) -> Result<Outcome, SessionError> {
        // Cleared before anything is sent so a crash here cannot send twice
        self.store.clear()?;

        let outcome = if state.events.is_empty() {
            self.record_error(NO_CLASSES_MESSAGE);
            Outcome::NoClasses
        } else {
            match synthesize(&state.events) {
                Err(e) => {
                    warn!(error = %e, "calendar synthesis failed");
                    self.record_error(SYNTH_FAILED_MESSAGE);
                    Outcome::SynthesisFailed
                }
                Ok(value) => {
                    let message = DownloadMessage {
                        value,
                        semester: state.semester,
                        year: state.year,
                    };
                    let delivery = self.courier.send(&message);
                    match &delivery {
                        Delivery::Delivered => info!(file = %message.file_name(), "calendar delivered"),
                        Delivery::NoReceiver => warn!("calendar had no receiver"),
                        Delivery::Error(e) => warn!(error = %e, "calendar delivery failed"),
                    }
                    Outcome::Downloaded {
                        events: state.events.len(),
                        delivery,
                    }
                }
            }
        };

        browser.set_date_input("");
        if let Err(e) = browser.submit_filter() {
            warn!(error = %e, "failed to reset the timetable filter");
        }
        Ok(outcome)
    }

    fn record_error(&mut self, message: &str) {
        if let Err(e) = self.store.set(StateKey::LastError, &message) {
            error!(error = %e, message, "failed to record session error");
        }
    }

    /// Drop the active session, if any
    pub(crate) fn cancel(&mut self) -> Result<(), StoreError> {
        self.store.clear()?;
        info!("session cancelled");
        Ok(())
    }

    /// Read and clear the last terminal error
    pub(crate) fn take_last_error(&mut self) -> Result<Option<String>, StoreError> {
        let message = self.store.get::<String>(StateKey::LastError)?;
        if message.is_some() {
            self.store.remove(StateKey::LastError)?;
        }
        Ok(message)
    }

    /// The stored session, without changing it
    pub(crate) fn state(&self) -> Result<Option<SessionState>, StoreError> {
        SessionState::load(&self.store)
    }
    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::{Cell, RefCell};
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::path::PathBuf;

    use super::*;
    use crate::error::NavError;
    use crate::core::LocationInfo;
    use crate::extract::tests::{week_page, with_slot};
    use crate::location::tests::{BUILDING_212, CannedSearch};
    use crate::location::{Offline, Resolver};
    use crate::page::fixture::FixturePage;
    use crate::session::store::{MemoryStore, SqliteStore};

    /// Browser over in-memory pages; past the last page it shows a blank page
    pub(crate) struct FixtureBrowser {
        pages: Vec<FixturePage>,
        index: usize,
        blank: FixturePage,
        pub(crate) dates_set: Vec<String>,
        pub(crate) submits: usize,
        pub(crate) fail_next_week: bool,
    }

    impl FixtureBrowser {
        pub(crate) fn new(pages: Vec<FixturePage>) -> Self {
            Self {
                pages,
                index: 0,
                blank: FixturePage::new(),
                dates_set: Vec::new(),
                submits: 0,
                fail_next_week: false,
            }
        }
    }

    impl Browser for FixtureBrowser {
        type Page = FixturePage;

        fn page(&self) -> &FixturePage {
            self.pages.get(self.index).unwrap_or(&self.blank)
        }

        fn set_date_input(&mut self, value: &str) {
            self.dates_set.push(value.to_string());
        }

        fn submit_filter(&mut self) -> Result<(), NavError> {
            self.submits += 1;
            Ok(())
        }

        fn next_week(&mut self) -> Result<(), NavError> {
            if self.fail_next_week {
                return Err(NavError::MissingControl {
                    id: "WkNext".to_string(),
                });
            }
            self.index += 1;
            Ok(())
        }
    }

    /// Courier that remembers what it was sent
    #[derive(Default)]
    pub(crate) struct RecordingCourier {
        pub(crate) sent: RefCell<Vec<DownloadMessage>>,
        pub(crate) answer: Option<Delivery>,
    }

    impl Courier for RecordingCourier {
        fn send(&self, message: &DownloadMessage) -> Delivery {
            self.sent.borrow_mut().push(message.clone());
            self.answer.clone().unwrap_or(Delivery::Delivered)
        }
    }

    struct PanickingCourier {
        calls: Cell<usize>,
    }

    impl Courier for PanickingCourier {
        fn send(&self, _message: &DownloadMessage) -> Delivery {
            self.calls.set(self.calls.get() + 1);
            panic!("process killed mid-delivery");
        }
    }

    fn broken_week(date: &str) -> FixturePage {
        with_slot(week_page(date), "Mon", 0, "X", "Lecture", "whenever", "ONLINE")
    }

    fn controller(courier: RecordingCourier) -> SessionController<MemoryStore, Offline, RecordingCourier> {
        SessionController::new(MemoryStore::default(), Offline, courier)
    }

    #[test]
    fn start_writes_state_and_loads_first_week() {
        let mut ctl = controller(RecordingCourier::default());
        let mut browser = FixtureBrowser::new(Vec::new());

        let state = ctl.start(&mut browser, Semester::First, 2026, None).unwrap();
        assert_eq!(state.total_weeks, 14);
        assert_eq!(state.forward, 0);
        assert_eq!(browser.dates_set, ["16-2-2026"]);
        assert_eq!(browser.submits, 1);
        assert_eq!(ctl.state().unwrap(), Some(state));
    }

    #[test]
    fn start_replaces_previous_session() {
        let mut ctl = controller(RecordingCourier::default());
        let mut browser = FixtureBrowser::new(Vec::new());
        ctl.start(&mut browser, Semester::First, 2026, Some(3)).unwrap();
        ctl.advance(&mut browser).unwrap();

        let state = ctl.start(&mut browser, Semester::Second, 2026, Some(2)).unwrap();
        assert_eq!(ctl.state().unwrap(), Some(state));
        assert_eq!(browser.dates_set.last().unwrap(), "20-7-2026");
    }

    #[test]
    fn advance_without_session_is_idle() {
        let mut ctl = controller(RecordingCourier::default());
        let mut browser = FixtureBrowser::new(Vec::new());
        assert_eq!(ctl.advance(&mut browser).unwrap(), Phase::Idle);
        assert_eq!(browser.submits, 0);
    }

    #[test]
    fn failing_weeks_still_reach_terminated() {
        let total = 4;
        let pages = (0..total).map(|_| broken_week("16-2-2026")).collect();
        let mut browser = FixtureBrowser::new(pages);
        let mut ctl = controller(RecordingCourier::default());
        ctl.start(&mut browser, Semester::First, 2026, Some(total)).unwrap();

        for expected in 1..=total {
            ctl.advance(&mut browser).unwrap();
            assert_eq!(ctl.state().unwrap().unwrap().forward, expected);
        }
        assert_eq!(
            ctl.advance(&mut browser).unwrap(),
            Phase::Terminated(Outcome::NoClasses)
        );
        assert_eq!(ctl.state().unwrap(), None);
    }

    #[test]
    fn empty_session_sets_last_error_and_sends_nothing() {
        let mut browser = FixtureBrowser::new(vec![week_page("16-2-2026")]);
        let mut ctl = controller(RecordingCourier::default());
        ctl.start(&mut browser, Semester::First, 2026, Some(1)).unwrap();

        assert!(matches!(ctl.advance(&mut browser).unwrap(), Phase::Finalizing(_)));
        assert_eq!(
            ctl.advance(&mut browser).unwrap(),
            Phase::Terminated(Outcome::NoClasses)
        );
        assert!(ctl.courier.sent.borrow().is_empty());
        assert_eq!(
            ctl.take_last_error().unwrap().as_deref(),
            Some(NO_CLASSES_MESSAGE)
        );
        assert_eq!(ctl.take_last_error().unwrap(), None);
        assert_eq!(browser.dates_set.last().unwrap(), "");
    }

    #[test]
    fn located_and_online_classes_are_delivered() {
        let week = week_page("16-2-2026");
        let week = with_slot(week, "Mon", 0, "NPSC1003", "Lecture", ", 8:00 am-10:00 am", "212 107");
        let week = with_slot(week, "Wed", 3, "COMP1000", "Lab", ", 2:00 pm-4:00 pm", "ONLINE");
        let mut browser = FixtureBrowser::new(vec![week]);

        let resolver = Resolver::new(CannedSearch::ok(BUILDING_212));
        let mut ctl = SessionController::new(MemoryStore::default(), resolver, RecordingCourier::default());
        ctl.start(&mut browser, Semester::First, 2026, Some(1)).unwrap();
        ctl.advance(&mut browser).unwrap();

        let phase = ctl.advance(&mut browser).unwrap();
        assert_eq!(
            phase,
            Phase::Terminated(Outcome::Downloaded {
                events: 2,
                delivery: Delivery::Delivered
            })
        );
        let sent = ctl.courier.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].file_name(), "timetable-2026-s1.ics");
        let payload = sent[0].value.replace("\r\n ", "");
        assert_eq!(payload.matches("BEGIN:VEVENT").count(), 2);
        assert_eq!(payload.matches("GEO:").count(), 1);
        assert!(payload.contains("LOCATION:ONLINE"));
        drop(sent);
        assert_eq!(ctl.take_last_error().unwrap(), None);
    }

    #[test]
    fn missing_receiver_is_not_an_error() {
        let week = with_slot(week_page("16-2-2026"), "Tue", 0, "A", "Lecture", "9:00am-10:00am", "ONLINE");
        let mut browser = FixtureBrowser::new(vec![week]);
        let courier = RecordingCourier {
            answer: Some(Delivery::NoReceiver),
            ..Default::default()
        };
        let mut ctl = controller(courier);
        ctl.start(&mut browser, Semester::First, 2026, Some(1)).unwrap();
        ctl.advance(&mut browser).unwrap();

        let phase = ctl.advance(&mut browser).unwrap();
        assert!(matches!(
            phase,
            Phase::Terminated(Outcome::Downloaded {
                delivery: Delivery::NoReceiver,
                ..
            })
        ));
        assert_eq!(ctl.state().unwrap(), None);
        assert_eq!(ctl.take_last_error().unwrap(), None);
    }

    #[test]
    fn unencodable_classes_set_last_error() {
        let week = with_slot(week_page("16-2-2026"), "Tue", 0, "A", "Lecture", "10:00am-9:00am", "ONLINE");
        let mut browser = FixtureBrowser::new(vec![week]);
        let mut ctl = controller(RecordingCourier::default());
        ctl.start(&mut browser, Semester::First, 2026, Some(1)).unwrap();
        ctl.advance(&mut browser).unwrap();

        assert_eq!(
            ctl.advance(&mut browser).unwrap(),
            Phase::Terminated(Outcome::SynthesisFailed)
        );
        assert!(ctl.courier.sent.borrow().is_empty());
        assert_eq!(
            ctl.take_last_error().unwrap().as_deref(),
            Some(SYNTH_FAILED_MESSAGE)
        );
    }

    #[test]
    fn crash_during_delivery_never_resends() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("session.db");
        let week = with_slot(week_page("16-2-2026"), "Mon", 0, "A", "Lecture", "9:00am-10:00am", "ONLINE");
        let mut browser = FixtureBrowser::new(vec![week]);

        let courier = PanickingCourier { calls: Cell::new(0) };
        let mut ctl = SessionController::new(SqliteStore::open(&db).unwrap(), Offline, courier);
        ctl.start(&mut browser, Semester::First, 2026, Some(1)).unwrap();
        ctl.advance(&mut browser).unwrap();
        let crashed = catch_unwind(AssertUnwindSafe(|| ctl.advance(&mut browser)));
        assert!(crashed.is_err());
        assert_eq!(ctl.courier.calls.get(), 1);
        drop(ctl);

        let mut fresh = SessionController::new(
            SqliteStore::open(&db).unwrap(),
            Offline,
            RecordingCourier::default(),
        );
        assert_eq!(fresh.advance(&mut browser).unwrap(), Phase::Idle);
        assert!(fresh.courier.sent.borrow().is_empty());
    }

    /// Resolver that cancels the session from a second connection while a week is read
    struct CancellingResolver {
        db: PathBuf,
        cancels: Cell<usize>,
    }

    impl LocationResolve for CancellingResolver {
        fn resolve(&self, _token: &str) -> Option<LocationInfo> {
            SqliteStore::open(&self.db).unwrap().clear().unwrap();
            self.cancels.set(self.cancels.get() + 1);
            None
        }
    }

    #[test]
    fn cancel_while_scraping_wins() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("session.db");
        let week = with_slot(week_page("20-7-2026"), "Mon", 0, "A", "Lecture", "9:00am-10:00am", "212 107");
        let mut browser = FixtureBrowser::new(vec![week, week_page("27-7-2026")]);

        let resolver = CancellingResolver {
            db: db.clone(),
            cancels: Cell::new(0),
        };
        let mut ctl = SessionController::new(
            SqliteStore::open(&db).unwrap(),
            resolver,
            RecordingCourier::default(),
        );
        ctl.start(&mut browser, Semester::Second, 2026, Some(14)).unwrap();

        assert_eq!(ctl.advance(&mut browser).unwrap(), Phase::Idle);
        assert_eq!(ctl.resolver.cancels.get(), 1);
        assert_eq!(ctl.state().unwrap(), None);
        assert_eq!(ctl.store.read(StateKey::Forward).unwrap(), None);
        assert_eq!(browser.index, 0);
        assert_eq!(ctl.advance(&mut browser).unwrap(), Phase::Idle);
        assert!(ctl.courier.sent.borrow().is_empty());
    }

    #[test]
    fn navigation_failure_keeps_progress() {
        let week = with_slot(week_page("16-2-2026"), "Mon", 0, "A", "Lecture", "9:00am-10:00am", "ONLINE");
        let mut browser = FixtureBrowser::new(vec![week]);
        let mut ctl = controller(RecordingCourier::default());
        ctl.start(&mut browser, Semester::First, 2026, Some(3)).unwrap();

        browser.fail_next_week = true;
        let err = ctl.advance(&mut browser).unwrap_err();
        assert!(matches!(err, SessionError::Navigation(_)));
        let state = ctl.state().unwrap().unwrap();
        assert_eq!(state.forward, 1);
        assert_eq!(state.events.len(), 1);
    }

    #[test]
    fn resume_navigates_to_the_stored_week() {
        let mut browser = FixtureBrowser::new(Vec::new());
        let mut ctl = controller(RecordingCourier::default());
        ctl.start(&mut browser, Semester::First, 2026, None).unwrap();
        ctl.advance(&mut browser).unwrap();
        ctl.advance(&mut browser).unwrap();

        let state = ctl.resume(&mut browser).unwrap();
        assert_eq!(state.forward, 2);
        assert_eq!(browser.dates_set.last().unwrap(), "2-3-2026");
    }

    #[test]
    fn resume_without_session_fails() {
        let mut ctl = controller(RecordingCourier::default());
        let mut browser = FixtureBrowser::new(Vec::new());
        assert!(matches!(
            ctl.resume(&mut browser),
            Err(SessionError::NoActiveSession)
        ));
    }

    #[test]
    fn cancel_clears_the_session() {
        let mut ctl = controller(RecordingCourier::default());
        let mut browser = FixtureBrowser::new(Vec::new());
        ctl.start(&mut browser, Semester::First, 2026, None).unwrap();
        ctl.cancel().unwrap();
        assert_eq!(ctl.state().unwrap(), None);
        assert_eq!(ctl.advance(&mut browser).unwrap(), Phase::Idle);
    }
}
