//! Navigation over the timetable
//!
//! A browser owns the currently loaded page and performs the three actions
//! the session needs: write the filter date, submit the filter, go to the
//! next week. The live implementation speaks ASP.NET WebForms postbacks; the
//! replay implementation walks saved pages on disk.

mod replay;
mod webforms;

use crate::error::NavError;
use crate::page::{HtmlPage, Page};

pub(crate) use replay::ReplayBrowser;
pub(crate) use webforms::WebFormsBrowser;

pub(crate) trait Browser {
    type Page: Page;

    /// The page currently loaded
    fn page(&self) -> &Self::Page;

    /// Overwrite the filter date field. Takes effect on the next submit.
    fn set_date_input(&mut self, value: &str);

    /// Submit the filter form and load the result
    fn submit_filter(&mut self) -> Result<(), NavError>;

    /// Activate the "next week" control and load the result
    fn next_week(&mut self) -> Result<(), NavError>;
}

/// Live or replayed timetable, picked at startup
pub(crate) enum AnyBrowser {
    Live(WebFormsBrowser),
    Replay(ReplayBrowser),
}

impl Browser for AnyBrowser {
    type Page = HtmlPage;

    fn page(&self) -> &HtmlPage {
        match self {
            AnyBrowser::Live(browser) => browser.page(),
            AnyBrowser::Replay(browser) => browser.page(),
        }
    }

    fn set_date_input(&mut self, value: &str) {
        match self {
            AnyBrowser::Live(browser) => browser.set_date_input(value),
            AnyBrowser::Replay(browser) => browser.set_date_input(value),
        }
    }

    fn submit_filter(&mut self) -> Result<(), NavError> {
        match self {
            AnyBrowser::Live(browser) => browser.submit_filter(),
            AnyBrowser::Replay(browser) => browser.submit_filter(),
        }
    }

    fn next_week(&mut self) -> Result<(), NavError> {
        match self {
            AnyBrowser::Live(browser) => browser.next_week(),
            AnyBrowser::Replay(browser) => browser.next_week(),
        }
    }
}
