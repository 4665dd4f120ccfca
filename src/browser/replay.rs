//! Offline navigation over saved timetable pages
//!
//! Pages are `*.html` files in one directory, one per week, visited in file
//! name order. Submitting the filter jumps to the page showing the requested
//! week; "next week" moves to the following file.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::Browser;
use crate::error::NavError;
use crate::extract::read_week_start;
use crate::page::HtmlPage;
use crate::utils::parse_input_date;

pub(crate) struct ReplayBrowser {
    pages: Vec<PathBuf>,
    /// Index into `pages` of the loaded page; `None` before the first submit
    current: Option<usize>,
    page: HtmlPage,
    date_input: String,
}

impl ReplayBrowser {
    pub(crate) fn open(dir: &Path) -> Result<Self, NavError> {
        let pattern = format!("{}/*.html", dir.display());
        let mut pages: Vec<PathBuf> = glob::glob(&pattern)?.flatten().collect();
        pages.sort();
        if pages.is_empty() {
            return Err(NavError::NoPages {
                dir: dir.display().to_string(),
            });
        }
        debug!(dir = %dir.display(), pages = pages.len(), "replaying saved pages");

        Ok(Self {
            pages,
            current: None,
            page: HtmlPage::empty(),
            date_input: String::new(),
        })
    }

    fn load(&mut self, index: usize) -> Result<(), NavError> {
        let Some(path) = self.pages.get(index) else {
            debug!(index, "no more saved pages");
            self.current = Some(index);
            self.page = HtmlPage::empty();
            return Ok(());
        };
        self.page = read_page(path)?;
        self.current = Some(index);
        debug!(page = %path.display(), "loaded saved page");
        Ok(())
    }

    /// Index of the saved page whose filter shows the week starting at `value`
    fn find_week(&self, value: &str) -> Result<Option<usize>, NavError> {
        let Some(wanted) = parse_input_date(value) else {
            return Ok(None);
        };
        for (index, path) in self.pages.iter().enumerate() {
            if read_week_start(&read_page(path)?).ok() == Some(wanted) {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }
}

fn read_page(path: &Path) -> Result<HtmlPage, NavError> {
    let body = std::fs::read_to_string(path).map_err(|source| NavError::ReadPage {
        path: path.display().to_string(),
        source,
    })?;
    Ok(HtmlPage::parse(&body))
}

impl Browser for ReplayBrowser {
    type Page = HtmlPage;

    fn page(&self) -> &HtmlPage {
        &self.page
    }

    fn set_date_input(&mut self, value: &str) {
        self.date_input = value.to_string();
    }

    fn submit_filter(&mut self) -> Result<(), NavError> {
        if self.date_input.trim().is_empty() {
            self.current = None;
            self.page = HtmlPage::empty();
            return Ok(());
        }
        let index = match self.find_week(&self.date_input)? {
            Some(index) => index,
            None => {
                warn!(date = %self.date_input, "no saved page for this week, starting from the first page");
                0
            }
        };
        self.load(index)
    }

    fn next_week(&mut self) -> Result<(), NavError> {
        let next = self.current.map_or(0, |i| i + 1);
        self.load(next)
    }
}
