//! Multi-page scraping session
//!
//! The controller is the only writer of session state. The driver feeds it
//! page loads; the courier receives the finished calendar.

mod controller;
mod courier;
mod driver;
mod state;
mod store;

pub(crate) use controller::SessionController;
pub(crate) use courier::{AnyCourier, Delivery, calendar_file_name};
pub(crate) use driver::run;
pub(crate) use state::{Outcome, Phase, SessionState};
pub(crate) use store::SqliteStore;
