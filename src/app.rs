//! Command handlers
//!
//! Wires the CLI to the session: picks the browser, store, resolver and
//! courier, then runs the page loop or prints stored state.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use tracing::info;

use crate::browser::{AnyBrowser, ReplayBrowser, WebFormsBrowser};
use crate::cli::{Cli, Commands};
use crate::consts::DEFAULT_TIMEZONE;
use crate::core::Semester;
use crate::error::{AppError, SessionError};
use crate::extract::{extract_week, read_week_start};
use crate::location::AnyResolver;
use crate::output::{
    output_class_json, output_dates_json, output_status_json, print_class_table,
    print_dates_table, print_status_table,
};
use crate::page::HtmlPage;
use crate::semester::boundaries_for;
use crate::session::{
    self, AnyCourier, Delivery, Outcome, Phase, SessionController, SessionState, SqliteStore,
    calendar_file_name,
};
use crate::utils::Timezone;

type Controller = SessionController<SqliteStore, AnyResolver, AnyCourier>;

pub(crate) fn run(cli: &Cli) -> Result<(), AppError> {
    match &cli.command {
        Commands::Start {
            semester,
            year,
            weeks,
        } => handle_start(cli, *semester, *year, *weeks),
        Commands::Resume => handle_resume(cli),
        Commands::Status => handle_status(cli),
        Commands::Cancel => handle_cancel(cli),
        Commands::Dates { year } => handle_dates(cli, *year),
        Commands::Extract { file } => handle_extract(cli, file),
    }
}

fn today(cli: &Cli) -> Result<NaiveDate, AppError> {
    let zone = cli.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE);
    Ok(Timezone::parse(Some(zone))?.today())
}

fn open_controller(cli: &Cli) -> Result<Controller, AppError> {
    let store = SqliteStore::open(&cli.db_path())?;
    Ok(SessionController::new(
        store,
        AnyResolver::new(cli.offline),
        AnyCourier::new(cli.output_dir()),
    ))
}

fn open_browser(cli: &Cli) -> Result<AnyBrowser, AppError> {
    if let Some(dir) = &cli.pages {
        return Ok(AnyBrowser::Replay(ReplayBrowser::open(dir)?));
    }
    let Some(url) = cli.url.as_deref() else {
        return Err(AppError::NoTimetableSource);
    };
    Ok(AnyBrowser::Live(WebFormsBrowser::open(
        url,
        cli.cookie.as_deref(),
    )?))
}

fn handle_start(
    cli: &Cli,
    semester: Option<u8>,
    year: Option<i32>,
    weeks: Option<u32>,
) -> Result<(), AppError> {
    let today = today(cli)?;
    let semester = match semester {
        Some(n) => Semester::try_from(n).map_err(|_| AppError::InvalidSemester { input: n })?,
        None => Semester::for_date(today),
    };
    let year = year.unwrap_or(today.year());

    let mut browser = open_browser(cli)?;
    let mut controller = open_controller(cli)?;
    let state = controller.start(&mut browser, semester, year, weeks)?;
    finish(cli, &mut controller, &mut browser, &state)
}

fn handle_resume(cli: &Cli) -> Result<(), AppError> {
    let mut controller = open_controller(cli)?;
    // Checked before the browser opens so a missing session needs no network
    if controller.state()?.is_none() {
        return Err(SessionError::NoActiveSession.into());
    }
    let mut browser = open_browser(cli)?;
    let state = controller.resume(&mut browser)?;
    finish(cli, &mut controller, &mut browser, &state)
}

/// Drive the loaded session to its end and report how it ended
fn finish(
    cli: &Cli,
    controller: &mut Controller,
    browser: &mut AnyBrowser,
    state: &SessionState,
) -> Result<(), AppError> {
    match session::run(controller, browser)? {
        Phase::Terminated(Outcome::Downloaded { events, delivery }) => {
            let output = cli.output_dir();
            match delivery {
                // Calendar already went to stdout
                Delivery::Delivered if output.as_os_str() == "-" => {}
                Delivery::Delivered => {
                    let path = output.join(calendar_file_name(state.semester, state.year));
                    println!("Saved {events} classes to {}", path.display());
                }
                Delivery::NoReceiver => {
                    eprintln!("Calendar built ({events} classes) but nothing received it.");
                }
                Delivery::Error(e) => eprintln!("Calendar built but could not be saved: {e}"),
            }
            Ok(())
        }
        Phase::Terminated(Outcome::NoClasses | Outcome::SynthesisFailed) => {
            let message = controller
                .take_last_error()?
                .unwrap_or_else(|| "Session ended without a calendar.".to_string());
            Err(AppError::SessionFailed { message })
        }
        Phase::Idle => {
            println!("Session was cancelled.");
            Ok(())
        }
        // The driver only returns once the session is idle or terminated
        Phase::Scraping(_) | Phase::Finalizing(_) => Ok(()),
    }
}

fn handle_status(cli: &Cli) -> Result<(), AppError> {
    let mut controller = open_controller(cli)?;
    let state = controller.state()?;
    let last_error = controller.take_last_error()?;
    if cli.json {
        println!("{}", output_status_json(state.as_ref(), last_error.as_deref()));
    } else {
        print_status_table(state.as_ref(), last_error.as_deref(), cli.use_color());
    }
    Ok(())
}

fn handle_cancel(cli: &Cli) -> Result<(), AppError> {
    let mut controller = open_controller(cli)?;
    let had_session = controller.state()?.is_some();
    controller.cancel()?;
    if had_session {
        println!("Session cancelled.");
    } else {
        println!("No active session.");
    }
    Ok(())
}

fn handle_dates(cli: &Cli, year: Option<i32>) -> Result<(), AppError> {
    let year = match year {
        Some(year) => year,
        None => today(cli)?.year(),
    };
    let dates = boundaries_for(year).ok_or(SessionError::NoBoundaries { year })?;
    if cli.json {
        println!("{}", output_dates_json(&dates));
    } else {
        print_dates_table(&dates, cli.use_color());
    }
    Ok(())
}

fn handle_extract(cli: &Cli, file: &Path) -> Result<(), AppError> {
    let body = std::fs::read_to_string(file).map_err(|source| AppError::ReadPage {
        path: file.display().to_string(),
        source,
    })?;
    let page = HtmlPage::parse(&body);
    let week_start = read_week_start(&page)?;
    let resolver = AnyResolver::new(cli.offline);
    let records = extract_week(&page, week_start, &resolver).collect::<Result<Vec<_>, _>>()?;
    info!(%week_start, classes = records.len(), "page extracted");

    if cli.json {
        println!("{}", output_class_json(&records));
    } else if records.is_empty() {
        println!("No classes found for the week of {week_start}.");
    } else {
        print_class_table(&records, cli.use_color());
    }
    Ok(())
}
