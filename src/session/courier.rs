//! Hand-off of the finished calendar
//!
//! Delivery is best effort: the session has already been cleared when a
//! message is sent, so the controller only logs the result.

use std::io::{self, Write};
use std::path::PathBuf;

use serde::Serialize;

use crate::core::Semester;

/// Finished calendar plus what it covers
#[derive(Debug, Clone, Serialize)]
pub(crate) struct DownloadMessage {
    pub(crate) value: String,
    pub(crate) semester: Semester,
    pub(crate) year: i32,
}

impl DownloadMessage {
    pub(crate) fn file_name(&self) -> String {
        calendar_file_name(self.semester, self.year)
    }
}

pub(crate) fn calendar_file_name(semester: Semester, year: i32) -> String {
    format!("timetable-{year}-s{semester}.ics")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Delivery {
    Delivered,
    /// Nobody was listening (closed pipe, no download target)
    NoReceiver,
    Error(String),
}

impl From<io::Error> for Delivery {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::BrokenPipe => Delivery::NoReceiver,
            _ => Delivery::Error(err.to_string()),
        }
    }
}

pub(crate) trait Courier {
    fn send(&self, message: &DownloadMessage) -> Delivery;
}

/// Writes `timetable-{year}-s{semester}.ics` into a directory
#[derive(Debug, Clone)]
pub(crate) struct FileCourier {
    dir: PathBuf,
}

impl FileCourier {
    pub(crate) fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub(crate) fn path_for(&self, message: &DownloadMessage) -> PathBuf {
        self.dir.join(message.file_name())
    }
}

impl Courier for FileCourier {
    fn send(&self, message: &DownloadMessage) -> Delivery {
        let write = || -> io::Result<()> {
            std::fs::create_dir_all(&self.dir)?;
            std::fs::write(self.path_for(message), &message.value)
        };
        match write() {
            Ok(()) => Delivery::Delivered,
            Err(e) => e.into(),
        }
    }
}

/// Writes the calendar to stdout (`--output -`)
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct StdoutCourier;

impl Courier for StdoutCourier {
    fn send(&self, message: &DownloadMessage) -> Delivery {
        let mut out = io::stdout().lock();
        match out
            .write_all(message.value.as_bytes())
            .and_then(|()| out.flush())
        {
            Ok(()) => Delivery::Delivered,
            Err(e) => e.into(),
        }
    }
}

/// Destination picked from `--output`
pub(crate) enum AnyCourier {
    File(FileCourier),
    Stdout(StdoutCourier),
}

impl AnyCourier {
    pub(crate) fn new(output: PathBuf) -> Self {
        if output.as_os_str() == "-" {
            AnyCourier::Stdout(StdoutCourier)
        } else {
            AnyCourier::File(FileCourier::new(output))
        }
    }
}

impl Courier for AnyCourier {
    fn send(&self, message: &DownloadMessage) -> Delivery {
        match self {
            AnyCourier::File(courier) => courier.send(message),
            AnyCourier::Stdout(courier) => courier.send(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> DownloadMessage {
        DownloadMessage {
            value: "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n".to_string(),
            semester: Semester::Second,
            year: 2026,
        }
    }

    #[test]
    fn file_name_carries_year_and_semester() {
        assert_eq!(message().file_name(), "timetable-2026-s2.ics");
    }

    #[test]
    fn file_courier_creates_directory_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        let courier = FileCourier::new(dir.path().join("out"));
        assert_eq!(courier.send(&message()), Delivery::Delivered);
        let written = std::fs::read_to_string(courier.path_for(&message())).unwrap();
        assert_eq!(written, message().value);
    }

    #[test]
    fn unwritable_target_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let courier = FileCourier::new(blocker);
        assert!(matches!(courier.send(&message()), Delivery::Error(_)));
    }

    #[test]
    fn broken_pipe_means_no_receiver() {
        let err = io::Error::new(io::ErrorKind::BrokenPipe, "closed");
        assert_eq!(Delivery::from(err), Delivery::NoReceiver);
    }

    #[test]
    fn dash_selects_stdout() {
        assert!(matches!(AnyCourier::new(PathBuf::from("-")), AnyCourier::Stdout(_)));
        assert!(matches!(AnyCourier::new(PathBuf::from("out")), AnyCourier::File(_)));
    }
}
