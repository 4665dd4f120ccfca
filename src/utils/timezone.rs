use chrono::{DateTime, Local, NaiveDate, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

use crate::error::AppError;

/// Zone used to decide what "today" is for default semester and year
#[derive(Debug, Clone, Copy)]
pub(crate) enum Timezone {
    Local,
    Named(Tz),
}

impl Timezone {
    pub(crate) fn parse(value: Option<&str>) -> Result<Self, AppError> {
        let Some(raw) = value else {
            return Ok(Timezone::Local);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("local") {
            return Ok(Timezone::Local);
        }
        if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
            return Ok(Timezone::Named(chrono_tz::UTC));
        }
        Tz::from_str(trimmed)
            .map(Timezone::Named)
            .map_err(|_| AppError::InvalidTimezone {
                input: trimmed.to_string(),
            })
    }

    /// Calendar date of `utc` in this zone
    pub(crate) fn date_of(self, utc: DateTime<Utc>) -> NaiveDate {
        match self {
            Timezone::Local => utc.with_timezone(&Local).date_naive(),
            Timezone::Named(tz) => utc.with_timezone(&tz).date_naive(),
        }
    }

    pub(crate) fn today(self) -> NaiveDate {
        self.date_of(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_none_returns_local() {
        assert!(matches!(Timezone::parse(None).unwrap(), Timezone::Local));
    }

    #[test]
    fn parse_local_string_returns_local() {
        assert!(matches!(
            Timezone::parse(Some("LOCAL")).unwrap(),
            Timezone::Local
        ));
        assert!(matches!(
            Timezone::parse(Some("  ")).unwrap(),
            Timezone::Local
        ));
    }

    #[test]
    fn parse_utc_variants() {
        for input in ["utc", "UTC", "z", " Z "] {
            let tz = Timezone::parse(Some(input)).unwrap();
            assert!(matches!(tz, Timezone::Named(chrono_tz::UTC)), "{input}");
        }
    }

    #[test]
    fn parse_named_timezone() {
        let tz = Timezone::parse(Some("Australia/Perth")).unwrap();
        assert!(matches!(tz, Timezone::Named(chrono_tz::Australia::Perth)));
    }

    #[test]
    fn parse_invalid_timezone_returns_error() {
        let err = Timezone::parse(Some("Mars/Olympus")).unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[test]
    fn date_rolls_over_ahead_of_utc() {
        // 20:00 UTC on 31 May is 04:00 on 1 June in Perth (UTC+8)
        let utc = "2026-05-31T20:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let perth = Timezone::parse(Some("Australia/Perth")).unwrap();
        assert_eq!(perth.date_of(utc), NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
        let utc_zone = Timezone::Named(chrono_tz::UTC);
        assert_eq!(utc_zone.date_of(utc), NaiveDate::from_ymd_opt(2026, 5, 31).unwrap());
    }
}
