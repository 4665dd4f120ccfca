use chrono::{Days, NaiveDate};

use super::{
    CLASS_TIME, CLASS_TYPE, CLASS_WHERE, MAX_SLOTS, WEEKDAYS, body_panel_id, header_panel_id,
    normalize_title,
};
use crate::core::{ScrapedRecord, parse_time_range};
use crate::error::ExtractError;
use crate::location::LocationResolve;
use crate::page::Page;

/// Lazily walks every (weekday, slot) position of one page.
///
/// Positions without both panels, or whose body panel lacks any of the
/// type/time/room children, are skipped. The first unparseable time range is
/// yielded as an error and ends the iteration.
pub(crate) struct WeekExtraction<'a, P, R> {
    page: &'a P,
    resolver: &'a R,
    week_start: NaiveDate,
    position: usize,
    failed: bool,
}

/// Start extracting the classes of the week beginning at `week_start`
pub(crate) fn extract_week<'a, P: Page, R: LocationResolve>(
    page: &'a P,
    week_start: NaiveDate,
    resolver: &'a R,
) -> WeekExtraction<'a, P, R> {
    WeekExtraction {
        page,
        resolver,
        week_start,
        position: 0,
        failed: false,
    }
}

/// Raw text of one complete slot
struct SlotText {
    title: String,
    kind: String,
    when: String,
    place: String,
}

impl<P: Page, R: LocationResolve> WeekExtraction<'_, P, R> {
    fn read_slot(&self, day: &str, slot: usize) -> Option<SlotText> {
        let page = self.page;
        let body = page.element_by_id(&body_panel_id(day, slot))?;
        let header = page.element_by_id(&header_panel_id(day, slot))?;

        let kind = page.first_by_class(body, CLASS_TYPE)?;
        let when = page.first_by_class(body, CLASS_TIME)?;
        let place = page.first_by_class(body, CLASS_WHERE)?;

        Some(SlotText {
            title: page.text(header),
            kind: page.text(kind),
            when: page.text(when),
            place: page.text(place),
        })
    }

    fn build(
        &self,
        day_index: usize,
        slot: usize,
        text: SlotText,
    ) -> Result<ScrapedRecord, ExtractError> {
        let day = WEEKDAYS[day_index];
        let time = parse_time_range(&text.when).map_err(|source| ExtractError::Time {
            day,
            slot,
            source,
        })?;
        let date = self
            .week_start
            .checked_add_days(Days::new(day_index as u64))
            .unwrap_or(self.week_start);

        Ok(ScrapedRecord {
            kind: normalize_title(&text.kind),
            title: normalize_title(&text.title),
            date,
            time,
            location: self.resolver.resolve(&text.place),
        })
    }
}

impl<P: Page, R: LocationResolve> Iterator for WeekExtraction<'_, P, R> {
    type Item = Result<ScrapedRecord, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        while self.position < WEEKDAYS.len() * MAX_SLOTS {
            let day_index = self.position / MAX_SLOTS;
            let slot = self.position % MAX_SLOTS;
            self.position += 1;

            let Some(text) = self.read_slot(WEEKDAYS[day_index], slot) else {
                continue;
            };
            let item = self.build(day_index, slot, text);
            if item.is_err() {
                self.failed = true;
            }
            return Some(item);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::tests::{week_page, with_slot};
    use crate::location::tests::{BUILDING_212, CannedSearch};
    use crate::location::{Offline, Resolver};
    use crate::page::fixture::FixtureElement;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 16).unwrap()
    }

    #[test]
    fn empty_page_yields_nothing() {
        let page = week_page("16-2-2026");
        assert_eq!(extract_week(&page, monday(), &Offline).count(), 0);
    }

    #[test]
    fn dates_follow_weekday_columns() {
        let page = week_page("16-2-2026");
        let page = with_slot(page, "Mon", 0, "NPSC1003", "Lecture", ", 8:00 am-10:00 am", "ONLINE");
        let page = with_slot(page, "Thu", 4, "COMP1000", "Lab", ", 2:00 pm-4:00 pm", "ONLINE");

        let records: Vec<_> = extract_week(&page, monday(), &Offline)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, monday());
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2026, 2, 19).unwrap());
        assert_eq!(records[1].time.start.hour, 14);
        assert_eq!(records[1].time.duration_minutes, 120);
    }

    #[test]
    fn index_gaps_are_skipped() {
        let page = week_page("16-2-2026");
        let page = with_slot(page, "Wed", 2, "A", "Lecture", "9:00am-10:00am", "ONLINE");
        let page = with_slot(page, "Wed", 17, "B", "Lecture", "11:00am-12:00pm", "ONLINE");

        let titles: Vec<_> = extract_week(&page, monday(), &Offline)
            .map(|r| r.unwrap().title)
            .collect();
        assert_eq!(titles, ["A", "B"]);
    }

    #[test]
    fn slot_missing_any_field_is_never_returned() {
        for missing in [CLASS_TYPE, CLASS_TIME, CLASS_WHERE] {
            let mut body = FixtureElement::new("");
            for (class, text) in [
                (CLASS_TYPE, "Lecture"),
                (CLASS_TIME, "9:00am-10:00am"),
                (CLASS_WHERE, "ONLINE"),
            ] {
                if class != missing {
                    body = body.child(class, FixtureElement::new(text));
                }
            }
            let page = week_page("16-2-2026")
                .with(&body_panel_id("Mon", 0), body)
                .with(&header_panel_id("Mon", 0), FixtureElement::new("NPSC1003"));

            assert_eq!(
                extract_week(&page, monday(), &Offline).count(),
                0,
                "slot without {missing} was returned"
            );
        }
    }

    #[test]
    fn slot_without_header_panel_is_skipped() {
        let page = with_slot(week_page("16-2-2026"), "Mon", 0, "X", "Lecture", "9:00am-10:00am", "ONLINE");
        let body_only = week_page("16-2-2026").with(
            &body_panel_id("Mon", 0),
            FixtureElement::new("")
                .child(CLASS_TYPE, FixtureElement::new("Lecture"))
                .child(CLASS_TIME, FixtureElement::new("9:00am-10:00am"))
                .child(CLASS_WHERE, FixtureElement::new("ONLINE")),
        );
        assert_eq!(extract_week(&page, monday(), &Offline).count(), 1);
        assert_eq!(extract_week(&body_only, monday(), &Offline).count(), 0);
    }

    #[test]
    fn bad_time_ends_the_week_with_an_error() {
        let page = week_page("16-2-2026");
        let page = with_slot(page, "Mon", 0, "A", "Lecture", "9:00am-10:00am", "ONLINE");
        let page = with_slot(page, "Tue", 0, "B", "Lecture", "sometime", "ONLINE");
        let page = with_slot(page, "Wed", 0, "C", "Lecture", "9:00am-10:00am", "ONLINE");

        let items: Vec<_> = extract_week(&page, monday(), &Offline).collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        let err = items[1].as_ref().unwrap_err();
        assert!(matches!(err, ExtractError::Time { day: "Tue", slot: 0, .. }));

        let collected: Result<Vec<_>, _> = extract_week(&page, monday(), &Offline).collect();
        assert!(collected.is_err());
    }

    #[test]
    fn fields_are_normalized_and_location_resolved() {
        let page = with_slot(
            week_page("16-2-2026"),
            "Fri",
            1,
            "\n  NPSC1003   Intro \n",
            " Workshop (15) ",
            ", 8:00 am-10:00 am",
            "212 107",
        );
        let resolver = Resolver::new(CannedSearch::ok(BUILDING_212));

        let record = extract_week(&page, monday(), &resolver)
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(record.title, "NPSC1003 Intro");
        assert_eq!(record.kind, "Workshop (15)");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2026, 2, 20).unwrap());
        assert_eq!(record.location.unwrap().room, "107");
    }

    #[test]
    fn multi_line_type_is_collapsed_to_one_line() {
        let page = with_slot(
            week_page("16-2-2026"),
            "Mon",
            0,
            "CITS2002",
            "Workshop\nEND:VEVENT\r\n  Group A",
            "9:00am-10:00am",
            "ONLINE",
        );
        let record = extract_week(&page, monday(), &Offline)
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(record.kind, "Workshop END:VEVENT Group A");
        assert!(!record.kind.contains(['\n', '\r']));
    }
}
