use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use tracing::warn;

use crate::models::{CalendarDay, ForecastDay};

/// A calendar never spans fewer days than this, whatever the request asks.
pub const MIN_CALENDAR_DAYS: u32 = 7;

/// The longest calendar a caller may request. `build_calendar` itself only
/// pads, so the bound is enforced where requests enter the system.
pub const MAX_CALENDAR_DAYS: u32 = 366;

/// Result of the calendar overlay: the dense day grid plus the number of
/// favorable records dropped for unparsable dates.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarWindow {
    pub days: Vec<CalendarDay>,
    pub dropped: usize,
}

/// Build the dense planting calendar starting at `reference`.
///
/// Day one is the reference date itself and days ascend without gaps for
/// `max(requested_days, MIN_CALENDAR_DAYS)` entries. Every record in
/// `favorable` is assumed to have already passed the favorability criteria;
/// this function only places them. Records whose wire date does not parse
/// are dropped and counted, records outside the span are ignored, and when
/// two records carry the same date the last one wins.
pub fn build_calendar(
    reference: NaiveDate,
    requested_days: u32,
    favorable: &[ForecastDay],
) -> CalendarWindow {
    let span = requested_days.max(MIN_CALENDAR_DAYS);

    let mut dropped = 0usize;
    let mut by_date: HashMap<NaiveDate, &ForecastDay> = HashMap::new();
    for day in favorable {
        match day.parsed_date() {
            Some(date) => {
                by_date.insert(date, day);
            }
            None => {
                dropped += 1;
                warn!("Dropping favorable record with unparsable date: {}", day.date);
            }
        }
    }

    let days = (0..span)
        .map(|offset| {
            let date = reference + Duration::days(i64::from(offset));
            let mut entry = CalendarDay::placeholder(date);
            if let Some(fav) = by_date.get(&date) {
                entry.temp = Some(fav.temp);
                entry.wind = Some(fav.wind);
                entry.rain = fav.rain;
                entry.favorable = true;
            }
            entry
        })
        .collect();

    CalendarWindow { days, dropped }
}
