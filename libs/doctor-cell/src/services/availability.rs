//! Availability resolution: turns a doctor's weekly schedule template plus
//! the unavailability ledger into concrete bookable (date, shift) slots.
//!
//! Pure date arithmetic over a fixed forward horizon; callers fetch the
//! doctor record and hand the pieces in, so the same rules apply no matter
//! where the data came from.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::{BookableDay, Shift, ShiftOffer, UnavailabilityRange, WeekSchedule};

/// How far forward candidate days are computed, counted from "today"
/// inclusive.
pub const BOOKING_HORIZON_DAYS: i64 = 180;

/// Compute the ordered list of bookable days within the horizon.
///
/// A day qualifies when its weekday offers at least one shift in the
/// template and the date is not inside any ledger range. Days that lose all
/// shifts to an exclusion are omitted entirely rather than emitted empty.
/// An empty template yields an empty list; there is no "always available"
/// fallback.
pub fn bookable_days(
    schedule: &WeekSchedule,
    unavailable: &[UnavailabilityRange],
    today: NaiveDate,
) -> Vec<BookableDay> {
    (0..BOOKING_HORIZON_DAYS)
        .map(|offset| today + Duration::days(offset))
        .filter(|date| {
            schedule.day(date.weekday()).has_any_shift() && !is_unavailable(unavailable, *date)
        })
        .map(|date| BookableDay {
            date,
            weekday_label: weekday_label(date.weekday()).to_string(),
            display_date: date.format("%b %-d").to_string(),
        })
        .collect()
}

/// Offered shifts for one candidate date, re-derived from the template and
/// ledger rather than any cached day list so it always reflects the latest
/// ledger state.
pub fn shifts_for_date(
    schedule: &WeekSchedule,
    unavailable: &[UnavailabilityRange],
    date: NaiveDate,
) -> Vec<ShiftOffer> {
    if is_unavailable(unavailable, date) {
        return Vec::new();
    }

    let day = schedule.day(date.weekday());
    let mut shifts = Vec::new();

    if day.morning {
        shifts.push(ShiftOffer {
            shift: Shift::Morning,
            label: Shift::Morning.label().to_string(),
            hours: day.morning_hours.clone(),
        });
    }
    if day.evening {
        shifts.push(ShiftOffer {
            shift: Shift::Evening,
            label: Shift::Evening.label().to_string(),
            hours: day.evening_hours.clone(),
        });
    }

    shifts
}

/// Inclusive whole-day range test. Comparison is calendar-date only, so a
/// range ending today still excludes today. A malformed range
/// (`start > end`) matches nothing.
fn is_unavailable(ranges: &[UnavailabilityRange], date: NaiveDate) -> bool {
    ranges
        .iter()
        .any(|range| range.start_date <= date && date <= range.end_date)
}

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
