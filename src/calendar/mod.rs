//! Calendar engine: pure day classification for a month at a location.
//!
//! Weekend and weekday classification are free functions; anything that needs
//! the holiday table goes through [`CalendarEngine`]. None of these functions
//! fail: an out-of-range month simply has no days, and a location or year
//! missing from the table has no holidays.

pub mod holidays;

use std::borrow::Cow;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::domain::{Location, MonthDescriptor};

pub use holidays::HolidayTable;

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12); zero for any other month value.
pub fn days_in_month(month: u32, year: i32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn days_of(month: u32, year: i32) -> impl Iterator<Item = NaiveDate> {
    (1..=days_in_month(month, year)).filter_map(move |day| NaiveDate::from_ymd_opt(year, month, day))
}

/// Monday-Friday dates of the month in ascending order.
pub fn weekdays_of(month: u32, year: i32) -> Vec<NaiveDate> {
    days_of(month, year).filter(|date| !is_weekend(*date)).collect()
}

/// Saturday and Sunday dates of the month in ascending order.
pub fn weekends_of(month: u32, year: i32) -> Vec<NaiveDate> {
    days_of(month, year).filter(|date| is_weekend(*date)).collect()
}

/// Holiday-aware calendar queries.
///
/// Implementors only supply the holiday lookup; working-day classification is
/// derived from it so every engine agrees on the weekend rule.
pub trait CalendarEngine {
    /// Holidays of `(location, year)` falling in `month`, ascending.
    fn holidays_of(&self, month: u32, year: i32, location: Location) -> Vec<NaiveDate>;

    fn is_holiday(&self, date: NaiveDate, location: Location) -> bool {
        self.holidays_of(date.month(), date.year(), location)
            .contains(&date)
    }

    fn is_working_day(&self, date: NaiveDate, location: Location) -> bool {
        !is_weekend(date) && !self.is_holiday(date, location)
    }

    fn working_days_of(&self, month: u32, year: i32, location: Location) -> Vec<NaiveDate> {
        let holidays = self.holidays_of(month, year, location);
        weekdays_of(month, year)
            .into_iter()
            .filter(|date| !holidays.contains(date))
            .collect()
    }

    fn working_day_count(&self, month: u32, year: i32, location: Location) -> u32 {
        self.working_days_of(month, year, location).len() as u32
    }

    fn month_descriptor(&self, month: u32, year: i32, location: Location) -> MonthDescriptor {
        MonthDescriptor {
            month,
            year,
            total_days: days_in_month(month, year),
            working_days: self.working_days_of(month, year, location),
            public_holidays: self.holidays_of(month, year, location),
            weekends: weekends_of(month, year),
            is_leap_year: is_leap_year(year),
        }
    }
}

/// Calendar engine backed by a [`HolidayTable`], the built-in one by default.
#[derive(Debug, Clone)]
pub struct StandardCalendar {
    table: Cow<'static, HolidayTable>,
}

impl StandardCalendar {
    pub fn new() -> Self {
        Self {
            table: Cow::Borrowed(HolidayTable::builtin()),
        }
    }

    pub fn with_table(table: HolidayTable) -> Self {
        Self {
            table: Cow::Owned(table),
        }
    }

    pub fn table(&self) -> &HolidayTable {
        &self.table
    }
}

impl Default for StandardCalendar {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarEngine for StandardCalendar {
    fn holidays_of(&self, month: u32, year: i32, location: Location) -> Vec<NaiveDate> {
        self.table
            .holidays(location, year)
            .iter()
            .filter(|date| date.month() == month)
            .copied()
            .collect()
    }

    fn is_holiday(&self, date: NaiveDate, location: Location) -> bool {
        self.table.contains(location, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn leap_years() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert_eq!(days_in_month(2, 2024), 29);
        assert_eq!(days_in_month(2, 2100), 28);
    }

    #[test]
    fn invalid_month_has_no_days() {
        assert_eq!(days_in_month(13, 2024), 0);
        assert!(weekdays_of(0, 2024).is_empty());
    }

    #[test]
    fn uk_january_2024_has_22_working_days() {
        let calendar = StandardCalendar::new();
        let descriptor = calendar.month_descriptor(1, 2024, Location::Uk);
        assert_eq!(descriptor.total_days, 31);
        assert_eq!(descriptor.working_day_count(), 22);
        assert_eq!(descriptor.public_holidays, vec![date(2024, 1, 1)]);
        assert_eq!(descriptor.weekends.len(), 8);
        assert!(descriptor.is_leap_year);
        assert!(!descriptor.is_working_day(date(2024, 1, 1)));
    }

    #[test]
    fn february_2024_working_days_by_location() {
        let calendar = StandardCalendar::new();
        assert_eq!(calendar.working_day_count(2, 2024, Location::Uk), 21);
        assert_eq!(calendar.working_day_count(2, 2024, Location::Us), 20);
        assert_eq!(calendar.working_day_count(2, 2024, Location::Mexico), 20);
    }

    #[test]
    fn working_day_checks_weekends_then_holidays() {
        let calendar = StandardCalendar::new();
        assert!(!calendar.is_working_day(date(2024, 1, 6), Location::Uk));
        assert!(!calendar.is_working_day(date(2024, 7, 4), Location::Us));
        assert!(calendar.is_working_day(date(2024, 7, 4), Location::Uk));
    }

    #[test]
    fn custom_table_replaces_builtin() {
        let calendar =
            StandardCalendar::with_table(HolidayTable::from_dates([(Location::Uk, date(2024, 1, 2))]));
        assert!(calendar.is_working_day(date(2024, 1, 1), Location::Uk));
        assert!(!calendar.is_working_day(date(2024, 1, 2), Location::Uk));
    }
}
