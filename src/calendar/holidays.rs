//! Static public-holiday table keyed by location and year.
//!
//! The built-in table is generated once from the statutory rules of each
//! jurisdiction for [`FIRST_TABLE_YEAR`]..=[`LAST_TABLE_YEAR`]. UK and US
//! entries are the observed dates (a holiday falling on a weekend is replaced
//! by its substitute weekday); Mexican rest days are not moved and may land on
//! a weekend. Years outside the table have no holidays.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use once_cell::sync::Lazy;

use super::is_weekend;
use crate::domain::Location;

pub const FIRST_TABLE_YEAR: i32 = 2020;
pub const LAST_TABLE_YEAR: i32 = 2035;

static BUILTIN: Lazy<HolidayTable> = Lazy::new(|| {
    let mut table = HolidayTable::default();
    for year in FIRST_TABLE_YEAR..=LAST_TABLE_YEAR {
        table.insert_year(Location::Uk, year, uk_bank_holidays(year));
        table.insert_year(Location::Us, year, us_federal_holidays(year));
        table.insert_year(Location::Mexico, year, mexico_rest_days(year));
    }
    table
});

/// Immutable `(location, year) -> holiday dates` lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayTable {
    entries: BTreeMap<(Location, i32), Vec<NaiveDate>>,
}

impl HolidayTable {
    /// Shared table covering every supported location.
    pub fn builtin() -> &'static HolidayTable {
        &BUILTIN
    }

    /// Builds a table from explicit dates; duplicates are collapsed.
    pub fn from_dates<I>(dates: I) -> Self
    where
        I: IntoIterator<Item = (Location, NaiveDate)>,
    {
        let mut entries: BTreeMap<(Location, i32), Vec<NaiveDate>> = BTreeMap::new();
        for (location, date) in dates {
            entries.entry((location, date.year())).or_default().push(date);
        }
        for dates in entries.values_mut() {
            dates.sort();
            dates.dedup();
        }
        Self { entries }
    }

    /// Holidays for `(location, year)` in ascending order; empty when absent.
    pub fn holidays(&self, location: Location, year: i32) -> &[NaiveDate] {
        self.entries
            .get(&(location, year))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, location: Location, date: NaiveDate) -> bool {
        self.holidays(location, date.year())
            .binary_search(&date)
            .is_ok()
    }

    fn insert_year(&mut self, location: Location, year: i32, mut dates: Vec<NaiveDate>) {
        dates.retain(|date| date.year() == year);
        dates.sort();
        dates.dedup();
        self.entries.insert((location, year), dates);
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// Easter Sunday (Gregorian), Oudin's algorithm.
pub fn easter_sunday(year: i32) -> NaiveDate {
    let g = year % 19;
    let c = year / 100;
    let h = (c - c / 4 - (8 * c + 13) / 25 + 19 * g + 15) % 30;
    let i = h - (h / 28) * (1 - (h / 28) * (29 / (h + 1)) * ((21 - g) / 11));
    let j = (year + year / 4 + i + 2 - c + c / 4) % 7;
    let p = i - j;
    let day = 1 + (p + 27 + (p + 6) / 40) % 31;
    let month = 3 + (p + 26) / 30;
    ymd(year, month as u32, day as u32)
}

fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> NaiveDate {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n).unwrap_or(NaiveDate::MIN)
}

fn last_weekday(year: i32, month: u32, weekday: Weekday) -> NaiveDate {
    let last_day = super::days_in_month(month, year);
    let mut date = ymd(year, month, last_day);
    while date.weekday() != weekday {
        date -= Duration::days(1);
    }
    date
}

/// Weekend dates move forward to the following Monday.
fn uk_substitute(date: NaiveDate) -> NaiveDate {
    let mut moved = date;
    while is_weekend(moved) {
        moved += Duration::days(1);
    }
    moved
}

/// Saturday is observed on Friday, Sunday on Monday.
fn us_observed(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date - Duration::days(1),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

fn uk_bank_holidays(year: i32) -> Vec<NaiveDate> {
    let easter = easter_sunday(year);
    let mut dates = vec![
        uk_substitute(ymd(year, 1, 1)),
        easter - Duration::days(2),
        easter + Duration::days(1),
        last_weekday(year, 8, Weekday::Mon),
    ];

    // Early May bank holiday moved for VE Day in 2020.
    if year == 2020 {
        dates.push(ymd(2020, 5, 8));
    } else {
        dates.push(nth_weekday(year, 5, Weekday::Mon, 1));
    }
    // Spring bank holiday moved for the Platinum Jubilee in 2022.
    if year == 2022 {
        dates.push(ymd(2022, 6, 2));
        dates.push(ymd(2022, 6, 3));
    } else {
        dates.push(last_weekday(year, 5, Weekday::Mon));
    }
    match year {
        2022 => dates.push(ymd(2022, 9, 19)),
        2023 => dates.push(ymd(2023, 5, 8)),
        _ => {}
    }

    // Christmas and Boxing Day substitutes never collide: 25th goes to the
    // 27th, 26th goes to the 28th.
    let christmas = ymd(year, 12, 25);
    let boxing = ymd(year, 12, 26);
    dates.push(if is_weekend(christmas) {
        ymd(year, 12, 27)
    } else {
        christmas
    });
    dates.push(if is_weekend(boxing) {
        ymd(year, 12, 28)
    } else {
        boxing
    });
    dates
}

fn us_federal_holidays(year: i32) -> Vec<NaiveDate> {
    let mut dates = vec![
        us_observed(ymd(year, 1, 1)),
        // Observed in December when next New Year's Day is a Saturday.
        us_observed(ymd(year + 1, 1, 1)),
        nth_weekday(year, 1, Weekday::Mon, 3),
        nth_weekday(year, 2, Weekday::Mon, 3),
        last_weekday(year, 5, Weekday::Mon),
        us_observed(ymd(year, 7, 4)),
        nth_weekday(year, 9, Weekday::Mon, 1),
        nth_weekday(year, 10, Weekday::Mon, 2),
        us_observed(ymd(year, 11, 11)),
        nth_weekday(year, 11, Weekday::Thu, 4),
        us_observed(ymd(year, 12, 25)),
    ];
    if year >= 2021 {
        dates.push(us_observed(ymd(year, 6, 19)));
    }
    dates
}

fn mexico_rest_days(year: i32) -> Vec<NaiveDate> {
    let easter = easter_sunday(year);
    let mut dates = vec![
        ymd(year, 1, 1),
        nth_weekday(year, 2, Weekday::Mon, 1),
        nth_weekday(year, 3, Weekday::Mon, 3),
        easter - Duration::days(3),
        easter - Duration::days(2),
        ymd(year, 5, 1),
        ymd(year, 9, 16),
        nth_weekday(year, 11, Weekday::Mon, 3),
        ymd(year, 12, 25),
    ];
    // Presidential inauguration, every six years.
    if (year - 2024) % 6 == 0 {
        dates.push(ymd(year, 10, 1));
    }
    dates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn easter_dates() {
        assert_eq!(easter_sunday(2023), date(2023, 4, 9));
        assert_eq!(easter_sunday(2024), date(2024, 3, 31));
        assert_eq!(easter_sunday(2025), date(2025, 4, 20));
    }

    #[test]
    fn uk_2024_bank_holidays() {
        let expected = vec![
            date(2024, 1, 1),
            date(2024, 3, 29),
            date(2024, 4, 1),
            date(2024, 5, 6),
            date(2024, 5, 27),
            date(2024, 8, 26),
            date(2024, 12, 25),
            date(2024, 12, 26),
        ];
        assert_eq!(
            HolidayTable::builtin().holidays(Location::Uk, 2024),
            expected.as_slice()
        );
    }

    #[test]
    fn uk_weekend_christmas_is_substituted() {
        // 2021-12-25 was a Saturday.
        let table = HolidayTable::builtin();
        assert!(table.contains(Location::Uk, date(2021, 12, 27)));
        assert!(table.contains(Location::Uk, date(2021, 12, 28)));
        assert!(!table.contains(Location::Uk, date(2021, 12, 25)));
        // 2022-01-01 was a Saturday.
        assert!(table.contains(Location::Uk, date(2022, 1, 3)));
    }

    #[test]
    fn us_observed_new_year_lands_in_prior_december() {
        // 2022-01-01 was a Saturday, observed on 2021-12-31.
        let table = HolidayTable::builtin();
        assert!(table.contains(Location::Us, date(2021, 12, 31)));
        assert!(!table.contains(Location::Us, date(2022, 1, 1)));
        assert!(table.contains(Location::Us, date(2024, 2, 19)));
        assert!(!table.contains(Location::Us, date(2020, 6, 19)));
    }

    #[test]
    fn mexico_2024_includes_inauguration_day() {
        let table = HolidayTable::builtin();
        assert!(table.contains(Location::Mexico, date(2024, 10, 1)));
        assert!(table.contains(Location::Mexico, date(2024, 2, 5)));
        assert!(table.contains(Location::Mexico, date(2024, 3, 28)));
        assert!(!table.contains(Location::Mexico, date(2025, 10, 1)));
    }

    #[test]
    fn years_outside_table_are_empty() {
        let table = HolidayTable::builtin();
        assert!(table.holidays(Location::Uk, 1999).is_empty());
        assert!(table.holidays(Location::Us, LAST_TABLE_YEAR + 1).is_empty());
    }

    #[test]
    fn custom_tables_sort_and_dedup() {
        let table = HolidayTable::from_dates([
            (Location::Us, date(2030, 5, 2)),
            (Location::Us, date(2030, 1, 7)),
            (Location::Us, date(2030, 5, 2)),
        ]);
        assert_eq!(
            table.holidays(Location::Us, 2030),
            &[date(2030, 1, 7), date(2030, 5, 2)]
        );
        assert!(table.holidays(Location::Uk, 2030).is_empty());
    }
}
