use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Day classification for one month at one location.
///
/// Derived on demand by the calendar engine and never persisted. Every day of
/// the month is exactly one of: a weekend, a working day, or a weekday
/// holiday. `public_holidays` may also list holidays that fall on a weekend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthDescriptor {
    pub month: u32,
    pub year: i32,
    pub total_days: u32,
    pub working_days: Vec<NaiveDate>,
    pub public_holidays: Vec<NaiveDate>,
    pub weekends: Vec<NaiveDate>,
    pub is_leap_year: bool,
}

impl MonthDescriptor {
    pub fn working_day_count(&self) -> u32 {
        self.working_days.len() as u32
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.working_days.binary_search(&date).is_ok()
    }

    /// Public holidays falling on Monday-Friday.
    pub fn weekday_holidays(&self) -> impl Iterator<Item = &NaiveDate> + '_ {
        self.public_holidays
            .iter()
            .filter(move |date| self.weekends.binary_search(date).is_err())
    }
}
