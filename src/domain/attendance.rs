//! Sparse attendance and annual-leave records plus derived status types.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Office-day marks keyed by year, month, and day.
///
/// Only `true` entries are ever written; unmarking deletes the entry and
/// prunes emptied month/year containers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceData {
    years: BTreeMap<i32, BTreeMap<u32, BTreeMap<u32, bool>>>,
}

impl AttendanceData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_marked(&self, date: NaiveDate) -> bool {
        self.years
            .get(&date.year())
            .and_then(|months| months.get(&date.month()))
            .and_then(|days| days.get(&date.day()))
            .copied()
            .unwrap_or(false)
    }

    /// Records a mark, returning `true` when the stored data changed.
    pub fn mark(&mut self, date: NaiveDate) -> bool {
        let slot = self
            .years
            .entry(date.year())
            .or_default()
            .entry(date.month())
            .or_default()
            .entry(date.day())
            .or_insert(false);
        let changed = !*slot;
        *slot = true;
        changed
    }

    /// Removes a mark, returning `true` when an entry was present.
    pub fn unmark(&mut self, date: NaiveDate) -> bool {
        let Some(months) = self.years.get_mut(&date.year()) else {
            return false;
        };
        let Some(days) = months.get_mut(&date.month()) else {
            return false;
        };
        let removed = days.remove(&date.day()).is_some();
        if days.is_empty() {
            months.remove(&date.month());
        }
        if months.is_empty() {
            self.years.remove(&date.year());
        }
        removed
    }

    /// Marked dates for a month in ascending order.
    pub fn marked_days(&self, year: i32, month: u32) -> Vec<NaiveDate> {
        self.years
            .get(&year)
            .and_then(|months| months.get(&month))
            .map(|days| {
                days.iter()
                    .filter(|(_, present)| **present)
                    .filter_map(|(day, _)| NaiveDate::from_ymd_opt(year, month, *day))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn marked_count(&self, year: i32, month: u32) -> u32 {
        self.years
            .get(&year)
            .and_then(|months| months.get(&month))
            .map(|days| days.values().filter(|present| **present).count() as u32)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

/// Days of annual leave keyed by year and month. Zero is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnualLeaveData {
    years: BTreeMap<i32, BTreeMap<u32, u32>>,
}

impl AnnualLeaveData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, year: i32, month: u32) -> u32 {
        self.years
            .get(&year)
            .and_then(|months| months.get(&month))
            .copied()
            .unwrap_or(0)
    }

    /// Stores `days`, removing the entry for zero. Returns `true` on change.
    pub fn set(&mut self, year: i32, month: u32, days: u32) -> bool {
        if days == 0 {
            let Some(months) = self.years.get_mut(&year) else {
                return false;
            };
            let removed = months.remove(&month).is_some();
            if months.is_empty() {
                self.years.remove(&year);
            }
            return removed;
        }
        let previous = self.years.entry(year).or_default().insert(month, days);
        previous != Some(days)
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

/// Monthly compliance snapshot recomputed on every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceStatus {
    pub required_days: u32,
    pub completed_days: u32,
    pub remaining_days: u32,
    pub is_on_track: bool,
    pub annual_leave_days: u32,
}

impl AttendanceStatus {
    pub fn new(required_days: u32, completed_days: u32, annual_leave_days: u32) -> Self {
        Self {
            required_days,
            completed_days,
            remaining_days: required_days.saturating_sub(completed_days),
            is_on_track: completed_days >= required_days,
            annual_leave_days,
        }
    }

    pub fn progress(&self) -> AttendanceProgress {
        AttendanceProgress::classify(self.completed_days, self.required_days)
    }
}

/// Three-way reading of a status, for callers that separate "ahead" from
/// "on track". `is_on_track` is true for both `OnTrack` and `Ahead`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceProgress {
    Behind,
    OnTrack,
    Ahead,
}

impl AttendanceProgress {
    pub fn classify(completed: u32, required: u32) -> Self {
        match completed.cmp(&required) {
            std::cmp::Ordering::Less => AttendanceProgress::Behind,
            std::cmp::Ordering::Equal => AttendanceProgress::OnTrack,
            std::cmp::Ordering::Greater => AttendanceProgress::Ahead,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AttendanceProgress::Behind => "Behind",
            AttendanceProgress::OnTrack => "On Track",
            AttendanceProgress::Ahead => "Ahead",
        }
    }
}
