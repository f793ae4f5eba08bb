use std::{cell::Cell, rc::Rc};

use tracing::debug;

use super::attendance_service::AttendanceRepository;
use crate::{
    core::listeners::{ListenerId, ListenerRegistry},
    domain::{MonthSummary, ViewState, YearSummary},
    errors::{Result, TrackerError},
};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English month name for 1-12; empty for anything else.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_NAMES.get(index as usize))
        .copied()
        .unwrap_or("")
}

/// Year-level roll-up of attendance plus navigation state.
pub struct SummaryService {
    attendance: Rc<dyn AttendanceRepository>,
    view: Cell<ViewState>,
    listeners: ListenerRegistry<ViewState>,
}

impl SummaryService {
    pub fn new(attendance: Rc<dyn AttendanceRepository>, initial_year: i32) -> Self {
        Self {
            attendance,
            view: Cell::new(ViewState::year(initial_year)),
            listeners: ListenerRegistry::new("navigation"),
        }
    }

    /// Twelve month summaries in calendar order plus exact totals.
    pub fn get_year_summary(&self, year: i32) -> YearSummary {
        let month_summaries: Vec<MonthSummary> = (1..=12)
            .map(|month| MonthSummary {
                month,
                month_name: month_name(month).to_string(),
                status: self.attendance.get_attendance_status(month, year),
            })
            .collect();
        let total_required_days = month_summaries
            .iter()
            .map(|summary| summary.status.required_days)
            .sum();
        let total_completed_days = month_summaries
            .iter()
            .map(|summary| summary.status.completed_days)
            .sum();
        YearSummary {
            year,
            month_summaries,
            total_required_days,
            total_completed_days,
            overall_progress: overall_progress(total_completed_days, total_required_days),
        }
    }

    pub fn show_year_view(&self, year: i32) {
        self.navigate(ViewState::year(year));
    }

    pub fn show_month_view(&self, month: u32, year: i32) -> Result<()> {
        if !(1..=12).contains(&month) {
            return Err(TrackerError::InvalidMonth(month));
        }
        self.navigate(ViewState::month(month, year));
        Ok(())
    }

    pub fn get_current_view(&self) -> ViewState {
        self.view.get()
    }

    pub fn add_navigation_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&ViewState) + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn remove_navigation_listener(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn navigate(&self, next: ViewState) {
        if self.view.get() == next {
            return;
        }
        self.view.set(next);
        debug!(view = ?next.current_view, year = next.selected_year, month = ?next.selected_month, "navigated");
        self.listeners.notify(&next);
    }
}

fn overall_progress(completed: u32, required: u32) -> u32 {
    if required == 0 {
        return 0;
    }
    (f64::from(completed) / f64::from(required) * 100.0).round() as u32
}
