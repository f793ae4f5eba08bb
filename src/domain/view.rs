use serde::{Deserialize, Serialize};

use super::attendance::AttendanceStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewKind {
    Year,
    Month,
}

/// Which calendar the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub current_view: ViewKind,
    pub selected_year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_month: Option<u32>,
}

impl ViewState {
    pub fn year(year: i32) -> Self {
        Self {
            current_view: ViewKind::Year,
            selected_year: year,
            selected_month: None,
        }
    }

    pub fn month(month: u32, year: i32) -> Self {
        Self {
            current_view: ViewKind::Month,
            selected_year: year,
            selected_month: Some(month),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub month: u32,
    pub month_name: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: i32,
    pub month_summaries: Vec<MonthSummary>,
    pub total_required_days: u32,
    pub total_completed_days: u32,
    /// Completed over required as a rounded percentage; 0 when nothing is required.
    pub overall_progress: u32,
}
