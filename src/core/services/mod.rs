pub mod attendance_service;
pub mod summary_service;

pub use attendance_service::{
    required_days_for, AttendanceChange, AttendanceRepository, AttendanceService,
};
pub use summary_service::{month_name, SummaryService};
