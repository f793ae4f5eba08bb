pub mod attendance;
pub mod calendar;
pub mod location;
pub mod view;

pub use attendance::{AnnualLeaveData, AttendanceData, AttendanceProgress, AttendanceStatus};
pub use calendar::MonthDescriptor;
pub use location::Location;
pub use view::{MonthSummary, ViewKind, ViewState, YearSummary};
