use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::{
    calendar::CalendarEngine,
    config::{ConfigProvider, Configuration},
    core::listeners::{ListenerId, ListenerRegistry},
    domain::{AnnualLeaveData, AttendanceData, AttendanceStatus},
    errors::{Result, TrackerError},
    storage::StorageGateway,
};

pub const ATTENDANCE_KEY: &str = "attendance";
pub const ANNUAL_LEAVE_KEY: &str = "annual_leave";

/// Why the status of some month may have changed.
#[derive(Debug, Clone, PartialEq)]
pub enum AttendanceChange {
    OfficeDayMarked(NaiveDate),
    OfficeDayUnmarked(NaiveDate),
    AnnualLeaveSet { month: u32, year: i32, days: u32 },
    Cleared,
    Reloaded,
    Configuration(Configuration),
}

/// Attendance marks, leave allowances, and the statistics derived from them.
pub trait AttendanceRepository {
    fn mark_office_day(&self, date: NaiveDate) -> Result<()>;
    fn unmark_office_day(&self, date: NaiveDate);
    fn is_office_day(&self, date: NaiveDate) -> bool;
    fn get_office_days(&self, month: u32, year: i32) -> Vec<NaiveDate>;
    fn set_annual_leave(&self, month: u32, year: i32, days: i64) -> Result<()>;
    fn get_annual_leave(&self, month: u32, year: i32) -> u32;
    fn calculate_required_days(&self, month: u32, year: i32) -> u32;
    fn get_attendance_status(&self, month: u32, year: i32) -> AttendanceStatus;
}

/// `ceil(days * percentage / 100)`; any fractional day rounds up.
pub fn required_days_for(days: u32, percentage: f64) -> u32 {
    (f64::from(days) * percentage / 100.0).ceil() as u32
}

/// Authoritative owner of attendance and annual-leave data.
///
/// Status is recomputed from the live configuration on every query, so a
/// location, year, or percentage change is visible immediately. Storage
/// failures are logged and never undo an in-memory change.
pub struct AttendanceService {
    config: Rc<dyn ConfigProvider>,
    calendar: Rc<dyn CalendarEngine>,
    storage: StorageGateway,
    attendance: RefCell<AttendanceData>,
    leave: RefCell<AnnualLeaveData>,
    listeners: Rc<ListenerRegistry<AttendanceChange>>,
    config_subscription: ListenerId,
}

impl AttendanceService {
    pub fn new(
        config: Rc<dyn ConfigProvider>,
        calendar: Rc<dyn CalendarEngine>,
        storage: StorageGateway,
    ) -> Self {
        let attendance = storage.load(ATTENDANCE_KEY).unwrap_or_default();
        let leave = storage.load(ANNUAL_LEAVE_KEY).unwrap_or_default();
        let listeners = Rc::new(ListenerRegistry::new("attendance"));

        let forward: Weak<ListenerRegistry<AttendanceChange>> = Rc::downgrade(&listeners);
        let config_subscription = config.subscribe(Box::new(move |snapshot: &Configuration| {
            if let Some(listeners) = forward.upgrade() {
                listeners.notify(&AttendanceChange::Configuration(*snapshot));
            }
        }));

        Self {
            config,
            calendar,
            storage,
            attendance: RefCell::new(attendance),
            leave: RefCell::new(leave),
            listeners,
            config_subscription,
        }
    }

    pub fn add_change_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&AttendanceChange) + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn remove_change_listener(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Flips the mark on `date`, returning whether it is now marked.
    pub fn toggle_office_day(&self, date: NaiveDate) -> Result<bool> {
        if self.is_office_day(date) {
            self.unmark_office_day(date);
            Ok(false)
        } else {
            self.mark_office_day(date)?;
            Ok(true)
        }
    }

    /// Drops every mark and leave allowance.
    pub fn clear_all(&self) {
        let had_marks = !self.attendance.borrow().is_empty();
        let had_leave = !self.leave.borrow().is_empty();
        if !had_marks && !had_leave {
            return;
        }
        *self.attendance.borrow_mut() = AttendanceData::new();
        *self.leave.borrow_mut() = AnnualLeaveData::new();
        self.persist_attendance();
        self.persist_leave();
        debug!("cleared attendance and annual leave");
        self.listeners.notify(&AttendanceChange::Cleared);
    }

    /// Re-reads both records from storage, replacing in-memory state.
    pub fn reload(&self) {
        *self.attendance.borrow_mut() = self.storage.load(ATTENDANCE_KEY).unwrap_or_default();
        *self.leave.borrow_mut() = self.storage.load(ANNUAL_LEAVE_KEY).unwrap_or_default();
        self.listeners.notify(&AttendanceChange::Reloaded);
    }

    pub fn attendance_snapshot(&self) -> AttendanceData {
        self.attendance.borrow().clone()
    }

    pub fn annual_leave_snapshot(&self) -> AnnualLeaveData {
        self.leave.borrow().clone()
    }

    fn working_day_count(&self, month: u32, year: i32) -> u32 {
        let location = self.config.configuration().location;
        self.calendar.working_day_count(month, year, location)
    }

    fn persist_attendance(&self) {
        if let Err(err) = self.storage.save(ATTENDANCE_KEY, &*self.attendance.borrow()) {
            warn!(error = %err, "failed to persist attendance data");
        }
    }

    fn persist_leave(&self) {
        if let Err(err) = self.storage.save(ANNUAL_LEAVE_KEY, &*self.leave.borrow()) {
            warn!(error = %err, "failed to persist annual leave data");
        }
    }
}

impl AttendanceRepository for AttendanceService {
    fn mark_office_day(&self, date: NaiveDate) -> Result<()> {
        let location = self.config.configuration().location;
        if !self.calendar.is_working_day(date, location) {
            return Err(TrackerError::NotAWorkingDay(date));
        }
        let changed = self.attendance.borrow_mut().mark(date);
        if changed {
            debug!(%date, "marked office day");
            self.persist_attendance();
            self.listeners.notify(&AttendanceChange::OfficeDayMarked(date));
        }
        Ok(())
    }

    fn unmark_office_day(&self, date: NaiveDate) {
        let changed = self.attendance.borrow_mut().unmark(date);
        if changed {
            debug!(%date, "unmarked office day");
            self.persist_attendance();
            self.listeners
                .notify(&AttendanceChange::OfficeDayUnmarked(date));
        }
    }

    fn is_office_day(&self, date: NaiveDate) -> bool {
        self.attendance.borrow().is_marked(date)
    }

    fn get_office_days(&self, month: u32, year: i32) -> Vec<NaiveDate> {
        self.attendance.borrow().marked_days(year, month)
    }

    fn set_annual_leave(&self, month: u32, year: i32, days: i64) -> Result<()> {
        if !(1..=12).contains(&month) {
            return Err(TrackerError::InvalidMonth(month));
        }
        let requested = u32::try_from(days).map_err(|_| TrackerError::InvalidLeaveValue(days))?;
        let working_days = self.working_day_count(month, year);
        if requested > working_days {
            return Err(TrackerError::LeaveExceedsWorkingDays {
                month,
                year,
                requested,
                working_days,
            });
        }
        let changed = self.leave.borrow_mut().set(year, month, requested);
        if changed {
            debug!(month, year, days = requested, "annual leave updated");
            self.persist_leave();
            self.listeners.notify(&AttendanceChange::AnnualLeaveSet {
                month,
                year,
                days: requested,
            });
        }
        Ok(())
    }

    fn get_annual_leave(&self, month: u32, year: i32) -> u32 {
        self.leave.borrow().get(year, month)
    }

    fn calculate_required_days(&self, month: u32, year: i32) -> u32 {
        let config = self.config.configuration();
        let working_days = self
            .calendar
            .working_day_count(month, year, config.location);
        let available = working_days.saturating_sub(self.get_annual_leave(month, year));
        required_days_for(available, config.in_office_percentage)
    }

    fn get_attendance_status(&self, month: u32, year: i32) -> AttendanceStatus {
        let completed = self.attendance.borrow().marked_count(year, month);
        AttendanceStatus::new(
            self.calculate_required_days(month, year),
            completed,
            self.get_annual_leave(month, year),
        )
    }
}

impl Drop for AttendanceService {
    fn drop(&mut self) {
        self.config.unsubscribe(self.config_subscription);
    }
}
