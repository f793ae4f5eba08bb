use std::rc::Rc;

use tracing::{info, warn};

use super::services::{AttendanceService, SummaryService};
use crate::{
    calendar::{CalendarEngine, StandardCalendar},
    config::{ConfigProvider, ConfigurationStore},
    core::services::AttendanceRepository,
    errors::Result,
    storage::{JsonFileBackend, StorageGateway},
};

/// Session facade that wires the stores together once.
///
/// Each component is an ordinary instance; the facade only owns the shared
/// handles so callers do not have to repeat the wiring.
pub struct Tracker {
    config: Rc<ConfigurationStore>,
    calendar: Rc<StandardCalendar>,
    attendance: Rc<AttendanceService>,
    summary: SummaryService,
    storage: StorageGateway,
    storage_available: bool,
}

impl Tracker {
    pub fn open(storage: StorageGateway) -> Self {
        Self::open_with_calendar(storage, StandardCalendar::new())
    }

    pub fn open_with_calendar(storage: StorageGateway, calendar: StandardCalendar) -> Self {
        let storage_available = storage.is_available();
        if !storage_available {
            warn!("persistent storage unavailable; changes will only last for this session");
        }

        let config = Rc::new(ConfigurationStore::with_storage(storage.clone()));
        let calendar = Rc::new(calendar);
        let attendance = Rc::new(AttendanceService::new(
            Rc::clone(&config) as Rc<dyn ConfigProvider>,
            Rc::clone(&calendar) as Rc<dyn CalendarEngine>,
            storage.clone(),
        ));
        let initial_year = config.get_configuration().year;
        let summary = SummaryService::new(
            Rc::clone(&attendance) as Rc<dyn AttendanceRepository>,
            initial_year,
        );

        info!(
            namespace = storage.namespace(),
            year = initial_year,
            storage_available,
            "tracker session opened"
        );

        Self {
            config,
            calendar,
            attendance,
            summary,
            storage,
            storage_available,
        }
    }

    /// Session over a fresh in-memory store; nothing outlives the process.
    pub fn in_memory() -> Self {
        Self::open(StorageGateway::in_memory())
    }

    /// Session persisted under the application data directory.
    pub fn open_default() -> Result<Self> {
        let backend = JsonFileBackend::open_default()?;
        Ok(Self::open(StorageGateway::new(backend)))
    }

    pub fn config(&self) -> &ConfigurationStore {
        &self.config
    }

    pub fn calendar(&self) -> &StandardCalendar {
        &self.calendar
    }

    pub fn attendance(&self) -> &AttendanceService {
        &self.attendance
    }

    pub fn summary(&self) -> &SummaryService {
        &self.summary
    }

    pub fn storage(&self) -> &StorageGateway {
        &self.storage
    }

    /// Whether storage accepted a write when the session opened.
    pub fn storage_available(&self) -> bool {
        self.storage_available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::Location, storage::MemoryBackend};
    use chrono::NaiveDate;

    #[test]
    fn sessions_over_one_backend_share_state() {
        let backend = MemoryBackend::new();
        let first = Tracker::open(StorageGateway::new(backend.clone()));
        first.config().set_year(2024).unwrap();
        first.config().set_location(Location::Us).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
        first.attendance().mark_office_day(date).unwrap();

        let second = Tracker::open(StorageGateway::new(backend));
        assert_eq!(second.config().get_configuration().location, Location::Us);
        assert!(second.attendance().is_office_day(date));
        assert_eq!(second.summary().get_current_view().selected_year, 2024);
    }

    #[test]
    fn unavailable_storage_still_works_in_memory() {
        let backend = MemoryBackend::new();
        backend.set_available(false);
        let tracker = Tracker::open(StorageGateway::new(backend));
        assert!(!tracker.storage_available());

        tracker.config().set_year(2024).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        tracker.attendance().mark_office_day(date).unwrap();
        assert!(tracker.attendance().is_office_day(date));
    }
}
