#![allow(dead_code)]

use chrono::NaiveDate;
use office_tracker::{
    domain::Location,
    storage::{MemoryBackend, StorageGateway},
    Tracker,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Opens a session over `backend` configured for `location`, `year`, `percentage`.
pub fn tracker_on(
    backend: MemoryBackend,
    location: Location,
    year: i32,
    percentage: f64,
) -> Tracker {
    let tracker = Tracker::open(StorageGateway::new(backend));
    let config = tracker.config();
    config.set_location(location).expect("set location");
    config.set_year(year).expect("set year");
    config
        .set_in_office_percentage(percentage)
        .expect("set percentage");
    tracker
}

/// Isolated in-memory session.
pub fn tracker(location: Location, year: i32, percentage: f64) -> Tracker {
    tracker_on(MemoryBackend::new(), location, year, percentage)
}
