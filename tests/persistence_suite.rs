mod common;

use common::{date, tracker_on};
use office_tracker::{
    config::Configuration,
    core::services::AttendanceRepository,
    domain::{AttendanceData, Location},
    storage::{JsonFileBackend, KeyValueBackend, MemoryBackend, StorageGateway},
    Tracker,
};
use tempfile::tempdir;

#[test]
fn state_survives_a_fresh_session_on_the_same_memory_backend() {
    let backend = MemoryBackend::new();
    {
        let tracker = tracker_on(backend.clone(), Location::Mexico, 2024, 40.0);
        tracker.attendance().mark_office_day(date(2024, 3, 4)).unwrap();
        tracker.attendance().set_annual_leave(3, 2024, 2).unwrap();
    }

    let reopened = Tracker::open(StorageGateway::new(backend));
    let config = reopened.config().get_configuration();
    assert_eq!(config.location, Location::Mexico);
    assert_eq!(config.year, 2024);
    assert_eq!(config.in_office_percentage, 40.0);
    assert!(reopened.attendance().is_office_day(date(2024, 3, 4)));
    assert_eq!(reopened.attendance().get_annual_leave(3, 2024), 2);
}

#[test]
fn json_file_backend_round_trips_a_session() {
    let dir = tempdir().unwrap();
    {
        let backend = JsonFileBackend::new(dir.path().to_path_buf()).unwrap();
        let tracker = Tracker::open(StorageGateway::new(backend));
        tracker.config().set_year(2024).unwrap();
        tracker.config().set_location(Location::Us).unwrap();
        tracker.attendance().mark_office_day(date(2024, 2, 20)).unwrap();
        tracker.attendance().mark_office_day(date(2024, 2, 21)).unwrap();
    }

    let backend = JsonFileBackend::new(dir.path().to_path_buf()).unwrap();
    let keys = StorageGateway::new(backend.clone()).keys();
    assert_eq!(
        keys,
        vec![
            "attendance".to_string(),
            "configuration".to_string()
        ]
    );

    let tracker = Tracker::open(StorageGateway::new(backend));
    assert_eq!(
        tracker.attendance().get_office_days(2, 2024),
        vec![date(2024, 2, 20), date(2024, 2, 21)]
    );
    assert_eq!(tracker.config().get_configuration().location, Location::Us);
}

#[test]
fn attendance_is_stored_as_nested_year_month_day_json() {
    let backend = MemoryBackend::new();
    let tracker = tracker_on(backend.clone(), Location::Uk, 2024, 60.0);
    tracker.attendance().mark_office_day(date(2024, 1, 2)).unwrap();

    let raw = backend.get("office-tracker:attendance").unwrap().unwrap();
    assert_eq!(raw, r#"{"2024":{"1":{"2":true}}}"#);
    let decoded: AttendanceData = serde_json::from_str(&raw).unwrap();
    assert!(decoded.is_marked(date(2024, 1, 2)));

    tracker.attendance().unmark_office_day(date(2024, 1, 2));
    let raw = backend.get("office-tracker:attendance").unwrap().unwrap();
    assert_eq!(raw, "{}");
}

#[test]
fn corrupted_records_load_as_empty() {
    let backend = MemoryBackend::new();
    backend.set("office-tracker:attendance", "[1, 2").unwrap();
    backend.set("office-tracker:annual_leave", "\"nope\"").unwrap();
    backend
        .set("office-tracker:configuration", r#"{"location":"Atlantis"}"#)
        .unwrap();

    let tracker = Tracker::open(StorageGateway::new(backend.clone()));
    assert!(tracker.attendance().attendance_snapshot().is_empty());
    assert!(tracker.attendance().annual_leave_snapshot().is_empty());
    assert_eq!(
        tracker.config().get_configuration().location,
        Configuration::defaults().location
    );
    assert_eq!(backend.get("office-tracker:attendance").unwrap(), None);
}

#[test]
fn out_of_range_saved_configuration_falls_back_to_defaults() {
    let backend = MemoryBackend::new();
    backend
        .set(
            "office-tracker:configuration",
            r#"{"location":"US","year":2024,"in_office_percentage":150.0}"#,
        )
        .unwrap();
    let tracker = Tracker::open(StorageGateway::new(backend));
    assert_eq!(tracker.config().get_configuration(), Configuration::defaults());
}

#[test]
fn clearing_the_namespace_resets_the_next_session() {
    let dir = tempdir().unwrap();
    let backend = JsonFileBackend::new(dir.path().join("store")).unwrap();
    backend.set("someone-else:key", "1").unwrap();
    {
        let tracker = Tracker::open(StorageGateway::new(backend.clone()));
        tracker.config().set_year(2024).unwrap();
        tracker.attendance().mark_office_day(date(2024, 1, 2)).unwrap();
        tracker.storage().clear().unwrap();
    }

    let tracker = Tracker::open(StorageGateway::new(backend.clone()));
    assert!(!tracker.attendance().is_office_day(date(2024, 1, 2)));
    assert_eq!(backend.get("someone-else:key").unwrap().as_deref(), Some("1"));
}

#[test]
fn quota_pressure_keeps_the_latest_write() {
    let backend = MemoryBackend::with_quota(256);
    let gateway = StorageGateway::new(backend.clone());
    for index in 0..4 {
        gateway
            .save(&format!("cache-{index}"), &"c".repeat(30))
            .unwrap();
    }
    let tracker = Tracker::open(gateway);
    tracker.config().set_year(2024).unwrap();
    assert!(backend.get("office-tracker:configuration").unwrap().is_some());
    assert!(backend.used_bytes() <= 256);
}
