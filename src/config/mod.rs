//! Configuration store: location, tracked year, and in-office percentage.

use std::cell::Cell;

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    core::listeners::{ListenerId, ListenerRegistry},
    domain::Location,
    errors::{Result, TrackerError},
    storage::StorageGateway,
};

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;
pub const DEFAULT_PERCENTAGE: f64 = 60.0;
pub const CONFIG_KEY: &str = "configuration";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub location: Location,
    pub year: i32,
    pub in_office_percentage: f64,
}

impl Configuration {
    /// UK, the current local year, 60%.
    pub fn defaults() -> Self {
        Self {
            location: Location::default(),
            year: Local::now().year(),
            in_office_percentage: DEFAULT_PERCENTAGE,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_location(self.location)?;
        validate_year(self.year)?;
        validate_percentage(self.in_office_percentage)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::defaults()
    }
}

fn validate_location(location: Location) -> Result<()> {
    if Location::ALL.contains(&location) {
        Ok(())
    } else {
        Err(TrackerError::InvalidLocation(location.to_string()))
    }
}

fn validate_year(year: i32) -> Result<()> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(TrackerError::InvalidYear(year))
    }
}

fn validate_percentage(percentage: f64) -> Result<()> {
    if percentage.is_finite() && (0.0..=100.0).contains(&percentage) {
        Ok(())
    } else {
        Err(TrackerError::InvalidPercentage(percentage))
    }
}

/// Read access to the live configuration plus change subscription.
pub trait ConfigProvider {
    fn configuration(&self) -> Configuration;
    fn subscribe(&self, listener: Box<dyn Fn(&Configuration)>) -> ListenerId;
    fn unsubscribe(&self, id: ListenerId) -> bool;
}

/// Owns the [`Configuration`]; every mutation is validated first and
/// listeners only hear about values that actually changed.
pub struct ConfigurationStore {
    current: Cell<Configuration>,
    listeners: ListenerRegistry<Configuration>,
    storage: Option<StorageGateway>,
}

impl ConfigurationStore {
    pub fn new() -> Self {
        Self {
            current: Cell::new(Configuration::defaults()),
            listeners: ListenerRegistry::new("configuration"),
            storage: None,
        }
    }

    /// Restores a previously saved configuration and keeps it saved.
    ///
    /// A missing, corrupted, or out-of-range record falls back to defaults.
    pub fn with_storage(storage: StorageGateway) -> Self {
        let initial = match storage.load::<Configuration>(CONFIG_KEY) {
            Some(saved) => match saved.validate() {
                Ok(()) => saved,
                Err(err) => {
                    warn!(error = %err, "ignoring invalid saved configuration");
                    Configuration::defaults()
                }
            },
            None => Configuration::defaults(),
        };
        Self {
            current: Cell::new(initial),
            listeners: ListenerRegistry::new("configuration"),
            storage: Some(storage),
        }
    }

    pub fn get_configuration(&self) -> Configuration {
        self.current.get()
    }

    pub fn supported_locations(&self) -> &'static [Location] {
        &Location::ALL
    }

    pub fn set_location(&self, location: Location) -> Result<()> {
        validate_location(location)?;
        self.apply(|config| config.location = location);
        Ok(())
    }

    /// Parses and applies a location name such as `"UK"` or `"Mexico"`.
    pub fn set_location_str(&self, value: &str) -> Result<()> {
        self.set_location(value.parse()?)
    }

    pub fn set_year(&self, year: i32) -> Result<()> {
        validate_year(year)?;
        self.apply(|config| config.year = year);
        Ok(())
    }

    pub fn set_in_office_percentage(&self, percentage: f64) -> Result<()> {
        validate_percentage(percentage)?;
        self.apply(|config| config.in_office_percentage = percentage);
        Ok(())
    }

    pub fn reset_to_defaults(&self) {
        let defaults = Configuration::defaults();
        self.apply(|config| *config = defaults);
    }

    pub fn add_change_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&Configuration) + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn remove_change_listener(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn apply(&self, change: impl FnOnce(&mut Configuration)) {
        let previous = self.current.get();
        let mut next = previous;
        change(&mut next);
        if next == previous {
            return;
        }
        self.current.set(next);
        debug!(
            location = %next.location,
            year = next.year,
            percentage = next.in_office_percentage,
            "configuration updated"
        );
        self.persist(&next);
        self.listeners.notify(&next);
    }

    fn persist(&self, config: &Configuration) {
        if let Some(storage) = &self.storage {
            if let Err(err) = storage.save(CONFIG_KEY, config) {
                warn!(error = %err, "failed to persist configuration");
            }
        }
    }
}

impl Default for ConfigurationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigProvider for ConfigurationStore {
    fn configuration(&self) -> Configuration {
        self.get_configuration()
    }

    fn subscribe(&self, listener: Box<dyn Fn(&Configuration)>) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use std::{cell::RefCell, rc::Rc};

    fn recording_store() -> (ConfigurationStore, Rc<RefCell<Vec<Configuration>>>) {
        let store = ConfigurationStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.add_change_listener(move |config| sink.borrow_mut().push(*config));
        (store, seen)
    }

    #[test]
    fn defaults_are_uk_current_year_sixty_percent() {
        let config = ConfigurationStore::new().get_configuration();
        assert_eq!(config.location, Location::Uk);
        assert_eq!(config.year, Local::now().year());
        assert_eq!(config.in_office_percentage, 60.0);
    }

    #[test]
    fn repeated_sets_notify_once() {
        let (store, seen) = recording_store();
        store.set_location(Location::Mexico).unwrap();
        store.set_location(Location::Mexico).unwrap();
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].location, Location::Mexico);
    }

    #[test]
    fn invalid_values_are_rejected_without_side_effects() {
        let (store, seen) = recording_store();
        let before = store.get_configuration();

        assert_eq!(store.set_year(1899).unwrap_err().kind(), ErrorKind::InvalidYear);
        assert_eq!(store.set_year(2101).unwrap_err().kind(), ErrorKind::InvalidYear);
        for bad in [-0.5, 100.5, f64::NAN, f64::INFINITY] {
            assert_eq!(
                store.set_in_office_percentage(bad).unwrap_err().kind(),
                ErrorKind::InvalidPercentage
            );
        }
        assert_eq!(
            store.set_location_str("Narnia").unwrap_err().kind(),
            ErrorKind::InvalidLocation
        );

        assert_eq!(store.get_configuration(), before);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn boundary_values_are_accepted() {
        let store = ConfigurationStore::new();
        store.set_year(1900).unwrap();
        store.set_year(2100).unwrap();
        store.set_in_office_percentage(0.0).unwrap();
        store.set_in_office_percentage(100.0).unwrap();
        store.set_location_str("us").unwrap();
        assert_eq!(store.get_configuration().location, Location::Us);
    }

    #[test]
    fn reset_notifies_only_when_different() {
        let (store, seen) = recording_store();
        store.reset_to_defaults();
        assert!(seen.borrow().is_empty());
        store.set_in_office_percentage(80.0).unwrap();
        store.reset_to_defaults();
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(store.get_configuration().in_office_percentage, 60.0);
    }

    #[test]
    fn removed_listener_is_silent() {
        let store = ConfigurationStore::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let id = store.add_change_listener(move |_| counter.set(counter.get() + 1));
        assert!(store.remove_change_listener(id));
        store.set_year(2030).unwrap();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn saved_configuration_is_restored() {
        let storage = StorageGateway::in_memory();
        let store = ConfigurationStore::with_storage(storage.clone());
        store.set_location(Location::Us).unwrap();
        store.set_year(2025).unwrap();

        let reopened = ConfigurationStore::with_storage(storage);
        let config = reopened.get_configuration();
        assert_eq!(config.location, Location::Us);
        assert_eq!(config.year, 2025);
    }

    #[test]
    fn out_of_range_saved_configuration_falls_back_to_defaults() {
        let storage = StorageGateway::in_memory();
        storage
            .save(
                CONFIG_KEY,
                &Configuration {
                    location: Location::Us,
                    year: 3000,
                    in_office_percentage: 50.0,
                },
            )
            .unwrap();
        let store = ConfigurationStore::with_storage(storage);
        assert_eq!(store.get_configuration().location, Location::Uk);
    }
}
