pub mod listeners;
pub mod services;
pub mod tracker;

pub use listeners::{ListenerId, ListenerRegistry};
pub use tracker::Tracker;
