use dirs::home_dir;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".office_tracker";
const STORE_DIR: &str = "store";

/// Returns the application data directory, defaulting to `~/.office_tracker`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("OFFICE_TRACKER_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Directory holding the key/value entries of the file backend.
pub fn store_dir() -> PathBuf {
    app_data_dir().join(STORE_DIR)
}
