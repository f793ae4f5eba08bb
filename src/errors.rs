use std::result::Result as StdResult;

use chrono::NaiveDate;
use thiserror::Error;

/// Unified error type for configuration, attendance, and storage layers.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Unsupported location: {0}")]
    InvalidLocation(String),
    #[error("Year {0} is outside the supported range 1900-2100")]
    InvalidYear(i32),
    #[error("In-office percentage must be a finite value between 0 and 100, got {0}")]
    InvalidPercentage(f64),
    #[error("Month {0} is outside the range 1-12")]
    InvalidMonth(u32),
    #[error("Annual leave must be a non-negative whole number of days, got {0}")]
    InvalidLeaveValue(i64),
    #[error(
        "Annual leave of {requested} days exceeds the {working_days} working days in {year}-{month:02}"
    )]
    LeaveExceedsWorkingDays {
        month: u32,
        year: i32,
        requested: u32,
        working_days: u32,
    },
    #[error("{0} is not a working day")]
    NotAWorkingDay(NaiveDate),
    #[error("Persistence error: {0}")]
    StorageWriteFailed(String),
    #[error("Stored entry `{key}` is corrupted: {reason}")]
    StorageReadCorrupted { key: String, reason: String },
}

/// Field-free discriminant of [`TrackerError`], handy for keyed UI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidLocation,
    InvalidYear,
    InvalidPercentage,
    InvalidMonth,
    InvalidLeaveValue,
    LeaveExceedsWorkingDays,
    NotAWorkingDay,
    StorageWriteFailed,
    StorageReadCorrupted,
}

impl TrackerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TrackerError::InvalidLocation(_) => ErrorKind::InvalidLocation,
            TrackerError::InvalidYear(_) => ErrorKind::InvalidYear,
            TrackerError::InvalidPercentage(_) => ErrorKind::InvalidPercentage,
            TrackerError::InvalidMonth(_) => ErrorKind::InvalidMonth,
            TrackerError::InvalidLeaveValue(_) => ErrorKind::InvalidLeaveValue,
            TrackerError::LeaveExceedsWorkingDays { .. } => ErrorKind::LeaveExceedsWorkingDays,
            TrackerError::NotAWorkingDay(_) => ErrorKind::NotAWorkingDay,
            TrackerError::StorageWriteFailed(_) => ErrorKind::StorageWriteFailed,
            TrackerError::StorageReadCorrupted { .. } => ErrorKind::StorageReadCorrupted,
        }
    }

    /// True for the validation kinds that callers are expected to surface.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self.kind(),
            ErrorKind::StorageWriteFailed | ErrorKind::StorageReadCorrupted
        )
    }
}

pub type Result<T> = StdResult<T, TrackerError>;

/// Failure reported by a raw key/value backend.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<BackendError> for TrackerError {
    fn from(err: BackendError) -> Self {
        TrackerError::StorageWriteFailed(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::StorageWriteFailed(err.to_string())
    }
}
