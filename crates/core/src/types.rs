/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Whole degrees Celsius after calibration.
pub type Celsius = i32;
