//! Pure domain logic for BMC chassis temperature monitoring.
//!
//! Nothing in this crate performs I/O. The controller client, notifier and
//! monitor live in the sibling crates and feed data in here for parsing,
//! calibration, classification, throttling and history keeping.

pub mod alert;
pub mod catalog;
pub mod error;
pub mod extract;
pub mod hardware;
pub mod history;
pub mod reading;
pub mod types;
