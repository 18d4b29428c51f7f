//! # Storage Module
//!
//! Handles all data persistence for the recharge tracker.
//!
//! Persistence is a handful of named JSON blobs in a data directory, mirroring
//! the key-value layout the service has always used:
//!
//! ```text
//! data/
//! ├── phone-recharge-data.json      ← current day bucket
//! ├── phone-recharge-history.json   ← closed days, newest first
//! └── phone-recharge-users.json     ← registered accounts
//! ```
//!
//! Every blob is read and replaced wholesale. There are no transactions or
//! locks: concurrent writers race and the last write wins.

pub mod traits;
pub mod json;

pub use traits::*;
pub use json::{DayBucketRepository, HistoryRepository, JsonConnection, UserRepository};
