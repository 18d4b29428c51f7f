//! # Domain Module
//!
//! Business logic for the recharge tracker, independent of HTTP and of the
//! storage backend.
//!
//! ## Module Organization
//!
//! - **calendar**: business timezone, "today", and tolerant day-label parsing
//! - **request_service**: the current-day request store (submit, toggle, delete)
//! - **history_service**: ordering and retention of closed days
//! - **rollover_service**: closing a day into history and resetting the bucket
//! - **auth_service**: credential check, session tokens, cron token
//! - **user_service**: registration and account administration
//! - **password**: slow password hashing
//!
//! ## Business Rules
//!
//! - Phone numbers need at least 10 digits; amounts must be positive
//! - History is sorted newest first, one entry per date, capped at N days
//! - A bucket already empty and dated today is never rolled over twice
//! - The configured admin is checked before registered accounts

pub mod calendar;
pub mod commands;
pub mod models;
pub mod password;
pub mod request_service;
pub mod history_service;
pub mod rollover_service;
pub mod auth_service;
pub mod user_service;

pub use auth_service::*;
pub use calendar::*;
pub use history_service::*;
pub use password::*;
pub use request_service::*;
pub use rollover_service::*;
pub use user_service::*;
