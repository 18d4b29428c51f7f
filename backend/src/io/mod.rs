//! # IO Module
//!
//! Interfaces that expose the domain to the outside world. The only one is
//! the JSON-over-HTTP API in [`rest`].

pub mod rest;
