//! # Domain Models
//!
//! Pure data describing tenants and what their shells should contain.
//! Keep it lean: no I/O, no logging, no composition logic. Only `serde` is allowed here.

pub mod config;
pub mod constants;
pub mod descriptor;
pub mod tenant;
