//! Outletiq - seasonal outlet sales reporting
//!
//! Loads a snapshot of outlet-store sales and computes season-over-season
//! comparisons per distributor or brand: totals, zero-excluded averages,
//! growth rates, and rank movement, plus a per-area efficiency report.
//! The HTTP surface in `core::http` serves the reports as JSON; the
//! `services::insights` client turns them into narrative commentary.

pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod report;
pub mod services;

pub use error::{ReportError, Result};
