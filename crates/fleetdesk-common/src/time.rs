//! ---
//! fd_section: "01-core-functionality"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Shared primitives and utilities for the dashboard runtime."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
use chrono::{Local, NaiveDate, Timelike};

/// Calendar date used to prefill date inputs (deadline, installation date).
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Hour of the local wall clock, used for dashboard greetings.
pub fn local_hour() -> u32 {
    Local::now().hour()
}
