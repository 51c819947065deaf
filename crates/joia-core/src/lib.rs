//! # joia-core
//!
//! Deterministic operations core for the JoI.A. business dashboard.
//!
//! The dashboard's screens are plumbing; the logic that has to be right
//! lives here: deciding which recurring obligations are due, merging them
//! into one prioritized alert list, and parsing the wallet's free-text
//! commands. Everything is pure and synchronous — the "now" anchor is an
//! explicit parameter anchored to the business timezone, so every path is
//! testable across month and year boundaries without touching the system
//! clock.
//!
//! ## Modules
//!
//! - [`recurrence`] — due-day-of-month vs "now", with month-length clamping
//! - [`alert`] — scan the three obligation collections into one ordered alert list
//! - [`command`] — classify and extract wallet commands (inflow, outflow, Pix)
//! - [`error`] — typed parser failures

pub mod alert;
pub mod command;
pub mod error;
pub mod recurrence;

pub use alert::{
    aggregate, most_urgent, AiTool, AlertItem, AlertSource, Obligation, Partnership, Platform,
};
pub use command::{
    parse, parse_amount, Flow, ParsedCommand, INFLOW_KEYWORDS, OUTFLOW_KEYWORDS, PIX_KEYWORDS,
};
pub use error::{CommandError, Result};
pub use recurrence::{
    alert_level, business_now, days_in_month, effective_due_day, AlertLevel, BUSINESS_TZ,
};
