//! Sample trade signal payload.
//!
//! The [`Signal`] is fixture data: a flat trading instruction with a fixed set
//! of keys that every transport serializes the same way.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Format of [`Signal::entry_time`].
pub const ENTRY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A trading instruction sent to the signal server.
///
/// Field names follow the server's wire format (`entryTime`, `newTP`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    /// Instrument symbol (e.g. `EURUSD`).
    pub symbol: String,
    /// `BUY` or `SELL`.
    pub direction: String,
    /// Entry time, `YYYY-MM-DD HH:MM:SS`.
    pub entry_time: String,
    /// Take profit in pips.
    pub tp: i64,
    /// Stop loss in pips.
    pub sl: i64,
    /// First take-profit condition time, `HH:MM`.
    pub tp_condition1: String,
    /// Second take-profit condition time, `HH:MM`.
    pub tp_condition2: String,
    /// Take profit applied once a condition triggers.
    #[serde(rename = "newTP")]
    pub new_tp: i64,
    /// Position size in lots.
    pub lot: f64,
    pub is_daily: bool,
    #[serde(rename = "dailyTP")]
    pub daily_tp: i64,
    pub daily_lot: f64,
    pub account_name: String,
    pub brand: String,
}

impl Signal {
    /// Build the sample signal stamped with the current local time.
    pub fn sample() -> Self {
        Self::sample_at(Local::now())
    }

    /// Build the sample signal stamped with `entry`.
    pub fn sample_at<Tz: TimeZone>(entry: DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            symbol: "EURUSD".to_string(),
            direction: "BUY".to_string(),
            entry_time: entry.format(ENTRY_TIME_FORMAT).to_string(),
            tp: 30,
            sl: 10,
            tp_condition1: "21:10".to_string(),
            tp_condition2: "09:40".to_string(),
            new_tp: 15,
            lot: 0.10,
            is_daily: false,
            daily_tp: 20,
            daily_lot: 0.01,
            account_name: "Test EA".to_string(),
            brand: "TEST BRAND".to_string(),
        }
    }

    /// Serialize to compact JSON text.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
