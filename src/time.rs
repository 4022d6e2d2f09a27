//! # Simulation Time Scale
//!
//! The orbit tree is driven by a single scalar: tropical years elapsed since the
//! model epoch. These helpers convert between that scalar, Unix timestamps,
//! Julian days and `chrono` date-times. They are pure functions of their
//! arguments and the [`ModelConstants`] passed in.

use crate::config::ModelConstants;
use chrono::{DateTime, TimeZone, Utc};

/// Seconds in a standard 24 h day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian day of the Unix epoch (1970-01-01 00:00 UTC)
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// One day in simulation years.
pub fn sim_day(c: &ModelConstants) -> f64 {
    1.0 / c.year_length_days
}

pub fn sim_hour(c: &ModelConstants) -> f64 {
    sim_day(c) / 24.0
}

pub fn sim_minute(c: &ModelConstants) -> f64 {
    sim_hour(c) / 60.0
}

pub fn sim_second(c: &ModelConstants) -> f64 {
    sim_minute(c) / 60.0
}

pub fn sim_week(c: &ModelConstants) -> f64 {
    sim_day(c) * 7.0
}

/// 30 days
pub fn sim_month(c: &ModelConstants) -> f64 {
    sim_day(c) * 30.0
}

/// 365 days (a calendar year, slightly short of one simulation unit)
pub fn sim_year(c: &ModelConstants) -> f64 {
    sim_day(c) * 365.0
}

/// Unix timestamp (seconds, fractional allowed) to simulation time.
pub fn ts_to_sim(c: &ModelConstants, ts: f64) -> f64 {
    (ts - epoch_ts(c)) * sim_second(c)
}

/// Simulation time to Unix timestamp.
pub fn sim_to_ts(c: &ModelConstants, sim: f64) -> f64 {
    sim / sim_second(c) + epoch_ts(c)
}

pub fn jd_to_ts(jd: f64) -> f64 {
    (jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY
}

pub fn ts_to_jd(ts: f64) -> f64 {
    ts / SECONDS_PER_DAY + UNIX_EPOCH_JD
}

pub fn datetime_to_sim(c: &ModelConstants, dt: DateTime<Utc>) -> f64 {
    ts_to_sim(c, datetime_to_ts(dt))
}

/// `None` when the result falls outside chrono's representable range.
pub fn sim_to_datetime(c: &ModelConstants, sim: f64) -> Option<DateTime<Utc>> {
    ts_to_datetime(sim_to_ts(c, sim))
}

pub fn jd_to_sim(c: &ModelConstants, jd: f64) -> f64 {
    ts_to_sim(c, jd_to_ts(jd))
}

pub fn sim_to_jd(c: &ModelConstants, sim: f64) -> f64 {
    ts_to_jd(sim_to_ts(c, sim))
}

fn epoch_ts(c: &ModelConstants) -> f64 {
    datetime_to_ts(c.epoch)
}

fn datetime_to_ts(dt: DateTime<Utc>) -> f64 {
    dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) * 1e-9
}

fn ts_to_datetime(ts: f64) -> Option<DateTime<Utc>> {
    if !ts.is_finite() {
        return None;
    }
    let secs = ts.floor();
    let nanos = ((ts - secs) * 1e9).round().min(999_999_999.0) as u32;
    Utc.timestamp_opt(secs as i64, nanos).single()
}
