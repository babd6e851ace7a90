use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// A recurring daily restriction window.
///
/// `start` and `end` are wall-clock `HH:MM` strings, exactly as the settings
/// editor stores them. They are parsed on every evaluation so that a slot
/// corrupted after load is surfaced instead of silently mis-evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimeSlot {
    pub start: String,
    pub end: String,
}

impl TimeSlot {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    /// True when `minute` (minutes since midnight) falls inside this slot.
    ///
    /// Same-day windows (`end > start`) are inclusive on both ends. Windows
    /// with `end <= start` span midnight and wrap: 21:00-02:00 covers late
    /// evening and early morning. A zero-length slot matches only its exact
    /// minute, through the wrap branch.
    pub fn contains_minute(&self, minute: u32) -> Result<bool> {
        let start = parse_minutes(&self.start)?;
        let end = parse_minutes(&self.end)?;

        if end > start {
            Ok(minute >= start && minute <= end)
        } else {
            Ok(minute >= start || minute <= end)
        }
    }
}

/// Weekly restriction schedule: active weekdays plus OR'd time slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Weekday indices, 0 = Sunday
    #[serde(default)]
    pub active_days: Vec<u8>,

    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
}

impl Schedule {
    /// True when `now` falls on an active weekday and inside any slot.
    pub fn matches_at(&self, now: &NaiveDateTime) -> Result<bool> {
        let day = now.weekday().num_days_from_sunday();
        if !self.active_days.iter().any(|d| u32::from(*d) == day) {
            return Ok(false);
        }

        let current = now.hour() * 60 + now.minute();
        for slot in &self.time_slots {
            if slot.contains_minute(current)? {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

/// Parse an `HH:MM` string into minutes since midnight.
///
/// Numeric values out of the usual clock range are accepted arithmetically:
/// settings editors have historically stored `24:00` as a slot end, which
/// normalizes to 1440 and behaves like end-of-day.
pub fn parse_minutes(value: &str) -> Result<u32> {
    let (hours, minutes) = value
        .split_once(':')
        .with_context(|| format!("Time must be HH:MM, got '{}'", value))?;

    let hours: u32 = hours
        .parse()
        .with_context(|| format!("Invalid hour in time string '{}'", value))?;
    let minutes: u32 = minutes
        .parse()
        .with_context(|| format!("Invalid minute in time string '{}'", value))?;

    Ok(hours * 60 + minutes)
}
