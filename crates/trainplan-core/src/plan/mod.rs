//! Plan metadata types.
//!
//! [`WorkoutMetadata`] is the single record extracted from a training-plan
//! document. Template keys are the typed [`Day`] abbreviations rather than
//! free strings, so "keys are a subset of the seven weekdays" holds by
//! construction.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod parser;

pub use parser::PlanParser;

/// Sentinel used when no volume declaration is found in the document.
pub const VOLUME_NOT_SPECIFIED: &str = "Not specified";

/// Day-of-week key for the weekly template, ordered Monday-first.
///
/// Serializes as the three-letter abbreviation ("Mon".."Sun"), matching the
/// day column of the plan's workout tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

/// A string that is not one of the seven weekday abbreviations.
#[derive(Debug, Clone, Error)]
#[error("unrecognized day abbreviation: {0:?}")]
pub struct UnknownDay(String);

impl Day {
    /// All seven days, Monday-first.
    pub const ALL: [Day; 7] = [
        Day::Mon,
        Day::Tue,
        Day::Wed,
        Day::Thu,
        Day::Fri,
        Day::Sat,
        Day::Sun,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Mon => "Mon",
            Day::Tue => "Tue",
            Day::Wed => "Wed",
            Day::Thu => "Thu",
            Day::Fri => "Fri",
            Day::Sat => "Sat",
            Day::Sun => "Sun",
        }
    }

    /// Map a chrono weekday onto the template key.
    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Day::Mon,
            Weekday::Tue => Day::Tue,
            Weekday::Wed => Day::Wed,
            Weekday::Thu => Day::Thu,
            Weekday::Fri => Day::Fri,
            Weekday::Sat => Day::Sat,
            Weekday::Sun => Day::Sun,
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = UnknownDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Mon" => Ok(Day::Mon),
            "Tue" => Ok(Day::Tue),
            "Wed" => Ok(Day::Wed),
            "Thu" => Ok(Day::Thu),
            "Fri" => Ok(Day::Fri),
            "Sat" => Ok(Day::Sat),
            "Sun" => Ok(Day::Sun),
            other => Err(UnknownDay(other.to_string())),
        }
    }
}

/// Structured metadata extracted from a training-plan document.
///
/// Persisted as flat JSON; dates serialize as `YYYY-MM-DD` strings and
/// `parsed_at` as an ISO-8601 timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutMetadata {
    /// Source document the record was derived from.
    pub plan_file: PathBuf,
    /// Free-text label of the current training phase.
    pub current_phase: String,
    /// Phase start date, absent when unparsable.
    pub phase_start: Option<NaiveDate>,
    /// Phase end date, absent when unparsable.
    pub phase_end: Option<NaiveDate>,
    /// Day abbreviation -> workout description.
    pub weekly_template: BTreeMap<Day, String>,
    /// Free-text volume target, or [`VOLUME_NOT_SPECIFIED`].
    pub weekly_volume_target: String,
    /// When the extraction ran.
    pub parsed_at: DateTime<Local>,
}

impl WorkoutMetadata {
    /// Workout text for the given day, if the template covers it.
    pub fn workout_for(&self, day: Day) -> Option<&str> {
        self.weekly_template.get(&day).map(String::as_str)
    }

    /// The built-in 7-day template used when no table shape matches.
    pub fn default_weekly_template() -> BTreeMap<Day, String> {
        [
            (Day::Mon, "REST"),
            (Day::Tue, "Run"),
            (Day::Wed, "Strength"),
            (Day::Thu, "Run"),
            (Day::Fri, "Strength"),
            (Day::Sat, "Long Run"),
            (Day::Sun, "REST or Easy"),
        ]
        .into_iter()
        .map(|(day, workout)| (day, workout.to_string()))
        .collect()
    }
}
