//! Session configuration: per-date attendance windows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::time::MinuteOfDay;

/// Part of the day a session belongs to.
///
/// The derived ordering (morning < afternoon < evening) is the canonical
/// slot order used by the schedule validator and the availability checker.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Morning,
    Afternoon,
    Evening,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Morning, Period::Afternoon, Period::Evening];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Morning => "morning",
            Period::Afternoon => "afternoon",
            Period::Evening => "evening",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scan direction of a session window. `In` sorts before `Out` within the
/// same period.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

/// A named attendance window within one day.
///
/// Times are carried as raw `"HH:mm"` strings exactly as configured;
/// accessors parse them on demand. `late_after` may only be absent on
/// `out` sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub period: Period,
    pub direction: Direction,
    pub opens: String,
    pub closes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late_after: Option<String>,
}

impl Session {
    pub fn opens_min(&self) -> Option<MinuteOfDay> {
        MinuteOfDay::parse(&self.opens)
    }

    pub fn closes_min(&self) -> Option<MinuteOfDay> {
        MinuteOfDay::parse(&self.closes)
    }

    pub fn late_after_min(&self) -> Option<MinuteOfDay> {
        self.late_after.as_deref().and_then(MinuteOfDay::parse)
    }

    /// Canonical sort key: period order, then direction order.
    pub fn slot_order(&self) -> (Period, Direction) {
        (self.period, self.direction)
    }
}

/// Sessions configured for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateSessionConfig {
    pub date: NaiveDate,
    /// Periods currently enabled for this date. Sessions in disabled
    /// periods are ignored by validation and availability checks.
    #[serde(default = "all_periods")]
    pub enabled_periods: Vec<Period>,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

impl DateSessionConfig {
    /// Sessions restricted to the enabled periods, in configuration order.
    pub fn enabled_sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions
            .iter()
            .filter(|s| self.enabled_periods.contains(&s.period))
    }
}

fn all_periods() -> Vec<Period> {
    Period::ALL.to_vec()
}

/// Versioned session configuration covering an event's date range.
///
/// A new config object replaces the old one wholesale on update; there is
/// no partial patching of individual dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub dates: Vec<DateSessionConfig>,
}

impl SessionConfig {
    pub fn sessions_on(&self, date: NaiveDate) -> Option<&DateSessionConfig> {
        self.dates.iter().find(|d| d.date == date)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            dates: Vec::new(),
        }
    }
}

fn default_version() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_ordering() {
        assert!(Period::Morning < Period::Afternoon);
        assert!(Period::Afternoon < Period::Evening);
        assert!(Direction::In < Direction::Out);
    }

    #[test]
    fn test_session_deserialization_defaults() {
        let json = r#"{
            "id": "s1",
            "name": "Morning check-in",
            "period": "morning",
            "direction": "in",
            "opens": "07:30",
            "closes": "08:30"
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.period, Period::Morning);
        assert!(session.late_after.is_none());
        assert_eq!(session.opens_min().unwrap().value(), 450);
    }

    #[test]
    fn test_enabled_sessions_filters_disabled_periods() {
        let config: DateSessionConfig = serde_json::from_str(
            r#"{
                "date": "2026-09-01",
                "enabled_periods": ["morning"],
                "sessions": [
                    {"id": "a", "name": "AM in", "period": "morning", "direction": "in",
                     "opens": "07:30", "closes": "08:30", "late_after": "08:00"},
                    {"id": "b", "name": "PM out", "period": "afternoon", "direction": "out",
                     "opens": "15:00", "closes": "16:00"}
                ]
            }"#,
        )
        .unwrap();
        let ids: Vec<&str> = config.enabled_sessions().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn test_enabled_periods_default_to_all() {
        let config: DateSessionConfig =
            serde_json::from_str(r#"{"date": "2026-09-01"}"#).unwrap();
        assert_eq!(config.enabled_periods, Period::ALL.to_vec());
    }
}
