//! Session schedule validation.
//!
//! Checks one date's attendance windows for internal consistency and for
//! overlaps between same-day sessions. Findings carry a severity: only
//! error-severity findings block a save, warnings are surfaced but
//! non-blocking. Times that fail to parse are "unknown" and skip the
//! comparison; only inconsistent *present* values produce findings.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{intervals_overlap, DateSessionConfig, Direction, Session, SessionConfig};

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A validation finding against a single session.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleFinding {
    pub date: NaiveDate,
    pub session_id: String,
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    /// Set when another session caused the finding (overlap pairs report
    /// each other).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_session_id: Option<String>,
}

/// Validate one date's sessions, restricted to enabled periods.
pub fn validate_date(config: &DateSessionConfig) -> Vec<ScheduleFinding> {
    let enabled: Vec<&Session> = config.enabled_sessions().collect();
    let mut findings = Vec::new();

    for session in &enabled {
        check_session(config.date, session, &mut findings);
    }

    // Overlap scan over the canonical slot order: morning < afternoon <
    // evening, then in < out.
    let mut ordered = enabled;
    ordered.sort_by_key(|s| s.slot_order());
    for pair in ordered.windows(2) {
        let earlier = pair[0];
        let later = pair[1];
        let (Some(earlier_closes), Some(later_opens)) =
            (earlier.closes_min(), later.opens_min())
        else {
            continue;
        };
        if earlier_closes > later_opens {
            findings.push(overlap_finding(config.date, earlier, later));
            findings.push(overlap_finding(config.date, later, earlier));
        }
    }

    findings
}

fn check_session(date: NaiveDate, session: &Session, findings: &mut Vec<ScheduleFinding>) {
    let opens = session.opens_min();
    let closes = session.closes_min();

    if let (Some(opens), Some(closes)) = (opens, closes) {
        if opens >= closes {
            findings.push(ScheduleFinding {
                date,
                session_id: session.id.clone(),
                severity: Severity::Error,
                code: "opens_after_closes",
                message: format!(
                    "'{}' must open before it closes ({} >= {})",
                    session.name, session.opens, session.closes
                ),
                conflicting_session_id: None,
            });
        }
    }

    match (&session.late_after, session.direction) {
        (None, Direction::In) => findings.push(ScheduleFinding {
            date,
            session_id: session.id.clone(),
            severity: Severity::Error,
            code: "late_after_required",
            message: format!("'{}' is a check-in session and needs a late-after time", session.name),
            conflicting_session_id: None,
        }),
        (Some(_), _) => {
            if let (Some(late), Some(opens), Some(closes)) =
                (session.late_after_min(), opens, closes)
            {
                if late < opens || late > closes {
                    findings.push(ScheduleFinding {
                        date,
                        session_id: session.id.clone(),
                        severity: Severity::Warning,
                        code: "late_after_out_of_range",
                        message: format!(
                            "'{}' marks late at {} which is outside {}-{}",
                            session.name, late, session.opens, session.closes
                        ),
                        conflicting_session_id: None,
                    });
                }
            }
        }
        (None, Direction::Out) => {}
    }
}

fn overlap_finding(date: NaiveDate, session: &Session, other: &Session) -> ScheduleFinding {
    ScheduleFinding {
        date,
        session_id: session.id.clone(),
        severity: Severity::Error,
        code: "session_overlap",
        message: format!(
            "'{}' ({}-{}) overlaps '{}' ({}-{})",
            session.name, session.opens, session.closes, other.name, other.opens, other.closes
        ),
        conflicting_session_id: Some(other.id.clone()),
    }
}

/// First error-severity finding across all dates, in configuration order.
///
/// Warnings never block; a multi-date config is reported through its first
/// offending date only.
pub fn first_error(config: &SessionConfig) -> Option<ScheduleFinding> {
    config.dates.iter().find_map(|date_config| {
        validate_date(date_config)
            .into_iter()
            .find(|f| f.severity == Severity::Error)
    })
}

/// True when the config contains an error-severity finding.
pub fn has_blocking_error(config: &SessionConfig) -> bool {
    first_error(config).is_some()
}
