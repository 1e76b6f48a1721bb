#[cfg(test)]
mod tests {
    use crate::models::{DateSessionConfig, Direction, Period, Session, SessionConfig};
    use crate::services::schedule::{first_error, has_blocking_error, validate_date, Severity};
    use chrono::NaiveDate;

    fn session(
        id: &str,
        period: Period,
        direction: Direction,
        opens: &str,
        closes: &str,
        late_after: Option<&str>,
    ) -> Session {
        Session {
            id: id.to_string(),
            name: id.to_string(),
            period,
            direction,
            opens: opens.to_string(),
            closes: closes.to_string(),
            late_after: late_after.map(str::to_string),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
    }

    fn date_config(sessions: Vec<Session>) -> DateSessionConfig {
        DateSessionConfig {
            date: date(),
            enabled_periods: Period::ALL.to_vec(),
            sessions,
        }
    }

    #[test]
    fn test_valid_day_has_no_findings() {
        let config = date_config(vec![
            session("am-in", Period::Morning, Direction::In, "07:30", "08:30", Some("08:00")),
            session("pm-out", Period::Afternoon, Direction::Out, "15:00", "16:00", None),
        ]);
        assert!(validate_date(&config).is_empty());
    }

    #[test]
    fn test_opens_after_closes_is_error() {
        let config = date_config(vec![session(
            "bad",
            Period::Morning,
            Direction::In,
            "09:00",
            "08:00",
            Some("08:30"),
        )]);
        let findings = validate_date(&config);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
        assert_eq!(findings[0].code, "opens_after_closes");
    }

    #[test]
    fn test_opens_equal_closes_is_error() {
        let config = date_config(vec![session(
            "zero",
            Period::Morning,
            Direction::Out,
            "08:00",
            "08:00",
            None,
        )]);
        let findings = validate_date(&config);
        assert_eq!(findings[0].code, "opens_after_closes");
    }

    #[test]
    fn test_late_after_out_of_range_is_warning_only() {
        let config = date_config(vec![session(
            "am-in",
            Period::Morning,
            Direction::In,
            "07:30",
            "08:30",
            Some("09:00"),
        )]);
        let findings = validate_date(&config);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[0].code, "late_after_out_of_range");

        let full = SessionConfig {
            version: 1,
            dates: vec![config],
        };
        assert!(!has_blocking_error(&full));
    }

    #[test]
    fn test_missing_late_after_on_check_in_is_error() {
        let config = date_config(vec![session(
            "am-in",
            Period::Morning,
            Direction::In,
            "07:30",
            "08:30",
            None,
        )]);
        let findings = validate_date(&config);
        assert_eq!(findings[0].code, "late_after_required");
        assert_eq!(findings[0].severity, Severity::Error);
    }

    #[test]
    fn test_overlap_reports_both_sessions() {
        let config = date_config(vec![
            session("a", Period::Morning, Direction::In, "08:00", "10:00", Some("08:30")),
            session("b", Period::Morning, Direction::Out, "09:30", "11:00", None),
        ]);
        let findings = validate_date(&config);
        let overlaps: Vec<_> = findings.iter().filter(|f| f.code == "session_overlap").collect();
        assert_eq!(overlaps.len(), 2);
        assert_eq!(overlaps[0].session_id, "a");
        assert_eq!(overlaps[0].conflicting_session_id.as_deref(), Some("b"));
        assert_eq!(overlaps[1].session_id, "b");
        assert_eq!(overlaps[1].conflicting_session_id.as_deref(), Some("a"));
    }

    #[test]
    fn test_back_to_back_sessions_do_not_overlap() {
        let config = date_config(vec![
            session("a", Period::Morning, Direction::In, "08:00", "10:00", Some("08:30")),
            session("b", Period::Morning, Direction::Out, "10:00", "12:00", None),
        ]);
        assert!(validate_date(&config).is_empty());
    }

    #[test]
    fn test_sessions_in_disabled_periods_are_ignored() {
        let mut config = date_config(vec![
            session("am", Period::Morning, Direction::In, "09:00", "08:00", Some("08:30")),
            session("pm", Period::Afternoon, Direction::Out, "15:00", "16:00", None),
        ]);
        config.enabled_periods = vec![Period::Afternoon];
        assert!(validate_date(&config).is_empty());
    }

    #[test]
    fn test_unknown_times_skip_comparison() {
        let config = date_config(vec![session(
            "blank",
            Period::Morning,
            Direction::Out,
            "",
            "not-a-time",
            None,
        )]);
        assert!(validate_date(&config).is_empty());
    }

    #[test]
    fn test_first_error_returns_earliest_date() {
        let good = DateSessionConfig {
            date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            enabled_periods: Period::ALL.to_vec(),
            sessions: vec![session("ok", Period::Morning, Direction::Out, "08:00", "09:00", None)],
        };
        let bad = DateSessionConfig {
            date: NaiveDate::from_ymd_opt(2026, 9, 2).unwrap(),
            enabled_periods: Period::ALL.to_vec(),
            sessions: vec![session("bad", Period::Morning, Direction::Out, "10:00", "09:00", None)],
        };
        let config = SessionConfig {
            version: 1,
            dates: vec![good, bad],
        };
        let finding = first_error(&config).unwrap();
        assert_eq!(finding.date, NaiveDate::from_ymd_opt(2026, 9, 2).unwrap());
        assert_eq!(finding.session_id, "bad");
    }
}
