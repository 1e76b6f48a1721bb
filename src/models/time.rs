//! Time-of-day helpers for session windows.
//!
//! Session open/close times travel through configs as `"HH:mm"` strings;
//! all comparisons happen in minutes since midnight. A malformed or empty
//! string parses to `None` and is treated as "unknown" by the validators,
//! which skip the comparison rather than raising an error.

use serde::{Deserialize, Serialize};

/// A minute offset from midnight (0..=1439).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    /// Parse an `"HH:mm"` string.
    ///
    /// Returns `None` for empty or malformed input and for out-of-range
    /// components (hour > 23, minute > 59).
    pub fn parse(s: &str) -> Option<Self> {
        let (hours, minutes) = s.trim().split_once(':')?;
        let hours: u16 = hours.parse().ok()?;
        let minutes: u16 = minutes.parse().ok()?;
        if hours > 23 || minutes > 59 {
            return None;
        }
        Some(Self(hours * 60 + minutes))
    }

    /// Raw minutes-since-midnight value.
    pub fn value(&self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Half-open interval overlap test for two same-day time windows.
///
/// Back-to-back windows, where one closes exactly as the other opens, do
/// not overlap.
pub fn intervals_overlap(
    a_opens: MinuteOfDay,
    a_closes: MinuteOfDay,
    b_opens: MinuteOfDay,
    b_closes: MinuteOfDay,
) -> bool {
    a_opens < b_closes && a_closes > b_opens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(s: &str) -> MinuteOfDay {
        MinuteOfDay::parse(s).unwrap()
    }

    #[test]
    fn test_parse_valid() {
        assert_eq!(m("00:00").value(), 0);
        assert_eq!(m("08:30").value(), 510);
        assert_eq!(m("23:59").value(), 1439);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(m(" 09:15 ").value(), 555);
    }

    #[test]
    fn test_parse_malformed() {
        assert!(MinuteOfDay::parse("").is_none());
        assert!(MinuteOfDay::parse("0830").is_none());
        assert!(MinuteOfDay::parse("8h30").is_none());
        assert!(MinuteOfDay::parse("ab:cd").is_none());
    }

    #[test]
    fn test_parse_out_of_range() {
        assert!(MinuteOfDay::parse("24:00").is_none());
        assert!(MinuteOfDay::parse("12:60").is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(m("08:05").to_string(), "08:05");
        assert_eq!(m("23:59").to_string(), "23:59");
    }

    #[test]
    fn test_overlap_one_minute() {
        assert!(intervals_overlap(m("08:00"), m("10:00"), m("09:59"), m("11:00")));
    }

    #[test]
    fn test_overlap_back_to_back_does_not_conflict() {
        assert!(!intervals_overlap(m("08:00"), m("10:00"), m("10:00"), m("12:00")));
        assert!(!intervals_overlap(m("10:00"), m("12:00"), m("08:00"), m("10:00")));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let cases = [
            (("08:00", "10:00"), ("09:30", "11:00")),
            (("08:00", "10:00"), ("10:00", "11:00")),
            (("07:00", "12:00"), ("08:00", "09:00")),
            (("13:00", "14:00"), ("08:00", "09:00")),
        ];
        for ((ao, ac), (bo, bc)) in cases {
            assert_eq!(
                intervals_overlap(m(ao), m(ac), m(bo), m(bc)),
                intervals_overlap(m(bo), m(bc), m(ao), m(ac)),
                "overlap({ao}-{ac}, {bo}-{bc}) not symmetric"
            );
        }
    }

    #[test]
    fn test_containment_overlaps() {
        assert!(intervals_overlap(m("07:00"), m("12:00"), m("08:00"), m("09:00")));
    }
}
