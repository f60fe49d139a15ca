use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::Slot;

pub const TIME_FORMAT: &str = "%H:%M";

/// A business's daily operating window. Same-day only; `open` is always
/// strictly before `close`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HoursInput")]
pub struct OperatingHours {
    #[serde(serialize_with = "hhmm::serialize")]
    pub open: NaiveTime,
    #[serde(serialize_with = "hhmm::serialize")]
    pub close: NaiveTime,
}

#[derive(Deserialize)]
struct HoursInput {
    open: String,
    close: String,
}

impl TryFrom<HoursInput> for OperatingHours {
    type Error = anyhow::Error;

    fn try_from(input: HoursInput) -> Result<Self, Self::Error> {
        Self::parse(&input.open, &input.close)
    }
}

impl OperatingHours {
    pub fn new(open: NaiveTime, close: NaiveTime) -> anyhow::Result<Self> {
        if open >= close {
            return Err(anyhow::anyhow!(
                "opening time {} must be before closing time {}",
                open.format(TIME_FORMAT),
                close.format(TIME_FORMAT)
            ));
        }
        Ok(Self { open, close })
    }

    pub fn parse(open: &str, close: &str) -> anyhow::Result<Self> {
        Self::new(parse_time(open)?, parse_time(close)?)
    }

    /// The window as a concrete interval on `date`.
    pub fn window_on(&self, date: NaiveDate) -> Slot {
        Slot {
            start: date.and_time(self.open),
            end: date.and_time(self.close),
        }
    }

    /// Whether `[start, start + duration)` on `date` lies inside the window.
    pub fn contains(&self, date: NaiveDate, start: NaiveTime, duration_minutes: i64) -> bool {
        let window = self.window_on(date);
        match Slot::starting_at(date.and_time(start), duration_minutes) {
            Some(candidate) => candidate.start >= window.start && candidate.end <= window.end,
            None => false,
        }
    }

    pub fn to_human_readable(&self) -> String {
        format!(
            "{}-{}",
            self.open.format(TIME_FORMAT),
            self.close.format(TIME_FORMAT)
        )
    }
}

pub fn parse_time(s: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)
        .map_err(|_| anyhow::anyhow!("invalid time format: {s} (expected HH:MM)"))
}

/// `None` when the end is not representable.
pub(crate) fn end_of(start: NaiveDateTime, duration_minutes: i64) -> Option<NaiveDateTime> {
    Duration::try_minutes(duration_minutes).and_then(|d| start.checked_add_signed(d))
}

pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIME_FORMAT;

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format(TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_time(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        parse_time(s).unwrap()
    }

    fn hours() -> OperatingHours {
        OperatingHours::parse("09:00", "22:00").unwrap()
    }

    #[test]
    fn test_parse_valid_hours() {
        let h = hours();
        assert_eq!(h.open, time("09:00"));
        assert_eq!(h.close, time("22:00"));
    }

    #[test]
    fn test_rejects_inverted_or_empty_window() {
        assert!(OperatingHours::parse("22:00", "09:00").is_err());
        assert!(OperatingHours::parse("09:00", "09:00").is_err());
    }

    #[test]
    fn test_parse_invalid_time() {
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("9am").is_err());
        assert!(parse_time("").is_err());
    }

    #[test]
    fn test_contains_inside_window() {
        let d = date("2030-06-16");
        assert!(hours().contains(d, time("09:00"), 60));
        assert!(hours().contains(d, time("14:00"), 60));
        // Ends exactly at closing
        assert!(hours().contains(d, time("21:00"), 60));
    }

    #[test]
    fn test_contains_outside_window() {
        let d = date("2030-06-16");
        assert!(!hours().contains(d, time("08:59"), 30));
        assert!(!hours().contains(d, time("21:30"), 60));
        assert!(!hours().contains(d, time("22:00"), 15));
    }

    #[test]
    fn test_wrap_past_midnight_is_outside() {
        let late = OperatingHours::parse("18:00", "23:59").unwrap();
        assert!(!late.contains(date("2030-06-16"), time("23:30"), 60));
    }

    #[test]
    fn test_huge_duration_is_outside() {
        let d = date("2030-06-16");
        assert!(!hours().contains(d, time("10:00"), 9_000_000_000_000));
        assert!(!hours().contains(d, time("10:00"), i64::MAX));
    }

    #[test]
    fn test_end_of_overflow() {
        let start = date("2030-06-16").and_time(time("10:00"));
        assert_eq!(end_of(start, 30), Some(date("2030-06-16").and_time(time("10:30"))));
        assert_eq!(end_of(start, i64::MAX), None);
        assert_eq!(end_of(start, 9_000_000_000_000), None);
    }

    #[test]
    fn test_to_human_readable() {
        assert_eq!(hours().to_human_readable(), "09:00-22:00");
    }

    #[test]
    fn test_serde_uses_hhmm() {
        let json = serde_json::to_string(&hours()).unwrap();
        assert_eq!(json, r#"{"open":"09:00","close":"22:00"}"#);
        let back: OperatingHours = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hours());
    }

    #[test]
    fn test_deserialize_validates_window() {
        let inverted = serde_json::from_str::<OperatingHours>(r#"{"open":"18:00","close":"08:00"}"#);
        assert!(inverted.is_err());
        let garbage = serde_json::from_str::<OperatingHours>(r#"{"open":"9am","close":"5pm"}"#);
        assert!(garbage.is_err());
    }
}
