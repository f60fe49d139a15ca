use chrono::NaiveDateTime;

use super::hours::end_of;

/// Half-open interval `[start, end)` occupied by one service instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Slot {
    /// `None` if `start + duration` overflows the calendar.
    pub fn starting_at(start: NaiveDateTime, duration_minutes: i64) -> Option<Self> {
        Some(Self {
            start,
            end: end_of(start, duration_minutes)?,
        })
    }

    pub fn overlaps(&self, other: &Slot) -> bool {
        self.start < other.end && other.start < self.end
    }
}
