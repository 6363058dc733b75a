use chrono::{DateTime, Duration, Utc};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("range end {end} is before its start {start}")]
    Inverted {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// A half-open `[start, end)` interval. A zero-length range means the time it
/// covered has been fully consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, RangeError> {
        if end < start {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Subtracts `[split_start, split_end)` from this range.
    ///
    /// Returns the range itself when the splitter does not overlap it (touching
    /// endpoints do not overlap), nothing when the splitter covers it, and
    /// otherwise the left remainder followed by the right remainder.
    pub fn split(&self, split_start: DateTime<Utc>, split_end: DateTime<Utc>) -> Vec<TimeRange> {
        if self.end <= split_start || self.start >= split_end {
            return vec![*self];
        }

        let mut pieces = Vec::with_capacity(2);
        if self.start < split_start && split_start < self.end {
            pieces.push(TimeRange {
                start: self.start,
                end: split_start,
            });
        }
        if self.start < split_end && split_end < self.end {
            pieces.push(TimeRange {
                start: split_end,
                end: self.end,
            });
        }
        pieces
    }

    /// Clips the range so it does not start before `instant`.
    pub fn after(&self, instant: DateTime<Utc>) -> TimeRange {
        if instant > self.end {
            TimeRange {
                start: self.end,
                end: self.end,
            }
        } else if instant < self.start {
            *self
        } else {
            TimeRange {
                start: instant,
                end: self.end,
            }
        }
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}
