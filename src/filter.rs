//! Normalized filter values produced by the interpreter.
//!
//! The JSON shape of [`FilterDescriptor`] is what the backend listing
//! endpoints read, so the field names here are fixed:
//!
//! ```text
//! {"type":"period","start_month":2,"end_month":5}
//! {"type":"date","start_date":"2025-01-01","end_date":"2025-01-31"}
//! {}
//! ```

use chrono::NaiveDate;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

/// A reporting period, `p1`..`p12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Period(pub u8);

impl Period {
    pub const FIRST: Period = Period(1);
    pub const LAST: Period = Period(12);

    pub fn is_valid(self) -> bool {
        (Self::FIRST..=Self::LAST).contains(&self)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// A date normalized to (year, month, day).
///
/// Field order matters: the derived `Ord` compares year, then month, then
/// day, which is the same order as comparing the `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl IsoDate {
    pub fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// The chrono date for this triple, or `None` if it is not a real calendar day.
    pub fn to_naive_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year.into(), self.month.into(), self.day.into())
    }
}

impl fmt::Display for IsoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl Serialize for IsoDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The filter a search box resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterDescriptor {
    Period { start_month: Period, end_month: Period },
    Date { start_date: IsoDate, end_date: IsoDate },
    /// No usable filter; serializes as `{}`
    #[default]
    Empty,
}

impl FilterDescriptor {
    /// A one-period range.
    pub fn single_period(period: Period) -> Self {
        Self::Period { start_month: period, end_month: period }
    }

    /// A one-day range.
    pub fn single_date(date: IsoDate) -> Self {
        Self::Date { start_date: date, end_date: date }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl Serialize for FilterDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Period { start_month, end_month } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "period")?;
                map.serialize_entry("start_month", start_month)?;
                map.serialize_entry("end_month", end_month)?;
                map.end()
            }
            Self::Date { start_date, end_date } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "date")?;
                map.serialize_entry("start_date", start_date)?;
                map.serialize_entry("end_date", end_date)?;
                map.end()
            }
            Self::Empty => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_iso_date_is_zero_padded() {
        assert_eq!(IsoDate::new(2025, 1, 5).to_string(), "2025-01-05");
        assert_eq!(IsoDate::new(987, 12, 31).to_string(), "0987-12-31");
    }

    #[test]
    fn test_iso_date_order_matches_string_order() {
        let dates = [
            IsoDate::new(2024, 12, 31),
            IsoDate::new(2025, 1, 1),
            IsoDate::new(2025, 1, 31),
            IsoDate::new(2025, 2, 1),
            IsoDate::new(2025, 10, 1),
        ];
        for pair in dates.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].to_string() < pair[1].to_string());
        }
    }

    #[test]
    fn test_calendar_check() {
        assert!(IsoDate::new(2024, 2, 29).to_naive_date().is_some());
        assert!(IsoDate::new(2025, 2, 29).to_naive_date().is_none());
        assert!(IsoDate::new(2025, 13, 1).to_naive_date().is_none());
        assert!(IsoDate::new(2025, 1, 0).to_naive_date().is_none());
    }

    #[test]
    fn test_period_validity() {
        assert!(Period(1).is_valid());
        assert!(Period(12).is_valid());
        assert!(!Period(0).is_valid());
        assert!(!Period(13).is_valid());
    }

    #[test]
    fn test_period_payload_shape() {
        let filter = FilterDescriptor::Period { start_month: Period(2), end_month: Period(5) };
        assert_eq!(
            serde_json::to_value(filter).unwrap(),
            json!({"type": "period", "start_month": 2, "end_month": 5})
        );
    }

    #[test]
    fn test_date_payload_shape() {
        let filter = FilterDescriptor::Date {
            start_date: IsoDate::new(2025, 1, 1),
            end_date: IsoDate::new(2025, 1, 31),
        };
        assert_eq!(
            serde_json::to_value(filter).unwrap(),
            json!({"type": "date", "start_date": "2025-01-01", "end_date": "2025-01-31"})
        );
    }

    #[test]
    fn test_empty_payload_shape() {
        assert_eq!(serde_json::to_string(&FilterDescriptor::Empty).unwrap(), "{}");
        assert!(FilterDescriptor::default().is_empty());
    }
}
