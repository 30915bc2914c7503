//! Decides whether a search box holds a complete date/period expression.
//!
//! Four shapes are accepted, all purely lexical:
//!
//! ```text
//! p7                        single period (p1..p12, marker case-insensitive)
//! p2...p5                   period range
//! 1/2/2025, 01-02-2025      single date, D[-/]M[-/]YYYY
//! 1/1/2025...31-01-2025     date range
//! ```
//!
//! Calendar validity (month <= 12, day <= 31) is not checked here; see
//! [`crate::parser::InterpretOptions`].

use regex::Regex;
use std::sync::LazyLock;

const PERIOD: &str = r"[pP](?:1[0-2]|[1-9])";
const DATE: &str = r"[0-9]{1,2}[-/][0-9]{1,2}[-/][0-9]{4}";

static SINGLE_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{PERIOD}$")).expect("valid regex"));
static PERIOD_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^{PERIOD}\.\.\.{PERIOD}$")).expect("valid regex"));
static SINGLE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{DATE}$")).expect("valid regex"));
static DATE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^{DATE}\.\.\.{DATE}$")).expect("valid regex"));

/// Which of the accepted shapes a search string has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputShape {
    SinglePeriod,
    PeriodRange,
    SingleDate,
    DateRange,
}

impl InputShape {
    pub fn is_range(self) -> bool {
        matches!(self, Self::PeriodRange | Self::DateRange)
    }
}

/// Classify `input` (surrounding whitespace ignored) into one of the accepted shapes.
pub fn recognize(input: &str) -> Option<InputShape> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    [
        (&*SINGLE_PERIOD, InputShape::SinglePeriod),
        (&*PERIOD_RANGE, InputShape::PeriodRange),
        (&*SINGLE_DATE, InputShape::SingleDate),
        (&*DATE_RANGE, InputShape::DateRange),
    ]
    .into_iter()
    .find(|(pattern, _)| pattern.is_match(input))
    .map(|(_, shape)| shape)
}

/// True iff `input` is a complete date/period expression worth interpreting.
pub fn is_complete_input(input: &str) -> bool {
    recognize(input).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_every_period_is_complete(#[values(1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12)] n: u8) {
        assert_eq!(recognize(&format!("p{n}")), Some(InputShape::SinglePeriod));
        assert_eq!(recognize(&format!("P{n}")), Some(InputShape::SinglePeriod));
    }

    #[rstest]
    #[case("p0")]
    #[case("p13")]
    #[case("p01")]
    #[case("p")]
    #[case("p1...")]
    #[case("p1..p2")]
    #[case("p1 ... p2")]
    #[case("p1...p13")]
    #[case("1/1/25")]
    #[case("2025-01-01")]
    #[case("1/1/2025...")]
    #[case("p1...01/01/2025")]
    #[case("01/01/2025...p1")]
    #[case("receipt 42")]
    #[case("１/1/2025")]
    fn test_rejected(#[case] input: &str) {
        assert!(!is_complete_input(input), "{input:?} should not be complete");
    }

    #[rstest]
    #[case("p2...p5", InputShape::PeriodRange)]
    #[case("P5...p2", InputShape::PeriodRange)]
    #[case("01/01/2025", InputShape::SingleDate)]
    #[case("1-1-2025", InputShape::SingleDate)]
    #[case("1-1/2025", InputShape::SingleDate)]
    #[case("31/02/2025", InputShape::SingleDate)]
    #[case("01-01-2025...31-01-2025", InputShape::DateRange)]
    #[case("  p3  ", InputShape::SinglePeriod)]
    fn test_accepted(#[case] input: &str, #[case] shape: InputShape) {
        assert_eq!(recognize(input), Some(shape));
        assert!(is_complete_input(input));
    }

    #[test]
    fn test_blank_input() {
        assert!(!is_complete_input(""));
        assert!(!is_complete_input("   "));
        assert!(!is_complete_input("\t\n"));
    }

    #[test]
    fn test_range_shapes() {
        assert!(InputShape::PeriodRange.is_range());
        assert!(InputShape::DateRange.is_range());
        assert!(!InputShape::SinglePeriod.is_range());
    }
}
