//! Operating-day codec.
//!
//! Weekdays are numbered 1 (Monday) through 7 (Sunday). Display names are
//! the short Turkish abbreviations used across the console ("Pzt", "Sal",
//! ...), and a set covering the whole week collapses to "All Days".
//!
//! Neither direction ever fails. Encoding silently skips numbers outside
//! 1..=7; decoding silently drops tokens it does not recognize, but reports
//! them in [`DecodedDays::unmatched`] so callers can surface them if they
//! want to.

use chrono::{Datelike, NaiveDate};

/// Label used when a leg runs every day of the week.
pub const ALL_DAYS_LABEL: &str = "All Days";

/// Short display names, indexed by `day - 1`.
const DAY_ABBREVIATIONS: [&str; 7] = ["Pzt", "Sal", "Çar", "Per", "Cum", "Cmt", "Paz"];

/// Lowercased name → weekday number.
///
/// Includes abbreviations, full names, and the ASCII spellings people type
/// on keyboards without Turkish letters.
const DAY_NAMES: &[(&str, u8)] = &[
    ("pzt", 1),
    ("pazartesi", 1),
    ("sal", 2),
    ("salı", 2),
    ("sali", 2),
    ("çar", 3),
    ("car", 3),
    ("çarşamba", 3),
    ("carsamba", 3),
    ("per", 4),
    ("perşembe", 4),
    ("persembe", 4),
    ("cum", 5),
    ("cuma", 5),
    ("cmt", 6),
    ("cts", 6),
    ("cumartesi", 6),
    ("paz", 7),
    ("pazar", 7),
];

/// Returns the display abbreviation for a weekday number, if it is in 1..=7.
pub fn day_abbreviation(day: u8) -> Option<&'static str> {
    match day {
        1..=7 => Some(DAY_ABBREVIATIONS[usize::from(day - 1)]),
        _ => None,
    }
}

/// Looks up a single day name (abbreviated or full, any case).
pub fn day_number(name: &str) -> Option<u8> {
    let key = normalize_token(name);
    DAY_NAMES
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, day)| *day)
}

/// Encode weekday numbers for display.
///
/// An empty input, or one containing every day 1..=7, yields
/// [`ALL_DAYS_LABEL`]. Otherwise the days are sorted ascending,
/// deduplicated, out-of-range numbers are dropped, and the abbreviations
/// are joined with `", "`.
///
/// # Examples
///
/// ```
/// use logistics_console::domain::encode_days;
///
/// assert_eq!(encode_days(&[3, 1]), "Pzt, Çar");
/// assert_eq!(encode_days(&[]), "All Days");
/// assert_eq!(encode_days(&[7, 6, 5, 4, 3, 2, 1]), "All Days");
/// ```
pub fn encode_days(days: &[u8]) -> String {
    if days.is_empty() || covers_every_day(days) {
        return ALL_DAYS_LABEL.to_string();
    }

    let mut sorted = days.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    sorted
        .into_iter()
        .filter_map(day_abbreviation)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result of decoding a comma-separated day list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedDays {
    /// Matched weekday numbers, in input order. Duplicates are kept.
    pub days: Vec<u8>,
    /// Non-empty tokens that matched no day name, trimmed, in input order.
    pub unmatched: Vec<String>,
}

impl DecodedDays {
    /// True when every non-empty token was recognized.
    pub fn is_clean(&self) -> bool {
        self.unmatched.is_empty()
    }
}

/// Decode a comma-separated list of day names.
///
/// Tokens are trimmed and compared case-insensitively. Unrecognized tokens
/// are left out of `days`; empty tokens (e.g. from a trailing comma) are
/// ignored entirely. "All Days" is not a day name and decodes to nothing.
///
/// # Examples
///
/// ```
/// use logistics_console::domain::decode_days;
///
/// assert_eq!(decode_days("pzt,ÇAR").days, vec![1, 3]);
///
/// let decoded = decode_days("Foo, Pzt");
/// assert_eq!(decoded.days, vec![1]);
/// assert_eq!(decoded.unmatched, vec!["Foo".to_string()]);
/// ```
pub fn decode_days(input: &str) -> DecodedDays {
    let mut decoded = DecodedDays::default();

    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match day_number(token) {
            Some(day) => decoded.days.push(day),
            None => decoded.unmatched.push(token.to_string()),
        }
    }

    decoded
}

fn covers_every_day(days: &[u8]) -> bool {
    (1..=7).all(|day| days.contains(&day))
}

/// Lowercase a token for lookup.
///
/// `str::to_lowercase` maps Turkish dotted capital `İ` to `i` followed by a
/// combining dot (U+0307); the dot is stripped so "PAZARTESİ" matches.
fn normalize_token(token: &str) -> String {
    token
        .trim()
        .to_lowercase()
        .chars()
        .filter(|&c| c != '\u{307}')
        .collect()
}

/// The weekdays a transportation leg operates on.
///
/// An empty set is displayed as "All Days" and treated as running every
/// day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatingDays(Vec<u8>);

impl OperatingDays {
    pub fn new(days: Vec<u8>) -> Self {
        Self(days)
    }

    /// Every day of the week, Monday first.
    pub fn every_day() -> Self {
        Self((1..=7).collect())
    }

    /// Parse a comma-separated day list, dropping unrecognized tokens.
    pub fn parse(input: &str) -> Self {
        Self(decode_days(input).days)
    }

    pub fn days(&self) -> &[u8] {
        &self.0
    }

    /// Canonical day list: ascending, deduplicated, in range.
    pub fn canonical(&self) -> Vec<u8> {
        let mut days: Vec<u8> = self.0.iter().copied().filter(|d| (1..=7).contains(d)).collect();
        days.sort_unstable();
        days.dedup();
        days
    }

    /// Display string, e.g. `"Pzt, Çar"` or `"All Days"`.
    pub fn display(&self) -> String {
        encode_days(&self.0)
    }

    pub fn is_every_day(&self) -> bool {
        self.0.is_empty() || covers_every_day(&self.0)
    }

    /// Whether the leg runs on the weekday of `date`.
    pub fn runs_on(&self, date: NaiveDate) -> bool {
        if self.0.is_empty() {
            return true;
        }
        let weekday = date.weekday().number_from_monday();
        self.0.iter().any(|&d| u32::from(d) == weekday)
    }
}

impl From<Vec<u8>> for OperatingDays {
    fn from(days: Vec<u8>) -> Self {
        Self(days)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Non-empty day lists that do not cover the whole week.
    fn partial_week() -> impl Strategy<Value = Vec<u8>> {
        proptest::collection::vec(1u8..=7, 1..12).prop_filter("not every day", |days| {
            !covers_every_day(days)
        })
    }

    proptest! {
        /// Decoding an encoded partial week gives the sorted, deduplicated input
        #[test]
        fn roundtrip_partial_week(days in partial_week()) {
            let mut expected = days.clone();
            expected.sort_unstable();
            expected.dedup();

            let decoded = decode_days(&encode_days(&days));
            prop_assert_eq!(decoded.days, expected);
            prop_assert!(decoded.unmatched.is_empty());
        }

        /// Input order never changes the encoding
        #[test]
        fn encoding_is_order_independent(mut days in proptest::collection::vec(0u8..=9, 0..12)) {
            let forward = encode_days(&days);
            days.reverse();
            prop_assert_eq!(encode_days(&days), forward);
        }

        /// Decoding never panics and every matched day is in range
        #[test]
        fn decode_days_in_range(input in ".{0,40}") {
            let decoded = decode_days(&input);
            prop_assert!(decoded.days.iter().all(|d| (1..=7).contains(d)));
        }
    }
}
