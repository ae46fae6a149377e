//! Date token extraction from free text.
//!
//! Patterns are tried in priority order; the first pattern with any match
//! wins, and within a pattern the leftmost match wins. No attempt is made
//! to reconcile conflicting dates.
//!
//! A date token only has to be clear of neighbouring digits, so dates glued
//! to letters or punctuation (`2023-05-10T09:30:00Z`, `report_2023-05-10.pdf`)
//! still match. The `regex` crate has no lookaround, so each pattern captures
//! the token in group 1 between non-digit guards.

use std::sync::LazyLock;

use regex::Regex;

/// Year-first, then day-first, then a bare year.
static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:^|\D)(\d{4}[-/]\d{1,2}[-/]\d{1,2})(?:\D|$)",
        r"(?:^|\D)(\d{1,2}[-/]\d{1,2}[-/]\d{4})(?:\D|$)",
        r"(?:^|\D)((?:19|20)\d{2})(?:\D|$)",
    ]
    .iter()
    .filter_map(|pattern| match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::error!(pattern, error = %e, "invalid date pattern");
            None
        }
    })
    .collect()
});

/// Returns the highest-priority date token in `text`, or an empty string.
///
/// Recognised forms, in priority order: `YYYY-MM-DD` / `YYYY/MM/DD`,
/// `DD-MM-YYYY` / `DD/MM/YYYY`, then a bare year. Bare years are limited to
/// 1900-2099 so street numbers and prices are not taken for dates; text
/// like `"since 1850"` yields `""`.
pub fn extract_date(text: &str) -> String {
    DATE_PATTERNS
        .iter()
        .find_map(|re| re.captures(text).and_then(|caps| caps.get(1)))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_date() {
        assert_eq!(extract_date("report published 2023-05-10"), "2023-05-10");
    }

    #[test]
    fn slashed_year_first_date() {
        assert_eq!(extract_date("updated 2021/7/3 by council"), "2021/7/3");
    }

    #[test]
    fn day_first_date() {
        assert_eq!(extract_date("posted 10-05-2023 in news"), "10-05-2023");
    }

    #[test]
    fn bare_year() {
        assert_eq!(extract_date("trend since 2019"), "2019");
    }

    #[test]
    fn no_date() {
        assert_eq!(extract_date("no date here"), "");
    }

    #[test]
    fn pattern_priority_beats_position() {
        // Bare year appears first but the full date has higher priority.
        assert_eq!(extract_date("since 2015, see 2023-01-02"), "2023-01-02");
        assert_eq!(extract_date("in 2018 and on 04-03-2020"), "04-03-2020");
    }

    #[test]
    fn leftmost_match_within_pattern() {
        assert_eq!(extract_date("2020-01-01 then 2021-02-02"), "2020-01-01");
    }

    #[test]
    fn non_year_numbers_ignored() {
        assert_eq!(extract_date("postcode 3030, 1500 residents"), "");
    }

    #[test]
    fn timestamp_yields_its_date_part() {
        assert_eq!(extract_date("updated 2023-05-10T09:30:00Z"), "2023-05-10");
    }

    #[test]
    fn date_joined_by_underscore() {
        assert_eq!(extract_date("report_2023-05-10.pdf"), "2023-05-10");
        assert_eq!(extract_date("minutes_10-05-2023_final"), "10-05-2023");
        assert_eq!(extract_date("budget_2019_v2"), "2019");
    }

    #[test]
    fn date_at_start_and_end_of_text() {
        assert_eq!(extract_date("2021/7/3"), "2021/7/3");
        assert_eq!(extract_date("FY2024"), "2024");
    }

    #[test]
    fn years_outside_1900s_and_2000s_ignored() {
        assert_eq!(extract_date("settled since 1850"), "");
    }

    #[test]
    fn year_inside_longer_number_ignored() {
        assert_eq!(extract_date("listing id 1202019"), "");
    }
}
