use chrono::NaiveDate;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::collections::BTreeSet;

use super::dates::{format_date, DateNormalizer};
use crate::models::FieldValue;

/// Checked in this order against every line; the first hit wins.
pub const AUTHORITY_KEYWORDS: [&str; 5] = [
    "ISSUING AUTHORITY",
    "ISSUED BY",
    "AUTHORITY",
    "ISSUING OFFICE",
    "PLACE OF ISSUE",
];

/// Birth, issue and expiry: fewer distinct dates than this is not trusted.
const MIN_DISTINCT_DATES: usize = 3;

lazy_static! {
    static ref ISSUE_DATE_PATTERNS: Vec<Regex> = vec![
        // DD-MM-YYYY, DD/MM/YY
        Regex::new(r"\d{2}[-/]\d{2}[-/]\d{2,4}").unwrap(),
        // DD MM YYYY
        Regex::new(r"\d{2} \d{2} \d{4}").unwrap(),
        // DD MMM YYYY
        Regex::new(r"(?i)\d{2} \b(?:JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)\b \d{4}").unwrap(),
    ];
}

/// Keyword and pattern heuristics over the full-page OCR lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeTextFieldResolver {
    dates: DateNormalizer,
}

impl FreeTextFieldResolver {
    pub fn new(dates: DateNormalizer) -> Self {
        FreeTextFieldResolver { dates }
    }

    /// Text after the last occurrence of the first matching keyword on the
    /// first matching line.
    pub fn find_authority<S: AsRef<str>>(&self, lines: &[S]) -> FieldValue {
        for line in lines {
            let line_upper = line.as_ref().to_uppercase();
            for keyword in AUTHORITY_KEYWORDS {
                if let Some(pos) = line_upper.rfind(keyword) {
                    let authority = line_upper[pos + keyword.len()..]
                        .trim_start_matches(|c: char| c == ':' || c == '-' || c == '.' || c.is_whitespace())
                        .trim()
                        .to_string();
                    debug!("Authority keyword {:?} matched line {:?}", keyword, line.as_ref());
                    return FieldValue::Found(authority);
                }
            }
        }
        FieldValue::NotFound
    }

    /// The second earliest of all distinct dates on the page, provided there
    /// are at least three of them.
    pub fn find_issuing_date<S: AsRef<str>>(&self, lines: &[S]) -> FieldValue {
        let dates = self.collect_dates(lines);
        debug!("Found {} distinct dates in page text", dates.len());

        if dates.len() < MIN_DISTINCT_DATES {
            return FieldValue::NotFound;
        }
        dates.iter().nth(1).copied().map(format_date).into()
    }

    fn collect_dates<S: AsRef<str>>(&self, lines: &[S]) -> BTreeSet<NaiveDate> {
        let mut dates = BTreeSet::new();
        for line in lines {
            for pattern in ISSUE_DATE_PATTERNS.iter() {
                for candidate in pattern.find_iter(line.as_ref()) {
                    match self.dates.parse(candidate.as_str()) {
                        Ok(date) => {
                            dates.insert(date);
                        }
                        Err(e) => debug!("Skipping date candidate {:?}: {}", candidate.as_str(), e),
                    }
                }
            }
        }
        dates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> FreeTextFieldResolver {
        FreeTextFieldResolver::new(DateNormalizer::with_reference_year(2026))
    }

    #[test]
    fn test_authority_after_keyword() {
        let lines = ["REPUBLIC OF INDONESIA", "ISSUING AUTHORITY: MINISTRY OF FOREIGN AFFAIRS"];
        assert_eq!(resolver().find_authority(&lines).as_str(), "MINISTRY OF FOREIGN AFFAIRS");
    }

    #[test]
    fn test_authority_is_uppercased() {
        let lines = ["Issued by  Kantor Imigrasi Jakarta "];
        assert_eq!(resolver().find_authority(&lines).as_str(), "KANTOR IMIGRASI JAKARTA");
    }

    #[test]
    fn test_authority_first_line_wins_over_better_keyword() {
        let lines = ["PLACE OF ISSUE JAKARTA", "ISSUING AUTHORITY: MINISTRY"];
        assert_eq!(resolver().find_authority(&lines).as_str(), "JAKARTA");
    }

    #[test]
    fn test_authority_first_keyword_in_list_order() {
        // ISSUED BY precedes AUTHORITY in the keyword list
        let lines = ["AUTHORITY X ISSUED BY EMBASSY"];
        assert_eq!(resolver().find_authority(&lines).as_str(), "EMBASSY");
    }

    #[test]
    fn test_authority_uses_last_occurrence() {
        let lines = ["AUTHORITY / AUTHORITY HOME OFFICE"];
        assert_eq!(resolver().find_authority(&lines).as_str(), "HOME OFFICE");
    }

    #[test]
    fn test_authority_not_found() {
        let lines = ["PASSPORT", "SURNAME SMITH"];
        assert_eq!(resolver().find_authority(&lines), FieldValue::NotFound);
        let empty: [&str; 0] = [];
        assert_eq!(resolver().find_authority(&empty), FieldValue::NotFound);
    }

    #[test]
    fn test_issuing_date_is_middle_of_three() {
        let lines = [
            "Date of expiry 15 MAR 2031",
            "Date of birth 01 JAN 1990",
            "Date of issue 16/03/2021",
        ];
        assert_eq!(resolver().find_issuing_date(&lines).as_str(), "16/03/2021");
    }

    #[test]
    fn test_issuing_date_deduplicates() {
        let lines = [
            "01 JAN 1990 / 01 01 1990",
            "15 MAR 2031",
            "15 mar 2031",
        ];
        assert_eq!(resolver().find_issuing_date(&lines), FieldValue::NotFound);
    }

    #[test]
    fn test_issuing_date_needs_three_dates() {
        let lines = ["Birth 01 JAN 1990", "Expiry 15 MAR 2031"];
        assert_eq!(resolver().find_issuing_date(&lines), FieldValue::NotFound);
    }

    #[test]
    fn test_issuing_date_with_more_than_three_dates() {
        let lines = [
            "20 FEB 1985 20 FEB 2015 20 FEB 2025",
            "01 JAN 1980",
        ];
        assert_eq!(resolver().find_issuing_date(&lines).as_str(), "20/02/1985");
    }

    #[test]
    fn test_unparseable_candidates_are_skipped() {
        let lines = ["99/99/9999", "01 JAN 1990", "15 MAR 2031"];
        assert_eq!(resolver().find_issuing_date(&lines), FieldValue::NotFound);
    }
}
