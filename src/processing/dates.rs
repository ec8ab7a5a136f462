use chrono::{Datelike, Local, NaiveDate};
use log::debug;

use crate::models::FieldValue;
use crate::utils::DateParseError;

/// Output format for every normalized date.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

const MONTH_NAMES: [(&str, &str, u32); 12] = [
    ("JAN", "JANUARY", 1),
    ("FEB", "FEBRUARY", 2),
    ("MAR", "MARCH", 3),
    ("APR", "APRIL", 4),
    ("MAY", "MAY", 5),
    ("JUN", "JUNE", 6),
    ("JUL", "JULY", 7),
    ("AUG", "AUGUST", 8),
    ("SEP", "SEPTEMBER", 9),
    ("OCT", "OCTOBER", 10),
    ("NOV", "NOVEMBER", 11),
    ("DEC", "DECEMBER", 12),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateToken {
    Number { value: u32, digits: usize },
    Month(u32),
}

impl DateToken {
    fn value(&self) -> u32 {
        match *self {
            DateToken::Number { value, .. } => value,
            DateToken::Month(month) => month,
        }
    }

    fn is_year(&self) -> bool {
        matches!(self, DateToken::Number { digits, .. } if *digits > 2)
    }
}

/// Which token plays which role once a three-part date has been resolved.
#[derive(Debug, Clone, Copy)]
struct Roles {
    year: usize,
    month: usize,
    day: usize,
}

impl Roles {
    const fn new(year: usize, month: usize, day: usize) -> Self {
        Roles { year, month, day }
    }
}

/// Parses MRZ and free-text date fragments into `DD/MM/YYYY`.
///
/// Ambiguous numeric dates lean year-first, two-digit years are placed
/// within 50 years of `reference_year`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateNormalizer {
    reference_year: i32,
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::with_reference_year(Local::now().year())
    }
}

impl DateNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference_year(reference_year: i32) -> Self {
        DateNormalizer { reference_year }
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Generic parse, `Not Found` on anything that is not a calendar date.
    pub fn parse_date(&self, date_str: &str) -> FieldValue {
        match self.parse(date_str) {
            Ok(date) => FieldValue::Found(format_date(date)),
            Err(e) => {
                debug!("Unparseable date {:?}: {}", date_str, e);
                FieldValue::NotFound
            }
        }
    }

    /// Like `parse_date`, but a year of 2000 or later is moved back a century.
    pub fn parse_birth_date(&self, date_str: &str) -> FieldValue {
        let date = match self.parse(date_str) {
            Ok(date) => date,
            Err(e) => {
                debug!("Unparseable birth date {:?}: {}", date_str, e);
                return FieldValue::NotFound;
            }
        };

        if date.year() < 2000 {
            return FieldValue::Found(format_date(date));
        }

        match date.with_year(date.year() - 100) {
            Some(corrected) => FieldValue::Found(format_date(corrected)),
            None => {
                debug!("Birth date {} has no counterpart a century earlier", date);
                FieldValue::NotFound
            }
        }
    }

    /// Shared parsing core for both entry points.
    pub fn parse(&self, date_str: &str) -> Result<NaiveDate, DateParseError> {
        let trimmed = date_str.trim();
        if trimmed.is_empty() {
            return Err(DateParseError::Empty);
        }

        let tokens = if trimmed.chars().all(|c| c.is_ascii_digit()) {
            Self::split_digit_run(trimmed)?
        } else {
            Self::tokenize(trimmed)?
        };

        let tokens: [DateToken; 3] = tokens
            .try_into()
            .map_err(|_| DateParseError::UnrecognizedShape(trimmed.to_string()))?;
        let roles = Self::resolve_roles(&tokens)
            .ok_or_else(|| DateParseError::UnrecognizedShape(trimmed.to_string()))?;

        let year = match tokens[roles.year] {
            DateToken::Number { value, digits } if digits <= 2 => self.expand_two_digit_year(value),
            token => token.value() as i32,
        };
        let month = tokens[roles.month].value();
        let day = tokens[roles.day].value();

        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(DateParseError::InvalidCalendarDate { year, month, day })
    }

    // YYMMDD or YYYYMMDD without separators
    fn split_digit_run(digits: &str) -> Result<Vec<DateToken>, DateParseError> {
        let parts = match digits.len() {
            6 => [&digits[0..2], &digits[2..4], &digits[4..6]],
            8 => [&digits[0..4], &digits[4..6], &digits[6..8]],
            _ => return Err(DateParseError::UnrecognizedShape(digits.to_string())),
        };

        parts
            .iter()
            .map(|part| Self::number_token(part))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| DateParseError::UnrecognizedShape(digits.to_string()))
    }

    fn tokenize(text: &str) -> Result<Vec<DateToken>, DateParseError> {
        text.split(|c: char| c.is_whitespace() || matches!(c, '-' | '/' | '.' | ','))
            .filter(|group| !group.is_empty())
            .map(|group| {
                let token = if group.chars().all(|c| c.is_ascii_digit()) {
                    Self::number_token(group)
                } else {
                    month_from_name(group).map(DateToken::Month)
                };
                token.ok_or_else(|| DateParseError::UnrecognizedShape(text.to_string()))
            })
            .collect()
    }

    fn number_token(group: &str) -> Option<DateToken> {
        let value = group.parse::<u32>().ok()?;
        Some(DateToken::Number {
            value,
            digits: group.len(),
        })
    }

    fn resolve_roles(tokens: &[DateToken; 3]) -> Option<Roles> {
        let year_positions: Vec<usize> = (0..3).filter(|&i| tokens[i].is_year()).collect();
        let month_positions: Vec<usize> = (0..3)
            .filter(|&i| matches!(tokens[i], DateToken::Month(_)))
            .collect();
        if year_positions.len() > 1 || month_positions.len() > 1 {
            return None;
        }
        let year_idx = year_positions.first().copied();
        let month_idx = month_positions.first().copied();
        let v: Vec<u32> = tokens.iter().map(DateToken::value).collect();

        let roles = match (year_idx, month_idx) {
            (Some(year), Some(month)) => Roles::new(year, month, 3 - year - month),
            (_, Some(0)) => {
                if v[1] > 31 {
                    Roles::new(1, 0, 2)
                } else {
                    Roles::new(2, 0, 1)
                }
            }
            (_, Some(1)) => {
                if v[0] > 31 || v[2] <= 31 {
                    Roles::new(0, 1, 2)
                } else {
                    Roles::new(2, 1, 0)
                }
            }
            (_, Some(_)) => {
                if v[1] > 31 {
                    Roles::new(1, 2, 0)
                } else {
                    Roles::new(0, 2, 1)
                }
            }
            (year, None) => {
                if v[0] > 31 || year == Some(0) || (v[1] <= 12 && v[2] <= 31) {
                    Roles::new(0, 1, 2)
                } else if v[0] > 12 {
                    Roles::new(2, 1, 0)
                } else {
                    Roles::new(2, 0, 1)
                }
            }
        };
        Some(roles)
    }

    fn expand_two_digit_year(&self, year: u32) -> i32 {
        let century = self.reference_year / 100 * 100;
        let year = century + year as i32;
        if year >= self.reference_year + 50 {
            year - 100
        } else if year < self.reference_year - 50 {
            year + 100
        } else {
            year
        }
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn month_from_name(name: &str) -> Option<u32> {
    let upper = name.to_uppercase();
    MONTH_NAMES
        .iter()
        .find(|(short, long, _)| upper == *short || upper == *long)
        .map(|(_, _, month)| *month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> DateNormalizer {
        DateNormalizer::with_reference_year(2026)
    }

    #[test]
    fn test_mrz_birth_dates_get_century_correction() {
        let dates = normalizer();
        assert_eq!(dates.parse_birth_date("990101").as_str(), "01/01/1999");
        assert_eq!(dates.parse_birth_date("050101").as_str(), "01/01/1905");
        assert_eq!(dates.parse_birth_date("740812").as_str(), "12/08/1974");
    }

    #[test]
    fn test_mrz_expiry_date() {
        assert_eq!(normalizer().parse_date("300101").as_str(), "01/01/2030");
        assert_eq!(normalizer().parse_date("120415").as_str(), "15/04/2012");
    }

    #[test]
    fn test_free_text_dates() {
        let dates = normalizer();
        assert_eq!(dates.parse_date("12 JAN 2020").as_str(), "12/01/2020");
        assert_eq!(dates.parse_date("12 january 2020").as_str(), "12/01/2020");
        assert_eq!(dates.parse_date("25/01/2020").as_str(), "25/01/2020");
        assert_eq!(dates.parse_date("25 01 2020").as_str(), "25/01/2020");
        assert_eq!(dates.parse_date("20200125").as_str(), "25/01/2020");
    }

    #[test]
    fn test_ambiguous_numeric_dates_lean_year_first() {
        let dates = normalizer();
        // all two-digit groups: year, month, day
        assert_eq!(dates.parse_date("12-01-20").as_str(), "20/01/2012");
        // four-digit year last, small leading group read month first
        assert_eq!(dates.parse_date("12/01/2020").as_str(), "01/12/2020");
    }

    #[test]
    fn test_two_digit_year_window() {
        let dates = normalizer();
        assert_eq!(dates.parse("750101").unwrap().year(), 2075);
        assert_eq!(dates.parse("760101").unwrap().year(), 1976);
        assert_eq!(dates.parse("000101").unwrap().year(), 2000);
    }

    #[test]
    fn test_unparseable_input_is_not_found() {
        let dates = normalizer();
        assert_eq!(dates.parse_date(""), FieldValue::NotFound);
        assert_eq!(dates.parse_date("<<<<<<"), FieldValue::NotFound);
        assert_eq!(dates.parse_date("99O101"), FieldValue::NotFound);
        assert_eq!(dates.parse_birth_date("991301"), FieldValue::NotFound);
        assert_eq!(dates.parse_date("31 FEB 2020"), FieldValue::NotFound);
        assert_eq!(dates.parse_date("12345"), FieldValue::NotFound);
    }

    #[test]
    fn test_parse_errors_are_typed() {
        let dates = normalizer();
        assert_eq!(dates.parse("  "), Err(DateParseError::Empty));
        assert_eq!(
            dates.parse("991301"),
            Err(DateParseError::InvalidCalendarDate { year: 1999, month: 13, day: 1 })
        );
        assert!(matches!(dates.parse("HELLO"), Err(DateParseError::UnrecognizedShape(_))));
    }

    #[test]
    fn test_birth_date_leap_day_without_counterpart() {
        // 1904 is a leap year, 1900 is not
        let dates = normalizer();
        assert_eq!(dates.parse_birth_date("040229").as_str(), "29/02/1904");
        assert_eq!(dates.parse_birth_date("000229"), FieldValue::NotFound);
    }
}
