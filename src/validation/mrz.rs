use log::debug;

use crate::models::{CheckDigitReport, MrzRecord, MRZ_FILLER};

const WEIGHTS: [u32; 3] = [7, 3, 1];

/// ICAO 9303 check digits over line two of a TD3 MRZ.
///
/// Only reported; extraction never depends on the outcome.
pub struct MrzValidator;

impl MrzValidator {
    pub fn validate(record: &MrzRecord) -> CheckDigitReport {
        let line: Vec<char> = record.lines[1].chars().collect();
        let span = |start: usize, end: usize| -> String { line[start..end].iter().collect() };
        let digit_at = |index: usize| line[index];

        // composite covers number+check, birth+check, expiry+check, personal+check
        let composite_input = format!("{}{}{}", span(0, 10), span(13, 20), span(21, 43));

        let report = CheckDigitReport {
            document_number_valid: Self::verify(&span(0, 9), digit_at(9)),
            date_of_birth_valid: Self::verify(&span(13, 19), digit_at(19)),
            date_of_expiry_valid: Self::verify(&span(21, 27), digit_at(27)),
            personal_number_valid: Self::verify(&span(28, 42), digit_at(42)),
            composite_valid: Self::verify(&composite_input, digit_at(43)),
        };
        debug!("Check digit report: {:?}", report);
        report
    }

    /// Weighted 7-3-1 sum modulo 10; `None` if a character is outside the MRZ alphabet.
    pub fn compute(field: &str) -> Option<u32> {
        field
            .chars()
            .zip(WEIGHTS.iter().cycle())
            .map(|(c, weight)| Self::char_value(c).map(|value| value * weight))
            .sum::<Option<u32>>()
            .map(|total| total % 10)
    }

    fn verify(field: &str, check: char) -> bool {
        let expected = if check == MRZ_FILLER {
            Some(0)
        } else {
            check.to_digit(10)
        };
        match (Self::compute(field), expected) {
            (Some(computed), Some(expected)) => computed == expected,
            _ => false,
        }
    }

    fn char_value(c: char) -> Option<u32> {
        match c {
            '0'..='9' => c.to_digit(10),
            'A'..='Z' => Some(c as u32 - 'A' as u32 + 10),
            MRZ_FILLER => Some(0),
            _ => None,
        }
    }
}
