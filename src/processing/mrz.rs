use log::{debug, warn};

use crate::models::{MrzRecord, MRZ_FILLER, TD3_LINE_COUNT, TD3_LINE_LENGTH};
use crate::utils::PassportError;

/// Decodes a TD3 MRZ line pair into positional raw fields.
pub struct MrzDecoder;

impl MrzDecoder {
    /// Decode the first two lines of an MRZ OCR pass.
    pub fn decode_lines<S: AsRef<str>>(lines: &[S]) -> Result<MrzRecord, PassportError> {
        if lines.len() < TD3_LINE_COUNT {
            return Err(PassportError::InsufficientData { found: lines.len() });
        }
        if lines.len() > TD3_LINE_COUNT {
            debug!("MRZ OCR returned {} lines, using the first two", lines.len());
        }
        Ok(Self::decode(lines[0].as_ref(), lines[1].as_ref()))
    }

    pub fn decode(line_a: &str, line_b: &str) -> MrzRecord {
        let a = Self::normalize_line(line_a);
        let b = Self::normalize_line(line_b);

        // Line 1: type (0-2), issuing state (2-5), name (5-44)
        // Line 2: number (0-9), nationality (10-13), birth (13-19), sex (20),
        // expiry (21-27)
        let (surname_raw, given_names_raw) = Self::split_name(&field(&a, 5, 44));

        let record = MrzRecord {
            document_type_code: field(&a, 0, 2),
            issuing_country_raw: field(&a, 2, 5),
            surname_raw,
            given_names_raw,
            document_number_raw: field(&b, 0, 9),
            nationality_code_raw: field(&b, 10, 13),
            birth_date_raw: field(&b, 13, 19),
            sex_raw: field(&b, 20, 21),
            expiry_date_raw: field(&b, 21, 27),
            lines: [a, b],
        };
        debug!("Decoded MRZ record: {:?}", record);
        record
    }

    /// Upper-case, then pad with `<` or truncate to exactly 44 characters.
    pub fn normalize_line(line: &str) -> String {
        let upper = line.to_uppercase();
        let length = upper.chars().count();

        if length > TD3_LINE_LENGTH {
            warn!(
                "MRZ line has {} characters, truncating to {}: {}",
                length, TD3_LINE_LENGTH, upper
            );
            return upper.chars().take(TD3_LINE_LENGTH).collect();
        }

        let mut padded = upper;
        padded.extend(std::iter::repeat(MRZ_FILLER).take(TD3_LINE_LENGTH - length));
        padded
    }

    /// Split on the first `<<` only; further fillers become spaces.
    fn split_name(region: &str) -> (String, String) {
        match region.split_once("<<") {
            Some((surname, given_names)) => (Self::defill(surname), Self::defill(given_names)),
            None => (Self::defill(region), String::new()),
        }
    }

    fn defill(part: &str) -> String {
        part.replace(MRZ_FILLER, " ").trim().to_uppercase()
    }
}

// Character-indexed slice; normalized lines always cover [start, end).
fn field(line: &str, start: usize, end: usize) -> String {
    line.chars().skip(start).take(end - start).collect()
}
