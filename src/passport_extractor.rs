use crate::config::ExtractorConfig;
use crate::models::*;
use crate::processing::*;
use crate::utils::PassportError;
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;

/// Assembles the eight identity fields from MRZ lines and page OCR text.
///
/// Cheap to clone; clones share the country table.
#[derive(Debug, Clone)]
pub struct PassportExtractor {
    countries: CountryCodeResolver,
    dates: DateNormalizer,
    free_text: FreeTextFieldResolver,
    config: ExtractorConfig,
}

impl PassportExtractor {
    pub fn new(countries: Arc<CountryCodeTable>) -> Self {
        Self::with_config(countries, ExtractorConfig::default())
    }

    pub fn with_config(countries: Arc<CountryCodeTable>, config: ExtractorConfig) -> Self {
        Self::with_parts(countries, DateNormalizer::default(), config)
    }

    pub fn with_parts(
        countries: Arc<CountryCodeTable>,
        dates: DateNormalizer,
        config: ExtractorConfig,
    ) -> Self {
        PassportExtractor {
            countries: CountryCodeResolver::new(countries),
            dates,
            free_text: FreeTextFieldResolver::new(dates),
            config,
        }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    // Main extraction function: MRZ lines and page lines are already OCR'd
    pub fn extract<A, B>(&self, mrz_lines: &[A], page_lines: &[B]) -> Result<ExtractedIdentity, PassportError>
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let record = MrzDecoder::decode_lines(mrz_lines)?;
        Ok(self.resolve_identity(&record, page_lines))
    }

    /// Clean, resolve and parse the decoded record, then fill authority and
    /// issue date from the page text.
    pub fn resolve_identity<S: AsRef<str>>(&self, record: &MrzRecord, page_lines: &[S]) -> ExtractedIdentity {
        // Step 1: Name, given names first
        let name = format!("{} {}", record.given_names_raw, record.surname_raw)
            .trim()
            .to_string();

        // Step 2: Positional codes
        let passport_type = FieldCleaner::clean(&record.document_type_code);
        let passport_number = FieldCleaner::clean(&record.document_number_raw);
        let nationality_code = FieldCleaner::clean(&record.nationality_code_raw);
        let nationality = if nationality_code.is_empty() {
            FieldValue::NotFound
        } else {
            FieldValue::Found(self.countries.resolve(&nationality_code))
        };

        // Step 3: MRZ dates
        let date_of_birth = self.dates.parse_birth_date(&record.birth_date_raw);
        let date_of_expiry = self.dates.parse_date(&record.expiry_date_raw);

        // Step 4: Free-text fields
        let authority = self.free_text.find_authority(page_lines);
        let date_of_issue = self.free_text.find_issuing_date(page_lines);

        let identity = ExtractedIdentity {
            name: FieldValue::non_empty(name),
            date_of_birth,
            date_of_issue,
            date_of_expiry,
            authority,
            nationality,
            passport_type: FieldValue::non_empty(passport_type),
            passport_number: FieldValue::non_empty(passport_number),
        };

        let missing = identity.fields().iter().filter(|(_, value)| !value.is_found()).count();
        if missing > 0 {
            warn!("{} of 8 fields not found for passport {}", missing, identity.passport_number);
        } else {
            info!("All fields extracted for passport {}", identity.passport_number);
        }
        identity
    }

    /// Run both OCR passes, then `extract`. `mrz_crop` is the MRZ region
    /// already isolated by the caller.
    pub fn extract_from_images(
        &self,
        ocr: &mut dyn OcrEngine,
        mrz_crop: &Path,
        page_image: &Path,
    ) -> Result<ExtractedIdentity, PassportError> {
        let prepared = ImageProcessor::prepare_mrz_crop(mrz_crop, self.config.mrz_width, self.config.mrz_height)?;
        let mrz_lines = ocr.read_lines(prepared.path(), Some(MRZ_ALLOWLIST))?;
        if mrz_lines.len() < TD3_LINE_COUNT {
            warn!("Insufficient OCR results for image {}", mrz_crop.display());
            return Err(PassportError::InsufficientData { found: mrz_lines.len() });
        }

        let page_lines = ocr.read_lines(page_image, None)?;
        self.extract(&mrz_lines, &page_lines)
    }
}
