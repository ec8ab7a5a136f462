pub mod batch;
pub mod country;
pub mod dates;
pub mod field_cleaner;
pub mod free_text;
pub mod image;
pub mod mrz;
pub mod ocr;

pub use batch::{collect_documents, run_batch, BatchDocument, BatchOutcome};
pub use country::{CountryCode, CountryCodeResolver, CountryCodeTable};
pub use dates::DateNormalizer;
pub use field_cleaner::FieldCleaner;
pub use free_text::FreeTextFieldResolver;
pub use self::image::ImageProcessor;
pub use mrz::MrzDecoder;
pub use ocr::{text_to_lines, OcrEngine, MRZ_ALLOWLIST};
#[cfg(feature = "tesseract")]
pub use ocr::TesseractOcr;
