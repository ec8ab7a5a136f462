use crate::utils::PassportError;
use std::path::Path;

#[cfg(feature = "tesseract")]
use log::debug;
#[cfg(feature = "tesseract")]
use tesseract::Tesseract;

/// Characters the MRZ OCR pass is allowed to emit.
pub const MRZ_ALLOWLIST: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789< ";

/// Turns an image into recognized text lines in reading order.
pub trait OcrEngine {
    fn read_lines(
        &mut self,
        image_path: &Path,
        allowlist: Option<&str>,
    ) -> Result<Vec<String>, PassportError>;
}

/// Split raw OCR text into lines, dropping blank ones.
pub fn text_to_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(feature = "tesseract")]
pub struct TesseractOcr {
    datapath: Option<String>,
    language: String,
}

#[cfg(feature = "tesseract")]
impl TesseractOcr {
    pub fn new(datapath: Option<String>, language: impl Into<String>) -> Self {
        TesseractOcr {
            datapath,
            language: language.into(),
        }
    }
}

#[cfg(feature = "tesseract")]
impl OcrEngine for TesseractOcr {
    fn read_lines(
        &mut self,
        image_path: &Path,
        allowlist: Option<&str>,
    ) -> Result<Vec<String>, PassportError> {
        let path_str = image_path
            .to_str()
            .ok_or_else(|| PassportError::OcrError("Could not convert path to string".to_string()))?;

        let mut tess = Tesseract::new(self.datapath.as_deref(), Some(self.language.as_str()))
            .map_err(|e| PassportError::OcrError(format!("Failed to initialize Tesseract: {}", e)))?;
        if let Some(allowlist) = allowlist {
            tess = tess
                .set_variable("tessedit_char_whitelist", allowlist)
                .map_err(|e| PassportError::OcrError(format!("Failed to set Tesseract variable: {}", e)))?;
        }
        tess = tess
            .set_image(path_str)
            .map_err(|e| PassportError::OcrError(format!("Failed to set image: {}", e)))?;

        let text = tess
            .get_text()
            .map_err(|e| PassportError::OcrError(format!("Failed to extract text: {}", e)))?;
        debug!("OCR result for {}:\n{}", image_path.display(), text);

        Ok(text_to_lines(&text))
    }
}
