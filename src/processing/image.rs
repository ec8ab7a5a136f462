use crate::utils::PassportError;
use image::imageops::{self, FilterType};
use image::{GenericImageView, GrayImage, ImageFormat};
use imageproc::contrast::equalize_histogram;
use log::debug;
use std::path::Path;
use tempfile::NamedTempFile;

pub struct ImageProcessor;

impl ImageProcessor {
    /// Grayscale, equalize and resize an MRZ crop, then write it to a
    /// temporary PNG for the OCR engine. The file is removed when the
    /// returned handle is dropped.
    pub fn prepare_mrz_crop(
        image_path: &Path,
        width: u32,
        height: u32,
    ) -> Result<NamedTempFile, PassportError> {
        let img = image::open(image_path).map_err(|e| {
            PassportError::ImageProcessingError(format!(
                "Failed to open image {}: {}",
                image_path.display(),
                e
            ))
        })?;

        let prepared = Self::preprocess(&img.to_luma8(), width, height);
        debug!(
            "Prepared MRZ crop {} ({}x{} -> {}x{})",
            image_path.display(),
            img.width(),
            img.height(),
            width,
            height
        );
        Self::save_to_temp_file(&prepared)
    }

    fn preprocess(gray: &GrayImage, width: u32, height: u32) -> GrayImage {
        let equalized = equalize_histogram(gray);
        imageops::resize(&equalized, width, height, FilterType::Triangle)
    }

    fn save_to_temp_file(img: &GrayImage) -> Result<NamedTempFile, PassportError> {
        let temp_file = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .map_err(|e| PassportError::ImageProcessingError(format!("Failed to create temp file: {}", e)))?;

        img.save_with_format(temp_file.path(), ImageFormat::Png)
            .map_err(|e| PassportError::ImageProcessingError(format!("Failed to write temp file: {}", e)))?;

        Ok(temp_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, RgbImage};

    #[test]
    fn test_prepare_mrz_crop_resizes_to_target() {
        let source = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        RgbImage::from_fn(60, 12, |x, _| image::Rgb([(x * 4) as u8, 0, 0]))
            .save(source.path())
            .unwrap();

        let prepared = ImageProcessor::prepare_mrz_crop(source.path(), 1110, 140).unwrap();
        let output = image::open(prepared.path()).unwrap();
        assert_eq!((output.width(), output.height()), (1110, 140));
    }

    #[test]
    fn test_temp_file_removed_on_drop() {
        let img = GrayImage::from_pixel(4, 4, Luma([200u8]));
        let prepared = ImageProcessor::save_to_temp_file(&img).unwrap();
        let path = prepared.path().to_path_buf();
        assert!(path.exists());
        drop(prepared);
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_image_is_an_error() {
        let result = ImageProcessor::prepare_mrz_crop(Path::new("/nonexistent/mrz.png"), 10, 10);
        assert!(matches!(result, Err(PassportError::ImageProcessingError(_))));
    }
}
