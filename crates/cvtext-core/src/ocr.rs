use std::path::{Path, PathBuf};
use std::process::Command;

use crate::backend::BackendError;

/// Default Tesseract language hint: Dutch plus English.
pub const DEFAULT_LANGUAGES: &str = "nld+eng";
/// Rasterization resolution used for OCR.
pub const DEFAULT_DPI: u32 = 300;
/// Tesseract page segmentation mode 1: automatic with orientation detection.
pub const DEFAULT_PSM: u8 = 1;

/// Settings shared by the rasterizer and the OCR engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrSettings {
    pub languages: String,
    pub dpi: u32,
    pub psm: u8,
    pub tesseract_path: PathBuf,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            languages: DEFAULT_LANGUAGES.to_string(),
            dpi: DEFAULT_DPI,
            psm: DEFAULT_PSM,
            tesseract_path: PathBuf::from("tesseract"),
        }
    }
}

/// Converts a rendered page image into text.
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Check that the engine can run (binary installed, languages present).
    fn availability(&self) -> Result<(), BackendError>;

    /// Recognize the text in the image at `image`.
    fn recognize(&self, image: &Path) -> Result<String, BackendError>;
}

/// OCR via the `tesseract` command-line tool.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    binary: PathBuf,
    languages: String,
    psm: u8,
}

impl TesseractCli {
    pub fn new(settings: &OcrSettings) -> Self {
        Self {
            binary: settings.tesseract_path.clone(),
            languages: settings.languages.clone(),
            psm: settings.psm,
        }
    }

    pub fn languages(&self) -> &str {
        &self.languages
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new(&OcrSettings::default())
    }
}

impl OcrEngine for TesseractCli {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn availability(&self) -> Result<(), BackendError> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .map_err(|e| {
                BackendError::Unavailable(format!(
                    "{} not runnable: {}",
                    self.binary.display(),
                    e
                ))
            })?;
        if !output.status.success() {
            return Err(BackendError::Unavailable(format!(
                "{} --version exited with {}",
                self.binary.display(),
                output.status
            )));
        }
        Ok(())
    }

    fn recognize(&self, image: &Path) -> Result<String, BackendError> {
        let output = Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .args(["-l", &self.languages])
            .args(["--psm", &self.psm.to_string()])
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackendError::ExtractionError(format!(
                "tesseract failed on {}: {}",
                image.display(),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_unavailable() {
        let engine = TesseractCli::new(&OcrSettings {
            tesseract_path: PathBuf::from("/nonexistent/bin/tesseract-cvtext"),
            ..OcrSettings::default()
        });
        assert!(matches!(
            engine.availability(),
            Err(BackendError::Unavailable(_))
        ));
    }

    #[test]
    fn defaults_match_dutch_english_hint() {
        let engine = TesseractCli::default();
        assert_eq!(engine.languages(), "nld+eng");
    }
}
