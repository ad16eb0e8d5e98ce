use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ocr::OcrSettings;
use crate::policy::AcceptPolicy;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub extraction: Option<ExtractionConfig>,
    pub ocr: Option<OcrConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub min_chars: Option<usize>,
    pub min_printable_ratio: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrConfig {
    pub enabled: Option<bool>,
    pub languages: Option<String>,
    pub dpi: Option<u32>,
    pub psm: Option<u8>,
    pub tesseract_path: Option<String>,
}

impl ConfigFile {
    /// Acceptance policy with config values applied over defaults.
    pub fn accept_policy(&self) -> AcceptPolicy {
        let defaults = AcceptPolicy::default();
        let ex = self.extraction.as_ref();
        AcceptPolicy {
            min_chars: ex.and_then(|e| e.min_chars).unwrap_or(defaults.min_chars),
            min_printable_ratio: ex
                .and_then(|e| e.min_printable_ratio)
                .unwrap_or(defaults.min_printable_ratio),
        }
    }

    /// OCR settings with config values applied over defaults.
    pub fn ocr_settings(&self) -> OcrSettings {
        let defaults = OcrSettings::default();
        let ocr = self.ocr.as_ref();
        OcrSettings {
            languages: ocr
                .and_then(|o| o.languages.clone())
                .unwrap_or(defaults.languages),
            dpi: ocr.and_then(|o| o.dpi).unwrap_or(defaults.dpi),
            psm: ocr.and_then(|o| o.psm).unwrap_or(defaults.psm),
            tesseract_path: ocr
                .and_then(|o| o.tesseract_path.clone())
                .map(PathBuf::from)
                .unwrap_or(defaults.tesseract_path),
        }
    }

    pub fn ocr_enabled(&self) -> bool {
        self.ocr.as_ref().and_then(|o| o.enabled).unwrap_or(true)
    }
}

/// Platform config directory path: `<config_dir>/cvtext/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cvtext").join("config.toml"))
}

/// Load config by cascading CWD `.cvtext.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".cvtext.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (bx, ox) = (base.extraction.unwrap_or_default(), overlay.extraction.unwrap_or_default());
    let (bo, oo) = (base.ocr.unwrap_or_default(), overlay.ocr.unwrap_or_default());
    ConfigFile {
        extraction: Some(ExtractionConfig {
            min_chars: ox.min_chars.or(bx.min_chars),
            min_printable_ratio: ox.min_printable_ratio.or(bx.min_printable_ratio),
        }),
        ocr: Some(OcrConfig {
            enabled: oo.enabled.or(bo.enabled),
            languages: oo.languages.or(bo.languages),
            dpi: oo.dpi.or(bo.dpi),
            psm: oo.psm.or(bo.psm),
            tesseract_path: oo.tesseract_path.or(bo.tesseract_path),
        }),
    }
}

/// Serialize a config as pretty TOML.
pub fn to_toml(config: &ConfigFile) -> Result<String, String> {
    toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config: {}", e))
}

/// Save the current config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, String> {
    let path = config_path().ok_or_else(|| "Could not determine config directory".to_string())?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let content = to_toml(config)?;
    std::fs::write(&path, content).map_err(|e| format!("Failed to write config: {}", e))?;
    Ok(path)
}
