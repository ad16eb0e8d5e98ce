use std::path::{Path, PathBuf};

/// Marker line placed above each OCR'd page.
pub fn page_marker(page_number: usize) -> String {
    format!("--- PAGE {} ---", page_number)
}

/// Prefix OCR text for one page with its marker.
pub fn with_page_marker(page_number: usize, text: &str) -> String {
    format!("{}\n{}", page_marker(page_number), text.trim_end())
}

/// Default text dump location: `<stem>.txt` in `dir`.
pub fn default_output_path(input: &Path, dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "extracted".to_string());
    dir.join(format!("{}.txt", stem))
}

/// Write extracted text as UTF-8, byte-for-byte.
pub fn write_text(path: &Path, text: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text.as_bytes())?;
    tracing::info!(path = %path.display(), bytes = text.len(), "text written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("cv.txt");
        let text = "Ervaring — Projectleider\r\n• Überprüfung  \n\n--- PAGE 2 ---\nnaïef\n";
        write_text(&path, text).unwrap();
        let back = std::fs::read(&path).unwrap();
        assert_eq!(back, text.as_bytes());
    }

    #[test]
    fn default_path_uses_stem() {
        let p = default_output_path(Path::new("/docs/_GJRoth_CV.pdf"), Path::new("."));
        assert_eq!(p, Path::new("./_GJRoth_CV.txt"));
    }

    #[test]
    fn marker_precedes_page_text() {
        assert_eq!(with_page_marker(3, "Naam\n\n"), "--- PAGE 3 ---\nNaam");
    }
}
