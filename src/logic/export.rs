//! Export Module - đưa result document ra ngoài process
//!
//! JSON là định dạng đi kèm và phải round-trip lossless. Các renderer
//! khác (PDF...) implement cùng trait ở phía ngoài.

use std::fs;
use std::path::{Path, PathBuf};

use crate::logic::classify::AnalysisResult;
use crate::logic::error::ExportError;

/// Boundary cho mọi định dạng export
pub trait ResultExporter {
    fn format(&self) -> &'static str;

    /// Ghi document cho `file_name` vào `out_dir`, trả đường dẫn file
    fn export(
        &self,
        result: &AnalysisResult,
        file_name: &str,
        out_dir: &Path,
    ) -> Result<PathBuf, ExportError>;
}

/// Tên file export theo tên dataset gốc
fn export_file_name(file_name: &str) -> String {
    format!("{}-analysis.json", file_name)
}

/// Chuỗi JSON pretty (indent 2) của result document
pub fn to_json_string(result: &AnalysisResult) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Parse ngược một document JSON về result
pub fn from_json_str(json: &str) -> Result<AnalysisResult, ExportError> {
    Ok(serde_json::from_str(json)?)
}

// ============================================================================
// JSON EXPORTER
// ============================================================================

/// Exporter mặc định: document JSON xuống đĩa
#[derive(Debug, Default)]
pub struct JsonExporter;

impl ResultExporter for JsonExporter {
    fn format(&self) -> &'static str {
        "json"
    }

    fn export(
        &self,
        result: &AnalysisResult,
        file_name: &str,
        out_dir: &Path,
    ) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(out_dir)?;
        let path = out_dir.join(export_file_name(file_name));
        fs::write(&path, to_json_string(result)?)?;

        log::info!("Result exported to {}", path.display());
        Ok(path)
    }
}

// ============================================================================
// TESTS
// ============================================================================
