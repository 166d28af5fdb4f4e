//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change an ingestion limit or default path, only edit this file.

use std::path::PathBuf;
use std::time::Duration;

/// Upload ceiling for a dataset file (bytes)
///
/// Files above this size are rejected before any content is read.
pub const MAX_UPLOAD_BYTES: u64 = 300 * 1024 * 1024;

/// Maximum data rows kept in a preview
pub const PREVIEW_ROW_LIMIT: usize = 10;

/// Multiplier applied to the sampled row count when estimating dataset size
pub const ROW_ESTIMATE_MULTIPLIER: u64 = 100;

/// Maximum entries in the ranked top-features list of a result
pub const TOP_FEATURE_LIMIT: usize = 5;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "DataGuard";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get history directory from environment or use the platform data dir
pub fn get_history_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("DATAGUARD_HISTORY_DIR") {
        return PathBuf::from(dir);
    }
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dataguard")
        .join("history")
}

/// Get per-run analysis deadline from environment (seconds), if configured
pub fn get_run_deadline() -> Option<Duration> {
    std::env::var("DATAGUARD_RUN_DEADLINE_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_secs)
}

/// Get owner id used to tag history entries
pub fn get_owner_id() -> String {
    std::env::var("DATAGUARD_OWNER")
        .unwrap_or_else(|_| "local".to_string())
}
