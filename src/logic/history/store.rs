//! History Store - file JSONL, lock khi ghi, flush từng entry

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::classify::{AnalysisResult, Prediction};
use crate::logic::error::StoreError;

const HISTORY_FILE: &str = "history.jsonl";

// ============================================================================
// ENTRY
// ============================================================================

/// Một dòng lịch sử của một run thành công
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub file_name: String,
    pub date: DateTime<Utc>,
    pub prediction: Prediction,
    pub confidence: f32,
    pub owner_id: String,
}

impl HistoryEntry {
    /// Entry mới từ result, timestamp lấy tại thời điểm ghi nhận
    pub fn from_result(
        owner_id: impl Into<String>,
        file_name: impl Into<String>,
        result: &AnalysisResult,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            file_name: file_name.into(),
            date: Utc::now(),
            prediction: result.prediction,
            confidence: result.confidence,
            owner_id: owner_id.into(),
        }
    }
}

// ============================================================================
// STORE
// ============================================================================

/// Append-only store, một file cho mọi owner
pub struct HistoryStore {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl HistoryStore {
    /// Mở store trong thư mục cho trước, tạo thư mục nếu chưa có
    ///
    /// File mở lazy ở lần append đầu tiên.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        Ok(Self {
            path: dir.join(HISTORY_FILE),
            file: Mutex::new(None),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ghi một entry, flush ngay
    pub fn append(&self, entry: &HistoryEntry) -> Result<(), StoreError> {
        let line = serde_json::to_string(entry)?;

        let mut guard = self.file.lock();
        if guard.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            *guard = Some(file);
        }

        if let Some(file) = guard.as_mut() {
            writeln!(file, "{}", line)?;
            file.flush()?;
        }

        log::debug!("History entry appended: {} ({})", entry.file_name, entry.prediction);
        Ok(())
    }

    /// Toàn bộ entry theo thứ tự append
    ///
    /// Dòng không parse được thì bỏ qua, một dòng hỏng không làm mất cả lịch sử.
    pub fn list_all(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(entry) = serde_json::from_str::<HistoryEntry>(&line) {
                entries.push(entry);
            } else {
                log::warn!("Skipping unreadable history line ({} bytes)", line.len());
            }
        }

        Ok(entries)
    }

    /// Entry của một owner, thứ tự append
    pub fn list_for(&self, owner_id: &str) -> Result<Vec<HistoryEntry>, StoreError> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|e| e.owner_id == owner_id)
            .collect())
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.list_all()?.len())
    }
}
