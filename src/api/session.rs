//! Session - danh tính caller và upload state đang sống
//!
//! Core không đụng vào ambient state: owner đi theo SessionContext được
//! truyền vào từng call, upload state nằm trọn trong UploadSession.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::logic::classify::AnalysisResult;
use crate::logic::ingest::DatasetHandle;
use crate::logic::tabular::PreviewTable;

// ============================================================================
// SESSION CONTEXT
// ============================================================================

/// Danh tính caller trong một phiên làm việc
///
/// `owner_id` là token định danh do lớp ngoài cấp (core không xác thực),
/// dùng để tag history entry. `session_id` sinh mới mỗi phiên.
#[derive(Debug, Clone)]
pub struct SessionContext {
    session_id: String,
    owner_id: String,
    started_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            started_at: Utc::now(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

// ============================================================================
// UPLOAD SESSION
// ============================================================================

/// Upload state của một phiên: tối đa một dataset/preview/result sống
///
/// Chọn dataset mới là preview và result của dataset trước bị bỏ luôn.
#[derive(Debug, Default)]
pub struct UploadSession {
    dataset: Option<DatasetHandle>,
    preview: Option<PreviewTable>,
    result: Option<AnalysisResult>,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Thay dataset đang chọn bằng dataset mới đã validate + parse
    pub fn select(&mut self, dataset: DatasetHandle, preview: PreviewTable) {
        self.dataset = Some(dataset);
        self.preview = Some(preview);
        self.result = None;
    }

    pub fn dataset(&self) -> Option<&DatasetHandle> {
        self.dataset.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewTable> {
        self.preview.as_ref()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    /// Gắn result của run vừa xong cho dataset đang chọn
    pub fn set_result(&mut self, result: AnalysisResult) {
        self.result = Some(result);
    }

    /// Tên file của dataset đang chọn
    pub fn file_name(&self) -> Option<&str> {
        self.dataset.as_ref().map(|d| d.name())
    }

    pub fn has_dataset(&self) -> bool {
        self.dataset.is_some()
    }

    /// Reset phiên về trạng thái ban đầu
    pub fn clear(&mut self) {
        self.dataset = None;
        self.preview = None;
        self.result = None;
    }
}

// ============================================================================
// TESTS
// ============================================================================
