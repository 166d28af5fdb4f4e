//! Commands - flow chính của caller: select → analyze → history → export
//!
//! Mỗi command nhận collaborator tường minh (session, store, classifier),
//! không đọc ambient state. Lỗi qua boundary này là String một dòng,
//! phần kind đứng đầu message để caller route được.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::constants::PREVIEW_ROW_LIMIT;
use crate::logic::classify::{AnalysisResult, Classifier};
use crate::logic::error::PipelineError;
use crate::logic::export::{JsonExporter, ResultExporter};
use crate::logic::history::{HistoryEntry, HistoryStore};
use crate::logic::ingest::{self, DatasetHandle};
use crate::logic::pipeline::{AnalysisPipeline, PipelineEvent, PipelineOptions, RowCount};
use crate::logic::tabular::{self, PreviewTable};

use super::session::{SessionContext, UploadSession};

// ============================================================================
// OUTCOME
// ============================================================================

/// Kết cục một lần phân tích
///
/// Run Done thì result luôn có mặt ở đây, kể cả khi history không ghi
/// được: store lỗi chỉ hạ cờ `saved`, không làm mất result.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub result: AnalysisResult,
    /// History entry đã xuống store chưa
    pub saved: bool,
    /// Lý do không lưu được, nếu có
    pub store_error: Option<String>,
}

// ============================================================================
// COMMANDS
// ============================================================================

/// Chọn dataset mới cho phiên: validate metadata rồi parse preview
///
/// Thành công thì dataset/preview/result cũ của phiên bị thay hết.
/// Thất bại thì phiên giữ nguyên như trước khi gọi.
pub fn select_dataset(
    session: &mut UploadSession,
    handle: DatasetHandle,
) -> Result<PreviewTable, String> {
    ingest::validate(&handle).map_err(|e| e.to_string())?;

    let preview =
        tabular::parse_preview(&handle, PREVIEW_ROW_LIMIT).map_err(|e| e.to_string())?;

    log::info!(
        "Dataset '{}' selected: {} columns, {} preview rows",
        handle.name(),
        preview.column_count(),
        preview.row_count()
    );

    session.select(handle, preview.clone());
    Ok(preview)
}

/// Chạy pipeline trên preview của phiên, ghi history khi Done
///
/// Progress từng stage được log lúc stage xong. `exact_rows` stream cả
/// file để đếm số dòng thật thay cho ước lượng mặc định. Run Done mà
/// store không ghi được thì result vẫn trả về với `saved` false.
pub async fn run_analysis(
    session: &mut UploadSession,
    ctx: &SessionContext,
    store: &HistoryStore,
    classifier: Arc<dyn Classifier>,
    exact_rows: bool,
    deadline: Option<Duration>,
) -> Result<RunOutcome, String> {
    let preview = session
        .preview()
        .cloned()
        .ok_or_else(|| PipelineError::NoInput.to_string())?;
    let file_name = session.file_name().unwrap_or("dataset.csv").to_string();

    let row_count = if exact_rows {
        let dataset = session
            .dataset()
            .ok_or_else(|| PipelineError::NoInput.to_string())?;
        RowCount::Exact(tabular::count_data_rows(dataset).map_err(|e| e.to_string())?)
    } else {
        RowCount::Estimated
    };

    let mut pipeline = AnalysisPipeline::new(classifier)
        .with_options(PipelineOptions { deadline, row_count })
        .with_input(preview);
    let mut handle = pipeline.start().map_err(|e| e.to_string())?;

    let result = loop {
        match handle.recv().await {
            Some(PipelineEvent::Progress(p)) => {
                log::info!("{}... {}%", p.stage_name, p.percent_complete);
            }
            Some(PipelineEvent::Done { result }) => break result,
            Some(PipelineEvent::Failed { error }) => return Err(error.to_string()),
            Some(PipelineEvent::Cancelled) => return Err(PipelineError::Cancelled.to_string()),
            None => return Err("pipeline closed: no terminal event received".to_string()),
        }
    };

    session.set_result(result.clone());

    let entry = HistoryEntry::from_result(ctx.owner_id(), &file_name, &result);
    let (saved, store_error) = match store.append(&entry) {
        Ok(()) => (true, None),
        Err(e) => {
            log::warn!("Result available, not saved: {}", e);
            (false, Some(e.to_string()))
        }
    };

    Ok(RunOutcome {
        result,
        saved,
        store_error,
    })
}

/// Lịch sử run của owner hiện tại, thứ tự append
pub fn get_history(
    store: &HistoryStore,
    ctx: &SessionContext,
) -> Result<Vec<HistoryEntry>, String> {
    store.list_for(ctx.owner_id()).map_err(|e| e.to_string())
}

/// Export result document của phiên ra file JSON trong `out_dir`
pub fn export_result(session: &UploadSession, out_dir: &Path) -> Result<PathBuf, String> {
    let result = session
        .result()
        .ok_or_else(|| "no result: run an analysis before exporting".to_string())?;
    let file_name = session.file_name().unwrap_or("dataset.csv");

    JsonExporter
        .export(result, file_name, out_dir)
        .map_err(|e| e.to_string())
}

/// Bỏ dataset/preview/result đang giữ, phiên về trạng thái ban đầu
pub fn clear_session(session: &mut UploadSession) {
    session.clear();
    log::info!("Session cleared");
}

// ============================================================================
// TESTS
// ============================================================================
