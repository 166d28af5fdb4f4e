//! Pipeline Runner - chạy 4 giai đoạn trên tokio task riêng
//!
//! Worker và observer tách nhau qua unbounded channel, thứ tự gửi là
//! thứ tự nhận. Cancel flag được check trước VÀ sau mỗi stage: cancel
//! đến trong lúc stage đang chạy thì progress của stage đó bị bỏ.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::constants::TOP_FEATURE_LIMIT;
use crate::logic::classify::{AnalysisResult, Classifier, Verdict};
use crate::logic::error::PipelineError;
use crate::logic::features::FeatureFrame;
use crate::logic::tabular::PreviewTable;

use super::progress::{PipelineEvent, PipelineProgress};
use super::{RowCount, RunState, Stage};

// ============================================================================
// OPTIONS
// ============================================================================

/// Tuỳ chọn cho một lần chạy
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Deadline cho cả run, check ở ranh giới giữa các stage
    pub deadline: Option<Duration>,
    /// Cách tính trường `rows` của result
    pub row_count: RowCount,
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Pipeline một lần chạy trên một preview đã parse
pub struct AnalysisPipeline {
    classifier: Arc<dyn Classifier>,
    options: PipelineOptions,
    input: Option<PreviewTable>,
    state: Arc<Mutex<RunState>>,
}

impl AnalysisPipeline {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            options: PipelineOptions::default(),
            input: None,
            state: Arc::new(Mutex::new(RunState::Idle)),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Gắn preview làm input; preview gắn sau thay preview trước
    pub fn with_input(mut self, preview: PreviewTable) -> Self {
        self.input = Some(preview);
        self
    }

    pub fn set_input(&mut self, preview: PreviewTable) {
        self.input = Some(preview);
    }

    pub fn state(&self) -> RunState {
        *self.state.lock()
    }

    /// Bắt đầu run trên tokio task mới (phải gọi trong runtime)
    ///
    /// Lỗi `NoInput` không đổi trạng thái, gắn input rồi start lại được.
    /// Mọi trạng thái khác Idle trả `AlreadyComplete`.
    pub fn start(&mut self) -> Result<RunHandle, PipelineError> {
        if *self.state.lock() != RunState::Idle {
            return Err(PipelineError::AlreadyComplete);
        }
        let preview = self.input.take().ok_or(PipelineError::NoInput)?;
        *self.state.lock() = RunState::Running;

        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let task = tokio::spawn(run_stages(
            preview,
            Arc::clone(&self.classifier),
            self.options.clone(),
            tx,
            Arc::clone(&cancel),
            Arc::clone(&self.state),
        ));

        log::info!(
            "Analysis pipeline started: {} stages, classifier '{}'",
            Stage::COUNT,
            self.classifier.name()
        );

        Ok(RunHandle {
            events: rx,
            cancel,
            state: Arc::clone(&self.state),
            task,
        })
    }
}

// ============================================================================
// RUN HANDLE
// ============================================================================

/// Control huỷ run, clone được để đưa sang task khác
#[derive(Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Phía observer của một run đang chạy
pub struct RunHandle {
    events: mpsc::UnboundedReceiver<PipelineEvent>,
    cancel: Arc<AtomicBool>,
    state: Arc<Mutex<RunState>>,
    task: JoinHandle<()>,
}

impl RunHandle {
    /// Nhận event tiếp theo; None khi worker đã đóng channel
    pub async fn recv(&mut self) -> Option<PipelineEvent> {
        self.events.recv().await
    }

    /// Yêu cầu huỷ; worker xác nhận bằng event Cancelled
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(Arc::clone(&self.cancel))
    }

    pub fn state(&self) -> RunState {
        *self.state.lock()
    }

    /// Chờ worker task kết thúc hẳn
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

// ============================================================================
// WORKER
// ============================================================================

async fn run_stages(
    preview: PreviewTable,
    classifier: Arc<dyn Classifier>,
    options: PipelineOptions,
    tx: mpsc::UnboundedSender<PipelineEvent>,
    cancel: Arc<AtomicBool>,
    state: Arc<Mutex<RunState>>,
) {
    let started = Instant::now();

    let mut frame: Option<FeatureFrame> = None;
    let mut verdict: Option<Verdict> = None;
    let mut result: Option<AnalysisResult> = None;

    for stage in Stage::ALL {
        if cancel.load(Ordering::SeqCst) {
            finish_cancelled(&state, &tx);
            return;
        }

        if let Some(deadline) = options.deadline {
            if started.elapsed() >= deadline {
                finish_failed(&state, &tx, PipelineError::Timeout { stage });
                return;
            }
        }

        let outcome = match stage {
            Stage::Validating => preview.validate(),
            Stage::Parsing => {
                let total = options.row_count.resolve(preview.row_count());
                frame = Some(FeatureFrame::from_preview(&preview, total));
                Ok(())
            }
            Stage::Analyzing => match frame.as_ref() {
                Some(f) => match classifier.classify(f) {
                    Ok(v) => {
                        verdict = Some(v);
                        Ok(())
                    }
                    Err(e) => Err(e.0),
                },
                None => Err("feature frame missing".to_string()),
            },
            Stage::GeneratingInsights => match (frame.as_ref(), verdict.take()) {
                (Some(f), Some(v)) => match synthesize_result(f, v) {
                    Ok(r) => {
                        result = Some(r);
                        Ok(())
                    }
                    Err(e) => Err(e),
                },
                _ => Err("verdict missing".to_string()),
            },
        };

        // Nhường scheduler để observer và cancel kịp chen giữa các stage
        tokio::task::yield_now().await;

        if let Err(message) = outcome {
            finish_failed(&state, &tx, PipelineError::StageFailed { stage, message });
            return;
        }

        if cancel.load(Ordering::SeqCst) {
            finish_cancelled(&state, &tx);
            return;
        }

        let _ = tx.send(PipelineEvent::Progress(PipelineProgress::after(stage)));
    }

    match result {
        Some(result) => {
            *state.lock() = RunState::Done;
            log::info!(
                "Analysis done: {} ({}), confidence {:.2}",
                result.prediction,
                result.attack_type,
                result.confidence
            );
            let _ = tx.send(PipelineEvent::Done { result });
        }
        None => {
            finish_failed(
                &state,
                &tx,
                PipelineError::StageFailed {
                    stage: Stage::GeneratingInsights,
                    message: "result missing after final stage".to_string(),
                },
            );
        }
    }
}

fn finish_cancelled(state: &Mutex<RunState>, tx: &mpsc::UnboundedSender<PipelineEvent>) {
    *state.lock() = RunState::Cancelled;
    log::info!("Analysis cancelled");
    let _ = tx.send(PipelineEvent::Cancelled);
}

fn finish_failed(
    state: &Mutex<RunState>,
    tx: &mpsc::UnboundedSender<PipelineEvent>,
    error: PipelineError,
) {
    *state.lock() = RunState::Failed;
    log::warn!("Analysis failed: {}", error);
    let _ = tx.send(PipelineEvent::Failed { error });
}

/// Tổng hợp result document từ frame và verdict của classifier
///
/// Check lại invariant nhãn, kẹp confidence về [0,1], xếp hạng
/// top features giảm dần theo importance rồi cắt còn tối đa 5.
fn synthesize_result(frame: &FeatureFrame, verdict: Verdict) -> Result<AnalysisResult, String> {
    verdict.check_consistency()?;

    let mut top_features = verdict.feature_weights;
    top_features.retain(|f| f.importance.is_finite());
    top_features.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    top_features.truncate(TOP_FEATURE_LIMIT);

    Ok(AnalysisResult {
        rows: frame.total_rows,
        columns: frame.column_count(),
        prediction: verdict.prediction,
        attack_type: verdict.attack_type,
        confidence: verdict.confidence.clamp(0.0, 1.0),
        top_features,
    })
}
