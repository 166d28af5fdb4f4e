//! Tests cho Pipeline Module - thứ tự event, cancel, deadline, single-shot

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::logic::classify::{
    AttackType, Classifier, ClassifierError, Prediction, TopFeature, Verdict,
};
use crate::logic::error::PipelineError;
use crate::logic::features::FeatureFrame;
use crate::logic::tabular::PreviewTable;

use super::{
    AnalysisPipeline, CancelHandle, PipelineEvent, PipelineOptions, RowCount, RunHandle, RunState,
    Stage,
};

// ============================================================================
// FIXTURES
// ============================================================================

fn preview(rows: usize) -> PreviewTable {
    let headers: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
    let rows: Vec<BTreeMap<String, String>> = (0..rows)
        .map(|i| {
            let mut row = BTreeMap::new();
            row.insert("a".to_string(), i.to_string());
            row.insert("b".to_string(), (i * 2).to_string());
            row.insert("c".to_string(), "x".to_string());
            row.insert("d".to_string(), String::new());
            row
        })
        .collect();
    PreviewTable::new(headers, rows, 10)
}

struct FixedClassifier(Verdict);

impl Classifier for FixedClassifier {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn classify(&self, _frame: &FeatureFrame) -> Result<Verdict, ClassifierError> {
        Ok(self.0.clone())
    }
}

struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn classify(&self, _frame: &FeatureFrame) -> Result<Verdict, ClassifierError> {
        Err(ClassifierError("model exploded".to_string()))
    }
}

/// Trả verdict vi phạm invariant nhãn để ép stage cuối fail
struct InconsistentClassifier;

impl Classifier for InconsistentClassifier {
    fn name(&self) -> &'static str {
        "inconsistent"
    }

    fn classify(&self, _frame: &FeatureFrame) -> Result<Verdict, ClassifierError> {
        Ok(Verdict {
            prediction: Prediction::Ddos,
            attack_type: AttackType::None,
            confidence: 0.9,
            feature_weights: vec![],
        })
    }
}

/// Tự bấm cancel trong lúc stage Analyzing đang chạy
#[derive(Default)]
struct CancellingClassifier {
    armed: Mutex<Option<CancelHandle>>,
}

impl CancellingClassifier {
    fn arm(&self, handle: CancelHandle) {
        *self.armed.lock() = Some(handle);
    }
}

impl Classifier for CancellingClassifier {
    fn name(&self) -> &'static str {
        "cancelling"
    }

    fn classify(&self, _frame: &FeatureFrame) -> Result<Verdict, ClassifierError> {
        if let Some(handle) = self.armed.lock().as_ref() {
            handle.cancel();
        }
        Ok(Verdict::normal(0.9, vec![]))
    }
}

async fn drain(mut handle: RunHandle) -> Vec<PipelineEvent> {
    let mut events = Vec::new();
    while let Some(ev) = handle.recv().await {
        events.push(ev);
    }
    events
}

/// Đúng một terminal event và nó đứng cuối
fn assert_single_terminal(events: &[PipelineEvent]) {
    let terminals = events.iter().filter(|e| e.is_terminal()).count();
    assert_eq!(terminals, 1, "expected one terminal event, got {}", terminals);
    assert!(events.last().map(|e| e.is_terminal()).unwrap_or(false));
}

// ============================================================================
// TESTS
// ============================================================================

#[tokio::test]
async fn test_full_run_emits_ordered_progress_then_done() {
    let weights = vec![
        TopFeature::new("f1", 0.05),
        TopFeature::new("f2", 0.3),
        TopFeature::new("f3", 0.1),
        TopFeature::new("f4", 0.25),
        TopFeature::new("f5", 0.2),
        TopFeature::new("f6", 0.15),
    ];
    let verdict = Verdict::attack(AttackType::HttpFlood, 0.91, weights);
    let mut pipeline =
        AnalysisPipeline::new(Arc::new(FixedClassifier(verdict))).with_input(preview(3));

    let handle = pipeline.start().unwrap();
    let events = drain(handle).await;

    assert_eq!(events.len(), 5);
    assert_single_terminal(&events);

    for (i, ev) in events[..4].iter().enumerate() {
        match ev {
            PipelineEvent::Progress(p) => {
                assert_eq!(p.stage_index, i);
                assert_eq!(p.stage_name, Stage::ALL[i].name());
                assert_eq!(p.percent_complete as usize, (i + 1) * 25);
            }
            other => panic!("expected progress at position {}, got {:?}", i, other),
        }
    }

    match &events[4] {
        PipelineEvent::Done { result } => {
            assert_eq!(result.rows, 300);
            assert_eq!(result.columns, 4);
            assert_eq!(result.prediction, Prediction::Ddos);
            assert_eq!(result.attack_type, AttackType::HttpFlood);
            assert_eq!(result.confidence, 0.91);

            // Xếp hạng giảm dần, cắt còn 5, phần tử yếu nhất bị loại
            assert_eq!(result.top_features.len(), 5);
            for pair in result.top_features.windows(2) {
                assert!(pair[0].importance >= pair[1].importance);
            }
            assert_eq!(result.top_features[0].name, "f2");
            assert!(result.top_features.iter().all(|f| f.name != "f1"));
        }
        other => panic!("expected Done, got {:?}", other),
    }

    assert_eq!(pipeline.state(), RunState::Done);
}

#[tokio::test]
async fn test_start_without_input_then_recover() {
    let mut pipeline =
        AnalysisPipeline::new(Arc::new(FixedClassifier(Verdict::normal(0.9, vec![]))));

    assert!(matches!(pipeline.start(), Err(PipelineError::NoInput)));
    // NoInput không đổi trạng thái, gắn input xong chạy được
    assert_eq!(pipeline.state(), RunState::Idle);

    pipeline.set_input(preview(2));
    let handle = pipeline.start().unwrap();
    let events = drain(handle).await;

    assert!(matches!(events.last(), Some(PipelineEvent::Done { .. })));
    assert_eq!(pipeline.state(), RunState::Done);
}

#[tokio::test]
async fn test_pipeline_is_single_shot() {
    let mut pipeline =
        AnalysisPipeline::new(Arc::new(FixedClassifier(Verdict::normal(0.8, vec![]))))
            .with_input(preview(1));

    let handle = pipeline.start().unwrap();
    drain(handle).await;
    assert_eq!(pipeline.state(), RunState::Done);

    pipeline.set_input(preview(1));
    assert!(matches!(
        pipeline.start(),
        Err(PipelineError::AlreadyComplete)
    ));
}

#[tokio::test]
async fn test_cancel_before_first_stage_suppresses_all_progress() {
    let mut pipeline =
        AnalysisPipeline::new(Arc::new(FixedClassifier(Verdict::normal(0.9, vec![]))))
            .with_input(preview(3));

    let handle = pipeline.start().unwrap();
    let cancel = handle.cancel_handle();
    assert!(!cancel.is_cancelled());
    handle.cancel();
    assert!(cancel.is_cancelled());
    let events = drain(handle).await;

    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], PipelineEvent::Cancelled));
    assert_eq!(pipeline.state(), RunState::Cancelled);
}

#[tokio::test]
async fn test_cancel_during_stage_discards_that_stage() {
    let classifier = Arc::new(CancellingClassifier::default());
    let mut pipeline = AnalysisPipeline::new(classifier.clone()).with_input(preview(2));

    let handle = pipeline.start().unwrap();
    classifier.arm(handle.cancel_handle());
    let events = drain(handle).await;

    // Validating và Parsing đã report, Analyzing bị huỷ giữa chừng nên không report
    assert_eq!(events.len(), 3);
    assert_single_terminal(&events);
    match (&events[0], &events[1]) {
        (PipelineEvent::Progress(p1), PipelineEvent::Progress(p2)) => {
            assert_eq!(p1.percent_complete, 25);
            assert_eq!(p2.percent_complete, 50);
        }
        other => panic!("expected two progress events, got {:?}", other),
    }
    assert!(matches!(events[2], PipelineEvent::Cancelled));
    assert_eq!(pipeline.state(), RunState::Cancelled);
}

#[tokio::test]
async fn test_join_waits_for_worker_exit() {
    let mut pipeline =
        AnalysisPipeline::new(Arc::new(FixedClassifier(Verdict::normal(0.9, vec![]))))
            .with_input(preview(2));

    let mut handle = pipeline.start().unwrap();
    let mut events = Vec::new();
    while let Some(ev) = handle.recv().await {
        events.push(ev);
    }
    assert!(matches!(events.last(), Some(PipelineEvent::Done { .. })));

    // Channel đóng nghĩa là worker đã gửi xong, join phải trả về ngay
    handle.join().await;
    assert_eq!(pipeline.state(), RunState::Done);
}

#[tokio::test]
async fn test_zero_deadline_times_out_before_any_stage() {
    let options = PipelineOptions {
        deadline: Some(Duration::ZERO),
        row_count: RowCount::Estimated,
    };
    let mut pipeline =
        AnalysisPipeline::new(Arc::new(FixedClassifier(Verdict::normal(0.9, vec![]))))
            .with_options(options)
            .with_input(preview(2));

    let handle = pipeline.start().unwrap();
    let events = drain(handle).await;

    assert_eq!(events.len(), 1);
    match &events[0] {
        PipelineEvent::Failed {
            error: PipelineError::Timeout { stage },
        } => assert_eq!(*stage, Stage::Validating),
        other => panic!("expected Timeout, got {:?}", other),
    }
    assert_eq!(pipeline.state(), RunState::Failed);
}

#[tokio::test]
async fn test_failing_classifier_fails_at_analyzing() {
    let mut pipeline = AnalysisPipeline::new(Arc::new(FailingClassifier)).with_input(preview(2));

    let handle = pipeline.start().unwrap();
    let events = drain(handle).await;

    assert_eq!(events.len(), 3);
    assert_single_terminal(&events);
    match &events[2] {
        PipelineEvent::Failed {
            error: PipelineError::StageFailed { stage, message },
        } => {
            assert_eq!(*stage, Stage::Analyzing);
            assert!(message.contains("model exploded"));
        }
        other => panic!("expected StageFailed, got {:?}", other),
    }
    assert_eq!(pipeline.state(), RunState::Failed);
}

#[tokio::test]
async fn test_inconsistent_verdict_fails_at_insights() {
    let mut pipeline =
        AnalysisPipeline::new(Arc::new(InconsistentClassifier)).with_input(preview(2));

    let handle = pipeline.start().unwrap();
    let events = drain(handle).await;

    assert_eq!(events.len(), 4);
    assert_single_terminal(&events);
    match &events[3] {
        PipelineEvent::Failed {
            error: PipelineError::StageFailed { stage, .. },
        } => assert_eq!(*stage, Stage::GeneratingInsights),
        other => panic!("expected StageFailed at final stage, got {:?}", other),
    }
}

#[tokio::test]
async fn test_exact_row_count_overrides_estimate() {
    let options = PipelineOptions {
        deadline: None,
        row_count: RowCount::Exact(5000),
    };
    let mut pipeline =
        AnalysisPipeline::new(Arc::new(FixedClassifier(Verdict::normal(0.7, vec![]))))
            .with_options(options)
            .with_input(preview(3));

    let handle = pipeline.start().unwrap();
    let events = drain(handle).await;

    match events.last() {
        Some(PipelineEvent::Done { result }) => assert_eq!(result.rows, 5000),
        other => panic!("expected Done, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_preview_still_completes() {
    let mut pipeline =
        AnalysisPipeline::new(Arc::new(FixedClassifier(Verdict::normal(0.6, vec![]))))
            .with_input(preview(0));

    let handle = pipeline.start().unwrap();
    let events = drain(handle).await;

    match events.last() {
        Some(PipelineEvent::Done { result }) => {
            assert_eq!(result.rows, 0);
            assert_eq!(result.columns, 4);
            assert_eq!(result.prediction, Prediction::Normal);
        }
        other => panic!("expected Done, got {:?}", other),
    }
}

#[tokio::test]
async fn test_confidence_is_clamped_into_unit_range() {
    let mut pipeline =
        AnalysisPipeline::new(Arc::new(FixedClassifier(Verdict::normal(1.7, vec![]))))
            .with_input(preview(1));

    let handle = pipeline.start().unwrap();
    let events = drain(handle).await;

    match events.last() {
        Some(PipelineEvent::Done { result }) => assert_eq!(result.confidence, 1.0),
        other => panic!("expected Done, got {:?}", other),
    }
}
