//! DataGuard Core - Dataset Ingestion & Staged Analysis Pipeline
//!
//! Nhận dataset CSV, kiểm tra metadata, parse preview giới hạn dòng,
//! chạy pipeline phân tích 4 giai đoạn và lưu lịch sử append-only.

pub mod api;
pub mod constants;
pub mod logic;

pub use logic::classify::{AnalysisResult, AttackType, Classifier, Prediction, TopFeature};
pub use logic::history::{HistoryEntry, HistoryStore};
pub use logic::ingest::DatasetHandle;
pub use logic::pipeline::{AnalysisPipeline, PipelineEvent, PipelineProgress, RunHandle};
pub use logic::tabular::PreviewTable;
