//! Classify Module - decision procedures cho pipeline
//!
//! Pipeline không biết procedure nào đang chạy, chỉ gọi qua trait
//! `Classifier`. Có hai procedure đi kèm: heuristic (deterministic)
//! và synthetic (random, cho demo).

mod heuristic;
mod synthetic;
mod types;

pub use heuristic::HeuristicClassifier;
pub use synthetic::SyntheticClassifier;
pub use types::{AnalysisResult, AttackType, Prediction, TopFeature, Verdict, ATTACK_TYPES};

use crate::logic::features::FeatureFrame;

/// Lỗi từ decision procedure
#[derive(Debug, Clone)]
pub struct ClassifierError(pub String);

impl std::fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Classifier error: {}", self.0)
    }
}

impl std::error::Error for ClassifierError {}

/// Capability chấm điểm một FeatureFrame thành Verdict
///
/// Implementor phải trả verdict nhất quán (attack_type None <=> Normal);
/// pipeline sẽ fail stage nếu không.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &'static str;

    fn classify(&self, frame: &FeatureFrame) -> Result<Verdict, ClassifierError>;
}
