//! Synthetic Classifier - stand-in ngẫu nhiên cho demo khi chưa có model
//!
//! Verdict rút thăm nhưng luôn giữ invariant nhãn/loại tấn công.
//! Seed được để tái lập kết quả trong demo.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::logic::features::FeatureFrame;

use super::types::{TopFeature, Verdict, ATTACK_TYPES};
use super::{Classifier, ClassifierError};

/// Tên feature cố định trong bảng xếp hạng của stand-in
const FEATURE_NAMES: [&str; 5] = [
    "Flow Packets/s",
    "Avg Fwd Segment Size",
    "Packet Length Std",
    "Flow IAT Mean",
    "Fwd Packet Length Mean",
];

pub struct SyntheticClassifier {
    rng: Mutex<StdRng>,
}

impl SyntheticClassifier {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Classifier tái lập được với seed cố định
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for SyntheticClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for SyntheticClassifier {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn classify(&self, _frame: &FeatureFrame) -> Result<Verdict, ClassifierError> {
        let mut rng = self.rng.lock();

        let is_attack = rng.gen_bool(0.5);
        let confidence = 0.85 + rng.gen::<f32>() * 0.13;

        let feature_weights: Vec<TopFeature> = FEATURE_NAMES
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let importance = 0.1 + (0.25 - idx as f32 * 0.05) + rng.gen::<f32>() * 0.1;
                TopFeature::new(*name, importance)
            })
            .collect();

        if is_attack {
            let attack = ATTACK_TYPES[rng.gen_range(0..ATTACK_TYPES.len())];
            Ok(Verdict::attack(attack, confidence, feature_weights))
        } else {
            Ok(Verdict::normal(confidence, feature_weights))
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
