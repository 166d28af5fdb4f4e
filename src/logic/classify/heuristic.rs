//! Heuristic Classifier - chấm điểm theo bảng chỉ báo, không cần model
//!
//! Mỗi chỉ báo gắn với một cột flow-statistics quen thuộc (vocabulary
//! CIC flow meter). Tín hiệu vượt ngưỡng được cộng dồn theo trọng số,
//! vượt decision threshold thì kết luận DDoS, loại tấn công lấy theo
//! nhóm chỉ báo đóng góp mạnh nhất.

use crate::logic::features::FeatureFrame;

use super::types::{AttackType, TopFeature, Verdict, ATTACK_TYPES};
use super::{Classifier, ClassifierError};

// ============================================================================
// INDICATOR TABLE
// ============================================================================

struct Indicator {
    column: &'static str,
    threshold: f32,
    weight: f32,
    /// true nếu giá trị THẤP dưới ngưỡng mới là tín hiệu (vd inter-arrival time)
    below: bool,
    attack: AttackType,
}

const INDICATORS: [Indicator; 8] = [
    Indicator { column: "flow packets/s", threshold: 1000.0, weight: 1.5, below: false, attack: AttackType::UdpFlood },
    Indicator { column: "flow bytes/s", threshold: 1_000_000.0, weight: 1.2, below: false, attack: AttackType::UdpFlood },
    Indicator { column: "packet length std", threshold: 400.0, weight: 0.9, below: false, attack: AttackType::UdpFlood },
    Indicator { column: "syn flag count", threshold: 50.0, weight: 1.6, below: false, attack: AttackType::SynFlood },
    Indicator { column: "fwd packets/s", threshold: 800.0, weight: 1.0, below: false, attack: AttackType::SynFlood },
    Indicator { column: "avg fwd segment size", threshold: 20.0, weight: 0.8, below: true, attack: AttackType::HttpFlood },
    Indicator { column: "fwd packet length mean", threshold: 30.0, weight: 0.8, below: true, attack: AttackType::HttpFlood },
    Indicator { column: "flow iat mean", threshold: 100.0, weight: 1.1, below: true, attack: AttackType::IcmpFlood },
];

/// Ngưỡng quyết định trên score tổng hợp
const DECISION_THRESHOLD: f32 = 0.6;

impl Indicator {
    /// Tín hiệu [0,1] của chỉ báo trên mean của cột
    fn signal(&self, mean: f32) -> f32 {
        if self.below {
            // Cột toàn 0 thường là dữ liệu thiếu, không tính
            if mean > 0.0 && mean < self.threshold {
                ((self.threshold - mean) / self.threshold).clamp(0.0, 1.0)
            } else {
                0.0
            }
        } else if mean > self.threshold {
            ((mean - self.threshold) / (self.threshold * 2.0)).min(1.0)
        } else {
            0.0
        }
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

/// Decision procedure mặc định: deterministic, cùng input cho cùng verdict
#[derive(Debug, Default)]
pub struct HeuristicClassifier;

impl HeuristicClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl Classifier for HeuristicClassifier {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn classify(&self, frame: &FeatureFrame) -> Result<Verdict, ClassifierError> {
        let mut total_contribution = 0.0f32;
        let mut total_weight = 0.0f32;
        let mut per_attack: Vec<(AttackType, f32)> =
            ATTACK_TYPES.iter().map(|a| (*a, 0.0)).collect();
        let mut weights: Vec<TopFeature> = Vec::new();

        for indicator in &INDICATORS {
            let col = match frame.column(indicator.column) {
                Some(col) if col.is_numeric() => col,
                _ => continue,
            };

            total_weight += indicator.weight;
            let signal = indicator.signal(col.mean);
            if signal <= 0.0 {
                continue;
            }

            let contribution = signal * indicator.weight;
            total_contribution += contribution;
            weights.push(TopFeature::new(col.name.clone(), contribution));

            if let Some(slot) = per_attack.iter_mut().find(|(a, _)| *a == indicator.attack) {
                slot.1 += contribution;
            }
        }

        // Dataset không có cột nào quen thuộc: verdict Normal với certainty thấp,
        // ranking lấy theo độ phân tán của các cột số
        if total_weight == 0.0 {
            let weights = dispersion_ranking(frame);
            return Ok(Verdict::normal(0.5, weights));
        }

        let score = (total_contribution / total_weight).min(1.0);
        let distance = (score - DECISION_THRESHOLD).abs() / DECISION_THRESHOLD;
        let confidence = (0.5 + distance * 0.5).min(1.0);

        if score > DECISION_THRESHOLD {
            let attack = per_attack
                .iter()
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(a, _)| *a)
                .unwrap_or(AttackType::SynFlood);
            Ok(Verdict::attack(attack, confidence, weights))
        } else {
            let weights = if weights.is_empty() {
                dispersion_ranking(frame)
            } else {
                weights
            };
            Ok(Verdict::normal(confidence, weights))
        }
    }
}

/// Ranking dự phòng: cột số nào dao động mạnh nhất đứng trước
fn dispersion_ranking(frame: &FeatureFrame) -> Vec<TopFeature> {
    frame
        .numeric_columns()
        .map(|c| TopFeature::new(c.name.clone(), (c.dispersion() * 0.1).min(0.1)))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
