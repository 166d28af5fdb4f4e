//! Classification Types - nhãn, verdict và result document
//!
//! Serde rename giữ đúng chuỗi nhãn xuất ra ngoài ("DDoS", "SYN Flood"...)
//! để document export ổn định giữa các phiên bản.

use serde::{Deserialize, Serialize};

// ============================================================================
// LABELS
// ============================================================================

/// Nhãn phân loại chính
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prediction {
    Normal,
    #[serde(rename = "DDoS")]
    Ddos,
}

impl Prediction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prediction::Normal => "Normal",
            Prediction::Ddos => "DDoS",
        }
    }

    pub fn is_attack(&self) -> bool {
        matches!(self, Prediction::Ddos)
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Loại tấn công khi prediction là DDoS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackType {
    None,
    #[serde(rename = "SYN Flood")]
    SynFlood,
    #[serde(rename = "UDP Flood")]
    UdpFlood,
    #[serde(rename = "HTTP Flood")]
    HttpFlood,
    #[serde(rename = "ICMP Flood")]
    IcmpFlood,
}

/// Các loại tấn công thực sự (không tính None)
pub const ATTACK_TYPES: [AttackType; 4] = [
    AttackType::SynFlood,
    AttackType::UdpFlood,
    AttackType::HttpFlood,
    AttackType::IcmpFlood,
];

impl AttackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttackType::None => "None",
            AttackType::SynFlood => "SYN Flood",
            AttackType::UdpFlood => "UDP Flood",
            AttackType::HttpFlood => "HTTP Flood",
            AttackType::IcmpFlood => "ICMP Flood",
        }
    }
}

impl std::fmt::Display for AttackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// RESULT DOCUMENT
// ============================================================================

/// Một feature trong bảng xếp hạng đóng góp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopFeature {
    pub name: String,
    pub importance: f32,
}

impl TopFeature {
    pub fn new(name: impl Into<String>, importance: f32) -> Self {
        Self {
            name: name.into(),
            importance,
        }
    }
}

/// Kết quả phân tích hoàn chỉnh, round-trip lossless qua JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub rows: u64,
    pub columns: usize,
    pub prediction: Prediction,
    pub attack_type: AttackType,
    pub confidence: f32,
    pub top_features: Vec<TopFeature>,
}

impl AnalysisResult {
    pub fn is_attack(&self) -> bool {
        self.prediction.is_attack()
    }
}

// ============================================================================
// VERDICT (CLASSIFIER OUTPUT)
// ============================================================================

/// Output thô của một decision procedure, trước khi tổng hợp thành result
///
/// Constructor giữ invariant: attack_type khác None khi và chỉ khi
/// prediction là DDoS. Pipeline vẫn check lại ở stage cuối.
#[derive(Debug, Clone)]
pub struct Verdict {
    pub prediction: Prediction,
    pub attack_type: AttackType,
    pub confidence: f32,
    pub feature_weights: Vec<TopFeature>,
}

impl Verdict {
    pub fn normal(confidence: f32, feature_weights: Vec<TopFeature>) -> Self {
        Self {
            prediction: Prediction::Normal,
            attack_type: AttackType::None,
            confidence,
            feature_weights,
        }
    }

    pub fn attack(attack_type: AttackType, confidence: f32, feature_weights: Vec<TopFeature>) -> Self {
        Self {
            prediction: Prediction::Ddos,
            attack_type,
            confidence,
            feature_weights,
        }
    }

    /// Kiểm tra tính nhất quán của verdict
    pub fn check_consistency(&self) -> Result<(), String> {
        match (self.prediction, self.attack_type) {
            (Prediction::Normal, AttackType::None) => {}
            (Prediction::Ddos, AttackType::None) => {
                return Err("DDoS verdict must name an attack type".to_string());
            }
            (Prediction::Normal, other) => {
                return Err(format!("normal verdict carries attack type '{}'", other));
            }
            (Prediction::Ddos, _) => {}
        }

        if !self.confidence.is_finite() {
            return Err(format!("confidence is not finite: {}", self.confidence));
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
