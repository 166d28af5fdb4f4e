//! Pipeline Module - state machine phân tích 4 giai đoạn
//!
//! Một instance chạy đúng một lần: Idle -> Running -> Done/Failed/Cancelled.
//! Progress bắn ra sau khi mỗi stage hoàn thành, quan sát qua channel.

mod progress;
mod runner;

#[cfg(test)]
mod tests;

pub use progress::{PipelineEvent, PipelineProgress};
pub use runner::{AnalysisPipeline, CancelHandle, PipelineOptions, RunHandle};

use serde::{Deserialize, Serialize};

use crate::constants::ROW_ESTIMATE_MULTIPLIER;

// ============================================================================
// STAGES
// ============================================================================

/// Bốn giai đoạn, đúng thứ tự chạy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Validating,
    Parsing,
    Analyzing,
    #[serde(rename = "Generating Insights")]
    GeneratingInsights,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Validating,
        Stage::Parsing,
        Stage::Analyzing,
        Stage::GeneratingInsights,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(&self) -> usize {
        match self {
            Stage::Validating => 0,
            Stage::Parsing => 1,
            Stage::Analyzing => 2,
            Stage::GeneratingInsights => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Validating => "Validating",
            Stage::Parsing => "Parsing",
            Stage::Analyzing => "Analyzing",
            Stage::GeneratingInsights => "Generating Insights",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// RUN STATE
// ============================================================================

/// Trạng thái vòng đời của một pipeline instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    Idle,
    Running,
    Done,
    Failed,
    Cancelled,
}

impl RunState {
    /// Run đã kết thúc chưa (theo bất kỳ nhánh nào)
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Failed | RunState::Cancelled)
    }
}

// ============================================================================
// ROW COUNT MODE
// ============================================================================

/// Cách xác định trường `rows` của result
#[derive(Debug, Clone, Default)]
pub enum RowCount {
    /// Ước lượng: số dòng preview nhân với hệ số cố định
    #[default]
    Estimated,
    /// Số đếm chính xác, lấy từ `tabular::count_data_rows`
    Exact(u64),
}

impl RowCount {
    pub fn resolve(&self, sampled_rows: usize) -> u64 {
        match self {
            RowCount::Estimated => sampled_rows as u64 * ROW_ESTIMATE_MULTIPLIER,
            RowCount::Exact(n) => *n,
        }
    }
}

#[cfg(test)]
mod stage_tests {
    use super::*;

    #[test]
    fn test_stage_order_and_names() {
        assert_eq!(Stage::COUNT, 4);
        assert_eq!(Stage::ALL[0].name(), "Validating");
        assert_eq!(Stage::ALL[3].name(), "Generating Insights");
        for (i, stage) in Stage::ALL.iter().enumerate() {
            assert_eq!(stage.index(), i);
        }
    }

    #[test]
    fn test_row_count_resolve() {
        assert_eq!(RowCount::Estimated.resolve(5), 500);
        assert_eq!(RowCount::Estimated.resolve(0), 0);
        assert_eq!(RowCount::Exact(1234).resolve(5), 1234);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!RunState::Idle.is_terminal());
        assert!(!RunState::Running.is_terminal());
        assert!(RunState::Done.is_terminal());
        assert!(RunState::Failed.is_terminal());
        assert!(RunState::Cancelled.is_terminal());
    }
}
