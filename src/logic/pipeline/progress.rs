//! Progress Events - những gì observer nhìn thấy trong một run

use serde::{Deserialize, Serialize};

use crate::logic::classify::AnalysisResult;
use crate::logic::error::PipelineError;

use super::Stage;

/// Snapshot tiến độ sau khi một stage hoàn thành
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineProgress {
    pub stage_index: usize,
    pub stage_name: String,
    pub percent_complete: u8,
}

impl PipelineProgress {
    /// Progress ghi nhận stage vừa xong
    pub fn after(stage: Stage) -> Self {
        let percent = ((stage.index() + 1) * 100 / Stage::COUNT) as u8;
        Self {
            stage_index: stage.index(),
            stage_name: stage.name().to_string(),
            percent_complete: percent,
        }
    }
}

/// Event trên channel quan sát: n progress rồi đúng một terminal
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PipelineEvent {
    Progress(PipelineProgress),
    Done { result: AnalysisResult },
    Failed { error: PipelineError },
    Cancelled,
}

impl PipelineEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PipelineEvent::Progress(_))
    }
}
