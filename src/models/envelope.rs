//! 各分析流程的输出

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::chart::{ChartRecord, UserInfo};
use crate::models::holland::{DimensionScores, RankedProfile};
use crate::models::narrative::NarrativeResult;

/// 综合分析结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisEnvelope {
    pub user_info: UserInfo,
    pub ziwei_analysis: NarrativeResult,
    pub holland_result: RankedProfile,
    pub combined_analysis: NarrativeResult,
    pub timestamp: DateTime<Utc>,
}

/// 单独的霍兰德测试结果
#[derive(Debug, Clone)]
pub struct InventoryReport {
    pub scores: DimensionScores,
    pub profile: RankedProfile,
    pub analysis: NarrativeResult,
}

/// 单独的紫微分析结果
#[derive(Debug, Clone)]
pub struct ChartReport {
    pub chart: ChartRecord,
    pub analysis: NarrativeResult,
}
