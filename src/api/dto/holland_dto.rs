//! 霍兰德测试 DTO

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::chart::DEFAULT_NAME;
use crate::models::envelope::InventoryReport;
use crate::models::holland::{DimensionScores, HollandType};
use crate::models::inventory::{InventoryAnswer, Respondent};
use crate::models::narrative::NarrativeResult;
use crate::security::validation::{Validatable, ValidationResult, validators};

/// 霍兰德测试请求
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HollandTestRequest {
    /// 24 道题的评分，单项无效时按 0 计
    pub answers: Option<Value>,
    /// 答卷人信息
    pub user_info: Option<HollandUserInfo>,
}

/// 答卷人信息
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HollandUserInfo {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub ziwei_info: Option<Value>,
}

/// 校验后的霍兰德测试输入
#[derive(Debug)]
pub struct HollandTestInput {
    pub answers: InventoryAnswer,
    pub respondent: Option<Respondent>,
}

impl Validatable for HollandTestRequest {
    type Validated = HollandTestInput;

    fn validate(self) -> ValidationResult<HollandTestInput> {
        let answers = InventoryAnswer::from_json("answers", self.answers.as_ref())?;

        let respondent = match self.user_info {
            Some(info) => {
                let name =
                    validators::text_or_default("userInfo.name", info.name.as_deref(), DEFAULT_NAME)?;
                let gender =
                    validators::text_or_default("userInfo.gender", info.gender.as_deref(), "")?;
                Some(Respondent {
                    name,
                    gender: Some(gender).filter(|g| !g.is_empty()),
                    ziwei_info: info.ziwei_info.filter(|v| !v.is_null()),
                })
            }
            None => None,
        };

        Ok(HollandTestInput {
            answers,
            respondent,
        })
    }
}

/// 主要类型
#[derive(Debug, Serialize)]
pub struct PrimaryType {
    #[serde(rename = "type")]
    pub kind: HollandType,
    pub score: u32,
}

/// 霍兰德测试响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HollandTestResponse {
    pub holland_code: String,
    pub scores: DimensionScores,
    /// 得分前三的类型
    pub primary_types: Vec<PrimaryType>,
    pub analysis: NarrativeResult,
    pub analysis_time: DateTime<Utc>,
}

impl From<InventoryReport> for HollandTestResponse {
    fn from(report: InventoryReport) -> Self {
        Self {
            primary_types: report
                .profile
                .top_three_types
                .iter()
                .map(|t| PrimaryType {
                    kind: t.kind,
                    score: t.score,
                })
                .collect(),
            holland_code: report.profile.holland_code,
            scores: report.scores,
            analysis: report.analysis,
            analysis_time: Utc::now(),
        }
    }
}
