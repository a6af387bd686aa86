//! 综合分析 DTO

use serde::Deserialize;
use serde_json::Value;

use crate::api::dto::ziwei_dto::BirthFields;
use crate::models::chart::{ChartRecord, DEFAULT_NAME, Palaces, UserInfo};
use crate::models::inventory::InventoryAnswer;
use crate::models::narrative::NarrativeResult;
use crate::security::validation::{Validatable, ValidationResult};
use crate::services::aggregator::{ChartSource, CombinedInput, SuppliedChart};

pub const COMBINED_SUCCESS_MESSAGE: &str = "紫微斗数与霍兰德测试综合分析完成";

/// 综合分析请求
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedAnalysisRequest {
    #[serde(flatten)]
    pub birth: BirthFields,
    #[serde(default)]
    pub holland_answers: Option<Value>,
    /// 前端已有的紫微分析结果
    #[serde(default)]
    pub ziwei_analysis: Option<SuppliedZiweiAnalysis>,
}

/// 调用方提供的紫微分析
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuppliedZiweiAnalysis {
    pub user_info: UserInfo,
    pub palaces: Palaces,
    pub deepseek_analysis: Option<Value>,
}

impl SuppliedZiweiAnalysis {
    fn into_supplied_chart(self) -> SuppliedChart {
        SuppliedChart {
            chart: ChartRecord {
                user_info: self.user_info,
                palaces: self.palaces,
                degraded_palaces: Vec::new(),
                placeholder: false,
            },
            narrative: self.deepseek_analysis.and_then(supplied_narrative),
        }
    }
}

/// 读取附带的命盘分析
///
/// 接受本服务输出的格式，也接受只带 `content`/`text` 的旧格式；
/// 旧格式中 `type` 为 `default`/`fallback` 的视为模板文本。
fn supplied_narrative(value: Value) -> Option<NarrativeResult> {
    if let Ok(result) = serde_json::from_value::<NarrativeResult>(value.clone()) {
        return Some(result).filter(|r| !r.text().trim().is_empty());
    }

    let text = ["content", "text"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|t| !t.is_empty())?
        .to_string();

    match value.get("type").and_then(Value::as_str) {
        Some("default") | Some("fallback") => Some(NarrativeResult::fallback(text)),
        _ => {
            let model = value
                .get("model")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string();
            Some(NarrativeResult::external(text, model, None))
        }
    }
}

impl Validatable for CombinedAnalysisRequest {
    type Validated = CombinedInput;

    /// 命盘由调用方提供时不要求出生信息
    fn validate(self) -> ValidationResult<CombinedInput> {
        let answers = InventoryAnswer::from_json("hollandAnswers", self.holland_answers.as_ref())?;

        match self.ziwei_analysis {
            Some(supplied) => {
                let requested = self.birth.name()?;
                let name = if self.birth.name.as_deref().is_some_and(|n| !n.trim().is_empty()) {
                    requested
                } else if !supplied.user_info.name.trim().is_empty() {
                    supplied.user_info.name.clone()
                } else {
                    DEFAULT_NAME.to_string()
                };
                Ok(CombinedInput {
                    name,
                    answers,
                    chart: ChartSource::Supplied(supplied.into_supplied_chart()),
                })
            }
            None => {
                let subject = self.birth.validate()?;
                Ok(CombinedInput {
                    name: subject.name.clone(),
                    answers,
                    chart: ChartSource::Compute(subject),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::validation::ValidationError;
    use serde_json::json;

    fn request(value: Value) -> CombinedAnalysisRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_answers_checked_before_birth_data() {
        let err = request(json!({"hollandAnswers": [1, 2]}))
            .validate()
            .unwrap_err();
        assert!(matches!(err, ValidationError::AnswerCount { got: 2, .. }));
    }

    #[test]
    fn test_birth_data_required_without_supplied_chart() {
        let err = request(json!({"hollandAnswers": vec![0; 24]}))
            .validate()
            .unwrap_err();
        assert_eq!(err.field(), "gender");

        let input = request(json!({
            "name": "周八",
            "gender": "female",
            "birthYear": 2007,
            "birthMonth": 1,
            "birthDay": 1,
            "birthHour": 0,
            "hollandAnswers": vec![0; 24]
        }))
        .validate()
        .unwrap();
        assert_eq!(input.name, "周八");
        assert!(matches!(input.chart, ChartSource::Compute(_)));
    }

    #[test]
    fn test_supplied_chart_skips_birth_data() {
        let input = request(json!({
            "hollandAnswers": vec![1; 24],
            "ziweiAnalysis": {
                "userInfo": {"name": "吴九", "soul": "文曲"},
                "palaces": {"命宫": {"name": "命宫", "position": "午", "majorStars": [], "minorStars": []}},
                "deepseekAnalysis": {"type": "deepseek_api", "content": "旧版分析", "model": "deepseek-chat"}
            }
        }))
        .validate()
        .unwrap();

        assert_eq!(input.name, "吴九");
        let ChartSource::Supplied(supplied) = input.chart else {
            panic!("expected supplied chart");
        };
        assert_eq!(supplied.chart.user_info.soul, "文曲");
        assert_eq!(supplied.chart.palaces.len(), 12);
        let narrative = supplied.narrative.unwrap();
        assert!(!narrative.is_fallback());
        assert_eq!(narrative.text(), "旧版分析");
    }

    #[test]
    fn test_supplied_narrative_formats() {
        let current = supplied_narrative(json!({
            "source": "fallback",
            "text": "模板",
            "timestamp": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(current.is_fallback());

        let legacy_default =
            supplied_narrative(json!({"type": "default", "content": "默认分析"})).unwrap();
        assert!(legacy_default.is_fallback());

        assert!(supplied_narrative(json!({"content": ""})).is_none());
        assert!(supplied_narrative(json!(null)).is_none());
    }
}
