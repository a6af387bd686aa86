//! 紫微分析 DTO

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::chart::{
    BirthData, ChartSubject, DEFAULT_LOCATION, DEFAULT_NAME, Gender, Palaces, UserInfo,
};
use crate::models::envelope::ChartReport;
use crate::models::narrative::NarrativeResult;
use crate::security::validation::{Validatable, ValidationError, ValidationResult, validators};

pub const MIN_BIRTH_YEAR: i64 = 1900;
pub const MAX_BIRTH_YEAR: i64 = 2100;

/// 出生信息
///
/// 紫微分析与综合分析共用。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BirthFields {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i64>,
    pub birth_month: Option<i64>,
    pub birth_day: Option<i64>,
    /// 0 点是合法值
    pub birth_hour: Option<i64>,
    pub birth_minute: Option<i64>,
    pub location: Option<String>,
}

impl BirthFields {
    /// 昵称，缺省为“用户”
    pub fn name(&self) -> ValidationResult<String> {
        validators::text_or_default("name", self.name.as_deref(), DEFAULT_NAME)
    }
}

impl Validatable for BirthFields {
    type Validated = ChartSubject;

    fn validate(self) -> ValidationResult<ChartSubject> {
        let name = self.name()?;

        let gender_raw = self
            .gender
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .ok_or_else(|| ValidationError::MissingField {
                field: "gender".into(),
            })?;
        let gender = Gender::parse(gender_raw).ok_or_else(|| ValidationError::InvalidGender {
            value: gender_raw.to_string(),
        })?;

        let year = validators::required_in_range(
            "birthYear",
            self.birth_year,
            MIN_BIRTH_YEAR,
            MAX_BIRTH_YEAR,
        )?;
        let month = validators::required_in_range("birthMonth", self.birth_month, 1, 12)?;
        let day = validators::required_in_range("birthDay", self.birth_day, 1, 31)?;
        let hour = validators::required_in_range("birthHour", self.birth_hour, 0, 23)?;
        let minute = validators::in_range("birthMinute", self.birth_minute.unwrap_or(0), 0, 59)?;

        let (year, month, day) = (year as i32, month as u32, day as u32);
        if NaiveDate::from_ymd_opt(year, month, day).is_none() {
            return Err(ValidationError::InvalidDate { year, month, day });
        }

        let location =
            validators::text_or_default("location", self.location.as_deref(), DEFAULT_LOCATION)?;

        Ok(ChartSubject {
            name,
            gender,
            birth: BirthData {
                year,
                month,
                day,
                hour: hour as u32,
                minute: minute as u32,
            },
            location,
        })
    }
}

/// 紫微分析响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZiweiAnalysisResponse {
    pub user_info: UserInfo,
    pub palaces: Palaces,
    pub deepseek_analysis: NarrativeResult,
    pub analysis_time: DateTime<Utc>,
}

impl From<ChartReport> for ZiweiAnalysisResponse {
    fn from(report: ChartReport) -> Self {
        Self {
            user_info: report.chart.user_info,
            palaces: report.chart.palaces,
            deepseek_analysis: report.analysis,
            analysis_time: Utc::now(),
        }
    }
}
