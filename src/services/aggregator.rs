//! 分析聚合服务
//!
//! 把计分、排盘和两次叙述生成串成一条流水线：
//!
//! `Validated → ChartReady → ChartNarrated → InventoryScored → CombinedNarrated → Done`
//!
//! 校验在进入流水线之前完成。之后的每个阶段都有本地回退：排盘失败换占位
//! 命盘，叙述生成失败换模板文本，两个叙述阶段互不影响。结构合法的请求
//! 总能得到完整结果。
//!
//! 一次分析内的所有生成调用共用一个时间预算，后面的调用只能使用剩余部分。

use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::models::chart::{ChartRecord, ChartSubject};
use crate::models::envelope::{AnalysisEnvelope, ChartReport, InventoryReport};
use crate::models::inventory::{InventoryAnswer, Respondent};
use crate::models::narrative::NarrativeResult;
use crate::observability::AppMetrics;
use crate::services::chart::{AstrolabeQuery, ChartProvider, normalize, time_slot};
use crate::services::narrative::{
    NarrativeClient, NarrativeOutcome, NarrativeRequest, UnavailableReason,
};
use crate::services::{fallback, prompts, scorer};

/// 默认的生成时间预算，留出余量给排盘和响应序列化
pub const DEFAULT_PIPELINE_BUDGET: Duration = Duration::from_millis(9_000);

/// 流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Validated,
    ChartReady,
    ChartNarrated,
    InventoryScored,
    CombinedNarrated,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Validated => "validated",
            PipelineStage::ChartReady => "chart_ready",
            PipelineStage::ChartNarrated => "chart_narrated",
            PipelineStage::InventoryScored => "inventory_scored",
            PipelineStage::CombinedNarrated => "combined_narrated",
            PipelineStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// 调用方已有的命盘
#[derive(Debug, Clone, PartialEq)]
pub struct SuppliedChart {
    pub chart: ChartRecord,
    /// 附带的命盘分析，存在时不再调用生成服务
    pub narrative: Option<NarrativeResult>,
}

/// 命盘来源
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSource {
    Compute(ChartSubject),
    Supplied(SuppliedChart),
}

/// 综合分析输入（已校验）
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedInput {
    pub name: String,
    pub answers: InventoryAnswer,
    pub chart: ChartSource,
}

/// 分析聚合服务
pub struct AnalysisAggregator {
    charts: Arc<dyn ChartProvider>,
    narrator: Arc<dyn NarrativeClient>,
    metrics: Arc<AppMetrics>,
    locale: String,
    pipeline_budget: Duration,
}

impl AnalysisAggregator {
    pub fn new(
        charts: Arc<dyn ChartProvider>,
        narrator: Arc<dyn NarrativeClient>,
        metrics: Arc<AppMetrics>,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            charts,
            narrator,
            metrics,
            locale: locale.into(),
            pipeline_budget: DEFAULT_PIPELINE_BUDGET,
        }
    }

    pub fn with_pipeline_budget(mut self, budget: Duration) -> Self {
        self.pipeline_budget = budget;
        self
    }

    /// 单独的霍兰德测试
    pub async fn analyze_inventory(
        &self,
        answers: &InventoryAnswer,
        respondent: Option<&Respondent>,
    ) -> InventoryReport {
        let span = info_span!("analysis", request_id = %Uuid::new_v4(), endpoint = "holland-test");
        async {
            self.metrics.record_analysis();
            let deadline = Instant::now() + self.pipeline_budget;

            let scores = scorer::score(answers);
            let profile = scorer::rank(&scores);
            debug!(holland_code = %profile.holland_code, "inventory scored");

            let request = prompts::inventory_request(&scores, &profile, respondent);
            let analysis = self
                .narrate("inventory", &request, deadline, || {
                    fallback::inventory_analysis(&scores, &profile)
                })
                .await;

            info!(fallback = analysis.is_fallback(), "inventory analysis complete");
            InventoryReport {
                scores,
                profile,
                analysis,
            }
        }
        .instrument(span)
        .await
    }

    /// 单独的紫微分析
    pub async fn analyze_chart(&self, subject: &ChartSubject) -> ChartReport {
        let span = info_span!("analysis", request_id = %Uuid::new_v4(), endpoint = "ziwei-analysis");
        async {
            self.metrics.record_analysis();
            let deadline = Instant::now() + self.pipeline_budget;

            let chart = self.acquire_chart(subject).await;
            let analysis = self
                .narrate_chart(&chart, prompts::chart_request, deadline)
                .await;

            info!(
                placeholder = chart.placeholder,
                fallback = analysis.is_fallback(),
                "chart analysis complete"
            );
            ChartReport { chart, analysis }
        }
        .instrument(span)
        .await
    }

    /// 综合分析
    pub async fn analyze_combined(&self, input: CombinedInput) -> AnalysisEnvelope {
        let span =
            info_span!("analysis", request_id = %Uuid::new_v4(), endpoint = "combined-analysis");
        async move {
            self.metrics.record_analysis();
            let deadline = Instant::now() + self.pipeline_budget;
            advance(PipelineStage::Validated);

            // 计分与排盘互不依赖，并发进行
            let answers = input.answers;
            let ((chart, supplied_narrative), scores) = tokio::join!(
                self.resolve_chart(input.chart),
                async move { scorer::score(&answers) }
            );
            advance(PipelineStage::ChartReady);

            let chart_narrative = match supplied_narrative {
                Some(narrative) => {
                    debug!("reusing supplied chart narrative");
                    narrative
                }
                None => {
                    self.narrate_chart(&chart, prompts::chart_stage_request, deadline)
                        .await
                }
            };
            advance(PipelineStage::ChartNarrated);

            let profile = scorer::rank(&scores);
            advance(PipelineStage::InventoryScored);

            let request = prompts::combined_request(&chart, &chart_narrative, &profile);
            let combined_analysis = self
                .narrate("combined", &request, deadline, || {
                    fallback::combined_analysis(&input.name, &chart, &profile)
                })
                .await;
            advance(PipelineStage::CombinedNarrated);

            let envelope = AnalysisEnvelope {
                user_info: chart.user_info,
                ziwei_analysis: chart_narrative,
                holland_result: profile,
                combined_analysis,
                timestamp: Utc::now(),
            };
            advance(PipelineStage::Done);

            info!(
                holland_code = %envelope.holland_result.holland_code,
                chart_fallback = envelope.ziwei_analysis.is_fallback(),
                combined_fallback = envelope.combined_analysis.is_fallback(),
                "combined analysis complete"
            );
            envelope
        }
        .instrument(span)
        .await
    }

    async fn resolve_chart(&self, source: ChartSource) -> (ChartRecord, Option<NarrativeResult>) {
        match source {
            ChartSource::Compute(subject) => (self.acquire_chart(&subject).await, None),
            ChartSource::Supplied(supplied) => {
                debug!("using supplied chart");
                (supplied.chart, supplied.narrative)
            }
        }
    }

    /// 排盘并标准化；排盘服务不可用时返回占位命盘
    async fn acquire_chart(&self, subject: &ChartSubject) -> ChartRecord {
        let query = AstrolabeQuery {
            solar_date: subject.birth.solar_date(),
            time_index: time_slot(subject.birth.hour, subject.birth.minute),
            gender: subject.gender.token(),
            locale: self.locale.clone(),
        };

        match self.charts.astrolabe(&query).await {
            Ok(raw) => {
                let chart = normalize(&raw, subject);
                if !chart.degraded_palaces.is_empty() {
                    self.metrics
                        .record_palace_failures(chart.degraded_palaces.len());
                }
                chart
            }
            Err(e) => {
                warn!(error = %e, "chart provider unavailable, using placeholder chart");
                self.metrics.record_chart_fallback();
                ChartRecord::placeholder(subject)
            }
        }
    }

    /// 命盘叙述；占位命盘不调用生成服务
    async fn narrate_chart(
        &self,
        chart: &ChartRecord,
        build: fn(&ChartRecord) -> NarrativeRequest,
        deadline: Instant,
    ) -> NarrativeResult {
        if chart.placeholder {
            debug!("placeholder chart, skipping chart narrative");
            return NarrativeResult::fallback(fallback::CHART_UNAVAILABLE_TEXT.to_string());
        }
        let request = build(chart);
        self.narrate("chart", &request, deadline, || fallback::chart_analysis(chart))
            .await
    }

    /// 调用生成服务，不可用或超出预算时使用模板文本
    async fn narrate(
        &self,
        stage: &'static str,
        request: &NarrativeRequest,
        deadline: Instant,
        template: impl FnOnce() -> String,
    ) -> NarrativeResult {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let outcome = if remaining.is_zero() {
            NarrativeOutcome::Unavailable(UnavailableReason::Timeout(Duration::ZERO))
        } else {
            tokio::time::timeout(remaining, self.narrator.generate(request))
                .await
                .unwrap_or(NarrativeOutcome::Unavailable(UnavailableReason::Timeout(
                    remaining,
                )))
        };

        match outcome {
            NarrativeOutcome::Generated(generated) => {
                self.metrics.record_narrative(false);
                NarrativeResult::external(generated.text, generated.model, generated.usage)
            }
            NarrativeOutcome::Unavailable(reason) => {
                self.metrics.record_narrative(true);
                warn!(stage, reason = %reason, "narrative unavailable, using template");
                NarrativeResult::fallback(template())
            }
        }
    }
}

fn advance(stage: PipelineStage) {
    debug!(stage = %stage, "pipeline stage reached");
}
