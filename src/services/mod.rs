//! 服务模块

pub mod aggregator;
pub mod chart;
pub mod fallback;
pub mod narrative;
pub mod prompts;
pub mod scorer;

pub use aggregator::{AnalysisAggregator, ChartSource, CombinedInput, PipelineStage, SuppliedChart};
pub use chart::{ChartProvider, DisabledChartProvider, HttpChartProvider, create_chart_provider};
pub use narrative::{
    DeepSeekClient, DisabledNarrativeClient, NarrativeClient, NarrativeOutcome, create_narrative_client,
};
