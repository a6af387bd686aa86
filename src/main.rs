use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};
use zhixiang::api::{self, app_state::AppState};
use zhixiang::config::loader::ConfigLoader;
use zhixiang::observability::{
    AppMetrics, HealthCheckResult, ObservabilityState, create_observability_router, init_tracing,
};
use zhixiang::services::{AnalysisAggregator, create_chart_provider, create_narrative_client};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load().context("failed to load configuration")?;
    ConfigLoader::validate(&config).context("invalid configuration")?;

    let _log_guard = init_tracing(&config.logging)?;
    info!(
        app = %config.app_name,
        environment = %config.environment,
        "Starting Zhixiang..."
    );

    let charts = create_chart_provider(&config.chart)?;
    info!(backend = %config.chart.backend, "Chart provider initialized");

    let narrator = create_narrative_client(&config.narrative)?;
    let narrative_configured = config.narrative.api_key().is_some();
    if narrative_configured {
        info!(model = %config.narrative.model, "Narrative client initialized");
    } else {
        warn!("No narrative API key configured, all analyses will use templates");
    }

    let metrics = Arc::new(AppMetrics::default());
    let aggregator = AnalysisAggregator::new(
        charts,
        narrator,
        metrics.clone(),
        config.chart.locale.clone(),
    )
    .with_pipeline_budget(config.narrative.pipeline_budget());
    let app_state = AppState::new(
        aggregator,
        metrics.clone(),
        !config.is_production(),
        config.server.max_request_size,
    );
    info!("Application state created");

    // 创建可观测性状态并集成路由
    let observability_state = Arc::new(ObservabilityState::with_metrics(
        env!("CARGO_PKG_VERSION").to_string(),
        metrics,
    ));
    observability_state
        .add_health_check(HealthCheckResult {
            name: "narrative".to_string(),
            healthy: narrative_configured,
            message: if narrative_configured {
                format!("{} via {}", config.narrative.model, config.narrative.base_url)
            } else {
                "not configured, using templates".to_string()
            },
            latency_ms: 0,
        })
        .await;
    observability_state
        .add_health_check(HealthCheckResult {
            name: "chart".to_string(),
            healthy: config.chart.backend != "disabled",
            message: format!("backend: {}", config.chart.backend),
            latency_ms: 0,
        })
        .await;

    let api_router = api::create_router(app_state);
    let router = create_observability_router(observability_state).merge(api_router);
    info!("API router created with observability endpoints");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
