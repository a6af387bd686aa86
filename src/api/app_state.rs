use crate::observability::AppMetrics;
use crate::services::aggregator::AnalysisAggregator;
use std::sync::Arc;

/// Application state shared by all analysis handlers
#[derive(Clone)]
pub struct AppState {
    /// Analysis pipeline
    pub aggregator: Arc<AnalysisAggregator>,
    /// Counters shared with the observability endpoints
    pub metrics: Arc<AppMetrics>,
    /// Attach panic diagnostics to 500 responses
    pub expose_diagnostics: bool,
    /// Request body limit in bytes
    pub max_request_size: usize,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("aggregator", &"Arc<AnalysisAggregator>")
            .field("metrics", &"Arc<AppMetrics>")
            .field("expose_diagnostics", &self.expose_diagnostics)
            .field("max_request_size", &self.max_request_size)
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(
        aggregator: AnalysisAggregator,
        metrics: Arc<AppMetrics>,
        expose_diagnostics: bool,
        max_request_size: usize,
    ) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            metrics,
            expose_diagnostics,
            max_request_size,
        }
    }
}
