use axum::{Json, extract::State};
use tracing::{debug, warn};

use crate::{
    api::{
        app_state::AppState,
        dto::{ApiResponse, COMBINED_SUCCESS_MESSAGE, CombinedAnalysisRequest},
        extract::ApiJson,
    },
    error::AppError,
    models::envelope::AnalysisEnvelope,
    security::Validatable,
    services::aggregator::ChartSource,
};

pub async fn combined_analysis(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CombinedAnalysisRequest>,
) -> Result<Json<ApiResponse<AnalysisEnvelope>>, AppError> {
    let input = request.validate().map_err(|e| {
        warn!(field = e.field(), error = %e, "combined analysis rejected");
        e
    })?;
    debug!(
        supplied_chart = matches!(input.chart, ChartSource::Supplied(_)),
        "combined analysis accepted"
    );

    let envelope = state.aggregator.analyze_combined(input).await;

    Ok(Json(ApiResponse::with_message(
        envelope,
        COMBINED_SUCCESS_MESSAGE,
    )))
}
