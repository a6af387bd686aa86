use axum::{Json, extract::State};
use tracing::{debug, warn};

use crate::{
    api::{
        app_state::AppState,
        dto::{ApiResponse, BirthFields, ZiweiAnalysisResponse},
        extract::ApiJson,
    },
    error::AppError,
    security::Validatable,
};

pub async fn ziwei_analysis(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BirthFields>,
) -> Result<Json<ApiResponse<ZiweiAnalysisResponse>>, AppError> {
    let subject = request.validate().map_err(|e| {
        warn!(field = e.field(), error = %e, "ziwei analysis rejected");
        e
    })?;
    debug!(solar_date = %subject.birth.solar_date(), "ziwei analysis accepted");

    let report = state.aggregator.analyze_chart(&subject).await;

    Ok(Json(ApiResponse::ok(report.into())))
}
