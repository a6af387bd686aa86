use axum::{Json, extract::State};
use tracing::{debug, warn};

use crate::{
    api::{
        app_state::AppState,
        dto::{ApiResponse, HollandTestRequest, HollandTestResponse},
        extract::ApiJson,
    },
    error::AppError,
    security::Validatable,
};

pub async fn holland_test(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<HollandTestRequest>,
) -> Result<Json<ApiResponse<HollandTestResponse>>, AppError> {
    let input = request.validate().map_err(|e| {
        warn!(field = e.field(), error = %e, "holland test rejected");
        e
    })?;
    debug!(
        has_respondent = input.respondent.is_some(),
        "holland test accepted"
    );

    let report = state
        .aggregator
        .analyze_inventory(&input.answers, input.respondent.as_ref())
        .await;

    Ok(Json(ApiResponse::ok(report.into())))
}
