//! 综合分析路由

use crate::api::handlers::{method_not_allowed, combined_analysis};
use crate::security::middleware::handle_options_preflight;
use axum::{Router, routing::post};

use crate::api::app_state::AppState;

/// 创建综合分析路由器
pub fn create_combined_router() -> Router<AppState> {
    Router::new().route(
        "/combined-analysis",
        post(combined_analysis)
            .options(handle_options_preflight)
            .fallback(method_not_allowed),
    )
}
