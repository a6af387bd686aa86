//! 紫微分析路由

use crate::api::handlers::{method_not_allowed, ziwei_analysis};
use crate::security::middleware::handle_options_preflight;
use axum::{Router, routing::post};

use crate::api::app_state::AppState;

/// 创建紫微分析路由器
pub fn create_ziwei_router() -> Router<AppState> {
    Router::new().route(
        "/ziwei-analysis",
        post(ziwei_analysis)
            .options(handle_options_preflight)
            .fallback(method_not_allowed),
    )
}
