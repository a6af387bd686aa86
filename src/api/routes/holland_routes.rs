//! 霍兰德测试路由

use crate::api::handlers::{method_not_allowed, holland_test};
use crate::security::middleware::handle_options_preflight;
use axum::{Router, routing::post};

use crate::api::app_state::AppState;

/// 创建霍兰德测试路由器
pub fn create_holland_router() -> Router<AppState> {
    Router::new().route(
        "/holland-test",
        post(holland_test)
            .options(handle_options_preflight)
            .fallback(method_not_allowed),
    )
}
