//! API 模块
//!
//! 提供 REST API 支持。

pub mod app_state;
pub mod dto;
pub mod extract;
pub mod handlers;
pub mod routes;

use crate::api::app_state::AppState;
use crate::error::ErrorResponse;
use crate::observability::metrics_middleware;
use crate::security::middleware::{cors_middleware, security_headers_middleware};
use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::any::Any;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::holland_routes::create_holland_router())
        .merge(routes::ziwei_routes::create_ziwei_router())
        .merge(routes::combined_routes::create_combined_router());

    let expose_diagnostics = app_state.expose_diagnostics;

    Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(app_state.max_request_size))
        .layer(CatchPanicLayer::custom(move |panic| {
            panic_response(panic, expose_diagnostics)
        }))
        .layer(axum::middleware::from_fn_with_state(
            app_state.metrics.clone(),
            metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        // Add security headers middleware to all routes
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(cors_middleware))
        .with_state(app_state)
}

/// 处理程序 panic 时的 500 响应
fn panic_response(panic: Box<dyn Any + Send + 'static>, expose_diagnostics: bool) -> Response {
    let details = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %details, "analysis handler panicked");

    let mut body = ErrorResponse::new("分析失败: 服务器内部错误");
    if expose_diagnostics {
        body = body.with_diagnostics(&details);
    }
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
