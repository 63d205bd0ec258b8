//! HTTP Commands Module
//!
//! 프론트엔드에서 호출 가능한 HTTP 엔드포인트 정의

pub mod ai;
pub mod recycle;
pub mod word;

use std::path::Path;
use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::pipeline::Vocabulary;

/// 핸들러 공유 상태
#[derive(Clone)]
pub struct AppState {
    pub vocab: Arc<Vocabulary>,
}

/// `{ "message": ... }` 형태의 단순 응답
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

async fn health_check() -> Json<MessageResponse> {
    Json(MessageResponse::new("ok"))
}

/// API 라우터 (정적 파일 제외)
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route(
            "/api/word/:word",
            get(word::get_word).put(word::add_word).delete(word::delete_word),
        )
        .route("/api/list", get(word::list_words))
        // 번들 UI(static/js/main.js)가 사용하는 접두사 없는 경로
        .route(
            "/word/:word",
            get(word::get_word).put(word::add_word).delete(word::delete_word),
        )
        .route("/list", get(word::list_words))
        .route("/api/recycle", get(recycle::list_recycled))
        .route("/api/ai/:word", get(ai::get_annotation))
        .route("/ai/:word", get(ai::get_annotation))
        .with_state(state)
}

/// 전체 라우터 (API + 정적 파일 + 미들웨어)
pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    api_router(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}
