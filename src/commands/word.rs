//! Word Commands
//!
//! 단어 조회/추가/삭제/목록 API

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use super::{AppState, MessageResponse};
use crate::error::{ApiError, ApiResult};
use crate::models::{Entry, Sense};
use crate::pipeline::AddOutcome;

#[derive(Debug, Serialize)]
pub struct NewWordResponse {
    pub message: &'static str,
    pub word: String,
    pub definition: Vec<Sense>,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

#[derive(Debug, Serialize)]
pub struct DuplicateResponse {
    pub message: &'static str,
    pub word: String,
    #[serde(rename = "createdAt")]
    pub created_at: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SpellCheckResponse {
    pub message: &'static str,
    pub suggestions: Vec<String>,
}

/// 저장된 단어 조회 (외부 사전 호출 없음)
pub async fn get_word(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> ApiResult<Response> {
    let entry = state
        .vocab
        .get_word(&word)
        .map_err(|e| ApiError::from(e).during("get_word"))?;

    Ok(match entry {
        Some(entry) => Json(entry).into_response(),
        None => (StatusCode::NOT_FOUND, Json(MessageResponse::new("not_found"))).into_response(),
    })
}

/// 단어 추가 (없으면 사전 조회 후 저장)
pub async fn add_word(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> ApiResult<Response> {
    let outcome = state
        .vocab
        .add_word(&word)
        .await
        .map_err(|e| ApiError::from(e).during("add_word"))?;

    Ok(match outcome {
        AddOutcome::New(entry) => Json(NewWordResponse {
            message: "new",
            word: entry.word,
            definition: entry.definition,
            created_at: entry.created_at,
        })
        .into_response(),
        AddOutcome::Duplicate { word, created_at } => (
            StatusCode::CONFLICT,
            Json(DuplicateResponse {
                message: "duplicate",
                word,
                created_at,
            }),
        )
            .into_response(),
        AddOutcome::SpellCheck(suggestions) => (
            StatusCode::NOT_FOUND,
            Json(SpellCheckResponse {
                message: "spell_check",
                suggestions,
            }),
        )
            .into_response(),
    })
}

/// 단어 삭제 (멱등)
pub async fn delete_word(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .vocab
        .delete_word(&word)
        .map_err(|e| ApiError::from(e).during("delete_word"))?;
    Ok(Json(MessageResponse::new("success")))
}

/// 전체 단어 목록
pub async fn list_words(State(state): State<AppState>) -> ApiResult<Json<Vec<Entry>>> {
    let entries = state
        .vocab
        .list_words()
        .map_err(|e| ApiError::from(e).during("list_words"))?;
    Ok(Json(entries))
}
