//! AI Commands
//!
//! 단어 사용법 설명 API.
//! - 설명 종류는 `what` 헤더 또는 `?what=` 쿼리로 지정 (헤더 우선)

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use super::{AppState, MessageResponse};
use crate::error::{ApiError, ApiResult, VocabError};

#[derive(Debug, Deserialize)]
pub struct AnnotationQuery {
    pub what: Option<String>,
}

fn kind_selector(headers: &HeaderMap, query: &AnnotationQuery) -> Result<String, ApiError> {
    let from_header = headers
        .get("what")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    from_header
        .map(str::to_string)
        .or_else(|| query.what.clone())
        .ok_or_else(|| {
            ApiError::from(VocabError::InvalidArgument(
                "annotation kind is required (`what` header or query)".to_string(),
            ))
        })
}

/// AI 설명 조회 (캐시 미스 시 생성 후 저장)
pub async fn get_annotation(
    State(state): State<AppState>,
    Path(word): Path<String>,
    Query(query): Query<AnnotationQuery>,
    headers: HeaderMap,
) -> ApiResult<Json<MessageResponse>> {
    let kind = kind_selector(&headers, &query)?;
    let explanation = state
        .vocab
        .annotate(&word, &kind)
        .await
        .map_err(|e| ApiError::from(e).during("annotate"))?;
    Ok(Json(MessageResponse::new(explanation)))
}
