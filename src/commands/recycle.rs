//! Recycle Bin Commands
//!
//! 휴지통 조회 (읽기 전용)

use axum::extract::State;
use axum::Json;

use super::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::RecycleEntry;

/// 휴지통 목록 (최근 삭제 순)
pub async fn list_recycled(State(state): State<AppState>) -> ApiResult<Json<Vec<RecycleEntry>>> {
    let rows = state
        .vocab
        .list_recycled()
        .map_err(|e| ApiError::from(e).during("list_recycled"))?;
    Ok(Json(rows))
}
