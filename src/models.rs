//! Wordbook Data Models
//!
//! 프론트엔드(JSON)와 매핑되는 Rust 데이터 모델

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 사전 항목 하나의 의미 정보 (품사별)
///
/// `fl`(품사)과 `shortdef`(짧은 정의) 외 필드는 `extra`에 그대로 보존됩니다.
/// (프론트엔드가 `meta.stems`, `def` 등을 직접 사용)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sense {
    // 첫 번째 이후 항목은 fl이 빠진 채로 오기도 함. 없던 필드는 저장 시에도 쓰지 않음
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortdef: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// 단어장 항목
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub word: String,
    pub definition: Vec<Sense>,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

/// 휴지통 항목 (삭제된 단어의 사본)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecycleEntry {
    pub id: i64,
    pub word: String,
    pub definition: Vec<Sense>,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    #[serde(rename = "deletedAt")]
    pub deleted_at: i64,
}

/// AI 설명 캐시 항목
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub word: String,
    pub kind: String,
    pub explanation: String,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}
