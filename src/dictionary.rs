//! Dictionary Provider
//!
//! Merriam-Webster Collegiate API 호출 및 응답 분류.
//! - 응답에는 "찾음" 플래그가 없으므로 첫 원소의 품사(`fl`) 필드 유무로 판별합니다.

use std::time::Duration;

use serde_json::Value;

use crate::error::{VocabError, VocabResult};
use crate::models::Sense;

pub const DICT_URL: &str = "https://www.dictionaryapi.com/api/v3/references/collegiate/json/";

/// 사전 조회 결과 분류
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// 정확히 일치하는 단어 (품사별 의미 목록)
    Senses(Vec<Sense>),
    /// 철자 후보 목록
    Suggestions(Vec<String>),
}

/// 사전 제공자 인터페이스
#[async_trait::async_trait]
pub trait DictionaryProvider: Send + Sync {
    /// 정규화된 단어로 사전 조회
    async fn lookup(&self, word: &str) -> VocabResult<Lookup>;
}

/// 원본 JSON 배열을 Senses / Suggestions 로 분류
pub fn classify(payload: Value) -> VocabResult<Lookup> {
    let Value::Array(items) = payload else {
        return Err(VocabError::Provider(
            "Dictionary response is not a JSON array".to_string(),
        ));
    };

    let has_part_of_speech = items
        .first()
        .and_then(Value::as_object)
        .is_some_and(|obj| obj.contains_key("fl"));

    if has_part_of_speech {
        let senses: Vec<Sense> = serde_json::from_value(Value::Array(items)).map_err(|e| {
            VocabError::Provider(format!("Failed to parse dictionary senses: {}", e))
        })?;
        Ok(Lookup::Senses(senses))
    } else if items.first().is_some_and(Value::is_object) {
        // fl 없는 객체(cxs 교차 참조 등)는 정확한 일치가 아님 → 후보 없는 철자 확인
        tracing::warn!(first = %items[0], "dictionary entry without part of speech");
        Ok(Lookup::Suggestions(Vec::new()))
    } else {
        let suggestions: Vec<String> = serde_json::from_value(Value::Array(items)).map_err(|e| {
            VocabError::Provider(format!("Failed to parse dictionary suggestions: {}", e))
        })?;
        Ok(Lookup::Suggestions(suggestions))
    }
}

/// Merriam-Webster HTTP 클라이언트
pub struct MerriamWebster {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl MerriamWebster {
    pub fn new(api_key: String, timeout: Duration) -> VocabResult<Self> {
        Self::with_base_url(DICT_URL.to_string(), api_key, timeout)
    }

    pub fn with_base_url(base_url: String, api_key: String, timeout: Duration) -> VocabResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| VocabError::Provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }
}

#[async_trait::async_trait]
impl DictionaryProvider for MerriamWebster {
    async fn lookup(&self, word: &str) -> VocabResult<Lookup> {
        let url = format!("{}{}", self.base_url, urlencoding::encode(word));
        tracing::debug!(word, "querying dictionary");

        let resp = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| VocabError::Provider(format!("Dictionary request failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(VocabError::Provider(format!(
                "Dictionary API error: {} {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let payload: Value = resp.json().await.map_err(|e| {
            VocabError::Provider(format!("Failed to parse dictionary response: {}", e))
        })?;

        classify(payload)
    }
}
