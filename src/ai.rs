//! AI Provider
//!
//! 단어 사용법 설명(JSON)을 OpenAI 호환 Chat Completions API로 생성합니다.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{VocabError, VocabResult};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// 설명 종류 (현재는 사용법 가이드 하나만 지원)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    HowToUse,
}

impl AnnotationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKind::HowToUse => "HowToUse",
        }
    }

    /// 시스템 프롬프트
    pub fn system_prompt(&self) -> &'static str {
        match self {
            AnnotationKind::HowToUse => HOW_TO_USE_SYSTEM_PROMPT,
        }
    }

    /// 사용자 프롬프트
    pub fn user_prompt(&self, word: &str) -> String {
        match self {
            AnnotationKind::HowToUse => format!(
                "Explain how to use the English word \"{}\". Respond with a JSON object only.",
                word
            ),
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnnotationKind {
    type Err = VocabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "howtouse" | "how_to_use" | "usage" => Ok(AnnotationKind::HowToUse),
            other => Err(VocabError::InvalidArgument(format!(
                "Unknown annotation kind: {}",
                other
            ))),
        }
    }
}

const HOW_TO_USE_SYSTEM_PROMPT: &str = r#"You are an English vocabulary tutor for Korean learners.
Answer with a single JSON object that matches this schema exactly:
{
  "synonyms": string[],        // required
  "antonyms": string[],        // required
  "context": string[],         // required, 2-3 example sentences
  "idioms": string[],          // optional, common idioms or phrases
  "meaning_ko": string,        // required, meaning in Korean
  "tips": string               // required, usage tips and common mistakes
}
Do not wrap the JSON in markdown."#;

/// AI 제공자 인터페이스
#[async_trait::async_trait]
pub trait AiProvider: Send + Sync {
    /// 설명 생성. 응답 본문(텍스트)을 그대로 반환
    async fn explain(&self, word: &str, kind: AnnotationKind) -> VocabResult<String>;
}

/// OpenAI 호환 클라이언트
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String, base_url: String, timeout: Duration) -> VocabResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| VocabError::Provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[async_trait::async_trait]
impl AiProvider for OpenAiClient {
    async fn explain(&self, word: &str, kind: AnnotationKind) -> VocabResult<String> {
        let body = serde_json::json!({
            "model": &self.model,
            "messages": [
                {"role": "system", "content": kind.system_prompt()},
                {"role": "user", "content": kind.user_prompt(word)}
            ],
            "response_format": {"type": "json_object"}
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VocabError::Provider(format!("AI request failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(VocabError::Provider(format!(
                "AI API error {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let data: CompletionResponse = resp
            .json()
            .await
            .map_err(|e| VocabError::Provider(format!("Failed to parse AI response: {}", e)))?;

        data.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| VocabError::Provider("AI returned no content".to_string()))
    }
}
