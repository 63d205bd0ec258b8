//! Configuration
//!
//! 환경 변수 기반 서버 설정. (.env.local / .env 는 lib.rs 에서 먼저 로드)

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::ai;
use crate::error::{VocabError, VocabResult};

/// 서버 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub dict_key: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub db_path: PathBuf,
    pub addr: SocketAddr,
    pub static_dir: PathBuf,
    pub http_timeout: Duration,
}

/// 비어 있지 않은 환경 변수 값
fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AppConfig {
    /// 환경 변수에서 설정 로드. DICT_KEY 가 없으면 기동 실패.
    pub fn from_env() -> VocabResult<Self> {
        Self::from_lookup(env_non_empty)
    }

    /// 키 조회 함수를 주입받아 설정 구성 (테스트에서 환경 변수 오염 방지)
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> VocabResult<Self> {
        let dict_key = get("DICT_KEY").ok_or_else(|| {
            VocabError::Configuration(
                "Dictionary API key is missing. Please set DICT_KEY in .env.local".to_string(),
            )
        })?;

        let addr_str = get("WORDBOOK_ADDR").unwrap_or_else(|| "127.0.0.1:12300".to_string());
        let addr = addr_str.parse::<SocketAddr>().map_err(|e| {
            VocabError::Configuration(format!("Invalid WORDBOOK_ADDR '{}': {}", addr_str, e))
        })?;

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(v) => v.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                VocabError::Configuration(format!("Invalid HTTP_TIMEOUT_SECS '{}': {}", v, e))
            })?,
            None => Duration::from_secs(20),
        };

        Ok(Self {
            dict_key,
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| ai::DEFAULT_MODEL.to_string()),
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| ai::DEFAULT_BASE_URL.to_string()),
            db_path: get("WORDBOOK_DB").map(PathBuf::from).unwrap_or_else(|| "words.db".into()),
            addr,
            static_dir: get("STATIC_DIR").map(PathBuf::from).unwrap_or_else(|| "public".into()),
            http_timeout,
        })
    }
}
