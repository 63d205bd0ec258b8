//! Wordbook - 개인 단어장 서버 라이브러리
//!
//! 사전 조회 결과를 SQLite에 저장하고, 브라우저 UI에 HTTP API로 제공합니다.

pub mod ai;
pub mod commands;
pub mod config;
pub mod db;
pub mod dictionary;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod utils;

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::ai::{AiProvider, OpenAiClient};
use crate::commands::AppState;
use crate::config::AppConfig;
use crate::dictionary::MerriamWebster;
use crate::error::VocabError;
use crate::pipeline::Vocabulary;

fn find_upwards(start: PathBuf, filename: &str, max_hops: usize) -> Option<PathBuf> {
    let mut cur = start;
    for _ in 0..=max_hops {
        let candidate = cur.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }
        if !cur.pop() {
            break;
        }
    }
    None
}

/// .env.local → .env 순서로 로드. 파일이 없으면 무시하고, 파싱 실패만 에러로 반환.
/// (tracing 초기화 전에 호출되므로 로그는 호출자가 남김)
pub fn load_env() -> Result<(), dotenvy::Error> {
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(p) = find_upwards(cwd, ".env.local", 4) {
            dotenvy::from_path(&p)?;
        }
    }
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e),
    }
}

/// tracing 초기화 (RUST_LOG 우선)
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wordbook=info,wordbook_lib=info,tower_http=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 설정으로부터 애플리케이션 상태 구성
pub fn build_state(config: &AppConfig) -> Result<AppState, VocabError> {
    if let Some(parent) = config.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db = db::Database::new(&config.db_path)?;
    db.initialize()?;

    let dictionary = MerriamWebster::new(config.dict_key.clone(), config.http_timeout)?;

    let ai: Option<Arc<dyn AiProvider>> = match &config.openai_api_key {
        Some(key) => Some(Arc::new(OpenAiClient::new(
            key.clone(),
            config.openai_model.clone(),
            config.openai_base_url.clone(),
            config.http_timeout,
        )?)),
        None => {
            tracing::warn!("OPENAI_API_KEY not set; AI annotations disabled");
            None
        }
    };

    let vocab = Vocabulary::new(
        Arc::new(db::DbState::new(db)),
        Arc::new(dictionary),
        ai,
    );

    Ok(AppState {
        vocab: Arc::new(vocab),
    })
}

/// 서버 실행
pub async fn run() -> Result<(), VocabError> {
    let env_loaded = load_env();
    init_tracing();
    if let Err(e) = env_loaded {
        tracing::warn!(error = %e, "failed to load .env file");
    }

    let config = AppConfig::from_env()?;
    let state = build_state(&config)?;
    let app = commands::create_router(state, &config.static_dir);

    tracing::info!(addr = %config.addr, db = %config.db_path.display(), "starting wordbook server");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
