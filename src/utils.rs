use std::sync::atomic::{AtomicI64, Ordering};

use crate::error::{VocabError, VocabResult};

static LAST_MILLIS: AtomicI64 = AtomicI64::new(0);

/// 조회 키 정규화 (앞뒤 공백 제거 + 소문자화)
/// - 대소문자만 다른 두 요청은 같은 항목을 가리켜야 합니다.
pub fn normalize_word(raw: &str) -> VocabResult<String> {
    let word = raw.trim().to_lowercase();
    if word.is_empty() {
        return Err(VocabError::InvalidArgument("word must not be empty".to_string()));
    }
    Ok(word)
}

/// 현재 시각(ms). 시스템 시계가 뒤로 가더라도 이전 값보다 작아지지 않습니다.
pub fn now_millis() -> i64 {
    let wall = chrono::Utc::now().timestamp_millis();
    let prev = LAST_MILLIS.fetch_max(wall, Ordering::SeqCst);
    wall.max(prev)
}
