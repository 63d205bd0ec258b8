//! Database Schema
//!
//! SQLite 테이블 스키마 정의

/// 데이터베이스 스키마 생성 SQL
pub const CREATE_SCHEMA: &str = r#"
-- 단어장 테이블 (정규화된 단어 1개당 1행)
CREATE TABLE IF NOT EXISTS words (
    word TEXT PRIMARY KEY,
    definition TEXT NOT NULL,  -- JSON Array (Sense[])
    created_at INTEGER NOT NULL
);

-- 휴지통 테이블 (같은 단어를 여러 번 삭제해도 충돌하지 않도록 대리키 사용)
CREATE TABLE IF NOT EXISTS recycle_bin (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    word TEXT NOT NULL,
    definition TEXT NOT NULL,  -- JSON Array (Sense[])
    created_at INTEGER NOT NULL,
    deleted_at INTEGER NOT NULL
);

-- 휴지통 인덱스
CREATE INDEX IF NOT EXISTS idx_recycle_word ON recycle_bin(word);
CREATE INDEX IF NOT EXISTS idx_recycle_deleted ON recycle_bin(deleted_at);

-- AI 설명 캐시 테이블
CREATE TABLE IF NOT EXISTS annotations (
    word TEXT NOT NULL,
    kind TEXT NOT NULL,
    explanation TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    PRIMARY KEY (word, kind)
);
"#;
