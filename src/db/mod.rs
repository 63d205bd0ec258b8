//! Database Module
//!
//! SQLite 데이터베이스 관리 (단어장 / 휴지통 / AI 설명 캐시)

mod schema;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, Row};

use crate::error::{VocabError, VocabResult};
use crate::models::{Annotation, Entry, RecycleEntry, Sense};
use crate::utils::now_millis;

/// 데이터베이스 상태 (AppState를 통해 핸들러에 전달)
pub struct DbState(pub Mutex<Database>);

impl DbState {
    pub fn new(db: Database) -> Self {
        Self(Mutex::new(db))
    }

    /// 잠금 획득. await 지점을 넘겨 보유하지 말 것.
    pub fn lock(&self) -> VocabResult<MutexGuard<'_, Database>> {
        self.0
            .lock()
            .map_err(|e| VocabError::Lock(format!("Failed to acquire database lock: {}", e)))
    }
}

/// 데이터베이스 래퍼
pub struct Database {
    conn: Connection,
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<(String, String, i64)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn decode_definition(json: &str) -> VocabResult<Vec<Sense>> {
    Ok(serde_json::from_str(json)?)
}

impl Database {
    /// 새 데이터베이스 연결 생성
    pub fn new(path: &Path) -> Result<Self, VocabError> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// 메모리 DB (테스트용)
    pub fn in_memory() -> Result<Self, VocabError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// 임의 SQL 실행 (테스트에서 테이블 손상 재현용)
    #[cfg(test)]
    pub(crate) fn execute_raw(&self, sql: &str) -> VocabResult<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// 데이터베이스 스키마 초기화
    pub fn initialize(&self) -> Result<(), VocabError> {
        self.conn.execute_batch(schema::CREATE_SCHEMA)?;
        Ok(())
    }

    // ─── 단어장 ───────────────────────────────────────────

    /// 단어 조회 (없으면 None)
    pub fn get_entry(&self, word: &str) -> VocabResult<Option<Entry>> {
        let row = self
            .conn
            .query_row(
                "SELECT word, definition, created_at FROM words WHERE word = ?1",
                [word],
                entry_from_row,
            )
            .optional()?;

        match row {
            Some((word, definition, created_at)) => Ok(Some(Entry {
                word,
                definition: decode_definition(&definition)?,
                created_at,
            })),
            None => Ok(None),
        }
    }

    /// 단어 저장. 이미 존재하면 Duplicate 에러.
    pub fn put_entry(&self, word: &str, definition: &[Sense]) -> VocabResult<Entry> {
        let created_at = now_millis();
        let result = self.conn.execute(
            "INSERT INTO words (word, definition, created_at) VALUES (?1, ?2, ?3)",
            (word, serde_json::to_string(definition)?, created_at),
        );

        match result {
            Ok(_) => Ok(Entry {
                word: word.to_string(),
                definition: definition.to_vec(),
                created_at,
            }),
            Err(e) => {
                let err = VocabError::from(e);
                if err.is_constraint_violation() {
                    Err(VocabError::Duplicate(word.to_string()))
                } else {
                    Err(err)
                }
            }
        }
    }

    /// 단어가 없을 때만 저장 (원자적). 이미 있으면 None.
    pub fn insert_entry_if_absent(
        &self,
        word: &str,
        definition: &[Sense],
    ) -> VocabResult<Option<Entry>> {
        let created_at = now_millis();
        let changed = self.conn.execute(
            "INSERT INTO words (word, definition, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(word) DO NOTHING",
            (word, serde_json::to_string(definition)?, created_at),
        )?;

        if changed == 0 {
            return Ok(None);
        }
        Ok(Some(Entry {
            word: word.to_string(),
            definition: definition.to_vec(),
            created_at,
        }))
    }

    /// 단어 삭제. 삭제된 행 수 반환 (없었으면 0)
    pub fn remove_entry(&self, word: &str) -> VocabResult<usize> {
        let removed = self.conn.execute("DELETE FROM words WHERE word = ?1", [word])?;
        Ok(removed)
    }

    /// 전체 단어 목록 (삽입 순서)
    pub fn list_entries(&self) -> VocabResult<Vec<Entry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT word, definition, created_at FROM words ORDER BY rowid")?;
        let iter = stmt.query_map([], entry_from_row)?;

        let mut out = Vec::new();
        for row in iter {
            let (word, definition, created_at) = row?;
            out.push(Entry {
                word,
                definition: decode_definition(&definition)?,
                created_at,
            });
        }
        Ok(out)
    }

    // ─── 휴지통 ───────────────────────────────────────────

    /// 삭제된 항목을 휴지통에 추가 (append only)
    pub fn archive_entry(&self, entry: &Entry) -> VocabResult<RecycleEntry> {
        let deleted_at = now_millis();
        self.conn.execute(
            "INSERT INTO recycle_bin (word, definition, created_at, deleted_at)
             VALUES (?1, ?2, ?3, ?4)",
            (
                &entry.word,
                serde_json::to_string(&entry.definition)?,
                entry.created_at,
                deleted_at,
            ),
        )?;

        Ok(RecycleEntry {
            id: self.conn.last_insert_rowid(),
            word: entry.word.clone(),
            definition: entry.definition.clone(),
            created_at: entry.created_at,
            deleted_at,
        })
    }

    /// 휴지통 목록 (최근 삭제 순)
    pub fn list_recycled(&self) -> VocabResult<Vec<RecycleEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, word, definition, created_at, deleted_at
             FROM recycle_bin ORDER BY deleted_at DESC, id DESC",
        )?;
        let iter = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in iter {
            let (id, word, definition, created_at, deleted_at) = row?;
            out.push(RecycleEntry {
                id,
                word,
                definition: decode_definition(&definition)?,
                created_at,
                deleted_at,
            });
        }
        Ok(out)
    }

    // ─── AI 설명 캐시 ─────────────────────────────────────

    /// 캐시된 설명 조회
    pub fn get_annotation(&self, word: &str, kind: &str) -> VocabResult<Option<Annotation>> {
        let row = self
            .conn
            .query_row(
                "SELECT word, kind, explanation, created_at FROM annotations
                 WHERE word = ?1 AND kind = ?2",
                [word, kind],
                |row| {
                    Ok(Annotation {
                        word: row.get(0)?,
                        kind: row.get(1)?,
                        explanation: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// 설명 저장. 이미 있으면 Duplicate 에러 (호출자가 먼저 조회해야 함)
    pub fn put_annotation(
        &self,
        word: &str,
        kind: &str,
        explanation: &str,
    ) -> VocabResult<Annotation> {
        let created_at = now_millis();
        let result = self.conn.execute(
            "INSERT INTO annotations (word, kind, explanation, created_at) VALUES (?1, ?2, ?3, ?4)",
            (word, kind, explanation, created_at),
        );

        match result {
            Ok(_) => Ok(Annotation {
                word: word.to_string(),
                kind: kind.to_string(),
                explanation: explanation.to_string(),
                created_at,
            }),
            Err(e) => {
                let err = VocabError::from(e);
                if err.is_constraint_violation() {
                    Err(VocabError::Duplicate(format!("{} ({})", word, kind)))
                } else {
                    Err(err)
                }
            }
        }
    }
}
