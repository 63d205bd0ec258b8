//! Lookup / AI Pipeline
//!
//! 단어 조회 흐름: 중복 확인 → 사전 호출 → 응답 분류 → 저장 → 응답 구성.
//! 삭제 시 휴지통 기록, AI 설명은 캐시 우선(cache-aside).
//!
//! DB 잠금은 await 지점을 넘겨 보유하지 않습니다. 외부 호출 중에는 다른 요청이 DB를 사용할 수 있습니다.

use std::sync::Arc;

use crate::ai::{AiProvider, AnnotationKind};
use crate::db::DbState;
use crate::dictionary::{DictionaryProvider, Lookup};
use crate::error::{VocabError, VocabResult};
use crate::models::{Entry, RecycleEntry};
use crate::utils::normalize_word;

/// 단어 추가 결과
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// 새로 조회되어 저장됨
    New(Entry),
    /// 이미 존재 (created_at은 경합으로 사라진 경우 None)
    Duplicate { word: String, created_at: Option<i64> },
    /// 사전에 없는 단어, 철자 후보 반환
    SpellCheck(Vec<String>),
}

/// 단어장 서비스
pub struct Vocabulary {
    db: Arc<DbState>,
    dictionary: Arc<dyn DictionaryProvider>,
    ai: Option<Arc<dyn AiProvider>>,
}

impl Vocabulary {
    pub fn new(
        db: Arc<DbState>,
        dictionary: Arc<dyn DictionaryProvider>,
        ai: Option<Arc<dyn AiProvider>>,
    ) -> Self {
        Self { db, dictionary, ai }
    }

    /// 저장된 단어 조회 (외부 호출 없음)
    pub fn get_word(&self, raw: &str) -> VocabResult<Option<Entry>> {
        let word = normalize_word(raw)?;
        self.db.lock()?.get_entry(&word)
    }

    /// 단어 추가
    pub async fn add_word(&self, raw: &str) -> VocabResult<AddOutcome> {
        let word = normalize_word(raw)?;

        if let Some(existing) = self.db.lock()?.get_entry(&word)? {
            tracing::info!(word = %word, "duplicate word");
            return Ok(AddOutcome::Duplicate {
                word,
                created_at: Some(existing.created_at),
            });
        }

        let lookup = self.dictionary.lookup(&word).await.inspect_err(|e| {
            tracing::warn!(word = %word, error = %e, "dictionary lookup failed");
        })?;

        match lookup {
            Lookup::Senses(senses) => {
                let db = self.db.lock()?;
                match db.insert_entry_if_absent(&word, &senses)? {
                    Some(entry) => {
                        tracing::info!(word = %word, senses = entry.definition.len(), "saved new word");
                        Ok(AddOutcome::New(entry))
                    }
                    None => {
                        // 외부 호출 중 다른 요청이 먼저 저장함
                        let created_at = db.get_entry(&word)?.map(|e| e.created_at);
                        tracing::info!(word = %word, "duplicate word (concurrent insert)");
                        Ok(AddOutcome::Duplicate { word, created_at })
                    }
                }
            }
            Lookup::Suggestions(suggestions) => {
                tracing::info!(word = %word, count = suggestions.len(), "spell check");
                Ok(AddOutcome::SpellCheck(suggestions))
            }
        }
    }

    /// 단어 삭제 (없어도 성공). 휴지통 기록 실패는 삭제를 막지 않습니다.
    /// 삭제된 경우 휴지통 항목을 반환 (기록 실패 시 None)
    pub fn delete_word(&self, raw: &str) -> VocabResult<Option<RecycleEntry>> {
        let word = normalize_word(raw)?;
        let db = self.db.lock()?;

        let Some(entry) = db.get_entry(&word)? else {
            tracing::debug!(word = %word, "delete: word not present");
            return Ok(None);
        };

        let archived = match db.archive_entry(&entry) {
            Ok(recycled) => Some(recycled),
            Err(e) => {
                tracing::warn!(word = %word, error = %e, "failed to archive deleted word");
                None
            }
        };

        let removed = db.remove_entry(&word)?;
        tracing::info!(word = %word, removed, "deleted word");
        Ok(archived)
    }

    /// 전체 단어 목록 (삽입 순서)
    pub fn list_words(&self) -> VocabResult<Vec<Entry>> {
        self.db.lock()?.list_entries()
    }

    /// 휴지통 목록
    pub fn list_recycled(&self) -> VocabResult<Vec<RecycleEntry>> {
        self.db.lock()?.list_recycled()
    }

    /// AI 설명 조회/생성
    pub async fn annotate(&self, raw: &str, kind: &str) -> VocabResult<String> {
        let kind: AnnotationKind = kind.parse()?;
        let word = normalize_word(raw)?;

        if let Some(cached) = self.db.lock()?.get_annotation(&word, kind.as_str())? {
            tracing::debug!(word = %word, kind = %kind, "annotation cache hit");
            return Ok(cached.explanation);
        }

        let ai = self.ai.as_ref().ok_or_else(|| {
            VocabError::Configuration(
                "AI API key is missing. Please set OPENAI_API_KEY in .env.local".to_string(),
            )
        })?;

        let explanation = ai.explain(&word, kind).await.inspect_err(|e| {
            tracing::warn!(word = %word, kind = %kind, error = %e, "AI request failed");
        })?;

        let db = self.db.lock()?;
        match db.put_annotation(&word, kind.as_str(), &explanation) {
            Ok(saved) => {
                tracing::info!(word = %word, kind = %kind, "cached annotation");
                Ok(saved.explanation)
            }
            Err(VocabError::Duplicate(_)) => {
                // 동시 요청이 먼저 캐시를 채움 → 먼저 저장된 값을 사용
                match db.get_annotation(&word, kind.as_str())? {
                    Some(cached) => Ok(cached.explanation),
                    None => Ok(explanation),
                }
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use crate::db::Database;
    use crate::dictionary::classify;

    struct FakeDictionary {
        payload: serde_json::Value,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl DictionaryProvider for FakeDictionary {
        async fn lookup(&self, _word: &str) -> VocabResult<Lookup> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            classify(self.payload.clone())
        }
    }

    struct FailingDictionary;

    #[async_trait::async_trait]
    impl DictionaryProvider for FailingDictionary {
        async fn lookup(&self, _word: &str) -> VocabResult<Lookup> {
            Err(VocabError::Provider("connection refused".to_string()))
        }
    }

    /// 외부 호출 도중 다른 요청이 같은 단어를 먼저 저장하는 상황 재현
    struct RacingDictionary {
        db: Arc<DbState>,
        payload: serde_json::Value,
    }

    #[async_trait::async_trait]
    impl DictionaryProvider for RacingDictionary {
        async fn lookup(&self, word: &str) -> VocabResult<Lookup> {
            let lookup = classify(self.payload.clone())?;
            if let Lookup::Senses(senses) = &lookup {
                self.db.lock()?.put_entry(word, senses)?;
            }
            Ok(lookup)
        }
    }

    struct FakeAi {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl AiProvider for FakeAi {
        async fn explain(&self, word: &str, _kind: AnnotationKind) -> VocabResult<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{{\"tips\":\"{} #{}\"}}", word, n))
        }
    }

    fn memory_db() -> Arc<DbState> {
        let db = Database::in_memory().unwrap();
        db.initialize().unwrap();
        Arc::new(DbState::new(db))
    }

    fn cat_payload() -> serde_json::Value {
        json!([{ "fl": "noun", "shortdef": ["a small domesticated animal"] }])
    }

    fn vocab_with(payload: serde_json::Value) -> (Vocabulary, Arc<FakeDictionary>, Arc<FakeAi>) {
        let dict = Arc::new(FakeDictionary {
            payload,
            calls: AtomicUsize::new(0),
        });
        let ai = Arc::new(FakeAi {
            calls: AtomicUsize::new(0),
        });
        let vocab = Vocabulary::new(memory_db(), dict.clone(), Some(ai.clone()));
        (vocab, dict, ai)
    }

    #[tokio::test]
    async fn test_add_new_then_duplicate_without_provider_call() {
        let (vocab, dict, _) = vocab_with(cat_payload());

        let first = vocab.add_word("cat").await.unwrap();
        assert!(matches!(&first, AddOutcome::New(e) if e.word == "cat"));
        assert_eq!(dict.calls.load(Ordering::SeqCst), 1);

        let second = vocab.add_word("cat").await.unwrap();
        assert!(matches!(second, AddOutcome::Duplicate { created_at: Some(_), .. }));
        assert_eq!(dict.calls.load(Ordering::SeqCst), 1);
        assert_eq!(vocab.list_words().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_spell_check_persists_nothing() {
        let (vocab, _, _) = vocab_with(json!(["cart", "cast"]));

        let outcome = vocab.add_word("catt").await.unwrap();
        assert_eq!(
            outcome,
            AddOutcome::SpellCheck(vec!["cart".to_string(), "cast".to_string()])
        );
        assert!(vocab.list_words().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_writes_nothing() {
        let vocab = Vocabulary::new(memory_db(), Arc::new(FailingDictionary), None);

        let result = vocab.add_word("cat").await;
        assert!(matches!(result, Err(VocabError::Provider(m)) if m.contains("connection refused")));
        assert!(vocab.list_words().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_case_insensitive() {
        let (vocab, _, _) = vocab_with(cat_payload());
        vocab.add_word("Hello").await.unwrap();

        let entry = vocab.get_word("hello").unwrap().unwrap();
        assert_eq!(entry.word, "hello");
        assert_eq!(vocab.get_word("HELLO").unwrap(), Some(entry));
    }

    #[tokio::test]
    async fn test_delete_archives_verbatim() {
        let (vocab, _, _) = vocab_with(cat_payload());
        let AddOutcome::New(entry) = vocab.add_word("cat").await.unwrap() else {
            panic!("expected new");
        };

        let archived = vocab.delete_word("CAT").unwrap().unwrap();
        assert_eq!(archived.word, "cat");
        assert_eq!(archived.definition, entry.definition);
        assert_eq!(archived.created_at, entry.created_at);
        assert!(vocab.get_word("cat").unwrap().is_none());
        assert_eq!(vocab.list_recycled().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_add_downgrades_to_duplicate() {
        let db = memory_db();
        let dict = Arc::new(RacingDictionary {
            db: db.clone(),
            payload: cat_payload(),
        });
        let vocab = Vocabulary::new(db, dict, None);

        let outcome = vocab.add_word("cat").await.unwrap();
        assert!(matches!(
            outcome,
            AddOutcome::Duplicate { ref word, created_at: Some(_) } if word == "cat"
        ));
        assert_eq!(vocab.list_words().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_succeeds_when_recycle_bin_broken() {
        let (vocab, _, _) = vocab_with(cat_payload());
        vocab.add_word("cat").await.unwrap();

        vocab
            .db
            .lock()
            .unwrap()
            .execute_raw("DROP TABLE recycle_bin")
            .unwrap();

        assert!(vocab.delete_word("cat").unwrap().is_none());
        assert!(vocab.get_word("cat").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_absent_leaves_bin_untouched() {
        let (vocab, _, _) = vocab_with(cat_payload());
        assert!(vocab.delete_word("ghost").unwrap().is_none());
        assert!(vocab.list_recycled().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_readd_after_delete() {
        let (vocab, dict, _) = vocab_with(cat_payload());
        vocab.add_word("cat").await.unwrap();
        vocab.delete_word("cat").unwrap();

        let again = vocab.add_word("cat").await.unwrap();
        assert!(matches!(again, AddOutcome::New(_)));
        assert_eq!(dict.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_annotation_cached() {
        let (vocab, _, ai) = vocab_with(cat_payload());

        let first = vocab.annotate("Cat", "HowToUse").await.unwrap();
        let second = vocab.annotate("cat", "HowToUse").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(ai.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_annotation_unknown_kind() {
        let (vocab, _, ai) = vocab_with(cat_payload());

        let result = vocab.annotate("cat", "Etymology").await;
        assert!(matches!(result, Err(VocabError::InvalidArgument(_))));
        assert_eq!(ai.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_annotation_without_key() {
        let dict = Arc::new(FakeDictionary {
            payload: cat_payload(),
            calls: AtomicUsize::new(0),
        });
        let vocab = Vocabulary::new(memory_db(), dict, None);

        let result = vocab.annotate("cat", "HowToUse").await;
        assert!(matches!(result, Err(VocabError::Configuration(_))));
    }
}
