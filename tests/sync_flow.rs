//! End-to-end orchestrator tests against an in-memory content store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use leetsync::error::{RepositoryError, SyncError};
use leetsync::github::{ContentStore, RemoteFile, create_or_update_file};
use leetsync::index::{INDEX_PATH, IndexEntry};
use leetsync::model::SolutionSubmission;
use leetsync::sync::{SyncOutcome, sync_solution};

#[derive(Default)]
struct MemoryStore {
    files: Mutex<HashMap<String, (String, u64)>>,
    writes: Mutex<Vec<String>>,
    /// When set, any put to a path containing this fragment fails with a
    /// 500, simulating an upstream outage mid-request.
    fail_puts_matching: Option<String>,
}

impl MemoryStore {
    fn seed(&self, path: &str, content: &str) {
        let mut files = self.files.lock().unwrap();
        files.insert(path.to_string(), (content.to_string(), 1));
    }

    fn writes_to(&self, path: &str) -> usize {
        self.writes.lock().unwrap().iter().filter(|p| *p == path).count()
    }

    fn total_writes(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    fn content_of(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(path).map(|(c, _)| c.clone())
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn get_file(&self, path: &str) -> Result<Option<RemoteFile>, RepositoryError> {
        let files = self.files.lock().unwrap();
        Ok(files.get(path).map(|(content, rev)| RemoteFile {
            content: content.clone(),
            sha: format!("rev-{rev}"),
        }))
    }

    async fn put_file(
        &self,
        path: &str,
        content: &str,
        _message: &str,
        sha: Option<&str>,
    ) -> Result<String, RepositoryError> {
        if let Some(fragment) = &self.fail_puts_matching {
            if path.contains(fragment.as_str()) {
                return Err(RepositoryError::Api {
                    status: 500,
                    body: "injected failure".to_string(),
                });
            }
        }

        let mut files = self.files.lock().unwrap();
        let next_rev = match files.get(path) {
            Some((_, rev)) => {
                let expected = format!("rev-{rev}");
                if sha != Some(expected.as_str()) {
                    return Err(RepositoryError::Api {
                        status: 409,
                        body: format!("sha mismatch for {path}"),
                    });
                }
                rev + 1
            }
            None => {
                if sha.is_some() {
                    return Err(RepositoryError::Api {
                        status: 422,
                        body: format!("{path} does not exist"),
                    });
                }
                1
            }
        };

        files.insert(path.to_string(), (content.to_string(), next_rev));
        self.writes.lock().unwrap().push(path.to_string());
        Ok(format!("rev-{next_rev}"))
    }
}

fn two_sum() -> SolutionSubmission {
    SolutionSubmission {
        slug: "two-sum".into(),
        title: "Two Sum".into(),
        difficulty: "Easy".into(),
        topics: vec![],
        description_html: "<p>Find two numbers.</p>".into(),
        code: "return 0".into(),
        language: "python".into(),
        source_url: "https://leetcode.com/problems/two-sum/".into(),
    }
}

fn index_items(store: &MemoryStore) -> Vec<IndexEntry> {
    let raw = store.content_of(INDEX_PATH).expect("index.json missing");
    let doc: serde_json::Value = serde_json::from_str(&raw).expect("index.json unparsable");
    serde_json::from_value(doc["items"].clone()).expect("items malformed")
}

#[tokio::test]
async fn first_sync_creates_solution_file_and_index_entry() {
    let store = MemoryStore::default();

    let outcome = sync_solution(&store, &two_sum(), "2026-08-27").await.unwrap();
    match outcome {
        SyncOutcome::Synced { path, message } => {
            assert_eq!(path, "easy/two-sum/solution.py");
            assert_eq!(message, "Synced: Two Sum");
        }
        other => panic!("expected Synced, got {other:?}"),
    }

    let solution = store.content_of("easy/two-sum/solution.py").unwrap();
    assert!(solution.starts_with("\"\"\"\n"), "python solutions use docstring wrapper");
    assert!(solution.ends_with("// [Solution]\nreturn 0"));

    let items = index_items(&store);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].slug, "two-sum");
    assert_eq!(items[0].name, "Two Sum");
    assert_eq!(items[0].path, "easy/two-sum/solution.py");
    assert_eq!(items[0].date_solved, "2026-08-27");
    assert_eq!(store.total_writes(), 2);
}

#[tokio::test]
async fn identical_resync_is_no_change_with_zero_writes() {
    let store = MemoryStore::default();
    sync_solution(&store, &two_sum(), "2026-08-27").await.unwrap();
    let writes_before = store.total_writes();

    let outcome = sync_solution(&store, &two_sum(), "2026-08-27").await.unwrap();
    assert_eq!(outcome, SyncOutcome::NoChange);
    assert_eq!(store.total_writes(), writes_before, "no writes on a no-change sync");
}

#[tokio::test]
async fn code_change_rewrites_solution_but_not_index_and_keeps_solve_date() {
    let store = MemoryStore::default();
    sync_solution(&store, &two_sum(), "2026-08-26").await.unwrap();

    let mut updated = two_sum();
    updated.code = "return 1".into();
    let outcome = sync_solution(&store, &updated, "2026-08-27").await.unwrap();

    assert!(matches!(outcome, SyncOutcome::Synced { .. }));
    let solution = store.content_of("easy/two-sum/solution.py").unwrap();
    assert!(solution.ends_with("return 1"));

    // Metadata is unchanged, so the re-rendered index is byte-identical
    // and the compare-before-write skips it.
    assert_eq!(store.writes_to(INDEX_PATH), 1);
    assert_eq!(store.writes_to("easy/two-sum/solution.py"), 2);

    let items = index_items(&store);
    assert_eq!(items[0].date_solved, "2026-08-26", "earliest solve date is sticky");
}

#[tokio::test]
async fn difficulty_change_moves_path_and_updates_index() {
    let store = MemoryStore::default();
    sync_solution(&store, &two_sum(), "2026-08-27").await.unwrap();

    let mut harder = two_sum();
    harder.difficulty = "Hard".into();
    let outcome = sync_solution(&store, &harder, "2026-08-27").await.unwrap();

    match outcome {
        SyncOutcome::Synced { path, .. } => assert_eq!(path, "hard/two-sum/solution.py"),
        other => panic!("expected Synced, got {other:?}"),
    }

    let items = index_items(&store);
    assert_eq!(items.len(), 1, "slug stays unique across difficulty changes");
    assert_eq!(items[0].difficulty, "Hard");
    assert_eq!(items[0].path, "hard/two-sum/solution.py");
}

#[tokio::test]
async fn hard_sorts_before_easy_on_same_date() {
    let store = MemoryStore::default();

    let mut hard = two_sum();
    hard.slug = "word-ladder".into();
    hard.title = "Word Ladder".into();
    hard.difficulty = "Hard".into();
    hard.topics = vec!["DP".into(), "Graph".into()];

    sync_solution(&store, &hard, "2026-08-27").await.unwrap();
    sync_solution(&store, &two_sum(), "2026-08-27").await.unwrap();

    let items = index_items(&store);
    let slugs: Vec<&str> = items.iter().map(|i| i.slug.as_str()).collect();
    assert_eq!(slugs, vec!["word-ladder", "two-sum"]);
    assert_eq!(items[0].topics, vec!["DP".to_string(), "Graph".to_string()]);
}

#[tokio::test]
async fn missing_required_field_is_validation_error_with_no_writes() {
    let store = MemoryStore::default();
    let mut sub = two_sum();
    sub.code = String::new();

    let err = sync_solution(&store, &sub, "2026-08-27").await.unwrap_err();
    assert!(matches!(err, SyncError::Validation(_)), "got: {err}");
    assert_eq!(store.total_writes(), 0);
}

#[tokio::test]
async fn unknown_language_and_difficulty_fall_back() {
    let store = MemoryStore::default();
    let mut sub = two_sum();
    sub.language = "brainfuck".into();
    sub.difficulty = "Nightmare".into();

    let outcome = sync_solution(&store, &sub, "2026-08-27").await.unwrap();
    match outcome {
        SyncOutcome::Synced { path, .. } => assert_eq!(path, "unknown/two-sum/solution.txt"),
        other => panic!("expected Synced, got {other:?}"),
    }
    let solution = store.content_of("unknown/two-sum/solution.txt").unwrap();
    assert!(solution.starts_with("/*\n"), "non-python uses block comments");
}

#[tokio::test]
async fn corrupt_index_is_replaced_not_fatal() {
    let store = MemoryStore::default();
    store.seed(INDEX_PATH, "{not json at all");

    sync_solution(&store, &two_sum(), "2026-08-27").await.unwrap();

    let items = index_items(&store);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].slug, "two-sum");
}

#[tokio::test]
async fn solution_write_failure_aborts_before_index_write() {
    let store = MemoryStore {
        fail_puts_matching: Some("solution".to_string()),
        ..MemoryStore::default()
    };

    let err = sync_solution(&store, &two_sum(), "2026-08-27").await.unwrap_err();
    assert!(matches!(err, SyncError::Repository(_)), "got: {err}");
    assert!(
        store.content_of(INDEX_PATH).is_none(),
        "index must not be written after a failed solution write"
    );
}

#[tokio::test]
async fn put_with_stale_revision_is_a_hard_error() {
    let store = MemoryStore::default();
    store.seed(INDEX_PATH, "{\"items\": []}");

    let err = store
        .put_file(INDEX_PATH, "{\"items\": []}", "Update index", Some("rev-999"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Api { status: 409, .. }), "got: {err}");
}

#[tokio::test]
async fn create_or_update_skips_write_when_content_matches() {
    let store = MemoryStore::default();
    store.seed("easy/two-sum/solution.py", "same content");

    let result = create_or_update_file(&store, "easy/two-sum/solution.py", "same content", "msg")
        .await
        .unwrap();
    assert!(!result.changed);
    assert_eq!(store.total_writes(), 0);

    let result = create_or_update_file(&store, "easy/two-sum/solution.py", "new content", "msg")
        .await
        .unwrap();
    assert!(result.changed);
    assert_eq!(store.total_writes(), 1);
}
