//! NotesWorkspace behaviour against the in-memory store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use gnotes_db::test_fixtures::sample_note;
use gnotes_db::{
    EmbeddingBackend, Error, FailureKind, MemoryNoteStore, NoteDraft, NoteStore, NotesWorkspace,
    Result, Vector,
};

struct FixedEmbedder {
    fail: AtomicBool,
}

impl FixedEmbedder {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            fail: AtomicBool::new(fail),
        })
    }
}

#[async_trait]
impl EmbeddingBackend for FixedEmbedder {
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vector>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Request("connection refused".into()));
        }
        Ok(texts.iter().map(|_| Vector::from(vec![1.0, 0.0])).collect())
    }

    fn dimension(&self) -> usize {
        2
    }

    fn model_name(&self) -> &str {
        "fixed"
    }
}

fn draft(title: &str, tags: &[&str]) -> NoteDraft {
    let mut draft = NoteDraft::new();
    draft.set_title(title);
    draft.set_content(format!("{} body", title));
    for tag in tags {
        draft.add_tag(tag);
    }
    draft
}

#[tokio::test]
async fn test_load_and_view_all() {
    let store = Arc::new(MemoryNoteStore::new());
    store.insert(sample_note("older", &["work"], 10), None).await.unwrap();
    store.insert(sample_note("newer", &["home", "work"], 1), None).await.unwrap();

    let workspace = NotesWorkspace::new(store);
    assert_eq!(workspace.load().await.unwrap(), 2);

    let view = workspace.view(None).await;
    let titles: Vec<&str> = view.notes.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["newer", "older"]);
    assert_eq!(view.total, 2);
    assert_eq!(view.tags[0].tag, "work");
    assert_eq!(view.tags[0].count, 2);
    assert!(view.empty_state.is_none());
}

#[tokio::test]
async fn test_view_empty_states() {
    let store = Arc::new(MemoryNoteStore::new());
    let workspace = NotesWorkspace::new(store.clone());
    workspace.load().await.unwrap();
    assert_eq!(
        workspace.view(None).await.empty_state.as_deref(),
        Some("No notes yet.")
    );

    store.insert(sample_note("a", &["work"], 0), None).await.unwrap();
    workspace.load().await.unwrap();
    let view = workspace.view(Some("travel")).await;
    assert!(view.notes.is_empty());
    assert_eq!(view.empty_state.as_deref(), Some("No notes tagged 'travel'."));
    assert_eq!(view.selected_tag.as_deref(), Some("travel"));
}

#[tokio::test]
async fn test_create_prepends_returned_row() {
    let store = Arc::new(MemoryNoteStore::new());
    store.insert(sample_note("existing", &["x"], 5), None).await.unwrap();
    let workspace = NotesWorkspace::new(store.clone());
    workspace.load().await.unwrap();

    let note = workspace.create(&draft("fresh", &["y"])).await.unwrap();
    let notes = workspace.notes().await;
    assert_eq!(notes[0].id, note.id);
    assert_eq!(notes.len(), 2);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_create_rejects_invalid_draft() {
    let store = Arc::new(MemoryNoteStore::new());
    let workspace = NotesWorkspace::new(store.clone());
    let err = workspace.create(&draft("no tags", &[])).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Validation);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_submit_updates_in_place_and_clears_draft() {
    let store = Arc::new(MemoryNoteStore::new());
    let workspace = NotesWorkspace::new(store);
    let created = workspace.create(&draft("first", &["a"])).await.unwrap();

    let mut edit = NoteDraft::for_note(&created);
    edit.set_title("renamed");
    let updated = workspace.submit(&mut edit).await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(workspace.get(created.id).await.unwrap().title, "renamed");
    assert_eq!(workspace.notes().await.len(), 1);
    assert!(edit.title.is_empty());
    assert!(edit.editing_id().is_none());
}

#[tokio::test]
async fn test_delete_removes_from_cache() {
    let store = Arc::new(MemoryNoteStore::new());
    let workspace = NotesWorkspace::new(store.clone());
    let note = workspace.create(&draft("gone", &["a"])).await.unwrap();
    workspace.delete(note.id).await.unwrap();
    assert!(workspace.notes().await.is_empty());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_delete_keeps_tag_filter_consistent() {
    let store = Arc::new(MemoryNoteStore::new());
    let workspace = NotesWorkspace::new(store);
    let first_a = workspace.create(&draft("first a", &["A"])).await.unwrap();
    workspace.create(&draft("only b", &["B"])).await.unwrap();
    workspace.create(&draft("both", &["A", "B"])).await.unwrap();

    workspace.delete(first_a.id).await.unwrap();

    let view = workspace.view(Some("A")).await;
    let titles: Vec<&str> = view.notes.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["both"]);
    assert!(view.notes.iter().all(|n| n.tags.iter().any(|t| t == "A")));
    assert_eq!(view.total, 2);
    assert!(view.empty_state.is_none());
}

#[tokio::test]
async fn test_embeds_on_create() {
    let store = Arc::new(MemoryNoteStore::new());
    let workspace =
        NotesWorkspace::new(store.clone()).with_embedder(FixedEmbedder::new(false));
    let note = workspace.create(&draft("vec", &["a"])).await.unwrap();
    assert!(store.get(note.id).await.unwrap().has_embedding());
}

#[tokio::test]
async fn test_embedding_failure_still_stores_note() {
    let store = Arc::new(MemoryNoteStore::new());
    let workspace =
        NotesWorkspace::new(store.clone()).with_embedder(FixedEmbedder::new(true));
    let note = workspace.create(&draft("plain", &["a"])).await.unwrap();
    assert!(!store.get(note.id).await.unwrap().has_embedding());
}

#[tokio::test]
async fn test_load_failure_is_reported_and_cache_kept() {
    let store = Arc::new(MemoryNoteStore::new());
    store.insert(sample_note("kept", &["a"], 0), None).await.unwrap();
    let workspace = NotesWorkspace::new(store.clone());
    workspace.load().await.unwrap();

    store.set_failure(Some(FailureKind::Network));
    let err = workspace.load().await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Network);

    let view = workspace.view(None).await;
    assert_eq!(view.notes.len(), 1);
    assert!(view.load_error.unwrap().starts_with("Failed to load notes"));

    store.set_failure(None);
    workspace.load().await.unwrap();
    assert!(workspace.view(None).await.load_error.is_none());
}

#[tokio::test]
async fn test_store_failure_leaves_cache_untouched() {
    let store = Arc::new(MemoryNoteStore::new());
    let workspace = NotesWorkspace::new(store.clone());
    store.set_failure(Some(FailureKind::Unauthorized));
    let err = workspace.create(&draft("x", &["a"])).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Unauthorized);
    assert!(workspace.notes().await.is_empty());
}

#[tokio::test]
async fn test_failed_reembed_clears_stale_embedding() {
    let store = Arc::new(MemoryNoteStore::new());
    let embedder = FixedEmbedder::new(false);
    let workspace = NotesWorkspace::new(store.clone()).with_embedder(embedder.clone());
    let note = workspace
        .create(&draft("Kubernetes cluster", &["ops"]))
        .await
        .unwrap();
    assert!(store.get(note.id).await.unwrap().has_embedding());

    embedder.fail.store(true, Ordering::SeqCst);
    let mut edit = NoteDraft::for_note(&note);
    edit.set_title("Banana bread");
    edit.set_content("banana flour sugar oven");
    let updated = workspace.submit(&mut edit).await.unwrap();

    assert_eq!(updated.content, "banana flour sugar oven");
    assert!(!updated.has_embedding());
    let missing = store.list_missing_embeddings().await.unwrap();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].id, note.id);
}
