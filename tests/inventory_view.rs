use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tokio_test::{assert_err, assert_ok};

use boiler_room_inventory::error::{Error, InventoryError};
use boiler_room_inventory::firestore::DocumentSnapshot;
use boiler_room_inventory::inventory::{InventoryBackend, InventoryView};

/// A list call that waits for the test before answering
struct Hold {
    started: Arc<Notify>,
    release: Arc<Notify>,
    result: Result<Vec<DocumentSnapshot>, String>,
}

#[derive(Default)]
struct FakeBackend {
    documents: Mutex<Vec<DocumentSnapshot>>,
    list_error: Mutex<Option<String>>,
    delete_error: Mutex<Option<String>>,
    holds: Mutex<VecDeque<Hold>>,
    delete_hold: Mutex<Option<(Arc<Notify>, Arc<Notify>)>>,
    deleted: Mutex<Vec<String>>,
    list_calls: AtomicUsize,
}

impl FakeBackend {
    fn with_ids(ids: &[&str]) -> Arc<Self> {
        let backend = Arc::new(Self::default());
        backend.set_ids(ids);
        backend
    }

    fn set_ids(&self, ids: &[&str]) {
        *self.documents.lock().unwrap() = ids.iter().map(|id| doc(id)).collect();
    }

    fn fail_lists(&self, message: Option<&str>) {
        *self.list_error.lock().unwrap() = message.map(str::to_string);
    }

    fn fail_deletes(&self, message: Option<&str>) {
        *self.delete_error.lock().unwrap() = message.map(str::to_string);
    }

    /// Make the next list call wait; returns (started, release)
    fn hold_next_list(
        &self,
        result: Result<Vec<DocumentSnapshot>, String>,
    ) -> (Arc<Notify>, Arc<Notify>) {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        self.holds.lock().unwrap().push_back(Hold {
            started: started.clone(),
            release: release.clone(),
            result,
        });
        (started, release)
    }

    /// Make the next delete call wait; returns (started, release)
    fn hold_next_delete(&self) -> (Arc<Notify>, Arc<Notify>) {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        *self.delete_hold.lock().unwrap() = Some((started.clone(), release.clone()));
        (started, release)
    }

    fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl InventoryBackend for FakeBackend {
    async fn list_documents(&self, collection: &str) -> Result<Vec<DocumentSnapshot>, Error> {
        assert_eq!(collection, "Inventory");
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let hold = self.holds.lock().unwrap().pop_front();
        if let Some(hold) = hold {
            hold.started.notify_one();
            hold.release.notified().await;
            return hold.result.map_err(Error::database);
        }

        if let Some(message) = self.list_error.lock().unwrap().clone() {
            return Err(Error::database(message));
        }
        Ok(self.documents.lock().unwrap().clone())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), Error> {
        assert_eq!(collection, "Inventory");

        let hold = self.delete_hold.lock().unwrap().take();
        if let Some((started, release)) = hold {
            started.notify_one();
            release.notified().await;
        }

        if let Some(message) = self.delete_error.lock().unwrap().clone() {
            return Err(Error::Api {
                status: 403,
                message,
            });
        }
        self.deleted.lock().unwrap().push(id.to_string());
        self.documents.lock().unwrap().retain(|d| d.id != id);
        Ok(())
    }
}

fn doc(id: &str) -> DocumentSnapshot {
    DocumentSnapshot::new(id)
        .with_field("PartName", format!("Part {}", id))
        .with_field("Quantity", 1_i64)
}

fn ids(view: &InventoryView<FakeBackend>) -> Vec<String> {
    view.items().into_iter().map(|i| i.id).collect()
}

#[tokio::test]
async fn test_mount_loads_once() {
    let backend = FakeBackend::with_ids(&["a", "b"]);
    let view = InventoryView::new(backend.clone());

    assert!(view.items().is_empty());
    assert_ok!(view.mount().await);
    assert_eq!(ids(&view), vec!["a", "b"]);

    backend.set_ids(&["c"]);
    assert_ok!(view.mount().await);
    assert_eq!(backend.list_calls.load(Ordering::SeqCst), 1);
    assert_eq!(ids(&view), vec!["a", "b"]);
}

#[tokio::test]
async fn test_load_replaces_list_wholesale() {
    let backend = FakeBackend::with_ids(&["a", "b"]);
    let view = InventoryView::new(backend.clone());
    view.load_all().await.unwrap();

    backend.set_ids(&["b", "c"]);
    view.load_all().await.unwrap();

    assert_eq!(ids(&view), vec!["b", "c"]);
}

#[tokio::test]
async fn test_failed_load_keeps_items() {
    let backend = FakeBackend::with_ids(&["a", "b"]);
    let view = InventoryView::new(backend.clone());
    view.load_all().await.unwrap();
    let before = view.items();

    backend.fail_lists(Some("unavailable"));
    let err = assert_err!(view.load_all().await);

    match err {
        InventoryError::Fetch { collection, source } => {
            assert_eq!(collection, "Inventory");
            assert!(source.to_string().contains("unavailable"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(view.items(), before);
}

#[tokio::test]
async fn test_remove_after_remote_success() {
    let backend = FakeBackend::with_ids(&["a", "b", "c"]);
    let view = InventoryView::new(backend.clone());
    view.mount().await.unwrap();

    assert_ok!(view.on_remove_pressed("b").await);
    assert_eq!(ids(&view), vec!["a", "c"]);
    assert_eq!(backend.deleted(), vec!["b"]);

    // gone upstream too, so a refresh does not bring it back
    view.refresh().await.unwrap();
    assert_eq!(ids(&view), vec!["a", "c"]);
}

#[tokio::test]
async fn test_removed_item_returns_if_still_remote() {
    let backend = FakeBackend::with_ids(&["a", "b"]);
    let view = InventoryView::new(backend.clone());
    view.mount().await.unwrap();

    view.remove_item("b").await.unwrap();
    // another client re-creates it
    backend.set_ids(&["a", "b"]);
    assert_eq!(ids(&view), vec!["a"]);

    view.load_all().await.unwrap();
    assert_eq!(ids(&view), vec!["a", "b"]);
}

#[tokio::test]
async fn test_failed_remove_leaves_state_untouched() {
    let backend = FakeBackend::with_ids(&["a", "b"]);
    let view = InventoryView::new(backend.clone());
    view.mount().await.unwrap();
    let before = view.items();

    backend.fail_deletes(Some("PERMISSION_DENIED"));
    let err = assert_err!(view.remove_item("a").await);

    assert!(matches!(err, InventoryError::Delete { ref id, .. } if id == "a"));
    assert_eq!(err.backend_error().status(), Some(403));
    assert_eq!(view.items(), before);

    // the item stays actionable
    backend.fail_deletes(None);
    assert_ok!(view.remove_item("a").await);
    assert_eq!(ids(&view), vec!["b"]);
}

#[tokio::test]
async fn test_remove_unknown_id_is_local_noop() {
    let backend = FakeBackend::with_ids(&["a"]);
    let view = InventoryView::new(backend.clone());
    view.mount().await.unwrap();

    assert_ok!(view.remove_item("zzz").await);
    assert_eq!(backend.deleted(), vec!["zzz"]);
    assert_eq!(ids(&view), vec!["a"]);

    backend.fail_deletes(Some("NOT_FOUND"));
    assert_err!(view.remove_item("zzz").await);
    assert_eq!(ids(&view), vec!["a"]);
}

#[tokio::test]
async fn test_concurrent_removes_of_different_items() {
    let backend = FakeBackend::with_ids(&["a", "b", "c"]);
    let view = InventoryView::new(backend.clone());
    view.mount().await.unwrap();

    let (first, second) = tokio::join!(view.remove_item("a"), view.remove_item("c"));
    assert_ok!(first);
    assert_ok!(second);
    assert_eq!(ids(&view), vec!["b"]);
}

#[tokio::test]
async fn test_refresh_flag_brackets_refresh() {
    let backend = FakeBackend::with_ids(&[]);
    let view = InventoryView::new(backend.clone());
    assert!(!view.is_refreshing());

    let (started, release) = backend.hold_next_list(Ok(vec![doc("x")]));
    let task = view.spawn_refresh();

    started.notified().await;
    assert!(view.is_refreshing());
    assert!(view.items().is_empty());

    release.notify_one();
    assert_ok!(task.await.unwrap());
    assert!(!view.is_refreshing());
    assert_eq!(ids(&view), vec!["x"]);
}

#[tokio::test]
async fn test_refresh_flag_resets_on_failure() {
    let backend = FakeBackend::with_ids(&["a"]);
    let view = InventoryView::new(backend.clone());
    view.mount().await.unwrap();

    let (started, release) = backend.hold_next_list(Err("offline".to_string()));
    let task = view.spawn_refresh();

    started.notified().await;
    assert!(view.is_refreshing());

    release.notify_one();
    let err = task.await.unwrap().unwrap_err();
    assert!(matches!(err, InventoryError::Fetch { .. }));
    assert!(!view.is_refreshing());
    assert_eq!(ids(&view), vec!["a"]);
}

#[tokio::test]
async fn test_refresh_flag_resets_when_cancelled() {
    let backend = FakeBackend::with_ids(&[]);
    let view = InventoryView::new(backend.clone());

    let (started, _release) = backend.hold_next_list(Ok(vec![]));
    let task = view.spawn_refresh();
    started.notified().await;
    assert!(view.is_refreshing());

    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());
    assert!(!view.is_refreshing());
}

#[tokio::test]
async fn test_last_response_wins() {
    let backend = FakeBackend::with_ids(&[]);
    let view = InventoryView::new(backend.clone());

    let (first_started, first_release) = backend.hold_next_list(Ok(vec![doc("old")]));
    let (second_started, second_release) = backend.hold_next_list(Ok(vec![doc("new")]));

    let first = view.spawn_load_all();
    first_started.notified().await;
    let second = view.spawn_load_all();
    second_started.notified().await;

    second_release.notify_one();
    assert_ok!(second.await.unwrap());
    assert_eq!(ids(&view), vec!["new"]);

    // the earlier request resolves last and overwrites
    first_release.notify_one();
    assert_ok!(first.await.unwrap());
    assert_eq!(ids(&view), vec!["old"]);
}

#[tokio::test]
async fn test_load_finishing_after_teardown_is_discarded() {
    let backend = FakeBackend::with_ids(&[]);
    let view = InventoryView::new(backend.clone());
    let handle = view.handle();

    let (started, release) = backend.hold_next_list(Ok(vec![doc("late")]));
    let task = view.spawn_mount();
    started.notified().await;

    drop(view);
    assert!(!handle.is_attached());

    release.notify_one();
    assert_ok!(task.await.unwrap());
}

#[tokio::test]
async fn test_remove_finishing_after_teardown_reports_success() {
    let backend = FakeBackend::with_ids(&["a", "b"]);
    let view = InventoryView::new(backend.clone());
    view.mount().await.unwrap();
    let handle = view.handle();

    let (started, release) = backend.hold_next_delete();
    let task = view.spawn_remove("a");
    started.notified().await;

    drop(view);
    assert!(!handle.is_attached());

    release.notify_one();
    assert_ok!(task.await.unwrap());
    assert_eq!(backend.deleted(), vec!["a"]);
}

#[tokio::test]
async fn test_search_filters_synchronously() {
    let backend = Arc::new(FakeBackend::default());
    *backend.documents.lock().unwrap() = vec![
        DocumentSnapshot::new("k1")
            .with_field("PartName", "Flame Rod")
            .with_field("Manufacturer", "Weil-McLain")
            .with_field("Image", "https://img.example.com/rod.png"),
        DocumentSnapshot::new("k2")
            .with_field("PartName", "Circulator Pump")
            .with_field("Manufacturer", "Taco")
            .with_field("Location", "Cage B"),
    ];
    let view = InventoryView::new(backend.clone());
    view.mount().await.unwrap();

    assert_eq!(view.on_search_text_change("").len(), 2);

    let cards = view.on_search_text_change("TACO");
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].id, "k2");
    assert_eq!(view.search_term(), "TACO");
    assert_eq!(view.filtered_view().len(), 1);

    // the image URI is searchable even though it is not shown as text
    let cards = view.on_search_text_change("img.example");
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].id, "k1");
    assert!(cards[0].fields.iter().all(|(label, _)| label != "Image"));
    assert_eq!(cards[0].image.as_deref(), Some("https://img.example.com/rod.png"));

    assert_eq!(view.filtered_view_for("k").len(), 2);
    assert_eq!(backend.list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_empty_term_preserves_backend_order() {
    let backend = FakeBackend::with_ids(&["z", "a", "m"]);
    let view = InventoryView::new(backend);
    view.mount().await.unwrap();

    let visible: Vec<String> = view.filtered_view_for("").into_iter().map(|i| i.id).collect();
    assert_eq!(visible, vec!["z", "a", "m"]);
}
