//! In-memory inventory list and the events that change it

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::task::JoinHandle;

use super::{filter, InventoryBackend, InventoryItem, ItemCard, INVENTORY_COLLECTION};
use crate::error::InventoryError;

#[derive(Debug, Default)]
struct ViewState {
    items: Vec<InventoryItem>,
    search_term: String,
    refreshing: bool,
    mounted: bool,
}

fn lock(state: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The inventory list screen, without the screen.
///
/// Holds the items last loaded from the backend, the search term and the
/// refresh flag. All methods take `&self`; network calls never hold the
/// state lock, so operations may overlap. Overlapping loads are not
/// de-duplicated: whichever response arrives last replaces the list.
pub struct InventoryView<B> {
    state: Arc<Mutex<ViewState>>,
    handle: ViewHandle<B>,
}

impl<B: InventoryBackend> InventoryView<B> {
    /// Create a view over the `Inventory` collection
    pub fn new(backend: Arc<B>) -> Self {
        Self::with_collection(backend, INVENTORY_COLLECTION)
    }

    /// Create a view over another collection
    pub fn with_collection(backend: Arc<B>, collection: &str) -> Self {
        let state = Arc::new(Mutex::new(ViewState::default()));
        let handle = ViewHandle {
            backend,
            collection: Arc::from(collection),
            state: Arc::downgrade(&state),
        };
        Self { state, handle }
    }

    /// Collection this view mirrors
    pub fn collection(&self) -> &str {
        &self.handle.collection
    }

    /// A handle for running operations from other tasks.
    ///
    /// The handle does not keep the view alive; operations finishing after
    /// the view is dropped leave no trace.
    pub fn handle(&self) -> ViewHandle<B> {
        self.handle.clone()
    }

    /// Snapshot of all loaded items, in backend order
    pub fn items(&self) -> Vec<InventoryItem> {
        lock(&self.state).items.clone()
    }

    /// The current search term
    pub fn search_term(&self) -> String {
        lock(&self.state).search_term.clone()
    }

    /// Whether a user-triggered refresh is in flight
    pub fn is_refreshing(&self) -> bool {
        lock(&self.state).refreshing
    }

    /// Replace the search term
    pub fn set_search_term(&self, term: &str) {
        lock(&self.state).search_term = term.to_string();
    }

    /// Loaded items matching the current search term
    pub fn filtered_view(&self) -> Vec<InventoryItem> {
        let state = lock(&self.state);
        filter::filtered_view(&state.items, &state.search_term)
    }

    /// Loaded items matching `term`, ignoring the stored search term
    pub fn filtered_view_for(&self, term: &str) -> Vec<InventoryItem> {
        filter::filtered_view(&lock(&self.state).items, term)
    }

    /// Cards for the rows currently visible
    pub fn cards(&self) -> Vec<ItemCard> {
        let state = lock(&self.state);
        let needle = state.search_term.to_lowercase();
        state
            .items
            .iter()
            .filter(|item| filter::matches_term(item, &needle))
            .map(ItemCard::from_item)
            .collect()
    }

    /// Replace the list with a full enumeration of the collection
    pub async fn load_all(&self) -> Result<(), InventoryError> {
        self.handle.load_all().await
    }

    /// [`load_all`](Self::load_all) bracketed by the refresh flag
    pub async fn refresh(&self) -> Result<(), InventoryError> {
        self.handle.refresh().await
    }

    /// Delete remotely, then drop the item locally
    pub async fn remove_item(&self, id: &str) -> Result<(), InventoryError> {
        self.handle.remove_item(id).await
    }

    /// First display of the screen: loads once, later calls do nothing
    pub async fn mount(&self) -> Result<(), InventoryError> {
        self.handle.mount().await
    }

    /// Search box edited: store the term and return the visible cards
    pub fn on_search_text_change(&self, text: &str) -> Vec<ItemCard> {
        self.set_search_term(text);
        self.cards()
    }

    /// Pull-to-refresh gesture
    pub async fn on_pull_to_refresh(&self) -> Result<(), InventoryError> {
        self.refresh().await
    }

    /// Remove control of a row pressed
    pub async fn on_remove_pressed(&self, id: &str) -> Result<(), InventoryError> {
        self.remove_item(id).await
    }
}

impl<B: InventoryBackend + 'static> InventoryView<B> {
    fn spawn<F, Fut>(&self, op: F) -> JoinHandle<Result<(), InventoryError>>
    where
        F: FnOnce(ViewHandle<B>) -> Fut,
        Fut: Future<Output = Result<(), InventoryError>> + Send + 'static,
    {
        tokio::spawn(op(self.handle()))
    }

    /// Run [`mount`](Self::mount) as a task
    pub fn spawn_mount(&self) -> JoinHandle<Result<(), InventoryError>> {
        self.spawn(|handle| async move { handle.mount().await })
    }

    /// Run [`load_all`](Self::load_all) as a task
    pub fn spawn_load_all(&self) -> JoinHandle<Result<(), InventoryError>> {
        self.spawn(|handle| async move { handle.load_all().await })
    }

    /// Run [`refresh`](Self::refresh) as a task
    pub fn spawn_refresh(&self) -> JoinHandle<Result<(), InventoryError>> {
        self.spawn(|handle| async move { handle.refresh().await })
    }

    /// Run [`remove_item`](Self::remove_item) as a task
    pub fn spawn_remove(&self, id: &str) -> JoinHandle<Result<(), InventoryError>> {
        let id = id.to_string();
        self.spawn(|handle| async move { handle.remove_item(&id).await })
    }
}

/// Weak handle to an [`InventoryView`]'s state plus its backend
pub struct ViewHandle<B> {
    backend: Arc<B>,
    collection: Arc<str>,
    state: Weak<Mutex<ViewState>>,
}

impl<B> Clone for ViewHandle<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            collection: self.collection.clone(),
            state: self.state.clone(),
        }
    }
}

impl<B: InventoryBackend> ViewHandle<B> {
    /// Apply `f` to the state, unless the view is gone
    fn with_state<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> Option<R> {
        let state = self.state.upgrade()?;
        let mut guard = lock(&state);
        Some(f(&mut guard))
    }

    /// Whether the owning view still exists
    pub fn is_attached(&self) -> bool {
        self.state.strong_count() > 0
    }

    /// See [`InventoryView::load_all`]
    pub async fn load_all(&self) -> Result<(), InventoryError> {
        log::debug!("loading {}", self.collection);

        let snapshots = self
            .backend
            .list_documents(&self.collection)
            .await
            .map_err(|source| {
                log::warn!("loading {} failed: {}", self.collection, source);
                InventoryError::Fetch {
                    collection: self.collection.to_string(),
                    source,
                }
            })?;

        let items: Vec<InventoryItem> = snapshots.into_iter().map(InventoryItem::from).collect();
        let count = items.len();
        match self.with_state(|state| state.items = items) {
            Some(()) => log::info!("loaded {} items from {}", count, self.collection),
            None => log::debug!("view closed, discarding {} loaded items", count),
        }
        Ok(())
    }

    /// See [`InventoryView::refresh`]
    pub async fn refresh(&self) -> Result<(), InventoryError> {
        let _flag = RefreshFlag::raise(self.state.clone());
        self.load_all().await
    }

    /// See [`InventoryView::remove_item`]
    pub async fn remove_item(&self, id: &str) -> Result<(), InventoryError> {
        self.backend
            .delete_document(&self.collection, id)
            .await
            .map_err(|source| {
                log::warn!("deleting {}/{} failed: {}", self.collection, id, source);
                InventoryError::Delete {
                    id: id.to_string(),
                    source,
                }
            })?;

        let removed = self.with_state(|state| {
            let before = state.items.len();
            state.items.retain(|item| item.id != id);
            before - state.items.len()
        });
        match removed {
            Some(0) => log::debug!("deleted {} which was not loaded", id),
            Some(_) => log::info!("removed {} from {}", id, self.collection),
            None => log::debug!("view closed after deleting {}", id),
        }
        Ok(())
    }

    /// See [`InventoryView::mount`]
    pub async fn mount(&self) -> Result<(), InventoryError> {
        let first = self
            .with_state(|state| !std::mem::replace(&mut state.mounted, true))
            .unwrap_or(false);
        if !first {
            return Ok(());
        }
        self.load_all().await
    }
}

/// Holds the refresh flag up until dropped, on every exit path
struct RefreshFlag {
    state: Weak<Mutex<ViewState>>,
}

impl RefreshFlag {
    fn raise(state: Weak<Mutex<ViewState>>) -> Self {
        if let Some(state) = state.upgrade() {
            lock(&state).refreshing = true;
        }
        Self { state }
    }
}

impl Drop for RefreshFlag {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            lock(&state).refreshing = false;
        }
    }
}
