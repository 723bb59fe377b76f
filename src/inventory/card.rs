//! Render model for one inventory row

use super::InventoryItem;
use crate::storage::StorageClient;

/// What a row of the list shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCard {
    /// Item id, the key of the row and the target of its remove control
    pub id: String,

    /// Labelled values, `id` and `Image` excluded
    pub fields: Vec<(String, String)>,

    /// Image to show, if the item has one
    pub image: Option<String>,
}

impl ItemCard {
    /// Build the card for an item
    pub fn from_item(item: &InventoryItem) -> Self {
        Self {
            id: item.id.clone(),
            fields: item.display_fields(),
            image: item.image_uri().map(str::to_string),
        }
    }

    /// Replace the image URI with a URL the storage backend serves
    pub fn resolve_image(mut self, storage: &StorageClient) -> Self {
        self.image = self
            .image
            .as_deref()
            .and_then(|uri| storage.resolve_image_uri(uri));
        self
    }
}

impl From<&InventoryItem> for ItemCard {
    fn from(item: &InventoryItem) -> Self {
        Self::from_item(item)
    }
}
