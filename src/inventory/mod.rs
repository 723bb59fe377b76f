//! The inventory screen: load, search, refresh and remove parts

mod backend;
mod card;
mod filter;
mod item;
mod view;

pub use backend::InventoryBackend;
pub use card::ItemCard;
pub use filter::filtered_view;
pub use item::{fields, InventoryItem};
pub use view::{InventoryView, ViewHandle};

/// Collection holding the part records
pub const INVENTORY_COLLECTION: &str = "Inventory";
