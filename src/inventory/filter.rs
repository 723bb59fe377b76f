//! Client-side search over loaded items

use super::InventoryItem;

/// Keep the items whose values contain `term`, ignoring case.
///
/// An empty term keeps everything. Order is preserved.
pub fn filtered_view(items: &[InventoryItem], term: &str) -> Vec<InventoryItem> {
    let needle = term.to_lowercase();
    items
        .iter()
        .filter(|item| matches_term(item, &needle))
        .cloned()
        .collect()
}

/// Whether `item` matches an already lower-cased term
pub(crate) fn matches_term(item: &InventoryItem, needle: &str) -> bool {
    needle.is_empty() || item.searchable_text().to_lowercase().contains(needle)
}
