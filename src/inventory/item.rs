//! Inventory records

use serde::Serialize;
use std::collections::BTreeMap;

use crate::firestore::{DocumentSnapshot, FieldValue};

/// Field names every part record is expected to carry
pub mod fields {
    /// Name of the part
    pub const PART_NAME: &str = "PartName";
    /// Manufacturer part number
    pub const PART_NUMBER: &str = "PartNumber";
    /// Where the part is stored
    pub const LOCATION: &str = "Location";
    /// Who makes the part
    pub const MANUFACTURER: &str = "Manufacturer";
    /// How many are on hand
    pub const QUANTITY: &str = "Quantity";
    /// Image URI
    pub const IMAGE: &str = "Image";
}

/// One part record.
///
/// The conventional fields are optional since nothing enforces the schema.
/// Any other attribute is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct InventoryItem {
    /// Backend assigned identifier
    pub id: String,

    #[serde(rename = "PartName", skip_serializing_if = "Option::is_none")]
    pub part_name: Option<String>,

    #[serde(rename = "PartNumber", skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,

    #[serde(rename = "Location", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(rename = "Manufacturer", skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    #[serde(rename = "Quantity", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,

    /// Image URI
    #[serde(rename = "Image", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Attributes outside the conventional set, by name
    #[serde(flatten)]
    pub extra: BTreeMap<String, FieldValue>,
}

impl InventoryItem {
    /// Create an item with only an id
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }

    /// Merge a document's field map with its id
    pub fn from_snapshot(snapshot: DocumentSnapshot) -> Self {
        let mut item = Self::new(&snapshot.id);
        for (name, value) in snapshot.fields {
            item.set_field(name, value);
        }
        item
    }

    /// Store a field, routing conventional names to their slots
    pub fn set_field(&mut self, name: String, value: FieldValue) {
        let slot = match name.as_str() {
            fields::PART_NAME => &mut self.part_name,
            fields::PART_NUMBER => &mut self.part_number,
            fields::LOCATION => &mut self.location,
            fields::MANUFACTURER => &mut self.manufacturer,
            fields::QUANTITY => &mut self.quantity,
            fields::IMAGE => &mut self.image,
            _ => {
                self.extra.insert(name, value);
                return;
            }
        };
        *slot = match value {
            FieldValue::Null => None,
            other => Some(other.to_text()),
        };
    }

    /// Builder form of [`set_field`](Self::set_field)
    pub fn with_field<V: Into<FieldValue>>(mut self, name: &str, value: V) -> Self {
        self.set_field(name.to_string(), value.into());
        self
    }

    fn conventional(&self) -> [(&'static str, Option<&str>); 6] {
        [
            (fields::PART_NAME, self.part_name.as_deref()),
            (fields::PART_NUMBER, self.part_number.as_deref()),
            (fields::LOCATION, self.location.as_deref()),
            (fields::MANUFACTURER, self.manufacturer.as_deref()),
            (fields::QUANTITY, self.quantity.as_deref()),
            (fields::IMAGE, self.image.as_deref()),
        ]
    }

    /// Text matched by the search box: every value including the id,
    /// concatenated without separators.
    pub fn searchable_text(&self) -> String {
        let mut out = self.id.clone();
        for (_, value) in self.conventional() {
            if let Some(value) = value {
                out.push_str(value);
            }
        }
        for value in self.extra.values() {
            out.push_str(&value.to_text());
        }
        out
    }

    /// Labelled values shown on the item's card; `id` and `Image` are hidden
    pub fn display_fields(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .conventional()
            .into_iter()
            .filter(|(name, _)| *name != fields::IMAGE)
            .filter_map(|(name, value)| value.map(|v| (name.to_string(), v.to_string())))
            .collect();
        out.extend(
            self.extra
                .iter()
                .map(|(name, value)| (name.clone(), value.to_text())),
        );
        out
    }

    /// The image URI, when present and non-blank
    pub fn image_uri(&self) -> Option<&str> {
        self.image.as_deref().filter(|s| !s.trim().is_empty())
    }
}

impl From<DocumentSnapshot> for InventoryItem {
    fn from(snapshot: DocumentSnapshot) -> Self {
        Self::from_snapshot(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valve() -> InventoryItem {
        InventoryItem::from_snapshot(
            DocumentSnapshot::new("v1")
                .with_field("PartName", "Gas Valve")
                .with_field("PartNumber", "VR8205")
                .with_field("Quantity", 4_i64)
                .with_field("Image", "gs://demo.appspot.com/valve.png")
                .with_field("Shelf", "B2")
                .with_field("Obsolete", false),
        )
    }

    #[test]
    fn test_from_snapshot_routes_fields() {
        let item = valve();
        assert_eq!(item.id, "v1");
        assert_eq!(item.part_name.as_deref(), Some("Gas Valve"));
        assert_eq!(item.quantity.as_deref(), Some("4"));
        assert_eq!(item.location, None);
        assert_eq!(item.extra.len(), 2);
        assert_eq!(item.extra["Shelf"], FieldValue::from("B2"));
    }

    #[test]
    fn test_searchable_text_includes_id_and_image() {
        assert_eq!(
            valve().searchable_text(),
            "v1Gas ValveVR82054gs://demo.appspot.com/valve.pngfalseB2"
        );
    }

    #[test]
    fn test_display_fields_hide_id_and_image() {
        let labels: Vec<String> = valve().display_fields().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            labels,
            vec!["PartName", "PartNumber", "Quantity", "Obsolete", "Shelf"]
        );
    }

    #[test]
    fn test_null_values_show_empty() {
        let item = InventoryItem::new("n1")
            .with_field("PartName", FieldValue::Null)
            .with_field("Notes", FieldValue::Null);
        assert_eq!(item.part_name, None);
        assert_eq!(item.searchable_text(), "n1");
        assert_eq!(
            item.display_fields(),
            vec![("Notes".to_string(), String::new())]
        );
    }

    #[test]
    fn test_blank_image_is_none() {
        let item = InventoryItem::new("x").with_field("Image", "  ");
        assert_eq!(item.image_uri(), None);
        assert_eq!(valve().image_uri(), Some("gs://demo.appspot.com/valve.png"));
    }

    #[test]
    fn test_serializes_with_field_names() {
        let json = serde_json::to_value(valve()).unwrap();
        assert_eq!(json["id"], "v1");
        assert_eq!(json["PartName"], "Gas Valve");
        assert!(json.get("Location").is_none());
        assert_eq!(json["Shelf"], serde_json::json!({ "stringValue": "B2" }));
    }
}
