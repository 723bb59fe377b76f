//! Typed document values

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Keys of the value kinds decoded into typed variants
const KNOWN_KINDS: [&str; 11] = [
    "nullValue",
    "booleanValue",
    "integerValue",
    "doubleValue",
    "timestampValue",
    "stringValue",
    "bytesValue",
    "referenceValue",
    "geoPointValue",
    "arrayValue",
    "mapValue",
];

/// A single field value stored in a document
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum FieldValue {
    /// Null
    Null,

    /// Boolean
    Boolean(bool),

    /// 64-bit integer
    Integer(i64),

    /// Double precision float
    Double(f64),

    /// RFC 3339 timestamp, kept as sent
    Timestamp(String),

    /// UTF-8 string
    String(String),

    /// Base64 encoded bytes
    Bytes(String),

    /// Path of another document
    Reference(String),

    /// Latitude/longitude pair
    GeoPoint {
        /// Latitude in degrees
        latitude: f64,
        /// Longitude in degrees
        longitude: f64,
    },

    /// Array of values
    Array(Vec<FieldValue>),

    /// Nested map of values
    Map(BTreeMap<String, FieldValue>),

    /// A value kind this client does not model, kept as received
    Unknown(serde_json::Value),
}

impl FieldValue {
    /// Text shown on cards and matched by search.
    ///
    /// Same as `Display` except that null reads as empty text.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::String(s) => s.clone(),
            FieldValue::Array(values) => values
                .iter()
                .map(FieldValue::to_text)
                .collect::<Vec<_>>()
                .join(","),
            FieldValue::Map(fields) => {
                let inner: Vec<String> = fields
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, value.to_text()))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
            other => other.to_string(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Double(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

/// Textual form of a value; null prints as `null`
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Double(d) => write!(f, "{}", d),
            FieldValue::Timestamp(s)
            | FieldValue::String(s)
            | FieldValue::Bytes(s)
            | FieldValue::Reference(s) => f.write_str(s),
            FieldValue::GeoPoint {
                latitude,
                longitude,
            } => write!(f, "{},{}", latitude, longitude),
            FieldValue::Array(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", value)?;
                }
                Ok(())
            }
            FieldValue::Map(fields) => {
                f.write_str("{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
            FieldValue::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match WireValue::try_from(self.clone()) {
            Ok(wire) => wire.serialize(serializer),
            Err(raw) => raw.serialize(serializer),
        }
    }
}

// REST encoding: an object with exactly one `<type>Value` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
enum WireValue {
    NullValue(serde_json::Value),
    BooleanValue(bool),
    IntegerValue(String),
    DoubleValue(WireDouble),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(WireLatLng),
    ArrayValue(WireArray),
    MapValue(WireMap),
}

// Non-finite doubles travel as the strings "NaN", "Infinity", "-Infinity".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum WireDouble {
    Number(f64),
    Text(String),
}

impl TryFrom<WireDouble> for f64 {
    type Error = String;

    fn try_from(value: WireDouble) -> Result<Self, Self::Error> {
        match value {
            WireDouble::Number(d) => Ok(d),
            WireDouble::Text(s) => match s.as_str() {
                "NaN" => Ok(f64::NAN),
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                _ => Err(format!("invalid doubleValue {:?}", s)),
            },
        }
    }
}

impl From<f64> for WireDouble {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            WireDouble::Text("NaN".to_string())
        } else if value == f64::INFINITY {
            WireDouble::Text("Infinity".to_string())
        } else if value == f64::NEG_INFINITY {
            WireDouble::Text("-Infinity".to_string())
        } else {
            WireDouble::Number(value)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireLatLng {
    #[serde(default)]
    latitude: f64,
    #[serde(default)]
    longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireArray {
    #[serde(default)]
    values: Vec<FieldValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireMap {
    #[serde(default)]
    fields: BTreeMap<String, FieldValue>,
}

impl TryFrom<serde_json::Value> for FieldValue {
    type Error = String;

    fn try_from(raw: serde_json::Value) -> Result<Self, Self::Error> {
        let known = match raw.as_object() {
            Some(object) => {
                object.len() == 1 && object.keys().all(|k| KNOWN_KINDS.contains(&k.as_str()))
            }
            None => return Err(format!("expected a value object, got {}", raw)),
        };
        if !known {
            return Ok(FieldValue::Unknown(raw));
        }
        let wire: WireValue = serde_json::from_value(raw).map_err(|e| e.to_string())?;
        FieldValue::try_from(wire)
    }
}

impl TryFrom<WireValue> for FieldValue {
    type Error = String;

    fn try_from(value: WireValue) -> Result<Self, Self::Error> {
        Ok(match value {
            WireValue::NullValue(_) => FieldValue::Null,
            WireValue::BooleanValue(b) => FieldValue::Boolean(b),
            WireValue::IntegerValue(s) => FieldValue::Integer(
                s.parse()
                    .map_err(|e| format!("invalid integerValue {:?}: {}", s, e))?,
            ),
            WireValue::DoubleValue(d) => FieldValue::Double(f64::try_from(d)?),
            WireValue::TimestampValue(s) => FieldValue::Timestamp(s),
            WireValue::StringValue(s) => FieldValue::String(s),
            WireValue::BytesValue(s) => FieldValue::Bytes(s),
            WireValue::ReferenceValue(s) => FieldValue::Reference(s),
            WireValue::GeoPointValue(p) => FieldValue::GeoPoint {
                latitude: p.latitude,
                longitude: p.longitude,
            },
            WireValue::ArrayValue(a) => FieldValue::Array(a.values),
            WireValue::MapValue(m) => FieldValue::Map(m.fields),
        })
    }
}

impl TryFrom<FieldValue> for WireValue {
    type Error = serde_json::Value;

    fn try_from(value: FieldValue) -> Result<Self, Self::Error> {
        Ok(match value {
            FieldValue::Null => WireValue::NullValue(serde_json::Value::Null),
            FieldValue::Boolean(b) => WireValue::BooleanValue(b),
            FieldValue::Integer(i) => WireValue::IntegerValue(i.to_string()),
            FieldValue::Double(d) => WireValue::DoubleValue(WireDouble::from(d)),
            FieldValue::Timestamp(s) => WireValue::TimestampValue(s),
            FieldValue::String(s) => WireValue::StringValue(s),
            FieldValue::Bytes(s) => WireValue::BytesValue(s),
            FieldValue::Reference(s) => WireValue::ReferenceValue(s),
            FieldValue::GeoPoint {
                latitude,
                longitude,
            } => WireValue::GeoPointValue(WireLatLng {
                latitude,
                longitude,
            }),
            FieldValue::Array(values) => WireValue::ArrayValue(WireArray { values }),
            FieldValue::Map(fields) => WireValue::MapValue(WireMap { fields }),
            FieldValue::Unknown(raw) => return Err(raw),
        })
    }
}
