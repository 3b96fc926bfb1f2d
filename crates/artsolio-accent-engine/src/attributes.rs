//! Raw accent-block attributes as the host persists them.
//!
//! Three schema generations are accepted side by side, so every field is
//! optional. A field holding the wrong JSON type reads as absent instead of
//! failing the whole block; nothing here ever rejects an attribute map.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::store::Attributes;

/// Structured image object written by the media picker
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImageAttribute {
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub alt: Option<String>,
    #[serde(default, deserialize_with = "lenient_dimension")]
    pub width: Option<u32>,
    #[serde(default, deserialize_with = "lenient_dimension")]
    pub height: Option<u32>,
    #[serde(default, alias = "srcSet", deserialize_with = "lenient_string")]
    pub srcset: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sizes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockAttributes {
    #[serde(default, deserialize_with = "lenient_string")]
    pub corner: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub hide_on_mobile: Option<bool>,

    // Image, structured and flattened
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<ImageAttribute>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_url: Option<String>,
    #[serde(default, rename = "imageURL", deserialize_with = "lenient_string")]
    pub image_url_upper: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub src: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub alt: Option<String>,
    #[serde(default, deserialize_with = "lenient_dimension")]
    pub width: Option<u32>,
    #[serde(default, deserialize_with = "lenient_dimension")]
    pub height: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub srcset: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sizes: Option<String>,

    // First generation: free strings only
    #[serde(default, deserialize_with = "lenient_string")]
    pub size_value: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub offset_uniform: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub offset_x: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub offset_y: Option<String>,

    // Preset-driven generations
    #[serde(default, deserialize_with = "lenient_string")]
    pub size_mode: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub size_preset: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub size_custom: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub size_resolved: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub offset_split: Option<bool>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub offset_mode: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub offset_preset: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub offset_custom: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub offset_resolved: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub offset_x_custom: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub offset_y_custom: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub offset_x_resolved: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub offset_y_resolved: Option<String>,

    // Parent anchoring
    #[serde(default, deserialize_with = "lenient")]
    pub mark_parent: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub parent_anchoring: Option<bool>,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub anchor_layer: Option<i64>,
}

impl BlockAttributes {
    pub fn from_map(attributes: &Attributes) -> Self {
        // every field is lenient, so only a non-object could fail here
        serde_json::from_value(Value::Object(attributes.clone())).unwrap_or_default()
    }
}

impl From<&Attributes> for BlockAttributes {
    fn from(attributes: &Attributes) -> Self {
        Self::from_map(attributes)
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Strings, plus numbers as their decimal text (`0` is a common offset)
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_dimension<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}
