//! Resolver: raw attributes and settings to concrete values.
//!
//! All functions are pure and total. Missing or invalid input resolves to
//! an empty string (or `None` for optional image fields), never an error.

use crate::attributes::BlockAttributes;
use crate::css_value::sanitize_length;
use crate::model::{ImageDescriptor, OffsetSetting, SizeSetting, ValueMode};

/// Offsets per axis; an empty string means "not set"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisOffsets {
    pub x: String,
    pub y: String,
}

impl AxisOffsets {
    pub fn uniform(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            x: value.clone(),
            y: value,
        }
    }
}

fn first_non_empty<'a>(candidates: impl IntoIterator<Item = Option<&'a String>>) -> String {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
        .cloned()
        .unwrap_or_default()
}

/// Canonical image from either the structured `image` object or the
/// flattened legacy fields. The structured object wins field by field.
pub fn resolve_image(attrs: &BlockAttributes) -> ImageDescriptor {
    let image = attrs.image.as_ref();

    ImageDescriptor {
        url: first_non_empty([
            image.and_then(|i| i.url.as_ref()),
            attrs.url.as_ref(),
            attrs.image_url.as_ref(),
            attrs.image_url_upper.as_ref(),
            attrs.src.as_ref(),
        ]),
        alt: image
            .and_then(|i| i.alt.clone())
            .or_else(|| attrs.alt.clone())
            .unwrap_or_default(),
        width: image.and_then(|i| i.width).or(attrs.width),
        height: image.and_then(|i| i.height).or(attrs.height),
        srcset: image
            .and_then(|i| i.srcset.clone())
            .or_else(|| attrs.srcset.clone()),
        sizes: image
            .and_then(|i| i.sizes.clone())
            .or_else(|| attrs.sizes.clone()),
    }
}

/// Inline size for the accent.
///
/// Preset mode returns the snapshot stored at selection time rather than a
/// live table lookup, so editing the preset table never moves placed accents.
pub fn resolve_size(size: &SizeSetting) -> String {
    match size.mode {
        ValueMode::Custom => sanitize_length(&size.custom),
        ValueMode::Preset => size.resolved.clone(),
    }
}

/// Offsets for both axes.
///
/// Split mode prefers the axis' custom value, then its resolved preset; it
/// never falls back to a uniform value.
pub fn resolve_offsets(offset: &OffsetSetting) -> AxisOffsets {
    match offset {
        OffsetSetting::Uniform {
            mode: ValueMode::Preset,
            resolved,
            ..
        } => AxisOffsets::uniform(resolved.clone()),
        OffsetSetting::Uniform {
            mode: ValueMode::Custom,
            custom,
            ..
        } => AxisOffsets::uniform(sanitize_length(custom)),
        OffsetSetting::Split {
            x_custom,
            y_custom,
            x_resolved,
            y_resolved,
        } => AxisOffsets {
            x: split_axis(x_custom, x_resolved),
            y: split_axis(y_custom, y_resolved),
        },
    }
}

fn split_axis(custom: &str, resolved: &str) -> String {
    let custom = sanitize_length(custom);
    if custom.is_empty() {
        resolved.to_string()
    } else {
        custom
    }
}

/// Uniform-offset precedence: the axis value, else the uniform value, else `0`
pub fn pick_offset(explicit: &str, uniform: &str) -> String {
    let explicit = explicit.trim();
    let uniform = uniform.trim();
    if !explicit.is_empty() {
        explicit.to_string()
    } else if !uniform.is_empty() {
        uniform.to_string()
    } else {
        "0".to_string()
    }
}
