//! Style synthesizer: canonical config to class list and inline style.
//!
//! [`synthesize`] is the single entry point for both the editable and the
//! published render paths, which is what keeps the two byte-identical.

use artsolio_accent_config::OffsetStyle;
use serde::Serialize;
use std::fmt;

use crate::model::{AccentConfig, Corner};
use crate::resolve::{AxisOffsets, resolve_offsets, resolve_size};

/// Base stacking value for accents; parents may override it through
/// [`Z_VAR`]
pub const ACCENT_Z_BASE: u32 = 12000;

pub const BASE_CLASS: &str = "artsolio-accent";
pub const HIDDEN_MOBILE_CLASS: &str = "is-hidden-mobile";

pub const SIZE_VAR: &str = "--artsolio_accent_size";
pub const Z_VAR: &str = "--artsolio_accent_z";
pub const OFFSET_VAR: &str = "--artsolio_accent_offset";
pub const OFFSET_X_VAR: &str = "--artsolio_accent_offset_x";
pub const OFFSET_Y_VAR: &str = "--artsolio_accent_offset_y";

pub const AUTO: &str = "auto";

/// Inline position for each side, a length or `auto`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sides {
    pub top: String,
    pub right: String,
    pub bottom: String,
    pub left: String,
}

impl Default for Sides {
    fn default() -> Self {
        Self {
            top: AUTO.into(),
            right: AUTO.into(),
            bottom: AUTO.into(),
            left: AUTO.into(),
        }
    }
}

/// Place `ox`/`oy` on the two sides that meet at `corner`; the others stay `auto`
pub fn compute_sides(corner: Corner, ox: &str, oy: &str) -> Sides {
    let mut sides = Sides::default();
    match corner {
        Corner::TopLeft => {
            sides.top = oy.into();
            sides.left = ox.into();
        }
        Corner::TopRight => {
            sides.top = oy.into();
            sides.right = ox.into();
        }
        Corner::BottomLeft => {
            sides.bottom = oy.into();
            sides.left = ox.into();
        }
        Corner::BottomRight => {
            sides.bottom = oy.into();
            sides.right = ox.into();
        }
    }
    sides
}

/// Ordered CSS declarations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyleMap {
    declarations: Vec<(String, String)>,
}

impl StyleMap {
    /// Set a declaration, replacing an existing one in place
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        match self.declarations.iter_mut().find(|(p, _)| *p == property) {
            Some((_, existing)) => *existing = value,
            None => self.declarations.push((property, value)),
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(p, v)| (p.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// `prop:value;prop:value`, the form written into a `style` attribute
    pub fn to_css_text(&self) -> String {
        self.iter()
            .map(|(p, v)| format!("{p}:{v}"))
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl fmt::Display for StyleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css_text())
    }
}

/// Inline style for an accent.
///
/// Position and the z-index indirection are always present; the size
/// variable only when a size resolved. Offsets follow `strategy`.
pub fn compute_style(
    size: &str,
    corner: Corner,
    offsets: &AxisOffsets,
    strategy: OffsetStyle,
) -> StyleMap {
    let mut style = StyleMap::default();
    if !size.is_empty() {
        style.set(SIZE_VAR, size);
    }
    style.set(Z_VAR, ACCENT_Z_BASE.to_string());

    match strategy {
        OffsetStyle::CustomProperties => {
            if offsets.x == offsets.y {
                if !offsets.x.is_empty() {
                    style.set(OFFSET_VAR, offsets.x.as_str());
                }
            } else {
                if !offsets.x.is_empty() {
                    style.set(OFFSET_X_VAR, offsets.x.as_str());
                }
                if !offsets.y.is_empty() {
                    style.set(OFFSET_Y_VAR, offsets.y.as_str());
                }
            }
            style.set("position", "absolute");
            style.set("z-index", format!("var({Z_VAR}, {ACCENT_Z_BASE})"));
        }
        OffsetStyle::InlineSides => {
            if !size.is_empty() {
                style.set("inline-size", size);
            }
            style.set("position", "absolute");
            style.set("z-index", format!("var({Z_VAR}, {ACCENT_Z_BASE})"));

            let ox = if offsets.x.is_empty() {
                "0"
            } else {
                offsets.x.as_str()
            };
            let oy = if offsets.y.is_empty() {
                "0"
            } else {
                offsets.y.as_str()
            };
            let sides = compute_sides(corner, ox, oy);
            style.set("top", sides.top);
            style.set("right", sides.right);
            style.set("bottom", sides.bottom);
            style.set("left", sides.left);
        }
    }

    style
}

/// `artsolio-accent is-<corner>`, plus the mobile-hiding class when asked
pub fn compute_class_name(corner: Corner, hide_on_mobile: bool) -> String {
    let mut classes = vec![BASE_CLASS.to_string(), format!("is-{corner}")];
    if hide_on_mobile {
        classes.push(HIDDEN_MOBILE_CLASS.to_string());
    }
    classes.join(" ")
}

/// What the rendering surface consumes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderProps {
    pub class_name: String,
    pub style: StyleMap,
}

pub fn synthesize(config: &AccentConfig, strategy: OffsetStyle) -> RenderProps {
    let size = resolve_size(&config.size);
    let offsets = resolve_offsets(&config.offset);
    RenderProps {
        class_name: compute_class_name(config.corner, config.hide_on_mobile),
        style: compute_style(&size, config.corner, &offsets, strategy),
    }
}
