//! Markup for the published page and the editor canvas.
//!
//! Both paths take their class and style from [`synthesize`], so what the
//! editor shows is exactly what gets saved.

use artsolio_accent_config::OffsetStyle;
use html_escape::encode_double_quoted_attribute;
use serde::Serialize;
use std::fmt::Write;

use crate::model::{AccentConfig, ImageDescriptor};
use crate::style::{RenderProps, synthesize};

pub const IMAGE_STYLE: &str = "display:block;width:100%;max-width:100%;height:auto";

/// What the editor canvas draws for one accent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorView {
    pub props: RenderProps,
    /// No image picked yet; the editor shows a media placeholder
    pub show_placeholder: bool,
}

pub fn render_editor(config: &AccentConfig, strategy: OffsetStyle) -> EditorView {
    EditorView {
        props: synthesize(config, strategy),
        show_placeholder: config.image.is_empty(),
    }
}

/// Saved markup: a `<figure>` wrapping the image, or an empty figure when
/// no image is set
pub fn render_static(config: &AccentConfig, strategy: OffsetStyle) -> String {
    let props = synthesize(config, strategy);
    let mut html = String::new();

    let _ = write!(
        html,
        r#"<figure class="{}" style="{}">"#,
        encode_double_quoted_attribute(&props.class_name),
        encode_double_quoted_attribute(&props.style.to_css_text()),
    );
    if !config.image.is_empty() {
        push_image(&mut html, &config.image);
    }
    html.push_str("</figure>");
    html
}

fn push_image(html: &mut String, image: &ImageDescriptor) {
    let _ = write!(
        html,
        r#"<img src="{}" alt="{}" decoding="async" loading="lazy" draggable="false""#,
        encode_double_quoted_attribute(&image.url),
        encode_double_quoted_attribute(&image.alt),
    );
    if let Some(width) = image.width {
        let _ = write!(html, r#" width="{width}""#);
    }
    if let Some(height) = image.height {
        let _ = write!(html, r#" height="{height}""#);
    }
    if let Some(srcset) = image.srcset.as_deref().filter(|s| !s.is_empty()) {
        let _ = write!(html, r#" srcset="{}""#, encode_double_quoted_attribute(srcset));
    }
    if let Some(sizes) = image.sizes.as_deref().filter(|s| !s.is_empty()) {
        let _ = write!(html, r#" sizes="{}""#, encode_double_quoted_attribute(sizes));
    }
    let _ = write!(html, r#" style="{IMAGE_STYLE}"/>"#);
}
