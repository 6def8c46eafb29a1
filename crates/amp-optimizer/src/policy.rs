use amp_dom::{Document, NodeId};

/// Extensions that need the runtime to run before first paint. Declaring any of them in `<head>`
/// keeps the boilerplate in place.
pub const RENDER_DELAYING_EXTENSIONS: &[&str] =
    &["amp-dynamic-css-classes", "amp-experiment", "amp-story"];

/// Component kinds that are never laid out statically: their size depends on the browser.
pub const ALWAYS_RENDER_DELAYING_ELEMENTS: &[&str] = &["amp-audio"];

/// `true` for a `<script custom-element="…">` declaring a render-delaying extension.
pub fn blocks_boilerplate_removal(doc: &Document, node: NodeId) -> bool {
    render_delaying_extension(doc, node).is_some()
}

pub(crate) fn render_delaying_extension(doc: &Document, node: NodeId) -> Option<&str> {
    if !doc.has_tag(node, "script") {
        return None;
    }
    doc.attr(node, "custom-element")
        .filter(|name| RENDER_DELAYING_EXTENSIONS.contains(name))
}

pub fn is_always_render_delaying(tag: &str) -> bool {
    ALWAYS_RENDER_DELAYING_ELEMENTS.contains(&tag)
}

pub fn is_custom_element(tag: &str) -> bool {
    tag.starts_with("amp-")
}
