use amp_dom::{Document, ElementBuilder, NodeId, element};

mod ssr;

pub(crate) fn boilerplate_style() -> ElementBuilder {
    element("style")
        .attr("amp-boilerplate", "")
        .text("body{-webkit-animation:-amp-start 8s steps(1,end) 0s 1 normal both}")
}

pub(crate) fn boilerplate_noscript() -> ElementBuilder {
    element("noscript").child(
        element("style")
            .attr("amp-boilerplate", "")
            .text("body{-webkit-animation:none}"),
    )
}

/// `<html amp>` with the standard boilerplate in head, `head_extra` after it and `body` children.
pub(crate) fn page(
    head_extra: impl IntoIterator<Item = ElementBuilder>,
    body: impl IntoIterator<Item = ElementBuilder>,
) -> Document {
    Document::from_element(
        element("html")
            .attr("amp", "")
            .child(
                element("head")
                    .child(element("meta").attr("charset", "utf-8"))
                    .child(boilerplate_style())
                    .child(boilerplate_noscript())
                    .children(head_extra),
            )
            .child(element("body").children(body)),
    )
    .expect("valid document")
}

pub(crate) fn html(doc: &Document) -> NodeId {
    doc.first_child_by_tag(doc.root(), "html").expect("html")
}

pub(crate) fn head(doc: &Document) -> NodeId {
    doc.first_child_by_tag(html(doc), "head").expect("head")
}

pub(crate) fn body(doc: &Document) -> NodeId {
    doc.first_child_by_tag(html(doc), "body").expect("body")
}

/// First element (document order) with the given `id` attribute.
pub(crate) fn by_id(doc: &Document, id: &str) -> NodeId {
    doc.descendants(doc.root())
        .find(|&n| doc.attr(n, "id") == Some(id))
        .unwrap_or_else(|| panic!("no element with id={id}"))
}

pub(crate) fn child_tags(doc: &Document, parent: NodeId) -> Vec<String> {
    doc.children(parent)
        .filter_map(|n| doc.tag(n).map(str::to_string))
        .collect()
}
