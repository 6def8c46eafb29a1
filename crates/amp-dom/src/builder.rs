use crate::{Document, NodeId, Result};

#[derive(Debug, Clone)]
enum Child {
    Element(ElementBuilder),
    Text(String),
}

/// Declarative description of an element subtree, materialized through [`Document`].
///
/// ```
/// use amp_dom::{Document, element};
///
/// let doc = Document::from_element(
///     element("html").child(element("body").child(
///         element("amp-img").attr("width", "300").attr("height", "200"),
///     )),
/// )?;
/// let html = doc.first_child_by_tag(doc.root(), "html").expect("html");
/// assert!(doc.first_child_by_tag(html, "body").is_some());
/// # Ok::<(), amp_dom::DomError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ElementBuilder {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Child>,
}

pub fn element(tag: impl Into<String>) -> ElementBuilder {
    ElementBuilder {
        tag: tag.into(),
        attrs: Vec::new(),
        children: Vec::new(),
    }
}

impl ElementBuilder {
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, child: ElementBuilder) -> Self {
        self.children.push(Child::Element(child));
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ElementBuilder>) -> Self {
        self.children
            .extend(children.into_iter().map(Child::Element));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Child::Text(text.into()));
        self
    }

    /// Creates the subtree inside `doc` and appends it to `parent`.
    pub fn append_to(self, doc: &mut Document, parent: NodeId) -> Result<NodeId> {
        let node = doc.create_element(self.tag, self.attrs);
        doc.append_child(parent, node)?;
        for child in self.children {
            match child {
                Child::Element(el) => {
                    el.append_to(doc, node)?;
                }
                Child::Text(text) => {
                    doc.insert_text(node, text)?;
                }
            }
        }
        Ok(node)
    }
}
