use indexmap::IndexMap;

/// Element attributes. Lookups are by name; insertion order only matters for snapshots.
pub type Attributes = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NodeKind {
    #[default]
    Document,
    Element {
        tag: String,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeData {
    pub kind: NodeKind,
    pub attrs: Attributes,
}

impl NodeData {
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Element {
                // HTML tag names are case-insensitive; the parser upstream hands them over lower-cased
                // but passes may create elements themselves.
                tag: tag.into().to_ascii_lowercase(),
            },
            attrs: Attributes::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text { text: text.into() },
            attrs: Attributes::new(),
        }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Comment { text: text.into() },
            attrs: Attributes::new(),
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag.as_str()),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }
}
