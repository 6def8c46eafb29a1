use serde_json::{Map, Value, json};

use crate::{Document, NodeId, NodeKind};

fn push_non_null(children: &mut Vec<Value>, v: Value) {
    if !v.is_null() {
        children.push(v);
    }
}

fn node_to_json(doc: &Document, id: NodeId) -> Value {
    let Some(data) = doc.node(id) else {
        return Value::Null;
    };
    let children = || {
        let mut out = Vec::new();
        for child in doc.children(id) {
            push_non_null(&mut out, node_to_json(doc, child));
        }
        out
    };
    match &data.kind {
        NodeKind::Document => json!({ "type": "document", "children": children() }),
        NodeKind::Element { tag } => {
            let mut pairs: Vec<(&String, &String)> = data.attrs.iter().collect();
            pairs.sort_by(|a, b| a.0.cmp(b.0));
            let mut attrs = Map::new();
            for (k, v) in pairs {
                attrs.insert(k.clone(), Value::String(v.clone()));
            }
            json!({
                "type": "element",
                "tag": tag,
                "attrs": Value::Object(attrs),
                "children": children(),
            })
        }
        // Whitespace-only text is layout noise for snapshots.
        NodeKind::Text { text } if text.trim().is_empty() => Value::Null,
        NodeKind::Text { text } => json!({ "type": "text", "text": text }),
        NodeKind::Comment { text } => json!({ "type": "comment", "text": text }),
    }
}

impl Document {
    /// Deterministic JSON view of the subtree at `node` (attributes sorted by name).
    ///
    /// Schema:
    /// - Document: `{ "type": "document", "children": [...] }`
    /// - Element: `{ "type": "element", "tag": "div", "attrs": {..}, "children": [...] }`
    /// - Text: `{ "type": "text", "text": "..." }`
    pub fn node_to_json_value(&self, node: NodeId) -> Value {
        node_to_json(self, node)
    }

    pub fn to_json_value(&self) -> Value {
        node_to_json(self, self.root())
    }
}
