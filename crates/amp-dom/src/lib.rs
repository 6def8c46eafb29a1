#![forbid(unsafe_code)]

//! Mutable HTML node tree used by the AMP optimizer.
//!
//! The optimizer never parses or serializes markup itself: an upstream parser builds a
//! [`Document`] and the transformation passes mutate it in place. The tree is arena-backed, so a
//! [`NodeId`] stays cheap to copy and each node keeps a single non-owning link to its parent.
//!
//! Cursor helpers ([`Document::next_node`], [`Document::skip_subtree`]) mirror the way the
//! optimizer walks a document: depth-first, with the option to jump over an entire subtree
//! (used to bypass `<template>` content).

mod builder;
mod error;
mod node;
mod snapshot;

pub use builder::{ElementBuilder, element};
pub use error::{DomError, Result};
pub use indextree::NodeId;
pub use node::{Attributes, NodeData, NodeKind};

use indextree::Arena;

#[derive(Debug, Clone)]
pub struct Document {
    arena: Arena<NodeData>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeData::default());
        Self { arena, root }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document whose single top-level child is `root` (usually an `<html>` element).
    pub fn from_element(root: ElementBuilder) -> Result<Self> {
        let mut doc = Self::new();
        let parent = doc.root;
        root.append_to(&mut doc, parent)?;
        Ok(doc)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node payload, or `None` for unknown and removed nodes.
    pub fn node(&self, node: NodeId) -> Option<&NodeData> {
        self.arena
            .get(node)
            .filter(|n| !n.is_removed())
            .map(|n| n.get())
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut NodeData> {
        match self.arena.get_mut(node) {
            Some(n) if !n.is_removed() => Ok(n.get_mut()),
            _ => Err(DomError::UnknownNode { node }),
        }
    }

    fn ensure_live(&self, node: NodeId) -> Result<()> {
        match self.node(node) {
            Some(_) => Ok(()),
            None => Err(DomError::UnknownNode { node }),
        }
    }

    pub fn kind(&self, node: NodeId) -> Option<&NodeKind> {
        self.node(node).map(|n| &n.kind)
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.node(node).and_then(NodeData::tag)
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(NodeData::is_element)
    }

    pub fn has_tag(&self, node: NodeId, tag: &str) -> bool {
        self.tag(node) == Some(tag)
    }

    /// Text content of a text or comment node.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match self.kind(node)? {
            NodeKind::Text { text } | NodeKind::Comment { text } => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn attrs(&self, node: NodeId) -> Option<&Attributes> {
        self.node(node).filter(|n| n.is_element()).map(|n| &n.attrs)
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.attrs(node)?.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.attrs(node).is_some_and(|attrs| attrs.contains_key(name))
    }

    pub fn set_attr(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        let data = self.node_mut(node)?;
        if !data.is_element() {
            return Err(DomError::NotAnElement { node });
        }
        data.attrs.insert(name.into(), value.into());
        Ok(())
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> Option<String> {
        let data = self.node_mut(node).ok()?;
        data.attrs.shift_remove(name)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.live(node)?.parent()
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.live(node)?.first_child()
    }

    pub fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.live(node)?.last_child()
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.live(node)?.next_sibling()
    }

    pub fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.live(node)?.previous_sibling()
    }

    fn live(&self, node: NodeId) -> Option<&indextree::Node<NodeData>> {
        self.arena.get(node).filter(|n| !n.is_removed())
    }

    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let first = self.first_child(node);
        std::iter::successors(first, move |id| self.next_sibling(*id))
    }

    pub fn first_child_by_tag(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.children(parent).find(|id| self.has_tag(*id, tag))
    }

    pub fn create_element<K, V>(
        &mut self,
        tag: impl Into<String>,
        attrs: impl IntoIterator<Item = (K, V)>,
    ) -> NodeId
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut data = NodeData::element(tag);
        for (name, value) in attrs {
            data.attrs.insert(name.into(), value.into());
        }
        self.arena.new_node(data)
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.arena.new_node(NodeData::text(text))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.arena.new_node(NodeData::comment(text))
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.ensure_live(parent)?;
        self.ensure_live(child)?;
        child.detach(&mut self.arena);
        parent.checked_append(child, &mut self.arena)?;
        Ok(())
    }

    /// Inserts `child` into `parent` right before `reference`; appends when `reference` is `None`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()> {
        let Some(reference) = reference else {
            return self.append_child(parent, child);
        };
        self.ensure_live(child)?;
        if self.parent(reference) != Some(parent) {
            return Err(DomError::NotAChild { parent, reference });
        }
        child.detach(&mut self.arena);
        reference.checked_insert_before(child, &mut self.arena)?;
        Ok(())
    }

    /// Inserts `child` as the next sibling of `reference`.
    pub fn insert_after(&mut self, reference: NodeId, child: NodeId) -> Result<()> {
        self.ensure_live(reference)?;
        self.ensure_live(child)?;
        child.detach(&mut self.arena);
        reference.checked_insert_after(child, &mut self.arena)?;
        Ok(())
    }

    /// Appends a new text node to `parent`.
    pub fn insert_text(&mut self, parent: NodeId, text: impl Into<String>) -> Result<NodeId> {
        let node = self.create_text(text);
        self.append_child(parent, node)?;
        Ok(node)
    }

    /// Removes `node` together with its whole subtree.
    pub fn remove(&mut self, node: NodeId) -> Result<()> {
        if node == self.root {
            return Err(DomError::RemoveRoot);
        }
        self.ensure_live(node)?;
        node.remove_subtree(&mut self.arena);
        Ok(())
    }

    /// Depth-first (pre-order) successor of `node`, or `None` once the walk is exhausted.
    pub fn next_node(&self, node: NodeId) -> Option<NodeId> {
        self.first_child(node).or_else(|| self.skip_subtree(node))
    }

    /// The node visited right after the entire subtree rooted at `node`, or `None`.
    pub fn skip_subtree(&self, node: NodeId) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            if let Some(next) = self.next_sibling(id) {
                return Some(next);
            }
            current = self.parent(id);
        }
        None
    }

    /// All live nodes below `node` in document order, `node` excluded.
    pub fn descendants(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let end = self.skip_subtree(node);
        let mut current = self.first_child(node);
        std::iter::from_fn(move || {
            let id = current.filter(|id| Some(*id) != end)?;
            current = self.next_node(id);
            Some(id)
        })
    }
}
