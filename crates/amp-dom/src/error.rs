use indextree::{NodeError, NodeId};

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error(transparent)]
    Tree(#[from] NodeError),

    #[error("Node {node:?} does not exist or was removed")]
    UnknownNode { node: NodeId },

    #[error("Node {node:?} is not an element")]
    NotAnElement { node: NodeId },

    #[error("Node {reference:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, reference: NodeId },

    #[error("The document root cannot be removed")]
    RemoveRoot,
}
