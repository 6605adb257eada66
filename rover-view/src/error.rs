use crate::view::{NodeId, PropKey};
use thiserror::Error;

/// Failures that abort a build, mount or copy
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("pass-through view {view} ({node:?}) has no rendered output to mount")]
    EmptyPassThrough { node: NodeId, view: &'static str },

    #[error("view {0} has no registered constructor and cannot be copied")]
    NotConstructible(&'static str),

    #[error("{0:?} was re-rendered before its tree was built")]
    NotBuilt(NodeId),
}

pub type Result<T> = std::result::Result<T, ViewError>;

/// Non-fatal problems reported while binding props and refs.
///
/// These never interrupt a render cycle; they are logged and forwarded to
/// observers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A prop value could not be assigned to its bound field
    #[error("prop '{prop}' on {view} ({node:?}) expects {expected} but got {found}; field left unchanged")]
    BindingMismatch {
        node: NodeId,
        view: &'static str,
        prop: PropKey,
        expected: &'static str,
        found: &'static str,
    },
    /// A declared `ref` found no matching or compatible field on its owner
    #[error("ref '{name}' from {target:?} has no compatible field on {view} ({owner:?})")]
    ReferenceUnresolved {
        owner: NodeId,
        view: &'static str,
        target: NodeId,
        name: PropKey,
    },
}
