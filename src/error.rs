//! Error types.
//!
//! The renderer fails on malformed descriptions and on backend refusals.
//! Stale subscribers are not errors.

use thiserror::Error;

// =============================================================================
// Tag Specifier Errors
// =============================================================================

/// Which kind of suffix fragment a tag specifier error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// `#id`
    Id,
    /// `.class`
    Class,
}

impl std::fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FragmentKind::Id => f.write_str("id"),
            FragmentKind::Class => f.write_str("class"),
        }
    }
}

/// A tag specifier such as `button#go.primary` could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagParseError {
    #[error("tag specifier `{spec}` has no leading tag name")]
    MissingTagName { spec: String },

    #[error("tag specifier `{spec}` has invalid tag name `{name}`")]
    InvalidTagName { spec: String, name: String },

    #[error("tag specifier `{spec}` has an empty {kind} fragment at byte {position}")]
    EmptyFragment {
        spec: String,
        kind: FragmentKind,
        position: usize,
    },
}

// =============================================================================
// Backend Errors
// =============================================================================

/// A UI backend refused an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Attributes, classes and handlers only exist on elements.
    #[error("node is not an element")]
    NotAnElement,

    /// The node has no parent to be replaced or removed from.
    #[error("node is not attached to a parent")]
    Detached,

    /// The handle does not belong to this backend.
    #[error("unknown node handle {0}")]
    UnknownNode(usize),

    /// Appending would make a node its own ancestor.
    #[error("appending would create a cycle in the node tree")]
    HierarchyCycle,
}

// =============================================================================
// Render Errors
// =============================================================================

/// Failure while rendering or re-rendering a node description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error(transparent)]
    Tag(#[from] TagParseError),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// An element set the attribute used to stamp render ids.
    #[error("attribute `{0}` is reserved for render ids")]
    ReservedAttribute(String),
}

// =============================================================================
// Config Errors
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid render id attribute name `{0}`")]
    InvalidAttributeName(String),
}
