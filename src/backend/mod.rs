//! UI Backend - The capabilities the renderer needs from a UI toolkit.
//!
//! The renderer never touches a concrete DOM. It drives a [`Backend`], which
//! can be a browser binding, a native toolkit, or the in-memory [`Document`]
//! shipped here for tests and headless use.
//!
//! # Contract
//!
//! - Handles (`Backend::Node`) are cheap to clone and identify one node.
//! - `find_by_attribute` only sees nodes attached to the document. A node
//!   replaced or removed from the tree must no longer be found; this is what
//!   lets cells drop subscribers whose UI is gone.
//! - Every method takes `&self`. Handlers bound through `bind_handler` may
//!   write cells, which re-renders through the same backend, so
//!   implementations must not hold internal borrows while calling out.

mod document;

pub use document::{Document, DomNode};

use crate::error::BackendError;
use crate::types::Callback;

pub trait Backend {
    /// Handle to one UI node.
    type Node: Clone + std::fmt::Debug;

    /// Create a detached element node.
    fn create_element(&self, tag: &str) -> Result<Self::Node, BackendError>;

    /// Create a detached text node.
    fn create_text(&self, text: &str) -> Result<Self::Node, BackendError>;

    /// Set a plain attribute, replacing any previous value.
    fn set_attribute(
        &self,
        node: &Self::Node,
        name: &str,
        value: &str,
    ) -> Result<(), BackendError>;

    /// Bind a live handler property (e.g. `onclick`).
    fn bind_handler(
        &self,
        node: &Self::Node,
        name: &str,
        handler: Callback,
    ) -> Result<(), BackendError>;

    /// Add one class token.
    fn add_class(&self, node: &Self::Node, class: &str) -> Result<(), BackendError>;

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere.
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), BackendError>;

    /// Put `new` where `old` currently is. `old` ends up detached.
    fn replace_node(&self, old: &Self::Node, new: &Self::Node) -> Result<(), BackendError>;

    /// Detach `node` from its parent.
    fn remove_node(&self, node: &Self::Node) -> Result<(), BackendError>;

    /// First attached element whose attribute `name` equals `value`.
    fn find_by_attribute(&self, name: &str, value: &str) -> Option<Self::Node>;
}
