//! Render Context - One live invocation of a component.
//!
//! A context exists on the stack while its component runs (`Constructing`).
//! Once popped its id lives on only as an attribute of the root UI node
//! (`Materialized`). When a cell write replaces that node, cells that still
//! hold the id find nothing on lookup and drop it (`Superseded`).

use std::fmt;
use std::num::ParseIntError;
use std::rc::Rc;
use std::str::FromStr;

use crate::error::RenderError;
use crate::types::Component;

// =============================================================================
// Render Id
// =============================================================================

/// Unique, monotonically increasing id of a render context.
///
/// Stamped onto the context's root UI node in decimal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderId(pub(crate) u64);

impl RenderId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RenderId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(RenderId)
    }
}

// =============================================================================
// Render Host
// =============================================================================

/// Something that can re-render a component in place.
///
/// Implemented by [`Renderer`](crate::Renderer) for every backend, so cells
/// can trigger re-renders without knowing the backend type.
pub trait RenderHost {
    /// Render `component` afresh and swap it in for the node stamped `id`.
    ///
    /// Returns `Ok(false)` when no attached node carries `id` anymore.
    fn rerender(&self, id: RenderId, component: &Component) -> Result<bool, RenderError>;
}

// =============================================================================
// Render Context
// =============================================================================

#[derive(Clone)]
pub struct RenderContext {
    pub id: RenderId,
    pub component: Component,
    pub host: Rc<dyn RenderHost>,
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("id", &self.id)
            .field("component", &self.component.name())
            .finish_non_exhaustive()
    }
}
