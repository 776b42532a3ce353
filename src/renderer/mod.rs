//! Renderer - Node descriptions to UI nodes.
//!
//! - [`tag`] - Tag specifier parsing (`tag#id.class`)
//! - [`Renderer`] - Recursive rendering, component contexts, in-place re-render
//!
//! # Pipeline
//!
//! ```text
//! Node ──render──► backend nodes (component roots stamped with render ids)
//!                      ▲
//! cell.write ──► find_rendered(id) ──► render component again ──► replace_node
//! ```

pub mod tag;
mod render;

pub use render::Renderer;
pub use tag::{TagSpec, parse_tag};
