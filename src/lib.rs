//! # spark-dom
//!
//! Minimal reactive DOM renderer for Rust.
//!
//! ## Architecture
//!
//! Components are plain functions returning a [`Node`] description. The
//! [`Renderer`] turns descriptions into UI nodes through a [`Backend`], and
//! runs every component inside a render context. [`ReactiveCell`] reads made
//! while a context is active subscribe that context; writing the cell renders
//! the component again and swaps the new node in for the old one.
//!
//! ```text
//! render(component) ─► push context ─► component() ─► cell.get() subscribes
//!                   ◄─ pop context  ◄─ stamp root node with render id
//!
//! cell.write(v) ─► for each subscriber: find node by render id
//!                    found:   render component again, replace node
//!                    missing: drop subscriber
//! ```
//!
//! There is no diffing, no batching and no eager unsubscription: a write
//! replaces whole component subtrees, synchronously, once per subscriber.
//!
//! ## Modules
//!
//! - [`types`] - Node descriptions (`Node`, `Element`, `Component`)
//! - [`engine`] - Render ids and the context stack
//! - [`renderer`] - Tag parsing and the `Renderer`
//! - [`state`] - `ReactiveCell`
//! - [`backend`] - The `Backend` trait and the in-memory `Document`
//! - [`config`] - `RenderConfig`
//! - [`error`] - Error types
//!
//! ## Logging
//!
//! Renders and re-renders are reported through [`tracing`] at `debug`,
//! subscription bookkeeping at `trace`. Install any subscriber to see them.

pub mod backend;
pub mod config;
pub mod engine;
pub mod error;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use backend::{Backend, Document, DomNode};

pub use config::RenderConfig;

pub use engine::{
    ContextGuard, RenderContext, RenderHost, RenderId, allocate_render_id, context_depth,
    current_context, enter_context, reset_registry,
};

pub use error::{BackendError, ConfigError, FragmentKind, RenderError, TagParseError};

pub use renderer::{Renderer, TagSpec, parse_tag};

pub use state::{Read, ReactiveCell, cell};
