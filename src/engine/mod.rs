//! Render Engine - Render ids and the context stack.
//!
//! The engine owns the process-wide state that links cell reads to the
//! component currently rendering:
//! - Registry: render id allocation and the context stack
//! - Context: the `RenderContext` record and the `RenderHost` seam
//!
//! # Nesting
//!
//! ```text
//! render(App)          stack: [App#0]
//!   render(Counter)    stack: [App#0, Counter#1]   <- cell reads attach to #1
//!   (popped)           stack: [App#0]              <- cell reads attach to #0
//! (popped)             stack: []                   <- cell reads are untracked
//! ```

mod context;
mod registry;

pub use context::*;
pub use registry::*;
