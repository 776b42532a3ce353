//! State Module - Reactive state.
//!
//! - **Cell** - [`ReactiveCell`], a value that re-renders the components
//!   that read it whenever it is written

mod cell;

pub use cell::*;
