//! Render Registry - Id allocation and the context stack.
//!
//! Manages the "who is currently rendering" state:
//! - Monotonic render id counter
//! - Context stack for nested component rendering
//!
//! The stack is thread-local and only ever changed through [`ContextGuard`],
//! so a component that panics or bails out with `?` still pops its context.

use std::cell::{Cell, RefCell};
use std::marker::PhantomData;

use super::context::{RenderContext, RenderId};

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Next render id to hand out.
    static NEXT_RENDER_ID: Cell<u64> = const { Cell::new(0) };

    /// Stack of contexts whose component is currently executing.
    static CONTEXT_STACK: RefCell<Vec<RenderContext>> = const { RefCell::new(Vec::new()) };
}

// =============================================================================
// Id Allocation
// =============================================================================

/// Allocate a fresh render id. Ids are never reused.
pub fn allocate_render_id() -> RenderId {
    NEXT_RENDER_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        RenderId(id)
    })
}

// =============================================================================
// Context Stack
// =============================================================================

/// The context on top of the stack, if any component is rendering.
pub fn current_context() -> Option<RenderContext> {
    CONTEXT_STACK.with(|stack| stack.borrow().last().cloned())
}

/// Number of contexts currently on the stack.
pub fn context_depth() -> usize {
    CONTEXT_STACK.with(|stack| stack.borrow().len())
}

/// Push `context` and return the guard that pops it.
pub fn enter_context(context: RenderContext) -> ContextGuard {
    let depth = CONTEXT_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        stack.push(context);
        stack.len()
    });
    ContextGuard {
        depth,
        _not_send: PhantomData,
    }
}

/// Scoped ownership of one context stack entry.
///
/// Dropping the guard pops the entry. Guards must be dropped in reverse
/// order of creation, which holds naturally for guards bound to locals.
#[must_use = "the context is popped as soon as the guard is dropped"]
pub struct ContextGuard {
    depth: usize,
    _not_send: PhantomData<*const ()>,
}

impl ContextGuard {
    /// Id of the context this guard owns.
    pub fn id(&self) -> Option<RenderId> {
        CONTEXT_STACK.with(|stack| stack.borrow().get(self.depth - 1).map(|ctx| ctx.id))
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CONTEXT_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.len() != self.depth {
                tracing::error!(
                    expected = self.depth,
                    actual = stack.len(),
                    "context stack popped out of order"
                );
            }
            stack.truncate(self.depth - 1);
        });
    }
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset id counter and context stack (for testing).
pub fn reset_registry() {
    NEXT_RENDER_ID.with(|next| next.set(0));
    CONTEXT_STACK.with(|stack| stack.borrow_mut().clear());
}
