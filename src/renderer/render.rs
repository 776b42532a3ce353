//! Renderer - Materializes node descriptions through a backend.
//!
//! # Algorithm
//!
//! 1. `Empty` renders to nothing
//! 2. `Text` becomes a text node
//! 3. `Element`: parse the tag specifier, create the element, apply
//!    attributes (handlers bound, statics set), classes, then id, and append
//!    each rendered child in order
//! 4. `Component`: allocate a render id, push a context, invoke the component,
//!    render its description, stamp the root node with the id, pop
//!
//! Step 4 pops through a [`ContextGuard`](crate::engine::ContextGuard), so the
//! stack stays balanced when rendering fails or the component panics.
//!
//! A component whose description is itself a component shares its root node
//! with it, and a node carries one stamp. The inner component is therefore
//! invoked inside the outer context: its reads subscribe the id that is
//! actually stamped, and re-rendering the outer component re-invokes it.
//!
//! A component that renders nothing leaves no stamped node. If a re-render
//! produces nothing, its old node is removed and the next write drops the
//! subscription; the component does not come back when its cells change
//! again.

use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::backend::Backend;
use crate::config::RenderConfig;
use crate::engine::{RenderContext, RenderHost, RenderId, allocate_render_id, enter_context};
use crate::error::{ConfigError, RenderError};
use crate::types::{AttrValue, Component, Element, Node};

use super::tag::parse_tag;

/// Turns [`Node`] descriptions into backend nodes and keeps them reactive.
///
/// Cloning is cheap; clones share the backend and config.
pub struct Renderer<B: Backend> {
    backend: Rc<B>,
    config: Rc<RenderConfig>,
}

impl<B: Backend> Clone for Renderer<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            config: self.config.clone(),
        }
    }
}

impl<B: Backend + 'static> Renderer<B> {
    /// Renderer with the default [`RenderConfig`].
    pub fn new(backend: B) -> Self {
        Self {
            backend: Rc::new(backend),
            config: Rc::new(RenderConfig::default()),
        }
    }

    pub fn with_config(backend: B, config: RenderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            backend: Rc::new(backend),
            config: Rc::new(config),
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Render a description. `Ok(None)` means it rendered to nothing.
    ///
    /// Elements may not set the render id attribute themselves; that fails
    /// with [`RenderError::ReservedAttribute`].
    pub fn render(&self, node: &Node) -> Result<Option<B::Node>, RenderError> {
        match node {
            Node::Empty => Ok(None),
            Node::Text(text) => Ok(Some(self.backend.create_text(text)?)),
            Node::Element(element) => self.render_element(element).map(Some),
            Node::Component(component) => self.render_component(component),
        }
    }

    /// Render `node` and append the result to `parent`.
    ///
    /// This is the application entry point: mount the root component into a
    /// container that is already part of the document.
    pub fn mount(&self, parent: &B::Node, node: &Node) -> Result<Option<B::Node>, RenderError> {
        let rendered = self.render(node)?;
        if let Some(child) = &rendered {
            self.backend.append_child(parent, child)?;
        }
        Ok(rendered)
    }

    fn render_element(&self, element: &Element) -> Result<B::Node, RenderError> {
        let spec = parse_tag(element.spec())?;
        let node = self.backend.create_element(spec.tag)?;

        for (name, value) in element.attrs() {
            if name == &self.config.id_attribute {
                return Err(RenderError::ReservedAttribute(name.clone()));
            }
            match value {
                AttrValue::Handler(handler) => {
                    self.backend.bind_handler(&node, name, handler.clone())?
                }
                AttrValue::Static(value) => self.backend.set_attribute(&node, name, value)?,
            }
        }
        for class in &spec.classes {
            self.backend.add_class(&node, class)?;
        }
        if let Some(id) = spec.id {
            self.backend.set_attribute(&node, "id", id)?;
        }

        for child in element.child_nodes() {
            if let Some(child) = self.render(child)? {
                self.backend.append_child(&node, &child)?;
            }
        }

        trace!(tag = spec.tag, "rendered element");
        Ok(node)
    }

    fn render_component(&self, component: &Component) -> Result<Option<B::Node>, RenderError> {
        let id = allocate_render_id();
        let _guard = enter_context(RenderContext {
            id,
            component: component.clone(),
            host: Rc::new(self.clone()),
        });

        debug!(render_id = %id, component = component.name(), "rendering component");
        let mut description = component.invoke();
        while let Node::Component(inner) = description {
            trace!(
                render_id = %id,
                component = inner.name(),
                "component shares its root with the caller"
            );
            description = inner.invoke();
        }

        let Some(node) = self.render(&description)? else {
            debug!(render_id = %id, component = component.name(), "component rendered nothing");
            return Ok(None);
        };
        self.stamp(&node, id)?;
        Ok(Some(node))
    }

    // =========================================================================
    // Render Ids
    // =========================================================================

    fn stamp(&self, node: &B::Node, id: RenderId) -> Result<(), RenderError> {
        self.backend
            .set_attribute(node, &self.config.id_attribute, &id.to_string())?;
        Ok(())
    }

    /// The attached node currently stamped with `id`, if any.
    pub fn find_rendered(&self, id: RenderId) -> Option<B::Node> {
        self.backend
            .find_by_attribute(&self.config.id_attribute, &id.to_string())
    }
}

impl<B: Backend + 'static> RenderHost for Renderer<B> {
    fn rerender(&self, id: RenderId, component: &Component) -> Result<bool, RenderError> {
        let Some(old) = self.find_rendered(id) else {
            return Ok(false);
        };

        debug!(render_id = %id, component = component.name(), "re-rendering component");
        match self.render_component(component)? {
            Some(new) => {
                self.stamp(&new, id)?;
                self.backend.replace_node(&old, &new)?;
            }
            None => {
                warn!(
                    render_id = %id,
                    component = component.name(),
                    "component re-rendered to nothing; removing its node"
                );
                self.backend.remove_node(&old)?;
            }
        }
        Ok(true)
    }
}
