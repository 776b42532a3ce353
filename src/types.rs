//! Core types - Node descriptions, attributes, components.
//!
//! A [`Node`] is the data a component returns to describe the UI it wants.
//! The variant is fixed when the description is built, so the renderer never
//! has to guess whether a value is an attribute map, a child, or a handler.
//!
//! ```ignore
//! use spark_dom::{h, Node};
//!
//! let view: Node = h("button#go.primary.large")
//!     .on("onclick", || println!("go!"))
//!     .child("Go")
//!     .into();
//! ```

use std::fmt;
use std::rc::Rc;

// =============================================================================
// Callback Types
// =============================================================================

/// Live handler bound to a UI node (click, input, ...).
///
/// Rc so the same handler can be shared by descriptions rendered repeatedly.
pub type Callback = Rc<dyn Fn()>;

// =============================================================================
// Attribute Values
// =============================================================================

/// Value of one attribute entry in an element description.
#[derive(Clone)]
pub enum AttrValue {
    /// Plain attribute text.
    Static(String),
    /// Bound as a handler property, never serialized as attribute text.
    Handler(Callback),
}

impl AttrValue {
    pub fn as_static(&self) -> Option<&str> {
        match self {
            AttrValue::Static(value) => Some(value),
            AttrValue::Handler(_) => None,
        }
    }

    pub fn is_handler(&self) -> bool {
        matches!(self, AttrValue::Handler(_))
    }
}

impl fmt::Debug for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Static(value) => f.debug_tuple("Static").field(value).finish(),
            AttrValue::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Static(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Static(value)
    }
}

impl From<Callback> for AttrValue {
    fn from(handler: Callback) -> Self {
        AttrValue::Handler(handler)
    }
}

// =============================================================================
// Component
// =============================================================================

/// A renderable unit: a function producing a [`Node`], with its arguments
/// already bound.
///
/// Cloning is cheap and clones share the same function.
#[derive(Clone)]
pub struct Component {
    name: &'static str,
    render: Rc<dyn Fn() -> Node>,
}

impl Component {
    /// Wrap a zero-argument component function.
    pub fn new<F, N>(render: F) -> Self
    where
        F: Fn() -> N + 'static,
        N: Into<Node>,
    {
        Self::named(std::any::type_name::<F>(), render)
    }

    /// Like [`Component::new`] with an explicit name for logs.
    pub fn named<F, N>(name: &'static str, render: F) -> Self
    where
        F: Fn() -> N + 'static,
        N: Into<Node>,
    {
        Self {
            name,
            render: Rc::new(move || render().into()),
        }
    }

    /// Bind an argument to a one-argument component function.
    ///
    /// The argument lives as long as the component and is passed by
    /// reference on every invocation, including re-renders.
    pub fn with<A, F, N>(arg: A, render: F) -> Self
    where
        A: 'static,
        F: Fn(&A) -> N + 'static,
        N: Into<Node>,
    {
        Self {
            name: std::any::type_name::<F>(),
            render: Rc::new(move || render(&arg).into()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether both handles share the same component function.
    pub fn ptr_eq(&self, other: &Component) -> bool {
        Rc::ptr_eq(&self.render, &other.render)
    }

    /// Run the component function.
    ///
    /// Only the renderer should call this; outside a render context any cell
    /// reads inside are untracked.
    pub(crate) fn invoke(&self) -> Node {
        (self.render)()
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component").field("name", &self.name).finish()
    }
}

/// Shorthand for [`Component::new`].
pub fn component<F, N>(render: F) -> Component
where
    F: Fn() -> N + 'static,
    N: Into<Node>,
{
    Component::new(render)
}

// =============================================================================
// Element
// =============================================================================

/// Description of one element: tag specifier, attributes, children.
#[derive(Clone, Debug)]
pub struct Element {
    spec: String,
    attrs: Vec<(String, AttrValue)>,
    children: Vec<Node>,
}

impl Element {
    /// Start an element from a tag specifier like `div#main.card.wide`.
    ///
    /// The specifier is parsed when the element is rendered.
    pub fn new(spec: impl Into<String>) -> Self {
        Self {
            spec: spec.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute. Setting the same key again replaces the value but
    /// keeps its original position.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    /// Bind a handler property, e.g. `on("onclick", ...)`.
    pub fn on(self, name: impl Into<String>, handler: impl Fn() + 'static) -> Self {
        let handler: Callback = Rc::new(handler);
        self.attr(name, AttrValue::Handler(handler))
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn spec(&self) -> &str {
        &self.spec
    }

    pub fn attrs(&self) -> &[(String, AttrValue)] {
        &self.attrs
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }
}

/// Shorthand for [`Element::new`].
pub fn h(spec: impl Into<String>) -> Element {
    Element::new(spec)
}

// =============================================================================
// Node
// =============================================================================

/// Recursive description of desired UI.
#[derive(Clone, Debug, Default)]
pub enum Node {
    /// Renders to nothing.
    #[default]
    Empty,
    /// Text content.
    Text(String),
    /// An element with attributes and children.
    Element(Element),
    /// A nested component, rendered in its own render context.
    Component(Component),
}

impl Node {
    pub fn text(value: impl fmt::Display) -> Self {
        Node::Text(value.to_string())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Node::Empty)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<Component> for Node {
    fn from(component: Component) -> Self {
        Node::Component(component)
    }
}

impl From<()> for Node {
    fn from(_: ()) -> Self {
        Node::Empty
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or(Node::Empty, Into::into)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Text(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Text(value)
    }
}

impl From<&String> for Node {
    fn from(value: &String) -> Self {
        Node::Text(value.clone())
    }
}

macro_rules! text_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(value: $ty) -> Self {
                    Node::Text(value.to_string())
                }
            }
        )*
    };
}

text_from!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char,
);
