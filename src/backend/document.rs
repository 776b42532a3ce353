//! In-memory Document - A tiny DOM for tests and headless rendering.
//!
//! Nodes live in an arena owned by the [`Document`] and are addressed by
//! copyable [`DomNode`] handles. The document has a single root, `body`;
//! a node is connected when following parents leads there.
//!
//! Detached nodes are never freed. A document is meant to live for one
//! test or one headless session.

use std::cell::RefCell;
use std::fmt::Write as _;

use super::Backend;
use crate::error::BackendError;
use crate::types::Callback;

// =============================================================================
// Node Storage
// =============================================================================

/// Handle to a node of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomNode(usize);

struct ElementData {
    tag: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    handlers: Vec<(String, Callback)>,
}

enum NodeKind {
    Element(ElementData),
    Text(String),
}

struct NodeData {
    kind: NodeKind,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl NodeData {
    fn element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    fn element_mut(&mut self) -> Result<&mut ElementData, BackendError> {
        match &mut self.kind {
            NodeKind::Element(data) => Ok(data),
            NodeKind::Text(_) => Err(BackendError::NotAnElement),
        }
    }
}

// =============================================================================
// Document
// =============================================================================

pub struct Document {
    nodes: RefCell<Vec<NodeData>>,
    body: DomNode,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing an empty `body`.
    pub fn new() -> Self {
        let body = NodeData {
            kind: NodeKind::Element(ElementData {
                tag: "body".to_string(),
                attributes: Vec::new(),
                classes: Vec::new(),
                handlers: Vec::new(),
            }),
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: RefCell::new(vec![body]),
            body: DomNode(0),
        }
    }

    pub fn body(&self) -> DomNode {
        self.body
    }

    fn push(&self, kind: NodeKind) -> DomNode {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        DomNode(nodes.len() - 1)
    }

    fn check(&self, node: DomNode) -> Result<(), BackendError> {
        if node.0 < self.nodes.borrow().len() {
            Ok(())
        } else {
            Err(BackendError::UnknownNode(node.0))
        }
    }

    fn read<R>(&self, node: DomNode, f: impl FnOnce(&NodeData) -> R) -> Option<R> {
        self.nodes.borrow().get(node.0).map(f)
    }

    fn write<R>(
        &self,
        node: DomNode,
        f: impl FnOnce(&mut NodeData) -> Result<R, BackendError>,
    ) -> Result<R, BackendError> {
        let mut nodes = self.nodes.borrow_mut();
        let data = nodes.get_mut(node.0).ok_or(BackendError::UnknownNode(node.0))?;
        f(data)
    }

    // -------------------------------------------------------------------------
    // Tree queries
    // -------------------------------------------------------------------------

    pub fn parent(&self, node: DomNode) -> Option<DomNode> {
        self.read(node, |data| data.parent.map(DomNode)).flatten()
    }

    pub fn children(&self, node: DomNode) -> Vec<DomNode> {
        self.read(node, |data| {
            data.children.iter().copied().map(DomNode).collect::<Vec<_>>()
        })
        .unwrap_or_default()
    }

    /// Whether `node` is `body` or a descendant of it.
    pub fn is_connected(&self, node: DomNode) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = Some(node.0);
        while let Some(index) = current {
            if index == self.body.0 {
                return true;
            }
            current = nodes.get(index).and_then(|data| data.parent);
        }
        false
    }

    /// `a` is `b` or one of its ancestors.
    fn is_inclusive_ancestor(nodes: &[NodeData], a: usize, b: usize) -> bool {
        let mut current = Some(b);
        while let Some(index) = current {
            if index == a {
                return true;
            }
            current = nodes.get(index).and_then(|data| data.parent);
        }
        false
    }

    fn detach(nodes: &mut [NodeData], node: usize) {
        if let Some(parent) = nodes[node].parent.take() {
            nodes[parent].children.retain(|&child| child != node);
        }
    }

    // -------------------------------------------------------------------------
    // Node queries
    // -------------------------------------------------------------------------

    pub fn is_element(&self, node: DomNode) -> bool {
        self.read(node, |data| data.element().is_some()).unwrap_or(false)
    }

    pub fn tag_name(&self, node: DomNode) -> Option<String> {
        self.read(node, |data| data.element().map(|el| el.tag.clone())).flatten()
    }

    /// Attribute value. `class` reads the class list.
    pub fn attribute(&self, node: DomNode, name: &str) -> Option<String> {
        self.read(node, |data| {
            let el = data.element()?;
            if name == "class" {
                return (!el.classes.is_empty()).then(|| el.classes.join(" "));
            }
            el.attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        })
        .flatten()
    }

    /// Plain attributes in insertion order (without `class`).
    pub fn attributes(&self, node: DomNode) -> Vec<(String, String)> {
        self.read(node, |data| {
            data.element()
                .map(|el| el.attributes.clone())
                .unwrap_or_default()
        })
        .unwrap_or_default()
    }

    pub fn classes(&self, node: DomNode) -> Vec<String> {
        self.read(node, |data| {
            data.element()
                .map(|el| el.classes.clone())
                .unwrap_or_default()
        })
        .unwrap_or_default()
    }

    pub fn has_class(&self, node: DomNode, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    pub fn handler(&self, node: DomNode, name: &str) -> Option<Callback> {
        self.read(node, |data| {
            data.element()?
                .handlers
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, handler)| handler.clone())
        })
        .flatten()
    }

    /// Names of bound handlers in binding order.
    pub fn handler_names(&self, node: DomNode) -> Vec<String> {
        self.read(node, |data| {
            data.element()
                .map(|el| {
                    el.handlers
                        .iter()
                        .map(|(key, _)| key.clone())
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        })
        .unwrap_or_default()
    }

    /// Invoke the handler bound as `name`. Returns false if none is bound.
    ///
    /// The document is not borrowed while the handler runs.
    pub fn dispatch(&self, node: DomNode, name: &str) -> bool {
        match self.handler(node, name) {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    /// Concatenated text of `node` and its descendants.
    pub fn text_content(&self, node: DomNode) -> String {
        let nodes = self.nodes.borrow();
        let mut out = String::new();
        if node.0 < nodes.len() {
            Self::collect_text(&nodes, node.0, &mut out);
        }
        out
    }

    fn collect_text(nodes: &[NodeData], index: usize, out: &mut String) {
        match &nodes[index].kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(_) => {
                for &child in &nodes[index].children {
                    Self::collect_text(nodes, child, out);
                }
            }
        }
    }

    /// Attached element with the given `id` attribute.
    pub fn find_by_id(&self, id: &str) -> Option<DomNode> {
        self.find_by_attribute("id", id)
    }

    // -------------------------------------------------------------------------
    // Serialization
    // -------------------------------------------------------------------------

    /// Serialize `node` as HTML. Handlers are not serialized.
    pub fn to_html(&self, node: DomNode) -> String {
        let nodes = self.nodes.borrow();
        let mut out = String::new();
        if node.0 < nodes.len() {
            Self::write_html(&nodes, node.0, &mut out);
        }
        out
    }

    fn write_html(nodes: &[NodeData], index: usize, out: &mut String) {
        match &nodes[index].kind {
            NodeKind::Text(text) => out.push_str(&escape_text(text)),
            NodeKind::Element(el) => {
                let _ = write!(out, "<{}", el.tag);
                for (name, value) in &el.attributes {
                    let _ = write!(out, " {}=\"{}\"", name, escape_attribute(value));
                }
                if !el.classes.is_empty() {
                    let _ = write!(out, " class=\"{}\"", escape_attribute(&el.classes.join(" ")));
                }
                out.push('>');
                for &child in &nodes[index].children {
                    Self::write_html(nodes, child, out);
                }
                let _ = write!(out, "</{}>", el.tag);
            }
        }
    }

    /// Detach `node` from its parent. Alias of [`Backend::remove_node`].
    pub fn remove(&self, node: DomNode) -> Result<(), BackendError> {
        self.remove_node(&node)
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

// =============================================================================
// Backend Implementation
// =============================================================================

impl Backend for Document {
    type Node = DomNode;

    fn create_element(&self, tag: &str) -> Result<DomNode, BackendError> {
        Ok(self.push(NodeKind::Element(ElementData {
            tag: tag.to_string(),
            attributes: Vec::new(),
            classes: Vec::new(),
            handlers: Vec::new(),
        })))
    }

    fn create_text(&self, text: &str) -> Result<DomNode, BackendError> {
        Ok(self.push(NodeKind::Text(text.to_string())))
    }

    fn set_attribute(&self, node: &DomNode, name: &str, value: &str) -> Result<(), BackendError> {
        self.write(*node, |data| {
            let el = data.element_mut()?;
            if name == "class" {
                el.classes.clear();
                for token in value.split_whitespace() {
                    if !el.classes.iter().any(|c| c == token) {
                        el.classes.push(token.to_string());
                    }
                }
                return Ok(());
            }
            match el.attributes.iter_mut().find(|(key, _)| key == name) {
                Some(entry) => entry.1 = value.to_string(),
                None => el.attributes.push((name.to_string(), value.to_string())),
            }
            Ok(())
        })
    }

    fn bind_handler(
        &self,
        node: &DomNode,
        name: &str,
        handler: Callback,
    ) -> Result<(), BackendError> {
        self.write(*node, |data| {
            let el = data.element_mut()?;
            match el.handlers.iter_mut().find(|(key, _)| key == name) {
                Some(entry) => entry.1 = handler,
                None => el.handlers.push((name.to_string(), handler)),
            }
            Ok(())
        })
    }

    fn add_class(&self, node: &DomNode, class: &str) -> Result<(), BackendError> {
        self.write(*node, |data| {
            let el = data.element_mut()?;
            if !el.classes.iter().any(|c| c == class) {
                el.classes.push(class.to_string());
            }
            Ok(())
        })
    }

    fn append_child(&self, parent: &DomNode, child: &DomNode) -> Result<(), BackendError> {
        self.check(*parent)?;
        self.check(*child)?;
        let mut nodes = self.nodes.borrow_mut();
        if nodes[parent.0].element().is_none() {
            return Err(BackendError::NotAnElement);
        }
        if Self::is_inclusive_ancestor(&nodes, child.0, parent.0) {
            return Err(BackendError::HierarchyCycle);
        }
        Self::detach(&mut nodes, child.0);
        nodes[parent.0].children.push(child.0);
        nodes[child.0].parent = Some(parent.0);
        Ok(())
    }

    fn replace_node(&self, old: &DomNode, new: &DomNode) -> Result<(), BackendError> {
        self.check(*old)?;
        self.check(*new)?;
        if old == new {
            return Ok(());
        }
        let mut nodes = self.nodes.borrow_mut();
        let parent = nodes[old.0].parent.ok_or(BackendError::Detached)?;
        if Self::is_inclusive_ancestor(&nodes, new.0, parent) {
            return Err(BackendError::HierarchyCycle);
        }
        Self::detach(&mut nodes, new.0);
        let position = nodes[parent]
            .children
            .iter()
            .position(|&child| child == old.0)
            .ok_or(BackendError::Detached)?;
        nodes[parent].children[position] = new.0;
        nodes[new.0].parent = Some(parent);
        nodes[old.0].parent = None;
        Ok(())
    }

    fn remove_node(&self, node: &DomNode) -> Result<(), BackendError> {
        self.check(*node)?;
        let mut nodes = self.nodes.borrow_mut();
        if nodes[node.0].parent.is_none() {
            return Err(BackendError::Detached);
        }
        Self::detach(&mut nodes, node.0);
        Ok(())
    }

    fn find_by_attribute(&self, name: &str, value: &str) -> Option<DomNode> {
        let nodes = self.nodes.borrow();
        let mut pending = vec![self.body.0];
        while let Some(index) = pending.pop() {
            let data = &nodes[index];
            if let Some(el) = data.element() {
                let found = el
                    .attributes
                    .iter()
                    .any(|(key, val)| key == name && val == value);
                if found {
                    return Some(DomNode(index));
                }
            }
            // Reverse so children are visited in document order.
            pending.extend(data.children.iter().rev().copied());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_build_and_serialize() {
        let doc = Document::new();
        let div = doc.create_element("div").unwrap();
        doc.set_attribute(&div, "id", "main").unwrap();
        doc.add_class(&div, "card").unwrap();
        doc.add_class(&div, "card").unwrap();
        let text = doc.create_text("a < b").unwrap();
        doc.append_child(&div, &text).unwrap();
        doc.append_child(&doc.body(), &div).unwrap();

        assert_eq!(doc.to_html(div), "<div id=\"main\" class=\"card\">a &lt; b</div>");
        assert_eq!(doc.text_content(doc.body()), "a < b");
        assert_eq!(doc.find_by_id("main"), Some(div));
        assert!(doc.is_connected(text));
    }

    #[test]
    fn test_text_nodes_reject_attributes() {
        let doc = Document::new();
        let text = doc.create_text("x").unwrap();
        assert_eq!(
            doc.set_attribute(&text, "id", "a"),
            Err(BackendError::NotAnElement)
        );
        assert_eq!(doc.add_class(&text, "a"), Err(BackendError::NotAnElement));
        let child = doc.create_text("y").unwrap();
        assert_eq!(doc.append_child(&text, &child), Err(BackendError::NotAnElement));
    }

    #[test]
    fn test_attributes_keep_insertion_order() {
        let doc = Document::new();
        let a = doc.create_element("a").unwrap();
        doc.set_attribute(&a, "href", "/x").unwrap();
        doc.set_attribute(&a, "class", "link").unwrap();
        doc.set_attribute(&a, "title", "t").unwrap();
        doc.set_attribute(&a, "href", "/y").unwrap();
        doc.bind_handler(&a, "onclick", Rc::new(|| {})).unwrap();

        assert_eq!(
            doc.attributes(a),
            vec![
                ("href".to_string(), "/y".to_string()),
                ("title".to_string(), "t".to_string()),
            ]
        );
        assert!(doc.attributes(doc.create_text("x").unwrap()).is_empty());
    }

    #[test]
    fn test_class_attribute_sets_class_list() {
        let doc = Document::new();
        let div = doc.create_element("div").unwrap();
        doc.add_class(&div, "old").unwrap();
        doc.set_attribute(&div, "class", "a b a").unwrap();
        assert_eq!(doc.classes(div), vec!["a", "b"]);
        assert_eq!(doc.attribute(div, "class").as_deref(), Some("a b"));
    }

    #[test]
    fn test_replace_keeps_position() {
        let doc = Document::new();
        let body = doc.body();
        let a = doc.create_element("a").unwrap();
        let b = doc.create_element("b").unwrap();
        let c = doc.create_element("c").unwrap();
        doc.append_child(&body, &a).unwrap();
        doc.append_child(&body, &b).unwrap();
        doc.append_child(&body, &c).unwrap();

        let x = doc.create_element("x").unwrap();
        doc.replace_node(&b, &x).unwrap();

        assert_eq!(doc.children(body), vec![a, x, c]);
        assert!(!doc.is_connected(b));
        assert_eq!(doc.parent(b), None);
        assert_eq!(doc.replace_node(&b, &x), Err(BackendError::Detached));
    }

    #[test]
    fn test_detached_nodes_are_not_found() {
        let doc = Document::new();
        let div = doc.create_element("div").unwrap();
        doc.set_attribute(&div, "data-render-id", "3").unwrap();
        assert_eq!(doc.find_by_attribute("data-render-id", "3"), None);

        doc.append_child(&doc.body(), &div).unwrap();
        assert_eq!(doc.find_by_attribute("data-render-id", "3"), Some(div));

        doc.remove(div).unwrap();
        assert_eq!(doc.find_by_attribute("data-render-id", "3"), None);
    }

    #[test]
    fn test_find_in_document_order() {
        let doc = Document::new();
        let outer = doc.create_element("section").unwrap();
        let inner = doc.create_element("p").unwrap();
        let later = doc.create_element("p").unwrap();
        for node in [&outer, &inner, &later] {
            doc.set_attribute(node, "data-k", "v").unwrap();
        }
        doc.append_child(&outer, &inner).unwrap();
        doc.append_child(&doc.body(), &outer).unwrap();
        doc.append_child(&doc.body(), &later).unwrap();

        assert_eq!(doc.find_by_attribute("data-k", "v"), Some(outer));
        doc.remove(outer).unwrap();
        assert_eq!(doc.find_by_attribute("data-k", "v"), Some(later));
    }

    #[test]
    fn test_cycle_rejected() {
        let doc = Document::new();
        let outer = doc.create_element("div").unwrap();
        let inner = doc.create_element("div").unwrap();
        doc.append_child(&outer, &inner).unwrap();
        assert_eq!(doc.append_child(&inner, &outer), Err(BackendError::HierarchyCycle));
        assert_eq!(doc.append_child(&outer, &outer), Err(BackendError::HierarchyCycle));
    }

    #[test]
    fn test_dispatch_handler() {
        let doc = Document::new();
        let button = doc.create_element("button").unwrap();
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        doc.bind_handler(&button, "onclick", Rc::new(move || counter.set(counter.get() + 1)))
            .unwrap();

        assert!(doc.dispatch(button, "onclick"));
        assert!(doc.dispatch(button, "onclick"));
        assert!(!doc.dispatch(button, "oninput"));
        assert_eq!(clicks.get(), 2);
        assert_eq!(doc.handler_names(button), vec!["onclick"]);
        assert_eq!(doc.to_html(button), "<button></button>");
    }

    #[test]
    fn test_unknown_handle() {
        let doc = Document::new();
        let other = Document::new();
        other.create_element("a").unwrap();
        let b = other.create_element("b").unwrap();
        assert_eq!(doc.append_child(&doc.body(), &b), Err(BackendError::UnknownNode(2)));
    }
}
