//! Document tree abstraction
//!
//! [`Document`] is the subset of DOM operations the synchronizer needs.
//! [`MemoryDocument`] is an arena-backed implementation used by hosts without a
//! browser and by the tests.

use thiserror::Error;

/// Handle to an element of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Errors raised when changing the shape of a [`MemoryDocument`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomError {
    /// The node does not exist in this document
    #[error("Unknown node {0:?}")]
    UnknownNode(NodeId),
    /// The intended parent is a text node
    #[error("Node {0:?} is not an element and cannot have children")]
    NotAnElement(NodeId),
    /// The child is the root or already has a parent
    #[error("Node {0:?} is already attached")]
    AlreadyAttached(NodeId),
    /// The child is the parent itself or one of its ancestors
    #[error("Appending {child:?} to {parent:?} would create a cycle")]
    Cycle {
        /// Intended parent
        parent: NodeId,
        /// Node being appended
        child: NodeId,
    },
}

/// DOM operations used for translation.
///
/// Query results are in document order. Operations on a node that does not
/// belong to the document are ignored.
pub trait Document {
    /// Elements carrying attribute `name`.
    fn elements_with_attribute(&self, name: &str) -> Vec<NodeId>;

    /// Elements whose class list contains `class`.
    fn elements_with_class(&self, class: &str) -> Vec<NodeId>;

    /// First element whose attribute `name` equals `value`.
    fn find_by_attribute(&self, name: &str, value: &str) -> Option<NodeId>;

    /// Value of attribute `name` on `node`.
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// Concatenated text of `node` and its descendants.
    fn text_content(&self, node: NodeId) -> String;

    /// Replaces every child of `node` with a single text node.
    fn set_text_content(&mut self, node: NodeId, text: &str);

    /// Sets attribute `name` on `node`.
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    /// Whether the class list of `node` contains `class`.
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Adds `class` to the class list of `node` if not already present.
    fn add_class(&mut self, node: NodeId, class: &str);

    /// Removes every occurrence of `class` from the class list of `node`.
    fn remove_class(&mut self, node: NodeId, class: &str);
}

/// Arena slot.
#[derive(Debug, Clone)]
enum Node {
    /// An element with ordered attributes
    Element {
        /// Tag name
        tag: String,
        /// Attributes in insertion order
        attributes: Vec<(String, String)>,
        /// Child nodes
        children: Vec<NodeId>,
    },
    /// A text node
    Text(String),
}

/// In-memory document tree.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    /// All nodes ever created; detached nodes stay in the arena
    nodes: Vec<Node>,
    /// Parent of each node, indexed like `nodes`
    parents: Vec<Option<NodeId>>,
    /// The `<html>` element
    root: NodeId,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Creates a document containing only an `<html>` root.
    #[must_use]
    pub fn new() -> Self {
        let root =
            Node::Element { tag: "html".to_string(), attributes: Vec::new(), children: Vec::new() };
        Self { nodes: vec![root], parents: vec![None], root: NodeId(0) }
    }

    /// The root element.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::Element {
            tag: tag.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        })
    }

    /// Appends the detached node `child` to `parent`.
    ///
    /// # Errors
    /// Returns an error if either node is unknown, `parent` is a text node,
    /// `child` is the root or already attached, or `child` is `parent` or one
    /// of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_parent(parent)?;
        if self.nodes.get(child.0).is_none() {
            return Err(DomError::UnknownNode(child));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(DomError::Cycle { parent, child });
        }
        if child == self.root || self.parent(child).is_some() {
            return Err(DomError::AlreadyAttached(child));
        }
        self.attach(parent, child);
        Ok(())
    }

    /// Builds `element` and appends it to `parent`, returning the new node.
    ///
    /// # Errors
    /// Returns an error if `parent` is unknown or a text node.
    pub fn append(&mut self, parent: NodeId, element: ElementBuilder) -> Result<NodeId, DomError> {
        self.check_parent(parent)?;
        let node = self.build(element);
        self.attach(parent, node);
        Ok(node)
    }

    /// Parent of `node`, `None` for the root and detached nodes.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parents.get(node.0).copied().flatten()
    }

    /// Tag name of `node`.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match self.nodes.get(node.0)? {
            Node::Element { tag, .. } => Some(tag),
            Node::Text(_) => None,
        }
    }

    /// Serializes the tree under the root as HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(self.root, &mut out);
        out
    }

    /// Adds a detached node to the arena.
    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.parents.push(None);
        NodeId(self.nodes.len() - 1)
    }

    /// Creates the detached subtree described by `element`.
    fn build(&mut self, element: ElementBuilder) -> NodeId {
        let node = self.create_element(&element.tag);
        for (name, value) in &element.attributes {
            self.set_attribute(node, name, value);
        }
        if let Some(text) = &element.text {
            let text_node = self.push(Node::Text(text.clone()));
            self.attach(node, text_node);
        }
        for child in element.children {
            let child_node = self.build(child);
            self.attach(node, child_node);
        }
        node
    }

    /// Links `child` under `parent` without checks.
    fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(Node::Element { children, .. }) = self.nodes.get_mut(parent.0) {
            children.push(child);
            if let Some(slot) = self.parents.get_mut(child.0) {
                *slot = Some(parent);
            }
        }
    }

    /// Fails unless `node` is an element of this document.
    fn check_parent(&self, node: NodeId) -> Result<(), DomError> {
        match self.nodes.get(node.0) {
            Some(Node::Element { .. }) => Ok(()),
            Some(Node::Text(_)) => Err(DomError::NotAnElement(node)),
            None => Err(DomError::UnknownNode(node)),
        }
    }

    /// Whether `candidate` is `node` or one of its ancestors.
    fn is_ancestor_or_self(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Attribute list of `node`, if it is an element.
    fn attributes(&self, node: NodeId) -> Option<&[(String, String)]> {
        match self.nodes.get(node.0)? {
            Node::Element { attributes, .. } => Some(attributes),
            Node::Text(_) => None,
        }
    }

    /// Elements reachable from the root, in pre-order.
    fn elements(&self) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if let Some(Node::Element { children, .. }) = self.nodes.get(id.0) {
                result.push(id);
                stack.extend(children.iter().rev().copied());
            }
        }
        result
    }

    /// Class list of `node`.
    fn classes(&self, node: NodeId) -> Vec<String> {
        self.attribute(node, "class")
            .map(|value| value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Appends the HTML of `node` to `out`.
    fn write_html(&self, node: NodeId, out: &mut String) {
        match self.nodes.get(node.0) {
            Some(Node::Element { tag, attributes, children }) => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape(value, true));
                    out.push('"');
                }
                out.push('>');
                for child in children {
                    self.write_html(*child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            Some(Node::Text(text)) => out.push_str(&escape(text, false)),
            None => {}
        }
    }
}

/// Escapes text for HTML output.
fn escape(text: &str, in_attribute: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if in_attribute => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl Document for MemoryDocument {
    fn elements_with_attribute(&self, name: &str) -> Vec<NodeId> {
        self.elements().into_iter().filter(|&id| self.attribute(id, name).is_some()).collect()
    }

    fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        self.elements().into_iter().filter(|&id| self.has_class(id, class)).collect()
    }

    fn find_by_attribute(&self, name: &str, value: &str) -> Option<NodeId> {
        self.elements().into_iter().find(|&id| self.attribute(id, name).as_deref() == Some(value))
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.attributes(node)?.iter().find(|(n, _)| n == name).map(|(_, value)| value.clone())
    }

    fn text_content(&self, node: NodeId) -> String {
        match self.nodes.get(node.0) {
            Some(Node::Element { children, .. }) => {
                children.iter().map(|&child| self.text_content(child)).collect()
            }
            Some(Node::Text(text)) => text.clone(),
            None => String::new(),
        }
    }

    fn set_text_content(&mut self, node: NodeId, text: &str) {
        if !matches!(self.nodes.get(node.0), Some(Node::Element { .. })) {
            return;
        }
        let old_children = match self.nodes.get_mut(node.0) {
            Some(Node::Element { children, .. }) => std::mem::take(children),
            _ => Vec::new(),
        };
        for child in old_children {
            if let Some(slot) = self.parents.get_mut(child.0) {
                *slot = None;
            }
        }
        if !text.is_empty() {
            let text_node = self.push(Node::Text(text.to_string()));
            self.attach(node, text_node);
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(Node::Element { attributes, .. }) = self.nodes.get_mut(node.0) {
            match attributes.iter_mut().find(|(n, _)| n == name) {
                Some((_, existing)) => value.clone_into(existing),
                None => attributes.push((name.to_string(), value.to_string())),
            }
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        let mut classes = self.classes(node);
        if classes.iter().any(|c| c == class) {
            return;
        }
        classes.push(class.to_string());
        self.set_attribute(node, "class", &classes.join(" "));
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        let classes = self.classes(node);
        if !classes.iter().any(|c| c == class) {
            return;
        }
        let remaining: Vec<String> = classes.into_iter().filter(|c| c != class).collect();
        self.set_attribute(node, "class", &remaining.join(" "));
    }
}

/// Declarative description of an element subtree.
#[derive(Debug, Clone)]
pub struct ElementBuilder {
    /// Tag name
    tag: String,
    /// Attributes in insertion order
    attributes: Vec<(String, String)>,
    /// Leading text child
    text: Option<String>,
    /// Element children, after the text
    children: Vec<ElementBuilder>,
}

impl ElementBuilder {
    /// Starts an element with tag `tag`.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self { tag: tag.to_string(), attributes: Vec::new(), text: None, children: Vec::new() }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    /// Adds a class.
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        match self.attributes.iter_mut().find(|(n, _)| n == "class") {
            Some((_, existing)) => {
                existing.push(' ');
                existing.push_str(class);
            }
            None => self.attributes.push(("class".to_string(), class.to_string())),
        }
        self
    }

    /// Sets the text child.
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// Adds a child element.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }
}
