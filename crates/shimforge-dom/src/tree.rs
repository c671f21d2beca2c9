//! Arena-backed node tree.
//!
//! One document per tree. Nodes are never freed; a removed node simply has
//! no parent. Insertion enforces the basic hierarchy rules (no cycles, a
//! document is never a child, only documents, elements and fragments have
//! children).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementData {
    /// Lower-cased tag name.
    pub tag_name: String,
    pub attrs: BTreeMap<String, String>,
}

impl ElementData {
    pub fn has_class(&self, class_name: &str) -> bool {
        self.attrs
            .get("class")
            .is_some_and(|c| c.split_ascii_whitespace().any(|t| t == class_name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Document,
    DocumentType { name: String },
    Element(ElementData),
    Text(String),
    Comment(String),
    DocumentFragment,
}

impl NodeKind {
    /// `Node.nodeType`.
    pub fn node_type(&self) -> u16 {
        match self {
            Self::Element(_) => 1,
            Self::Text(_) => 3,
            Self::Comment(_) => 8,
            Self::Document => 9,
            Self::DocumentType { .. } => 10,
            Self::DocumentFragment => 11,
        }
    }

    /// `Node.nodeName`.
    pub fn node_name(&self) -> String {
        match self {
            Self::Element(e) => e.tag_name.to_ascii_uppercase(),
            Self::Text(_) => "#text".to_string(),
            Self::Comment(_) => "#comment".to_string(),
            Self::Document => "#document".to_string(),
            Self::DocumentType { name } => name.clone(),
            Self::DocumentFragment => "#document-fragment".to_string(),
        }
    }

    fn can_have_children(&self) -> bool {
        matches!(self, Self::Document | Self::Element(_) | Self::DocumentFragment)
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
    document: NodeId,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// A tree holding only an empty document.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
            document: NodeId(0),
        }
    }

    pub fn document(&self) -> NodeId {
        self.document
    }

    /// First element child of the document.
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(self.document)
            .iter()
            .copied()
            .find(|c| self.element(*c).is_some())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // -- creation -----------------------------------------------------------

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.alloc(NodeKind::Element(ElementData {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs: BTreeMap::new(),
        }))
    }

    pub fn create_text(&mut self, data: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text(data.into()))
    }

    pub fn create_comment(&mut self, data: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Comment(data.into()))
    }

    pub fn create_doctype(&mut self, name: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::DocumentType { name: name.into() })
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.alloc(NodeKind::DocumentFragment)
    }

    // -- inspection ---------------------------------------------------------

    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes.get(id.0).ok_or(DomError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes.get_mut(id.0).ok_or(DomError::NodeNotFound(id))
    }

    pub fn kind(&self, id: NodeId) -> Result<&NodeKind, DomError> {
        Ok(&self.node(id)?.kind)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.nodes.get(id.0).map(|n| &n.kind) {
            Some(NodeKind::Element(e)) => Some(e),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    /// Parent, if it is an element.
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|p| self.element(*p).is_some())
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map_or(&[], |n| n.children.as_slice())
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    fn index_in_parent(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        let index = self.children(parent).iter().position(|c| *c == id)?;
        Some((parent, index))
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.index_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.index_in_parent(id)?;
        index.checked_sub(1).map(|i| self.children(parent)[i])
    }

    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = self.previous_sibling(id);
        while let Some(sibling) = cursor {
            if self.element(sibling).is_some() {
                return Some(sibling);
            }
            cursor = self.previous_sibling(sibling);
        }
        None
    }

    /// `Node.contains`: inclusive descendant test.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attrs
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element(e) => {
                e.attrs.insert(name.to_ascii_lowercase(), value.to_string());
                Ok(())
            }
            other => Err(DomError::HierarchyRequest(format!(
                "{} cannot carry attributes",
                other.node_name()
            ))),
        }
    }

    /// Concatenated text of every text descendant, in tree order.
    pub fn text_content(&self, id: NodeId) -> String {
        match self.nodes.get(id.0).map(|n| &n.kind) {
            Some(NodeKind::Text(t) | NodeKind::Comment(t)) => t.clone(),
            _ => {
                let mut out = String::new();
                self.collect_text(id, &mut out);
                out
            }
        }
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for child in self.children(id) {
            match self.nodes.get(child.0).map(|n| &n.kind) {
                Some(NodeKind::Text(t)) => out.push_str(t),
                Some(NodeKind::Comment(_)) => {}
                _ => self.collect_text(*child, out),
            }
        }
    }

    /// Element descendants of `scope` (excluding `scope`) in document order.
    pub fn descendant_elements(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.element(id).is_some() {
                out.push(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    // -- mutation -----------------------------------------------------------

    fn detach(&mut self, id: NodeId) {
        if let Some((parent, index)) = self.index_in_parent(id) {
            self.nodes[parent.0].children.remove(index);
        }
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.parent = None;
        }
    }

    fn ensure_insertable(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let parent_kind = self.kind(parent)?;
        let child_kind = self.kind(child)?;
        if !parent_kind.can_have_children() {
            return Err(DomError::HierarchyRequest(format!(
                "{} cannot have children",
                parent_kind.node_name()
            )));
        }
        if matches!(child_kind, NodeKind::Document) {
            return Err(DomError::HierarchyRequest(
                "a document cannot be inserted".to_string(),
            ));
        }
        if self.contains(child, parent) {
            return Err(DomError::HierarchyRequest(format!(
                "{child} is an inclusive ancestor of {parent}"
            )));
        }
        Ok(())
    }

    /// `parent.insertBefore(child, reference)`; `None` appends. A fragment
    /// child moves all of its children and is left empty.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<NodeId, DomError> {
        self.ensure_insertable(parent, child)?;
        if let Some(r) = reference
            && self.parent(r) != Some(parent)
        {
            return Err(DomError::NotFound(format!(
                "{r} is not a child of {parent}"
            )));
        }
        let reference = if reference == Some(child) {
            self.next_sibling(child)
        } else {
            reference
        };

        let moving = if matches!(self.kind(child)?, NodeKind::DocumentFragment) {
            self.children(child).to_vec()
        } else {
            vec![child]
        };
        for node in &moving {
            self.detach(*node);
        }
        let mut at = match reference {
            Some(r) => self
                .children(parent)
                .iter()
                .position(|c| *c == r)
                .ok_or_else(|| DomError::NotFound(format!("{r} is not a child of {parent}")))?,
            None => self.children(parent).len(),
        };
        for node in moving {
            self.nodes[parent.0].children.insert(at, node);
            self.nodes[node.0].parent = Some(parent);
            at += 1;
        }
        Ok(child)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, DomError> {
        self.insert_before(parent, child, None)
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, DomError> {
        self.node(child)?;
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotFound(format!(
                "{child} is not a child of {parent}"
            )));
        }
        self.detach(child);
        Ok(child)
    }
}
