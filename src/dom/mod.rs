mod markup;
mod parser;

pub use parser::{parse_document, parse_fragment};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::utils::error::Result;

/// Elements serialized without a closing tag
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Handle addressing a node inside a `Document` arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Payload of a document node
#[derive(Debug, Clone)]
pub enum NodeData {
    Element {
        tag: String,
        attrs: BTreeMap<String, String>,
    },
    Text(String),
}

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// An owned HTML document: an arena of nodes addressed by index, with
/// parent links. Documents are transient working copies; detached nodes
/// stay in the arena until the document is dropped.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Create an empty document containing only the synthetic root
    pub fn new() -> Self {
        Document {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Element {
                    tag: "#document".to_string(),
                    attrs: BTreeMap::new(),
                },
            }],
        }
    }

    /// The synthetic root node holding all top-level content
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Create a detached element node
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(NodeData::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: BTreeMap::new(),
        })
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeData::Text(text.to_string()))
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Insert `child` as the first child of `parent`
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(parent).children.insert(0, child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Remove a node from its parent's child list. The node stays in the
    /// arena and can be re-inserted.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|&c| c != id);
            self.node_mut(id).parent = None;
        }
    }

    /// Detach all children of a node
    pub fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.node_mut(child).parent = None;
        }
    }

    /// Replace a node's children with parsed markup
    pub fn set_inner_markup(&mut self, id: NodeId, markup: &str) -> Result<()> {
        self.clear_children(id);
        parser::parse_fragment(self, id, markup)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Element tag name, or `None` for text nodes
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).data {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    /// Text payload, or `None` for element nodes
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).data {
            NodeData::Text(text) => Some(text),
            NodeData::Element { .. } => None,
        }
    }

    /// Full attribute map of an element
    pub fn attrs(&self, id: NodeId) -> Option<&BTreeMap<String, String>> {
        match &self.node(id).data {
            NodeData::Element { attrs, .. } => Some(attrs),
            NodeData::Text(_) => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attrs(id).and_then(|a| a.get(name)).map(|s| s.as_str())
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// Set an attribute; a no-op on text nodes
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeData::Element { attrs, .. } = &mut self.node_mut(id).data {
            attrs.insert(name.to_ascii_lowercase(), value.to_string());
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let NodeData::Element { attrs, .. } = &mut self.node_mut(id).data {
            attrs.remove(name);
        }
    }

    /// Whether the element's class attribute contains `class` as a
    /// whitespace-separated token
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .map(|v| v.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// All descendants of `id` in document order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            for &child in self.children(node).iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Whether `node` is `ancestor` or lies inside its subtree
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        self.collect_text(id, None)
    }

    /// Like `text_content`, but skips subtrees of elements carrying the
    /// given class
    pub fn text_excluding_class(&self, id: NodeId, class: &str) -> String {
        self.collect_text(id, Some(class))
    }

    fn collect_text(&self, id: NodeId, skip_class: Option<&str>) -> String {
        let mut out = String::new();
        self.collect_text_into(id, skip_class, &mut out);
        out
    }

    fn collect_text_into(&self, id: NodeId, skip_class: Option<&str>, out: &mut String) {
        for &child in self.children(id) {
            match &self.node(child).data {
                NodeData::Text(text) => out.push_str(text),
                NodeData::Element { .. } => {
                    if let Some(class) = skip_class {
                        if self.has_class(child, class) {
                            continue;
                        }
                    }
                    self.collect_text_into(child, skip_class, out);
                }
            }
        }
    }

    /// Heading rank of an element: `h1`..`h6` map to 1..6
    pub fn heading_rank(&self, id: NodeId) -> Option<u8> {
        let tag = self.tag(id)?;
        let mut chars = tag.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some('h'), Some(digit @ '1'..='6'), None) => Some(digit as u8 - b'0'),
            _ => None,
        }
    }

    /// All headings under `scope` in document order
    pub fn headings(&self, scope: NodeId) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| self.heading_rank(n).is_some())
            .collect()
    }

    /// Serialize the whole document back to markup
    pub fn to_html(&self) -> String {
        markup::serialize_children(self, self.root())
    }

    /// Serialize a single node (including itself) to markup
    pub fn node_html(&self, id: NodeId) -> String {
        markup::serialize_node(self, id)
    }

    /// Markup of a node's children only
    pub fn inner_html(&self, id: NodeId) -> String {
        markup::serialize_children(self, id)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Set of eligible heading ranks (1..=6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankSet([bool; 6]);

impl RankSet {
    pub fn empty() -> Self {
        RankSet([false; 6])
    }

    pub fn single(rank: u8) -> Self {
        let mut set = Self::empty();
        set.insert(rank);
        set
    }

    pub fn range(low: u8, high: u8) -> Self {
        let mut set = Self::empty();
        for rank in low..=high {
            set.insert(rank);
        }
        set
    }

    /// Ranks outside 1..=6 are ignored
    pub fn insert(&mut self, rank: u8) {
        if (1..=6).contains(&rank) {
            self.0[(rank - 1) as usize] = true;
        }
    }

    pub fn contains(&self, rank: u8) -> bool {
        (1..=6).contains(&rank) && self.0[(rank - 1) as usize]
    }

    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|&b| b)
    }

    /// Parse a rank selector like `"h2 h3"`, `"h2,h3"` or `"2 3"`.
    /// Unrecognized tokens are ignored.
    pub fn parse(selector: &str) -> Self {
        let mut set = Self::empty();
        for token in selector
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            let digits = token.trim_start_matches(|c| c == 'h' || c == 'H');
            if let Ok(rank) = digits.parse::<u8>() {
                set.insert(rank);
            }
        }
        set
    }
}
