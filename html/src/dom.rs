use css::StyleMap;
use thiserror::Error;

pub type NodeId = usize;

/// Nesting limit for any walk over a [`Tree`]
pub const MAX_DEPTH: usize = 4096;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {0} does not exist")]
    MissingNode(NodeId),
    #[error("node {0} is a text node and cannot have children")]
    LeafParent(NodeId),
    #[error("node {0} is reachable through more than one parent")]
    Revisited(NodeId),
    #[error("tree is nested deeper than {0} levels")]
    TooDeep(usize),
}

/// Attributes in document order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DOMAttributes(pub Vec<(String, String)>);

impl DOMAttributes {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing the value in place if it already exists
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let (name, value) = (name.into(), value.into());
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some(existing) => existing.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[macro_export]
macro_rules! attributes {
    ($($name:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut attrs = $crate::DOMAttributes::empty();
        $(attrs.set($name, $value);)*
        attrs
    }};
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub tag_name: String,
    pub attributes: DOMAttributes,
    pub style: StyleMap,
    pub class_name: Option<String>,
}

/// A generated box such as `::before`, captured as a child of its originating element
#[derive(Debug, Clone, PartialEq)]
pub struct PseudoElementData {
    /// The pseudo kind without colons, e.g. `before`
    pub pseudo: String,
    pub style: StyleMap,
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Element(ElementData),
    PseudoElement(PseudoElementData),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    PseudoElement,
    Text,
}

impl NodeData {
    pub fn element(tag_name: impl Into<String>, attributes: DOMAttributes, style: StyleMap) -> Self {
        NodeData::Element(ElementData {
            tag_name: tag_name.into(),
            attributes,
            style,
            class_name: None,
        })
    }

    pub fn pseudo_element(pseudo: impl Into<String>, style: StyleMap) -> Self {
        NodeData::PseudoElement(PseudoElementData {
            pseudo: pseudo.into(),
            style,
            class_name: None,
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        NodeData::Text(text.into())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Element(_) => NodeKind::Element,
            NodeData::PseudoElement(_) => NodeKind::PseudoElement,
            NodeData::Text(_) => NodeKind::Text,
        }
    }

    /// The tag name of an element, or the pseudo kind of a pseudo-element
    pub fn tag(&self) -> Option<&str> {
        match self {
            NodeData::Element(e) => Some(&e.tag_name),
            NodeData::PseudoElement(p) => Some(&p.pseudo),
            NodeData::Text(_) => None,
        }
    }

    pub fn attributes(&self) -> Option<&DOMAttributes> {
        match self {
            NodeData::Element(e) => Some(&e.attributes),
            _ => None,
        }
    }

    pub fn style(&self) -> Option<&StyleMap> {
        match self {
            NodeData::Element(e) => Some(&e.style),
            NodeData::PseudoElement(p) => Some(&p.style),
            NodeData::Text(_) => None,
        }
    }

    pub fn style_mut(&mut self) -> Option<&mut StyleMap> {
        match self {
            NodeData::Element(e) => Some(&mut e.style),
            NodeData::PseudoElement(p) => Some(&mut p.style),
            NodeData::Text(_) => None,
        }
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            NodeData::Element(e) => e.class_name.as_deref(),
            NodeData::PseudoElement(p) => p.class_name.as_deref(),
            NodeData::Text(_) => None,
        }
    }

    /// Store the interned class and its canonical style. Text nodes are left alone.
    pub fn assign_class(&mut self, class_name: Option<String>, style: StyleMap) {
        match self {
            NodeData::Element(e) => {
                e.class_name = class_name;
                e.style = style;
            }
            NodeData::PseudoElement(p) => {
                p.class_name = class_name;
                p.style = style;
            }
            NodeData::Text(_) => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub data: NodeData,
}

/// An owned markup tree. Nodes live in an arena and refer to each other by index; the
/// root is always [`Tree::root`].
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(root: NodeData) -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: vec![],
                data: root,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    /// Add `data` as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, data: NodeData) -> Result<NodeId, TreeError> {
        let kind = self.get(parent).ok_or(TreeError::MissingNode(parent))?.data.kind();
        if kind == NodeKind::Text {
            return Err(TreeError::LeafParent(parent));
        }
        let id = self.nodes.len();
        self.nodes.push(Node {
            parent: Some(parent),
            children: vec![],
            data,
        });
        self.nodes[parent].children.push(id);
        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.get(id).ok_or(TreeError::MissingNode(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.get_mut(id).ok_or(TreeError::MissingNode(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }

    /// Every node reachable from the root, children before their parent and siblings
    /// in document order. Fails if a node is reachable twice or the tree is nested
    /// deeper than [`MAX_DEPTH`].
    pub fn post_order(&self) -> Result<Vec<NodeId>, TreeError> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![(self.root(), 0, false)];
        while let Some((id, depth, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            if depth > MAX_DEPTH {
                return Err(TreeError::TooDeep(MAX_DEPTH));
            }
            let node = self.node(id)?;
            if std::mem::replace(&mut visited[id], true) {
                return Err(TreeError::Revisited(id));
            }
            stack.push((id, depth, true));
            stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1, false)));
        }
        Ok(order)
    }
}

#[cfg(test)]
#[test]
fn test_post_order() {
    let mut tree = Tree::new(NodeData::element("div", DOMAttributes::empty(), StyleMap::new()));
    let a = tree
        .append(0, NodeData::element("p", DOMAttributes::empty(), StyleMap::new()))
        .unwrap();
    let text = tree.append(a, NodeData::text("hi")).unwrap();
    let b = tree.append(0, NodeData::pseudo_element("before", StyleMap::new())).unwrap();
    assert_eq!(tree.post_order().unwrap(), vec![text, a, b, 0]);
    assert_eq!(tree.node(text).unwrap().parent, Some(a));
}

#[cfg(test)]
#[test]
fn test_text_is_a_leaf() {
    let mut tree = Tree::new(NodeData::element("div", DOMAttributes::empty(), StyleMap::new()));
    let text = tree.append(0, NodeData::text("hi")).unwrap();
    assert_eq!(
        tree.append(text, NodeData::text("nested")),
        Err(TreeError::LeafParent(text))
    );
    assert_eq!(tree.append(42, NodeData::text("x")), Err(TreeError::MissingNode(42)));
}

#[cfg(test)]
#[test]
fn test_depth_guard() {
    let mut tree = Tree::new(NodeData::element("div", DOMAttributes::empty(), StyleMap::new()));
    let mut parent = tree.root();
    for _ in 0..=MAX_DEPTH {
        parent = tree
            .append(parent, NodeData::element("div", DOMAttributes::empty(), StyleMap::new()))
            .unwrap();
    }
    assert_eq!(tree.post_order(), Err(TreeError::TooDeep(MAX_DEPTH)));
}

#[cfg(test)]
#[test]
fn test_shared_child_is_rejected() {
    let mut tree = Tree::new(NodeData::element("div", DOMAttributes::empty(), StyleMap::new()));
    let a = tree
        .append(0, NodeData::element("p", DOMAttributes::empty(), StyleMap::new()))
        .unwrap();
    let b = tree
        .append(0, NodeData::element("p", DOMAttributes::empty(), StyleMap::new()))
        .unwrap();
    // Graft `a` under `b` as well, and close a cycle back to the root
    tree.node_mut(b).unwrap().children.push(a);
    assert_eq!(tree.post_order(), Err(TreeError::Revisited(a)));
    tree.node_mut(b).unwrap().children = vec![0];
    assert_eq!(tree.post_order(), Err(TreeError::Revisited(0)));
}
