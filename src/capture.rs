use crate::Options;
use css::{StyleMap, StyleValue};
use html::{DOMAttributes, NodeData, NodeId, Tree, TreeError};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, span, warn, Level};

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("could not parse capture: {0}")]
    Json(#[from] serde_json::Error),
    #[error("node {0} is referenced but never described")]
    UnknownNode(u64),
    #[error("node {0} is described twice")]
    DuplicateNode(u64),
    #[error("node {0} is reachable more than once (cycle or shared child)")]
    Revisited(u64),
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// A subtree as recorded by the page walker: a flat table of nodes that refer to their
/// children by id, plus the options the capture was made with
#[derive(Debug, Deserialize)]
pub struct Capture {
    #[serde(flatten)]
    pub options: Options,
    pub root: u64,
    pub nodes: Vec<CapturedNode>,
}

#[derive(Debug, Deserialize)]
pub struct CapturedNode {
    pub id: u64,
    #[serde(flatten)]
    pub kind: CapturedKind,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CapturedKind {
    Element {
        tag: String,
        #[serde(default)]
        attributes: Vec<(String, String)>,
        #[serde(default)]
        style: CapturedStyle,
        #[serde(default)]
        children: Vec<u64>,
    },
    PseudoElement {
        pseudo: String,
        #[serde(default)]
        style: CapturedStyle,
        #[serde(default)]
        children: Vec<u64>,
    },
    Text {
        text: String,
    },
}

/// Computed style as the walker records it: property values next to the reserved
/// `pseudoStates` and `pseudoElements` maps
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedStyle {
    #[serde(default)]
    pub pseudo_states: BTreeMap<String, CapturedStyle>,
    #[serde(default)]
    pub pseudo_elements: BTreeMap<String, CapturedStyle>,
    #[serde(flatten)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

// The walker never descends into these
static EXCLUDED: &[&str] = &["script", "link"];

impl From<CapturedStyle> for StyleMap {
    fn from(captured: CapturedStyle) -> Self {
        let declarations = captured
            .properties
            .into_iter()
            .filter_map(|(name, value)| match value {
                serde_json::Value::String(s) => Some((name, StyleValue::Text(s))),
                serde_json::Value::Number(n) => Some((name, StyleValue::Text(n.to_string()))),
                other => {
                    warn!("Ignoring non-string value for {}: {}", name, other);
                    None
                }
            })
            .collect();
        StyleMap {
            declarations,
            pseudo_elements: captured
                .pseudo_elements
                .into_iter()
                .map(|(k, v)| (k, v.into()))
                .collect(),
            pseudo_states: captured
                .pseudo_states
                .into_iter()
                .map(|(k, v)| (k, v.into()))
                .collect(),
        }
    }
}

impl CapturedKind {
    fn is_excluded(&self) -> bool {
        matches!(self, CapturedKind::Element { tag, .. } if EXCLUDED.contains(&tag.to_lowercase().as_str()))
    }

    fn into_parts(self) -> (NodeData, Vec<u64>) {
        match self {
            CapturedKind::Element {
                tag,
                attributes,
                style,
                children,
            } => (
                NodeData::element(tag, DOMAttributes(attributes), style.into()),
                children,
            ),
            CapturedKind::PseudoElement {
                pseudo,
                style,
                children,
            } => (NodeData::pseudo_element(pseudo, style.into()), children),
            CapturedKind::Text { text } => (NodeData::text(text), vec![]),
        }
    }
}

impl Capture {
    pub fn from_json(input: &str) -> Result<Self, CaptureError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Assemble the owned tree, checking that every id is described once and reached
    /// once from the root
    pub fn build(self) -> Result<(Tree, Options), CaptureError> {
        let span = span!(Level::DEBUG, "Building tree", nodes = self.nodes.len());
        let _enter = span.enter();

        let mut described = HashMap::with_capacity(self.nodes.len());
        for CapturedNode { id, kind } in self.nodes {
            if described.insert(id, kind).is_some() {
                return Err(CaptureError::DuplicateNode(id));
            }
        }

        let (root, children) = described
            .remove(&self.root)
            .ok_or(CaptureError::UnknownNode(self.root))?
            .into_parts();
        let mut tree = Tree::new(root);
        let mut visited = HashSet::from([self.root]);
        let mut stack: Vec<(NodeId, u64)> =
            children.into_iter().rev().map(|c| (tree.root(), c)).collect();
        while let Some((parent, id)) = stack.pop() {
            if !visited.insert(id) {
                return Err(CaptureError::Revisited(id));
            }
            let kind = described.remove(&id).ok_or(CaptureError::UnknownNode(id))?;
            if kind.is_excluded() {
                debug!("Skipping excluded node {}", id);
                continue;
            }
            let (data, children) = kind.into_parts();
            let node = tree.append(parent, data)?;
            stack.extend(children.into_iter().rev().map(|c| (node, c)));
        }
        if !described.is_empty() {
            debug!("{} described nodes are not reachable from the root", described.len());
        }
        Ok((tree, self.options))
    }
}

#[cfg(test)]
#[test]
fn test_build() {
    let input = r#"{
        "url": "https://example.com/a/",
        "extractColors": true,
        "root": 1,
        "nodes": [
            { "id": 1, "kind": "element", "tag": "div",
              "attributes": [["class", "card"], ["data-x", "1"]],
              "style": { "color": "red", "z-index": 2,
                         "pseudoStates": { ":hover": { "color": "blue" } } },
              "children": [2, 3, 4] },
            { "id": 2, "kind": "pseudoElement", "pseudo": "before",
              "style": { "content": "\"\"" } },
            { "id": 3, "kind": "element", "tag": "script", "children": [5] },
            { "id": 4, "kind": "text", "text": "Hello" },
            { "id": 5, "kind": "text", "text": "alert(1)" }
        ]
    }"#;
    let (tree, options) = Capture::from_json(input).unwrap().build().unwrap();
    assert!(options.extract_colors);
    assert!(!options.remove_data_attributes);
    assert_eq!(
        options.base_url.as_ref().map(|u| u.as_str()),
        Some("https://example.com/a/")
    );
    assert_eq!(tree.len(), 3);
    let root = tree.node(tree.root()).unwrap();
    let style = root.data.style().unwrap();
    assert_eq!(style.get("z-index"), Some(&StyleValue::from("2")));
    assert_eq!(
        style.pseudo_states[":hover"].get("color"),
        Some(&StyleValue::from("blue"))
    );
    assert_eq!(root.data.attributes().unwrap().get("data-x"), Some("1"));
    assert_eq!(
        tree.node(root.children[0]).unwrap().data,
        NodeData::pseudo_element("before", StyleMap::new().with("content", "\"\""))
    );
    assert_eq!(tree.node(root.children[1]).unwrap().data, NodeData::text("Hello"));
}

#[cfg(test)]
#[test]
fn test_malformed_captures() {
    let cycle = r#"{ "root": 1, "nodes": [
        { "id": 1, "kind": "element", "tag": "div", "children": [2] },
        { "id": 2, "kind": "element", "tag": "p", "children": [1] } ] }"#;
    assert!(matches!(
        Capture::from_json(cycle).unwrap().build(),
        Err(CaptureError::Revisited(1))
    ));

    let shared = r#"{ "root": 1, "nodes": [
        { "id": 1, "kind": "element", "tag": "div", "children": [2, 3] },
        { "id": 2, "kind": "element", "tag": "p", "children": [3] },
        { "id": 3, "kind": "text", "text": "twice" } ] }"#;
    assert!(matches!(
        Capture::from_json(shared).unwrap().build(),
        Err(CaptureError::Revisited(3))
    ));

    let dangling = r#"{ "root": 1, "nodes": [
        { "id": 1, "kind": "element", "tag": "div", "children": [9] } ] }"#;
    assert!(matches!(
        Capture::from_json(dangling).unwrap().build(),
        Err(CaptureError::UnknownNode(9))
    ));

    let duplicate = r#"{ "root": 1, "nodes": [
        { "id": 1, "kind": "text", "text": "a" },
        { "id": 1, "kind": "text", "text": "b" } ] }"#;
    assert!(matches!(
        Capture::from_json(duplicate).unwrap().build(),
        Err(CaptureError::DuplicateNode(1))
    ));

    assert!(matches!(Capture::from_json("{"), Err(CaptureError::Json(_))));
}
