use crate::names;
use css::{canonicalize, extract_style_colors, Palette, StyleMap};
use html::{NodeData, Tree, TreeError};
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use tracing::{debug, span, warn, Level};

/// Everything one conversion learns about its styles. A fresh table is used for every
/// run; nothing is shared between runs.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    // structural hash -> classes registered under it, first seen first
    style_hash_index: HashMap<u64, Vec<String>>,
    class_definitions: HashMap<String, StyleMap>,
    // class names in allocation order
    allocated: Vec<String>,
    emitted: HashSet<String>,
    palette: Palette,
}

/// Hash of a canonical style. Maps are ordered, so equal content hashes equally no
/// matter how the style was built.
pub fn structural_hash(style: &StyleMap) -> u64 {
    let mut hasher = DefaultHasher::new();
    style.hash(&mut hasher);
    hasher.finish()
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn definition(&self, class_name: &str) -> Option<&StyleMap> {
        self.class_definitions.get(class_name)
    }

    /// Every class with its canonical style, in allocation order
    pub fn definitions(&self) -> impl Iterator<Item = (&str, &StyleMap)> {
        self.allocated
            .iter()
            .filter_map(move |name| self.class_definitions.get(name).map(|s| (name.as_str(), s)))
    }

    pub fn len(&self) -> usize {
        self.allocated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocated.is_empty()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn is_emitted(&self, class_name: &str) -> bool {
        self.emitted.contains(class_name)
    }

    /// Returns `true` the first time a class is marked
    pub fn mark_emitted(&mut self, class_name: &str) -> bool {
        self.emitted.insert(class_name.to_string())
    }

    /// Find or allocate the class for a canonical style. `data` is the node the style
    /// belongs to and only matters when a new name has to be made up.
    pub fn intern(&mut self, style: StyleMap, data: &NodeData) -> String {
        let hash = structural_hash(&style);
        self.intern_hashed(hash, style, data)
    }

    fn intern_hashed(&mut self, hash: u64, style: StyleMap, data: &NodeData) -> String {
        if let Some(bucket) = self.style_hash_index.get(&hash) {
            let existing = bucket
                .iter()
                .find(|name| self.class_definitions.get(name.as_str()) == Some(&style));
            if let Some(name) = existing {
                debug!("Reusing class {}", name);
                return name.clone();
            }
            warn!("Hash {:016x} is shared by different styles", hash);
        }
        let name = names::resolve(names::candidate(data), |n| self.class_definitions.contains_key(n));
        debug!("Allocated class {}", name);
        self.style_hash_index.entry(hash).or_default().push(name.clone());
        self.class_definitions.insert(name.clone(), style);
        self.allocated.push(name.clone());
        name
    }
}

/// The interning pass. Walks the tree children first; pseudo-element children are
/// folded into their parent as `::<kind>` variants, colors are extracted when asked
/// for, and every node with a non-empty style is given the class for its canonical
/// style. Afterwards each styled node holds its canonical style and class name.
pub fn intern_styles(
    tree: &mut Tree,
    table: &mut SymbolTable,
    extract_colors: bool,
) -> Result<(), TreeError> {
    let span = span!(Level::DEBUG, "Interning styles");
    let _enter = span.enter();
    for id in tree.post_order()? {
        let mut folded = Vec::new();
        for &child in &tree.node(id)?.children {
            if let NodeData::PseudoElement(pseudo) = &tree.node(child)?.data {
                let selector = format!("::{}", pseudo.pseudo.trim_start_matches(':'));
                folded.push((selector, pseudo.style.clone()));
            }
        }

        let node = tree.node_mut(id)?;
        let style = match node.data.style_mut() {
            Some(style) => style,
            None => continue,
        };
        style.pseudo_elements.extend(folded);
        if extract_colors {
            extract_style_colors(style, &mut table.palette);
        }
        let merged = std::mem::take(style);
        if merged.is_empty() {
            node.data.assign_class(None, merged);
            continue;
        }
        let canonical = canonicalize(&merged);
        let class_name = table.intern(canonical.clone(), &node.data);
        node.data.assign_class(Some(class_name), canonical);
    }
    debug!("{} classes", table.len());
    Ok(())
}

#[cfg(test)]
#[test]
fn test_reuse_on_equal_styles() {
    use css::style_map;
    use html::DOMAttributes;
    let mut table = SymbolTable::new();
    let node = NodeData::element("p", DOMAttributes::empty(), StyleMap::new());
    let a = table.intern(canonicalize(&style_map! {"color" => "red", "margin" => "0"}), &node);
    let b = table.intern(canonicalize(&style_map! {"margin" => "0", "color" => "red"}), &node);
    let c = table.intern(canonicalize(&style_map! {"color" => "blue"}), &node);
    assert_eq!(a, "pCls");
    assert_eq!(a, b);
    assert_eq!(c, "pCls0");
    assert_eq!(table.len(), 2);
}

#[cfg(test)]
#[test]
fn test_hash_collision_is_not_reused() {
    use css::style_map;
    use html::DOMAttributes;
    let mut table = SymbolTable::new();
    let node = NodeData::element("span", DOMAttributes::empty(), StyleMap::new());
    let red = style_map! {"color" => "red"};
    let blue = style_map! {"color" => "blue"};
    let first = table.intern_hashed(7, red.clone(), &node);
    let second = table.intern_hashed(7, blue.clone(), &node);
    assert_ne!(first, second);
    assert_eq!(table.intern_hashed(7, blue, &node), second);
    assert_eq!(table.intern_hashed(7, red, &node), first);
    assert_eq!(table.style_hash_index[&7], vec![first, second]);
}

#[cfg(test)]
#[test]
fn test_emitted_once() {
    let mut table = SymbolTable::new();
    assert!(!table.is_emitted("btn"));
    assert!(table.mark_emitted("btn"));
    assert!(!table.mark_emitted("btn"));
    assert!(table.is_emitted("btn"));
}
