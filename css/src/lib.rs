use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(PartialEq, Clone, Debug)]
pub enum StyleValue {
    Text(String),
    Number(f64),
}

impl StyleValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            StyleValue::Text(s) => Some(s.as_str()),
            StyleValue::Number(_) => None,
        }
    }
}

// The normalizer turns non-finite numbers into text. Zero hashes the same whatever
// its sign, so hashing agrees with `PartialEq`.
impl Eq for StyleValue {}

impl Hash for StyleValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            StyleValue::Text(s) => {
                0u8.hash(state);
                s.hash(state);
            }
            StyleValue::Number(n) => {
                1u8.hash(state);
                let n = if *n == 0.0 { 0.0 } else { *n };
                n.to_bits().hash(state);
            }
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Text(s) => f.write_str(s),
            StyleValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        StyleValue::Text(s.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(s: String) -> Self {
        StyleValue::Text(s)
    }
}

impl From<f64> for StyleValue {
    fn from(n: f64) -> Self {
        StyleValue::Number(n)
    }
}

/// The resolved style of one node: plain declarations plus the nested variants for
/// pseudo-elements (keyed by selector suffix, e.g. `::before`) and pseudo-states
/// (keyed by state, e.g. `:hover`)
///
/// All three maps are ordered, so two maps holding the same content compare, hash and
/// print identically no matter in which order they were filled.
#[derive(PartialEq, Eq, Hash, Clone, Debug, Default)]
pub struct StyleMap {
    pub declarations: BTreeMap<String, StyleValue>,
    pub pseudo_elements: BTreeMap<String, StyleMap>,
    pub pseudo_states: BTreeMap<String, StyleMap>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.pseudo_elements.is_empty() && self.pseudo_states.is_empty()
    }

    pub fn get(&self, property: &str) -> Option<&StyleValue> {
        self.declarations.get(property)
    }

    pub fn insert(&mut self, property: impl Into<String>, value: impl Into<StyleValue>) {
        self.declarations.insert(property.into(), value.into());
    }

    /// Builder form of [`StyleMap::insert`]
    pub fn with(mut self, property: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.insert(property, value);
        self
    }

    pub fn with_pseudo_state(mut self, state: impl Into<String>, style: StyleMap) -> Self {
        self.pseudo_states.insert(state.into(), style);
        self
    }

    pub fn with_pseudo_element(mut self, selector: impl Into<String>, style: StyleMap) -> Self {
        self.pseudo_elements.insert(selector.into(), style);
        self
    }
}

#[macro_export]
macro_rules! style_map {
    ($($name:expr => $value:expr),* $(,)?) => {
        $crate::StyleMap::new()$(.with($name, $value))*
    };
}

/// Colors found while extracting, keyed by a readable name. The first color recorded
/// under a name wins and insertion order is kept for printing.
#[derive(PartialEq, Clone, Debug, Default)]
pub struct Palette(Vec<(String, String)>);

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `color` under `name` unless the name is already taken. Returns whether
    /// the entry was added.
    pub fn insert_first(&mut self, name: impl Into<String>, color: impl Into<String>) -> bool {
        let name = name.into();
        if self.get(&name).is_some() {
            return false;
        }
        self.0.push((name, color.into()));
        true
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, c)| (n.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Palette {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, color) in &self.0 {
            map.serialize_entry(name, color)?;
        }
        map.end()
    }
}

mod colors;
mod keywords;
mod normalize;
mod parsing;
#[cfg(test)]
mod tests;

pub use colors::{extract_colors, extract_style_colors};
pub use keywords::{nearest_named_color, NamedColor, NAMED_COLORS};
pub use normalize::{camel_case, canonicalize, kebab_case};
pub use parsing::{parse_color_literal, parse_numeric, RgbColor};
