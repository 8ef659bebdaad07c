use css::camel_case;
use html::{DOMAttributes, NodeData};

/// Compact a raw attribute value into an identifier, or `None` if nothing usable is left
fn compact(raw: &str) -> Option<String> {
    let name = camel_case(raw);
    if name.is_empty() {
        return None;
    }
    if name.starts_with(|c: char| c.is_numeric()) {
        return Some(format!("_{}", name));
    }
    Some(name)
}

/// The longest whitespace separated class, the first one on ties
fn longest_class(value: &str) -> Option<&str> {
    value.split_whitespace().fold(None, |longest: Option<&str>, class| match longest {
        Some(l) if l.len() >= class.len() => Some(l),
        _ => Some(class),
    })
}

fn from_attributes(attributes: &DOMAttributes) -> Option<String> {
    let class = ["class", "className"]
        .iter()
        .filter_map(|&name| attributes.get(name))
        .find(|value| !value.trim().is_empty());
    class
        .and_then(longest_class)
        .and_then(compact)
        .or_else(|| attributes.get("id").and_then(compact))
        .or_else(|| attributes.get("name").and_then(compact))
}

/// A readable class name for a node, derived from its `class`, `id` or `name`
/// attribute, falling back to `<tag>Cls`
pub fn candidate(data: &NodeData) -> String {
    data.attributes()
        .and_then(from_attributes)
        .unwrap_or_else(|| format!("{}Cls", camel_case(data.tag().unwrap_or("node"))))
}

/// The first of `name`, `name0`, `name1`, ... that is not taken yet
pub fn resolve(name: String, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(&name) {
        return name;
    }
    (0usize..)
        .map(|suffix| format!("{}{}", name, suffix))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or(name)
}

#[cfg(test)]
fn element(attributes: DOMAttributes) -> NodeData {
    NodeData::element("div", attributes, css::StyleMap::new())
}

#[cfg(test)]
#[test]
fn test_candidate_order() {
    use html::attributes;
    let both = attributes! {"id" => "main-nav", "class" => "nav nav-primary nav-dark"};
    assert_eq!(candidate(&element(both)), "navPrimary");
    let react = attributes! {"className" => "card-body"};
    assert_eq!(candidate(&element(react)), "cardBody");
    let blank_class = attributes! {"class" => "  ", "id" => "main-nav"};
    assert_eq!(candidate(&element(blank_class)), "mainNav");
    let symbols = attributes! {"class" => "---", "name" => "email"};
    assert_eq!(candidate(&element(symbols)), "email");
    assert_eq!(candidate(&element(attributes! {"id" => "3col"})), "_3col");
    assert_eq!(candidate(&element(DOMAttributes::empty())), "divCls");
    assert_eq!(
        candidate(&NodeData::pseudo_element("before", css::StyleMap::new())),
        "beforeCls"
    );
}

#[cfg(test)]
#[test]
fn test_longest_class_ties() {
    assert_eq!(longest_class("ab cd ef"), Some("ab"));
    assert_eq!(longest_class("a bcd efg"), Some("bcd"));
    assert_eq!(longest_class(""), None);
}

#[cfg(test)]
#[test]
fn test_resolve_suffixes() {
    let mut taken: Vec<String> = Vec::new();
    for _ in 0..4 {
        let name = resolve("btn".to_string(), |n| taken.iter().any(|t| t == n));
        taken.push(name);
    }
    assert_eq!(taken, vec!["btn", "btn0", "btn1", "btn2"]);
}
