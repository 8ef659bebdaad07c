use super::parsing::parse_numeric;
use super::{StyleMap, StyleValue};
use std::collections::BTreeMap;
use tracing::warn;

/// Splits an identifier-ish string into lowercase words: on anything that is not
/// alphanumeric, and on case changes (`fooBar`, `HTMLParser`)
fn words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// `background-color` -> `backgroundColor`, `btn primary` -> `btnPrimary`
pub fn camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (i, word) in words(input).into_iter().enumerate() {
        if i == 0 {
            out.push_str(&word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

#[cfg(test)]
#[test]
fn test_camel_case() {
    assert_eq!(camel_case("background-color"), "backgroundColor");
    assert_eq!(camel_case("-webkit-transition"), "webkitTransition");
    assert_eq!(camel_case("fontSize"), "fontSize");
    assert_eq!(camel_case("btn_primary--large"), "btnPrimaryLarge");
    assert_eq!(camel_case("dark slate gray"), "darkSlateGray");
    assert_eq!(camel_case("HTMLParser"), "htmlParser");
    assert_eq!(camel_case("nav-item2"), "navItem2");
    assert_eq!(camel_case("---"), "");
}

const VENDOR_PREFIXES: &[&str] = &["webkit-", "moz-", "ms-", "o-"];

/// `backgroundColor` -> `background-color`, restoring the leading dash of vendor
/// prefixes (`webkitTransition` -> `-webkit-transition`)
pub fn kebab_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    for c in input.chars() {
        if c.is_uppercase() {
            out.push('-');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    if VENDOR_PREFIXES.iter().any(|p| out.starts_with(p)) {
        out.insert(0, '-');
    }
    out
}

#[cfg(test)]
#[test]
fn test_kebab_case() {
    assert_eq!(kebab_case("backgroundColor"), "background-color");
    assert_eq!(kebab_case("color"), "color");
    assert_eq!(kebab_case("webkitTransition"), "-webkit-transition");
    assert_eq!(kebab_case("msFlex"), "-ms-flex");
}

fn canonical_value(value: &StyleValue) -> StyleValue {
    match value {
        StyleValue::Text(s) => parse_numeric(s).map_or_else(|| value.clone(), StyleValue::Number),
        StyleValue::Number(n) if !n.is_finite() => StyleValue::Text(n.to_string()),
        StyleValue::Number(n) if *n == 0.0 => StyleValue::Number(0.0),
        StyleValue::Number(_) => value.clone(),
    }
}

/// Spellings of one property (`font-size`, `fontSize`) collapse into a single key. The
/// raw names are visited in sorted order and the last one wins.
fn canonical_declarations(
    declarations: &BTreeMap<String, StyleValue>,
) -> BTreeMap<String, StyleValue> {
    let mut canonical = BTreeMap::new();
    for (name, value) in declarations {
        let property = camel_case(name);
        if let Some(dropped) = canonical.insert(property.clone(), canonical_value(value)) {
            warn!("`{}` overrides another spelling of {}, dropping {}", name, property, dropped);
        }
    }
    canonical
}

/// Canonical form of a style: camelCase property names and numeric-looking values as
/// numbers, applied to the nested pseudo-element and pseudo-state maps too. Selector
/// and state keys are kept as they are.
pub fn canonicalize(style: &StyleMap) -> StyleMap {
    StyleMap {
        declarations: canonical_declarations(&style.declarations),
        pseudo_elements: style
            .pseudo_elements
            .iter()
            .map(|(selector, nested)| (selector.clone(), canonicalize(nested)))
            .collect(),
        pseudo_states: style
            .pseudo_states
            .iter()
            .map(|(state, nested)| (state.clone(), canonicalize(nested)))
            .collect(),
    }
}

#[cfg(test)]
#[test]
fn test_canonicalize() {
    let raw = StyleMap::new()
        .with("font-size", "12")
        .with("line-height", "1.5")
        .with("margin", "0 auto")
        .with_pseudo_state(":hover", StyleMap::new().with("z-index", "2"));
    let canonical = canonicalize(&raw);
    assert_eq!(canonical.get("fontSize"), Some(&StyleValue::Number(12.0)));
    assert_eq!(canonical.get("lineHeight"), Some(&StyleValue::Number(1.5)));
    assert_eq!(canonical.get("margin"), Some(&StyleValue::from("0 auto")));
    assert_eq!(
        canonical.pseudo_states[":hover"].get("zIndex"),
        Some(&StyleValue::Number(2.0))
    );
    // Idempotent
    assert_eq!(canonicalize(&canonical), canonical);
}

#[cfg(test)]
#[test]
fn test_spellings_collapse() {
    let raw = StyleMap::new()
        .with("font-size", "12px")
        .with("fontSize", "14px");
    let canonical = canonicalize(&raw);
    assert_eq!(canonical.declarations.len(), 1);
    assert_eq!(canonical.get("fontSize"), Some(&StyleValue::from("14px")));
}
