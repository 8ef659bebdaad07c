use super::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn hash_of(style: &StyleMap) -> u64 {
    let mut hasher = DefaultHasher::new();
    style.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn test_insertion_order_does_not_matter() {
    let a = style_map! {
        "color" => "red",
        "font-size" => "12",
        "margin" => "0 auto",
    }
    .with_pseudo_state(":hover", style_map! { "opacity" => "0.5", "color" => "blue" });
    let b = style_map! {
        "margin" => "0 auto",
        "color" => "red",
        "font-size" => "12",
    }
    .with_pseudo_state(":hover", style_map! { "color" => "blue", "opacity" => "0.5" });
    assert_eq!(a, b);
    assert_eq!(hash_of(&canonicalize(&a)), hash_of(&canonicalize(&b)));
}

#[test]
fn test_nested_content_changes_hash() {
    let plain = style_map! { "color" => "red" };
    let hovered = style_map! { "color" => "red" }
        .with_pseudo_state(":hover", style_map! { "color" => "blue" });
    assert_ne!(hash_of(&canonicalize(&plain)), hash_of(&canonicalize(&hovered)));
}

#[test]
fn test_zero_interns_once() {
    let a = canonicalize(&style_map! { "margin" => "0" });
    let b = canonicalize(&style_map! { "margin" => "-0" });
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn test_numeric_zero_interns_once() {
    let a = canonicalize(&style_map! { "margin" => 0.0 });
    let b = canonicalize(&style_map! { "margin" => -0.0 });
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
    assert_eq!(b.get("margin").map(|v| v.to_string()).as_deref(), Some("0"));
    // Equal before normalizing too
    assert_eq!(
        hash_of(&style_map! { "margin" => 0.0 }),
        hash_of(&style_map! { "margin" => -0.0 })
    );
}

#[test]
fn test_non_finite_numbers_become_text() {
    let style = canonicalize(&style_map! {
        "width" => f64::NAN,
        "height" => f64::INFINITY,
    });
    assert_eq!(style.get("width"), Some(&StyleValue::from("NaN")));
    assert_eq!(style.get("height"), Some(&StyleValue::from("inf")));
    assert_eq!(style, style.clone());
    assert_eq!(canonicalize(&style), style);
}

#[test]
fn test_empty_style() {
    assert!(StyleMap::new().is_empty());
    assert!(!StyleMap::new()
        .with_pseudo_element("::before", StyleMap::new())
        .is_empty());
}

#[test]
fn test_palette_keeps_insertion_order() {
    let mut palette = Palette::new();
    assert!(palette.insert_first("white", "#fff"));
    assert!(palette.insert_first("black", "#000000"));
    assert!(!palette.insert_first("white", "#ffffff"));
    let entries: Vec<_> = palette.iter().collect();
    assert_eq!(entries, vec![("white", "#fff"), ("black", "#000000")]);
}
