use super::keywords::nearest_named_color;
use super::normalize::camel_case;
use super::parsing::{find_hex, find_rgb, find_rgba, parse_color_literal};
use super::{Palette, StyleMap, StyleValue};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Finds the color literal a value refers to, rewriting an `rgb()` triplet to hex in
/// place. `rgba()` and hex literals are reported as they are but never rewritten.
/// When several kinds occur, hex beats `rgba()` beats `rgb()`.
fn extract_value(value: &mut String) -> Option<String> {
    let original = value.clone();
    let mut candidate = None;
    if let Some((start, text, color)) = find_rgb(&original) {
        let hex = color.to_hex();
        value.replace_range(start..start + text.len(), &hex);
        candidate = Some(hex);
    }
    if let Some(text) = find_rgba(&original) {
        candidate = Some(text.to_string());
    }
    if let Some(text) = find_hex(&original) {
        candidate = Some(text.to_string());
    }
    candidate
}

fn record(candidate: String, palette: &mut Palette) {
    let color = match parse_color_literal(&candidate) {
        Some(color) => color,
        None => {
            trace!("Not a color: {}", candidate);
            return;
        }
    };
    let name = camel_case(nearest_named_color(&color).name);
    if palette.insert_first(name.as_str(), candidate.as_str()) {
        debug!("Palette entry {} = {}", name, candidate);
    }
}

/// Runs color extraction over every string value of a declaration block
pub fn extract_colors(declarations: &mut BTreeMap<String, StyleValue>, palette: &mut Palette) {
    for value in declarations.values_mut() {
        if let StyleValue::Text(text) = value {
            if let Some(candidate) = extract_value(text) {
                record(candidate, palette);
            }
        }
    }
}

/// Runs color extraction over a style and, separately, over each of its pseudo-state
/// and pseudo-element blocks
pub fn extract_style_colors(style: &mut StyleMap, palette: &mut Palette) {
    extract_colors(&mut style.declarations, palette);
    for nested in style.pseudo_states.values_mut() {
        extract_colors(&mut nested.declarations, palette);
    }
    for nested in style.pseudo_elements.values_mut() {
        extract_colors(&mut nested.declarations, palette);
    }
}

#[cfg(test)]
#[test]
fn test_rgb_is_rewritten() {
    let mut value = "1px solid rgb(255, 0, 0)".to_string();
    assert_eq!(extract_value(&mut value), Some("#ff0000".to_string()));
    assert_eq!(value, "1px solid #ff0000");
}

#[cfg(test)]
#[test]
fn test_rgba_and_hex_are_kept() {
    let mut value = "rgba(0, 0, 255, 1)".to_string();
    assert_eq!(extract_value(&mut value), Some("rgba(0, 0, 255, 1)".to_string()));
    assert_eq!(value, "rgba(0, 0, 255, 1)");

    let mut value = "#FF0000".to_string();
    assert_eq!(extract_value(&mut value), Some("#FF0000".to_string()));
    assert_eq!(value, "#FF0000");
}

#[cfg(test)]
#[test]
fn test_hex_wins_over_rgb() {
    let mut value = "rgb(0, 0, 0) #fff".to_string();
    assert_eq!(extract_value(&mut value), Some("#fff".to_string()));
    assert_eq!(value, "#000000 #fff");
}

#[cfg(test)]
#[test]
fn test_palette_first_wins() {
    let mut palette = Palette::new();
    let mut first = StyleMap::new().with("color", "rgb(255, 0, 0)");
    let mut second = StyleMap::new().with("border-color", "#fe0000");
    extract_style_colors(&mut first, &mut palette);
    extract_style_colors(&mut second, &mut palette);
    assert_eq!(palette.len(), 1);
    assert_eq!(palette.get("red"), Some("#ff0000"));
    assert_eq!(first.get("color"), Some(&StyleValue::from("#ff0000")));
    assert_eq!(second.get("border-color"), Some(&StyleValue::from("#fe0000")));
}

#[cfg(test)]
#[test]
fn test_nested_blocks_and_unknown_literals() {
    let mut palette = Palette::new();
    let mut style = StyleMap::new()
        .with("width", "12px")
        .with("color", "#abcde")
        .with_pseudo_state(":hover", StyleMap::new().with("color", "rgb(0, 0, 128)"))
        .with_pseudo_element("::after", StyleMap::new().with("background", "#008000"));
    extract_style_colors(&mut style, &mut palette);
    assert_eq!(palette.get("navy"), Some("#000080"));
    assert_eq!(palette.get("green"), Some("#008000"));
    assert_eq!(palette.len(), 2);
    assert_eq!(style.pseudo_states[":hover"].get("color"), Some(&StyleValue::from("#000080")));
}
