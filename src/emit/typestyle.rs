use super::Backend;
use css::{Palette, StyleMap, StyleValue};
use std::fmt::Write;

const INDENT: &str = "    ";

/// CSS-in-JS output for the `typestyle` package: one exported `style({...})` call per
/// class, variants nested under `$nest`
pub struct TypeStyle;

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        quote(name)
    }
}

fn value(value: &StyleValue) -> String {
    match value {
        StyleValue::Number(n) => n.to_string(),
        StyleValue::Text(s) => quote(s),
    }
}

/// `&::before` / `&:hover`
fn nested_selector(suffix: &str) -> String {
    if suffix.starts_with(':') {
        format!("&{}", suffix)
    } else {
        format!("&:{}", suffix)
    }
}

fn write_object(style: &StyleMap, depth: usize, out: &mut String) {
    let pad = INDENT.repeat(depth + 1);
    out.push_str("{\n");
    for (name, v) in &style.declarations {
        let _ = writeln!(out, "{}{}: {},", pad, key(name), value(v));
    }
    let nested: Vec<_> = style
        .pseudo_elements
        .iter()
        .chain(style.pseudo_states.iter())
        .collect();
    if !nested.is_empty() {
        let _ = write!(out, "{}$nest: {{\n", pad);
        let inner = INDENT.repeat(depth + 2);
        for (suffix, variant) in nested {
            let _ = write!(out, "{}{}: ", inner, quote(&nested_selector(suffix)));
            write_object(variant, depth + 2, out);
            out.push_str(",\n");
        }
        let _ = writeln!(out, "{}}},", pad);
    }
    out.push_str(&INDENT.repeat(depth));
    out.push('}');
}

impl Backend for TypeStyle {
    fn imports(&self) -> String {
        "import { style } from 'typestyle';".to_string()
    }

    fn rule(&self, class_name: &str, style: &StyleMap) -> String {
        let mut out = format!("export const {} = style(", class_name);
        write_object(style, 0, &mut out);
        out.push_str(");");
        out
    }

    fn palette(&self, palette: &Palette) -> String {
        let json = serde_json::to_string(palette).unwrap_or_else(|_| "{}".to_string());
        format!("export const colors = {};", json)
    }
}

#[cfg(test)]
#[test]
fn test_rule() {
    let style = StyleMap::new()
        .with("color", "#ff0000")
        .with("fontSize", 12.0)
        .with("fontFamily", "'Open Sans'")
        .with_pseudo_element("::before", StyleMap::new().with("content", "\"\""))
        .with_pseudo_state(":hover", StyleMap::new().with("opacity", 0.5));
    let expected = r#"export const btn = style({
    color: '#ff0000',
    fontFamily: '\'Open Sans\'',
    fontSize: 12,
    $nest: {
        '&::before': {
            content: '""',
        },
        '&:hover': {
            opacity: 0.5,
        },
    },
});"#;
    assert_eq!(TypeStyle.rule("btn", &style), expected);
}

#[cfg(test)]
#[test]
fn test_palette() {
    let mut palette = Palette::new();
    palette.insert_first("red", "#ff0000");
    palette.insert_first("navy", "rgba(0, 0, 128, 1)");
    assert_eq!(
        TypeStyle.palette(&palette),
        r##"export const colors = {"red":"#ff0000","navy":"rgba(0, 0, 128, 1)"};"##
    );
}
