use super::Backend;
use css::{kebab_case, Palette, StyleMap, StyleValue};
use std::fmt::Write;

/// Plain CSS: every class, and each of its variants, becomes its own rule. Numbers are
/// printed as pixel lengths unless the property takes a bare number.
pub struct Css;

// Properties whose numeric values carry no unit, as TypeStyle treats them
static UNITLESS: &[&str] = &[
    "animationIterationCount",
    "borderImageOutset",
    "borderImageSlice",
    "borderImageWidth",
    "boxFlex",
    "boxFlexGroup",
    "boxOrdinalGroup",
    "columnCount",
    "columns",
    "fillOpacity",
    "flex",
    "flexGrow",
    "flexNegative",
    "flexOrder",
    "flexPositive",
    "flexShrink",
    "floodOpacity",
    "fontWeight",
    "gridArea",
    "gridColumn",
    "gridColumnEnd",
    "gridColumnSpan",
    "gridColumnStart",
    "gridRow",
    "gridRowEnd",
    "gridRowSpan",
    "gridRowStart",
    "lineClamp",
    "lineHeight",
    "opacity",
    "order",
    "orphans",
    "stopOpacity",
    "strokeDasharray",
    "strokeDashoffset",
    "strokeMiterlimit",
    "strokeOpacity",
    "strokeWidth",
    "tabSize",
    "widows",
    "zIndex",
    "zoom",
];

static VENDOR_PREFIXES: &[&str] = &["webkit", "moz", "ms", "o"];

fn is_unitless(name: &str) -> bool {
    let unprefixed = VENDOR_PREFIXES
        .iter()
        .find_map(|p| {
            name.strip_prefix(*p)
                .filter(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
        })
        .map(|rest| {
            let mut chars = rest.chars();
            chars
                .next()
                .map(|c| c.to_ascii_lowercase().to_string() + chars.as_str())
                .unwrap_or_default()
        });
    let name = unprefixed.as_deref().unwrap_or(name);
    UNITLESS.contains(&name)
}

fn css_value(name: &str, value: &StyleValue) -> String {
    match value {
        StyleValue::Number(n) if *n != 0.0 && !is_unitless(name) => format!("{}px", n),
        _ => value.to_string(),
    }
}

fn variant_selector(base: &str, suffix: &str) -> String {
    if suffix.starts_with(':') {
        format!("{}{}", base, suffix)
    } else {
        format!("{}:{}", base, suffix)
    }
}

fn write_rules(selector: &str, style: &StyleMap, top: bool, out: &mut Vec<String>) {
    if top || !style.declarations.is_empty() {
        let mut rule = format!("{} {{\n", selector);
        for (name, value) in &style.declarations {
            let _ = writeln!(rule, "    {}: {};", kebab_case(name), css_value(name, value));
        }
        rule.push('}');
        out.push(rule);
    }
    for (suffix, variant) in style.pseudo_elements.iter().chain(style.pseudo_states.iter()) {
        write_rules(&variant_selector(selector, suffix), variant, false, out);
    }
}

impl Backend for Css {
    fn imports(&self) -> String {
        String::new()
    }

    fn rule(&self, class_name: &str, style: &StyleMap) -> String {
        let mut rules = Vec::new();
        write_rules(&format!(".{}", class_name), style, true, &mut rules);
        rules.join("\n")
    }

    fn palette(&self, palette: &Palette) -> String {
        let mut out = String::from(":root {\n");
        for (name, color) in palette.iter() {
            let _ = writeln!(out, "    --{}: {};", kebab_case(name), color);
        }
        out.push('}');
        out
    }
}

#[cfg(test)]
#[test]
fn test_rule() {
    let style = StyleMap::new()
        .with("backgroundColor", "#ff0000")
        .with("zIndex", 2.0)
        .with_pseudo_element("::after", StyleMap::new().with("content", "\"\""))
        .with_pseudo_state("hover", StyleMap::new().with("webkitTransform", "none"));
    let expected = r#".card {
    background-color: #ff0000;
    z-index: 2;
}
.card::after {
    content: "";
}
.card:hover {
    -webkit-transform: none;
}"#;
    assert_eq!(Css.rule("card", &style), expected);
}

#[cfg(test)]
#[test]
fn test_palette() {
    let mut palette = Palette::new();
    palette.insert_first("darkSlateGray", "#2f4f4f");
    assert_eq!(Css.palette(&palette), ":root {\n    --dark-slate-gray: #2f4f4f;\n}");
}

#[cfg(test)]
#[test]
fn test_lengths_get_pixels() {
    let style = StyleMap::new()
        .with("width", 32.0)
        .with("marginTop", -4.5)
        .with("padding", 0.0)
        .with("opacity", 0.5)
        .with("webkitFlexGrow", 1.0)
        .with("height", "2em");
    let expected = r#".box {
    height: 2em;
    margin-top: -4.5px;
    opacity: 0.5;
    padding: 0;
    -webkit-flex-grow: 1;
    width: 32px;
}"#;
    assert_eq!(Css.rule("box", &style), expected);
}
