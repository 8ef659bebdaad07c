use super::dom::{DOMAttributes, NodeData, Tree};
use nom::branch::alt;
use nom::bytes::complete::{tag_no_case, take_while_m_n};
use nom::character::complete::char;
use nom::combinator::recognize;
use nom::sequence::{pair, tuple};
use nom::IResult;
use tracing::{debug, span, warn, Level};
use url::Url;

/// Attributes starting with this prefix are dropped when `remove_data_attributes` is set
pub const DATA_ATTRIBUTE_PREFIX: &str = "data-";

/// Attributes whose values are links to resolve against the base URL
static LINK_ATTRIBUTES: &[&str] = &["src", "href"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotateOptions {
    pub remove_data_attributes: bool,
    pub base_url: Option<Url>,
}

/// Matches the schemes that are left alone when resolving links
fn absolute_prefix(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(pair(
            alt((
                tag_no_case("https"),
                tag_no_case("http"),
                tag_no_case("file"),
                tag_no_case("ftps"),
                tag_no_case("ftp"),
                tag_no_case("mailto"),
                tag_no_case("javascript"),
            )),
            char(':'),
        )),
        // Inline images, e.g. `data:image/png;base64,...`
        recognize(tuple((
            tag_no_case("data:image/"),
            take_while_m_n(2, 9, |c: char| c != ';'),
            char(';'),
        ))),
    ))(input)
}

pub fn is_absolute(value: &str) -> bool {
    absolute_prefix(value).is_ok()
}

#[cfg(test)]
#[test]
fn test_is_absolute() {
    assert!(is_absolute("https://other.com/x"));
    assert!(is_absolute("HTTP://other.com"));
    assert!(is_absolute("ftps://files.example.com"));
    assert!(is_absolute("mailto:someone@example.com"));
    assert!(is_absolute("javascript:void(0)"));
    assert!(is_absolute("data:image/png;base64,AAAA"));
    assert!(!is_absolute("data:text/html,hi"));
    assert!(!is_absolute("b/c.html"));
    assert!(!is_absolute("/root.css"));
    assert!(!is_absolute("httpx://nope"));
}

/// Resolve a link against `base`, leaving empty and already absolute values untouched
pub fn resolve_link(base: &Url, value: &str) -> String {
    if value.is_empty() || is_absolute(value) {
        return value.to_string();
    }
    match base.join(value) {
        Ok(url) => url.to_string(),
        Err(e) => {
            warn!("Could not resolve {} against {}: {}", value, base, e);
            value.to_string()
        }
    }
}

#[cfg(test)]
#[test]
fn test_resolve_link() {
    let base = Url::parse("https://example.com/a/").unwrap();
    assert_eq!(resolve_link(&base, "b/c.html"), "https://example.com/a/b/c.html");
    assert_eq!(resolve_link(&base, "/root.css"), "https://example.com/root.css");
    assert_eq!(resolve_link(&base, "https://other.com/x"), "https://other.com/x");
    assert_eq!(resolve_link(&base, "javascript:void(0)"), "javascript:void(0)");
    assert_eq!(resolve_link(&base, ""), "");
}

/// Apply the attribute rewrites to one element's attributes
pub fn annotate_attributes(attributes: DOMAttributes, options: &AnnotateOptions) -> DOMAttributes {
    DOMAttributes(
        attributes
            .0
            .into_iter()
            .filter(|(name, _)| {
                !(options.remove_data_attributes && name.starts_with(DATA_ATTRIBUTE_PREFIX))
            })
            .map(|(name, value)| match &options.base_url {
                Some(base) if LINK_ATTRIBUTES.contains(&name.as_str()) => {
                    let resolved = resolve_link(base, &value);
                    (name, resolved)
                }
                _ => (name, value),
            })
            .collect(),
    )
}

/// Apply the attribute rewrites to every element of the tree
pub fn annotate(tree: &mut Tree, options: &AnnotateOptions) {
    let span = span!(Level::DEBUG, "Annotating attributes");
    let _enter = span.enter();
    let mut count = 0;
    for node in tree.nodes_mut() {
        if let NodeData::Element(element) = &mut node.data {
            let attributes = std::mem::take(&mut element.attributes);
            element.attributes = annotate_attributes(attributes, options);
            count += 1;
        }
    }
    debug!("Annotated {} elements", count);
}
