use super::dom::{NodeData, NodeId, Tree, TreeError};

// Elements that never have content or a closing tag
static VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

enum Visit {
    Open(NodeId),
    Close(NodeId),
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

fn push_attribute(name: &str, value: &str, out: &mut String) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_attribute(value, out);
    out.push('"');
}

/// Render the tree as markup. An element that was given a class name has its `class`
/// attribute replaced by it; pseudo-elements are not part of the markup.
pub fn to_markup(tree: &Tree) -> Result<String, TreeError> {
    // Validates the shape so the walk below terminates
    tree.post_order()?;
    let mut out = String::new();
    let mut stack = vec![Visit::Open(tree.root())];
    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Open(id) => {
                let node = tree.node(id)?;
                match &node.data {
                    NodeData::Text(text) => escape_text(text, &mut out),
                    NodeData::PseudoElement(_) => {}
                    NodeData::Element(element) => {
                        out.push('<');
                        out.push_str(&element.tag_name);
                        if let Some(class_name) = &element.class_name {
                            push_attribute("class", class_name, &mut out);
                        }
                        for (name, value) in element.attributes.iter() {
                            let replaced = name == "class" || name == "className";
                            if element.class_name.is_some() && replaced {
                                continue;
                            }
                            push_attribute(name, value, &mut out);
                        }
                        out.push('>');
                        if VOID_ELEMENTS.contains(&element.tag_name.as_str()) {
                            continue;
                        }
                        stack.push(Visit::Close(id));
                        stack.extend(node.children.iter().rev().map(|&c| Visit::Open(c)));
                    }
                }
            }
            Visit::Close(id) => {
                if let Some(tag) = tree.node(id)?.data.tag() {
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                }
            }
        }
    }
    Ok(out)
}
