use crate::style::SymbolTable;
use css::{Palette, StyleMap};
use html::{NodeData, Tree, TreeError};
use std::str::FromStr;
use tracing::{debug, span, Level};

mod plain;
mod typestyle;

pub use plain::Css;
pub use typestyle::TypeStyle;

/// Turns interned styles into text for one style sheet flavour
pub trait Backend {
    /// Boilerplate that goes at the top of the output
    fn imports(&self) -> String;
    /// One class definition
    fn rule(&self, class_name: &str, style: &StyleMap) -> String;
    fn palette(&self, palette: &Palette) -> String;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Format {
    TypeStyle,
    Css,
}

impl Default for Format {
    fn default() -> Self {
        Self::TypeStyle
    }
}

impl FromStr for Format {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "typestyle" => Ok(Self::TypeStyle),
            "css" => Ok(Self::Css),
            other => Err(format!("unknown format '{}', expected 'typestyle' or 'css'", other)),
        }
    }
}

impl Format {
    pub fn backend(&self) -> Box<dyn Backend> {
        match self {
            Format::TypeStyle => Box::new(TypeStyle),
            Format::Css => Box::new(Css),
        }
    }
}

/// Class definitions in output order. Each node contributes its own definition (if it
/// is an element whose class has not been printed yet) followed by everything its
/// children contribute; children are visited, and so claim their classes, first.
pub fn emit_rules(
    tree: &Tree,
    table: &mut SymbolTable,
    backend: &dyn Backend,
) -> Result<Vec<String>, TreeError> {
    let mut fragments: Vec<Vec<String>> = vec![Vec::new(); tree.len()];
    for id in tree.post_order()? {
        let node = tree.node(id)?;
        let mut own = Vec::new();
        if let NodeData::Element(element) = &node.data {
            if let Some(class_name) = &element.class_name {
                if table.mark_emitted(class_name) {
                    let style = table.definition(class_name).unwrap_or(&element.style);
                    own.push(backend.rule(class_name, style));
                }
            }
        }
        for &child in &node.children {
            own.append(&mut fragments[child]);
        }
        fragments[id] = own;
    }
    Ok(std::mem::take(&mut fragments[tree.root()]))
}

/// The complete style sheet: boilerplate, the palette when `with_palette` is set and
/// something was collected, then every class definition once
pub fn emit(
    tree: &Tree,
    table: &mut SymbolTable,
    backend: &dyn Backend,
    with_palette: bool,
) -> Result<String, TreeError> {
    let span = span!(Level::DEBUG, "Emitting");
    let _enter = span.enter();
    let rules = emit_rules(tree, table, backend)?;
    debug!("{} rules", rules.len());
    let mut sections = vec![backend.imports()];
    if with_palette && !table.palette().is_empty() {
        sections.push(backend.palette(table.palette()));
    }
    sections.extend(rules);
    Ok(sections
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
#[test]
fn test_format_from_str() {
    assert_eq!("css".parse::<Format>(), Ok(Format::Css));
    assert_eq!("typestyle".parse::<Format>(), Ok(Format::TypeStyle));
    assert!("scss".parse::<Format>().is_err());
    assert_eq!(Format::default(), Format::TypeStyle);
}
