//! Turns a captured DOM subtree into a deduplicated style sheet.
//!
//! Every distinct style in the tree (pseudo-elements folded into their parents) is
//! interned under one readable class name, each node is annotated with its class, and
//! the definitions are emitted once each, in document order.

use html::{annotate, AnnotateOptions, Tree};
use serde::Deserialize;
use tracing::{info, span, Level};
use url::Url;

/// Loading of captured subtrees
pub mod capture;
/// Printing of interned styles
pub mod emit;
mod error;
/// Readable, collision-free class names
pub mod names;
/// Interning of node styles into classes
pub mod style;
#[cfg(test)]
mod tests;

pub use emit::{Backend, Css, Format, TypeStyle};
pub use error::{Error, Result};
pub use style::{intern_styles, structural_hash, SymbolTable};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Collect a color palette, and print it with the style sheet
    pub extract_colors: bool,
    /// Drop `data-*` attributes
    pub remove_data_attributes: bool,
    /// Resolve relative `src`/`href` values against this URL
    #[serde(alias = "url")]
    pub base_url: Option<Url>,
}

impl Options {
    pub fn annotate_options(&self) -> AnnotateOptions {
        AnnotateOptions {
            remove_data_attributes: self.remove_data_attributes,
            base_url: self.base_url.clone(),
        }
    }
}

/// The result of one run
#[derive(Debug)]
pub struct Conversion {
    pub stylesheet: String,
    pub symbols: SymbolTable,
}

/// Annotate `tree`, intern its styles and print the style sheet with `backend`. On
/// success every styled element of the tree carries its class name.
///
/// The tree is checked before anything is touched, so a malformed tree produces an
/// error and no output.
pub fn convert(tree: &mut Tree, options: &Options, backend: &dyn Backend) -> Result<Conversion> {
    let span = span!(Level::DEBUG, "Converting", nodes = tree.len());
    let _enter = span.enter();
    tree.post_order()?;
    annotate(tree, &options.annotate_options());
    let mut symbols = SymbolTable::new();
    intern_styles(tree, &mut symbols, options.extract_colors)?;
    let stylesheet = emit::emit(tree, &mut symbols, backend, options.extract_colors)?;
    info!(
        classes = symbols.len(),
        colors = symbols.palette().len(),
        "Conversion finished"
    );
    Ok(Conversion { stylesheet, symbols })
}
