mod annotate;
mod dom;
mod serialize;
#[cfg(test)]
mod tests;

pub use annotate::{
    annotate, annotate_attributes, is_absolute, resolve_link, AnnotateOptions,
    DATA_ATTRIBUTE_PREFIX,
};
pub use dom::*;
pub use serialize::to_markup;
