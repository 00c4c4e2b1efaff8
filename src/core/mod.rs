//! SVG cleaning core
//!
//! This module contains the engine: the namespace-aware document tree,
//! the declarative removal table, selector matching, and the canonical
//! pretty-printer.

pub mod document;
pub mod error;
pub mod namespace;
pub mod rules;
pub mod selector;
pub mod serializer;
pub mod stripper;

pub use document::{Attribute, Document, Element, QName, XmlNode};
pub use error::{SvgError, SvgResult};
pub use namespace::ns;
pub use rules::{Rule, DEFAULT_RULES};
pub use selector::{NameTest, Selector};
pub use stripper::Stripper;
