//! svgscrub - a Git clean filter for SVG files
//!
//! SVG editors save per-session state straight into the document:
//! window geometry, zoom level, the last export path, the selected
//! layer. None of it is part of the drawing, and all of it produces
//! spurious diffs the moment two machines touch the same file. This
//! crate strips that metadata and pretty-prints the result in one
//! canonical shape.
//!
//! The engine lives in [`core`]: a namespace-aware document tree, a
//! declarative removal table, and a deterministic serializer. The
//! [`files`] module adds the front-ends a clean filter runs as -
//! stdin-to-stdout filtering, in-place batch conversion, and `git config`
//! setup.
//!
//! Cleaning is idempotent: running the filter over its own output
//! reproduces it byte for byte.
//!
//! # Example
//!
//! ```
//! use svgscrub::Stripper;
//!
//! # fn main() -> svgscrub::SvgResult<()> {
//! let stripper = Stripper::new()?;
//! let cleaned = stripper.strip(br#"<svg inkscape:version="1.3" width="10"/>"#)?;
//! assert_eq!(cleaned, b"<svg width=\"10\"/>\n");
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod files;

pub use crate::core::{
    Document, Rule, Selector, Stripper, SvgError, SvgResult, DEFAULT_RULES,
};
