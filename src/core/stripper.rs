//! The metadata stripper
//!
//! Ties the engine together: parse bytes into a [`Document`], run the
//! removal table over it, serialize the result canonically.

use crate::core::document::Document;
use crate::core::error::{SvgError, SvgResult};
use crate::core::rules::{Rule, DEFAULT_RULES};
use crate::core::selector::Selector;
use crate::core::serializer;

#[derive(Debug)]
struct CompiledRule {
    selector: Selector,
    path: String,
    description: String,
}

/// Removes editor session metadata from SVG documents
#[derive(Debug)]
pub struct Stripper {
    rules: Vec<CompiledRule>,
}

impl Stripper {
    /// Create a stripper with the built-in removal table
    pub fn new() -> SvgResult<Self> {
        Self::with_rules(DEFAULT_RULES)
    }

    /// Create a stripper with a custom removal table
    pub fn with_rules(rules: &[Rule]) -> SvgResult<Self> {
        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            let selector = Selector::parse(rule.path).map_err(|e| match e {
                SvgError::BadSelector(msg) => {
                    SvgError::BadSelector(format!("{}: {}", rule.path, msg))
                }
                other => other,
            })?;
            compiled.push(CompiledRule {
                selector,
                path: rule.path.to_string(),
                description: rule.description.to_string(),
            });
        }
        Ok(Self { rules: compiled })
    }

    /// Clean a whole document: parse, strip, pretty-print
    ///
    /// Fails with [`SvgError::MalformedDocument`] when the input is not
    /// well-formed XML; nothing is returned in that case, so callers
    /// can never emit partial output.
    pub fn strip(&self, input: &[u8]) -> SvgResult<Vec<u8>> {
        let mut doc = Document::parse(input)?;
        self.strip_document(&mut doc);
        Ok(serializer::serialize(&doc))
    }

    /// Run the removal table over an already-parsed document
    ///
    /// Returns the number of deleted attributes. Zero means the
    /// document carried none of the targeted metadata.
    pub fn strip_document(&self, doc: &mut Document) -> usize {
        let mut removed = 0;
        for rule in &self.rules {
            let count = rule.selector.apply(&mut doc.root);
            if count > 0 {
                log::debug!("removed {} ({})", rule.path, rule.description);
                removed += count;
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strips_editor_attributes() {
        let stripper = Stripper::new().unwrap();
        let input = br#"<svg inkscape:version="1.0" sodipodi:docname="a.svg" width="10"><sodipodi:namedview inkscape:zoom="2"/></svg>"#;
        let output = String::from_utf8(stripper.strip(input).unwrap()).unwrap();
        assert_eq!(
            output,
            "<svg width=\"10\">\n\t<sodipodi:namedview/>\n</svg>\n"
        );
    }

    #[test]
    fn test_strip_document_counts_removals() {
        let stripper = Stripper::new().unwrap();
        let mut doc = Document::parse(
            br#"<svg inkscape:version="1.0"><g inkscape:export-xdpi="96" inkscape:export-ydpi="96"/></svg>"#,
        )
        .unwrap();
        assert_eq!(stripper.strip_document(&mut doc), 3);
        assert_eq!(stripper.strip_document(&mut doc), 0);
    }

    #[test]
    fn test_malformed_input_reports_error() {
        let stripper = Stripper::new().unwrap();
        let err = stripper.strip(b"<svg><g></svg>").unwrap_err();
        assert!(matches!(err, SvgError::MalformedDocument(_)));
    }

    #[test]
    fn test_custom_rule_table() {
        let rules = [Rule::new("/svg:svg/@data-editor", "session marker")];
        let stripper = Stripper::with_rules(&rules).unwrap();
        let output = stripper
            .strip(br#"<svg data-editor="x" inkscape:version="1.0"/>"#)
            .unwrap();
        let output = String::from_utf8(output).unwrap();
        // Only the custom table applies.
        assert_eq!(output, "<svg inkscape:version=\"1.0\"/>\n");
    }

    #[test]
    fn test_bad_custom_rule_is_rejected() {
        let rules = [Rule::new("not-a-path", "broken")];
        let err = Stripper::with_rules(&rules).unwrap_err();
        assert!(matches!(err, SvgError::BadSelector(_)));
    }
}
