//! Canonical pretty-printer
//!
//! Serializes a document in one fixed shape so that output never
//! depends on which tool produced the input: tab indentation (one tab
//! per nesting level), `\n` line endings, a single trailing newline,
//! and consistent entity escaping. Elements whose content is purely
//! structural get one child per line; anything containing character
//! data is written inline with the text preserved verbatim.
//!
//! The printer is total: serializing a parsed [`Document`] cannot
//! fail, and feeding its output back through the parser reproduces the
//! same tree.

use crate::core::document::{Document, Element, Misc, XmlNode, XmlDecl};
use quick_xml::escape::{escape, partial_escape};

/// Serialize a document to bytes
pub fn serialize(doc: &Document) -> Vec<u8> {
    serialize_to_string(doc).into_bytes()
}

/// Serialize a document to a string
pub fn serialize_to_string(doc: &Document) -> String {
    let mut printer = Printer { out: String::new() };
    printer.write_document(doc);
    printer.out
}

struct Printer {
    out: String,
}

impl Printer {
    fn write_document(&mut self, doc: &Document) {
        if let Some(decl) = &doc.decl {
            self.write_decl(decl);
        }
        for misc in &doc.prolog {
            self.write_misc(misc);
        }
        self.write_element(&doc.root, 0);
        for misc in &doc.epilog {
            self.write_misc(misc);
        }
    }

    fn write_decl(&mut self, decl: &XmlDecl) {
        self.out.push_str("<?xml version=\"");
        self.out.push_str(&decl.version);
        self.out.push('"');
        if let Some(encoding) = &decl.encoding {
            self.out.push_str(" encoding=\"");
            self.out.push_str(encoding);
            self.out.push('"');
        }
        if let Some(standalone) = &decl.standalone {
            self.out.push_str(" standalone=\"");
            self.out.push_str(standalone);
            self.out.push('"');
        }
        self.out.push_str("?>\n");
    }

    fn write_misc(&mut self, misc: &Misc) {
        match misc {
            Misc::Comment(text) => {
                self.out.push_str("<!--");
                self.out.push_str(text);
                self.out.push_str("-->\n");
            }
            Misc::DocType(text) => {
                self.out.push_str("<!DOCTYPE ");
                self.out.push_str(text);
                self.out.push_str(">\n");
            }
            Misc::PI { target, data } => {
                self.write_pi(target, data);
                self.out.push('\n');
            }
        }
    }

    fn write_pi(&mut self, target: &str, data: &str) {
        self.out.push_str("<?");
        self.out.push_str(target);
        if !data.is_empty() {
            self.out.push(' ');
            self.out.push_str(data);
        }
        self.out.push_str("?>");
    }

    fn write_element(&mut self, element: &Element, depth: usize) {
        self.indent(depth);
        self.write_open_tag(element);

        if !has_significant_children(element) {
            self.out.push_str("/>\n");
            return;
        }
        self.out.push('>');

        if has_character_content(element) {
            // Character data present: keep the whole content inline so
            // no whitespace is invented inside it.
            for child in &element.children {
                self.write_inline_node(child);
            }
        } else {
            self.out.push('\n');
            for child in &element.children {
                match child {
                    XmlNode::Element(el) => self.write_element(el, depth + 1),
                    XmlNode::Comment(text) => {
                        self.indent(depth + 1);
                        self.out.push_str("<!--");
                        self.out.push_str(text);
                        self.out.push_str("-->\n");
                    }
                    XmlNode::PI { target, data } => {
                        self.indent(depth + 1);
                        self.write_pi(target, data);
                        self.out.push('\n');
                    }
                    // Whitespace-only text between structural children
                    // is the previous indentation; it gets regenerated.
                    XmlNode::Text(_) => {}
                    // Unreachable: CDATA forces inline mode.
                    XmlNode::CData(_) => {}
                }
            }
            self.indent(depth);
        }

        self.out.push_str("</");
        self.out.push_str(&element.name.raw);
        self.out.push_str(">\n");
    }

    fn write_inline_element(&mut self, element: &Element) {
        self.write_open_tag(element);
        if element.children.is_empty() {
            self.out.push_str("/>");
            return;
        }
        self.out.push('>');
        for child in &element.children {
            self.write_inline_node(child);
        }
        self.out.push_str("</");
        self.out.push_str(&element.name.raw);
        self.out.push('>');
    }

    fn write_inline_node(&mut self, node: &XmlNode) {
        match node {
            XmlNode::Element(el) => self.write_inline_element(el),
            XmlNode::Text(text) => self.out.push_str(&partial_escape(text)),
            XmlNode::CData(text) => {
                self.out.push_str("<![CDATA[");
                self.out.push_str(text);
                self.out.push_str("]]>");
            }
            XmlNode::Comment(text) => {
                self.out.push_str("<!--");
                self.out.push_str(text);
                self.out.push_str("-->");
            }
            XmlNode::PI { target, data } => self.write_pi(target, data),
        }
    }

    fn write_open_tag(&mut self, element: &Element) {
        self.out.push('<');
        self.out.push_str(&element.name.raw);
        for attr in &element.attributes {
            self.out.push(' ');
            self.out.push_str(&attr.name.raw);
            self.out.push_str("=\"");
            self.out.push_str(&escape_attribute(&attr.value));
            self.out.push('"');
        }
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push('\t');
        }
    }
}

/// Whether the element has children worth serializing
///
/// Whitespace-only text in otherwise structural content does not
/// count; such elements collapse to a self-closing tag.
fn has_significant_children(element: &Element) -> bool {
    if has_character_content(element) {
        return true;
    }
    element
        .children
        .iter()
        .any(|c| !matches!(c, XmlNode::Text(_)))
}

/// Whether the element's content contains character data that must be
/// preserved verbatim
fn has_character_content(element: &Element) -> bool {
    element.children.iter().any(|c| match c {
        XmlNode::Text(text) => !text.trim().is_empty(),
        XmlNode::CData(_) => true,
        _ => false,
    })
}

/// Escape an attribute value, keeping control whitespace visible as
/// character references so it survives a reparse
fn escape_attribute(value: &str) -> String {
    let escaped = escape(value);
    if !escaped.contains('\n') && !escaped.contains('\t') {
        return escaped.into_owned();
    }
    escaped.replace('\n', "&#10;").replace('\t', "&#9;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::Document;
    use pretty_assertions::assert_eq;

    fn roundtrip(xml: &str) -> String {
        serialize_to_string(&Document::parse(xml.as_bytes()).unwrap())
    }

    #[test]
    fn test_nested_elements_indent_with_tabs() {
        assert_eq!(
            roundtrip("<svg><g><rect/></g></svg>"),
            "<svg>\n\t<g>\n\t\t<rect/>\n\t</g>\n</svg>\n"
        );
    }

    #[test]
    fn test_reindents_messy_whitespace() {
        assert_eq!(
            roundtrip("<svg>\r\n      <g>  <rect/>\t</g>\r\n</svg>"),
            "<svg>\n\t<g>\n\t\t<rect/>\n\t</g>\n</svg>\n"
        );
    }

    #[test]
    fn test_text_content_stays_inline() {
        assert_eq!(
            roundtrip("<svg><title>  My &amp; Art  </title></svg>"),
            "<svg>\n\t<title>  My &amp; Art  </title>\n</svg>\n"
        );
    }

    #[test]
    fn test_mixed_content_preserved_verbatim() {
        assert_eq!(
            roundtrip("<svg><text>a <tspan>b</tspan> c</text></svg>"),
            "<svg>\n\t<text>a <tspan>b</tspan> c</text>\n</svg>\n"
        );
    }

    #[test]
    fn test_empty_pair_collapses_to_self_closing() {
        assert_eq!(roundtrip("<svg><g>   </g></svg>"), "<svg>\n\t<g/>\n</svg>\n");
    }

    #[test]
    fn test_attributes_escaped() {
        assert_eq!(
            roundtrip(r#"<svg title="a &lt; b &amp; c"/>"#),
            "<svg title=\"a &lt; b &amp; c\"/>\n"
        );
    }

    #[test]
    fn test_declaration_and_comment_kept() {
        assert_eq!(
            roundtrip("<?xml version=\"1.0\" encoding=\"UTF-8\"?><!-- hand drawn --><svg/>"),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- hand drawn -->\n<svg/>\n"
        );
    }

    #[test]
    fn test_cdata_preserved() {
        assert_eq!(
            roundtrip("<svg><script><![CDATA[if (a < b) go();]]></script></svg>"),
            "<svg>\n\t<script><![CDATA[if (a < b) go();]]></script>\n</svg>\n"
        );
    }

    #[test]
    fn test_output_is_stable() {
        let once = roundtrip(
            "<svg>\n  <g>\n    <rect width=\"3\"/>\n    <!-- note -->\n  </g>\n</svg>",
        );
        let twice = roundtrip(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_trailing_newline() {
        assert!(roundtrip("<svg/>").ends_with("/>\n"));
    }
}
