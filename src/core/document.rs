//! In-memory XML document tree
//!
//! This module parses SVG/XML bytes into an ordered, namespace-aware
//! tree. Element and attribute order is preserved exactly as read, raw
//! qualified names are kept so serialization reproduces the source's
//! own prefixes, and every name additionally carries its resolved
//! namespace URI so removal rules match regardless of prefix spelling.

use crate::core::error::{SvgError, SvgResult};
use crate::core::namespace::{ns, split_qname, NamespaceScope};
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// A qualified name: the raw spelling plus its resolved namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QName {
    /// Name exactly as written in the source (e.g. `inkscape:zoom`)
    pub raw: String,
    /// Prefix part, if any
    pub prefix: Option<String>,
    /// Local part
    pub local: String,
    /// Resolved namespace URI, if the name is in a namespace
    pub ns: Option<String>,
}

/// A single attribute, order-preserving
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

/// An element with its attributes and children in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: QName,
    pub attributes: Vec<Attribute>,
    pub children: Vec<XmlNode>,
}

/// A node in element content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(Element),
    /// Character data, entity references already resolved
    Text(String),
    /// CDATA section, kept verbatim
    CData(String),
    Comment(String),
    PI { target: String, data: String },
}

/// The XML declaration, when the source has one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDecl {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

/// Prolog/epilog items outside the root element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Misc {
    Comment(String),
    DocType(String),
    PI { target: String, data: String },
}

/// A parsed XML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub decl: Option<XmlDecl>,
    pub prolog: Vec<Misc>,
    pub root: Element,
    pub epilog: Vec<Misc>,
}

impl Element {
    /// Visit this element and every descendant element, depth first
    pub fn visit_elements_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut Element),
    {
        f(self);
        for child in self.children.iter_mut() {
            if let XmlNode::Element(el) = child {
                el.visit_elements_mut(f);
            }
        }
    }

    /// Child elements, in order
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Child elements, in order, mutable
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|c| match c {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Look up an attribute value by raw name
    pub fn attribute(&self, raw: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.raw == raw)
            .map(|a| a.value.as_str())
    }
}

impl Document {
    /// Parse a document from bytes
    ///
    /// Fails with [`SvgError::MalformedDocument`] on anything that is
    /// not well-formed XML, including non-UTF-8 input, unclosed or
    /// mismatched tags, undefined entity references, and documents
    /// with no (or more than one) root element.
    pub fn parse(input: &[u8]) -> SvgResult<Document> {
        let text = std::str::from_utf8(input)
            .map_err(|_| SvgError::MalformedDocument("input is not valid UTF-8".to_string()))?;
        Self::parse_str(text)
    }

    /// Parse a document from a string
    pub fn parse_str(text: &str) -> SvgResult<Document> {
        let mut reader = Reader::from_str(text);

        let mut decl: Option<XmlDecl> = None;
        let mut prolog: Vec<Misc> = Vec::new();
        let mut root: Option<Element> = None;
        let mut epilog: Vec<Misc> = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut scope = NamespaceScope::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(malformed("multiple root elements", reader.buffer_position()));
                    }
                    let element = open_element(&e, &mut scope, reader.buffer_position())?;
                    stack.push(element);
                }
                Ok(Event::Empty(e)) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(malformed("multiple root elements", reader.buffer_position()));
                    }
                    let element = open_element(&e, &mut scope, reader.buffer_position())?;
                    scope.pop();
                    attach(&mut stack, &mut root, XmlNode::Element(element));
                }
                Ok(Event::End(e)) => {
                    let Some(element) = stack.pop() else {
                        return Err(malformed("unexpected closing tag", reader.buffer_position()));
                    };
                    let end_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    if element.name.raw != end_name {
                        return Err(malformed(
                            &format!(
                                "closing tag </{}> does not match <{}>",
                                end_name, element.name.raw
                            ),
                            reader.buffer_position(),
                        ));
                    }
                    scope.pop();
                    attach(&mut stack, &mut root, XmlNode::Element(element));
                }
                Ok(Event::Text(e)) => {
                    let raw = String::from_utf8_lossy(e.as_ref()).to_string();
                    let text = quick_xml::escape::unescape(&raw)
                        .map_err(|err| malformed(&format!("bad text content: {}", err), reader.buffer_position()))?;
                    let text = normalize_line_endings(&text);
                    if stack.is_empty() {
                        if !text.trim().is_empty() {
                            return Err(malformed("character data outside root element", reader.buffer_position()));
                        }
                    } else {
                        push_text(&mut stack, text);
                    }
                }
                Ok(Event::GeneralRef(e)) => {
                    let name = String::from_utf8_lossy(e.as_ref()).to_string();
                    if stack.is_empty() {
                        return Err(malformed("entity reference outside root element", reader.buffer_position()));
                    }
                    let resolved = resolve_reference(&name)
                        .ok_or_else(|| malformed(&format!("undefined entity &{};", name), reader.buffer_position()))?;
                    push_text(&mut stack, resolved);
                }
                Ok(Event::CData(e)) => {
                    let content = String::from_utf8_lossy(&e.into_inner()).to_string();
                    if stack.is_empty() {
                        return Err(malformed("CDATA outside root element", reader.buffer_position()));
                    }
                    attach(&mut stack, &mut root, XmlNode::CData(content));
                }
                Ok(Event::Comment(e)) => {
                    let content = String::from_utf8_lossy(e.as_ref()).to_string();
                    if stack.is_empty() {
                        let misc = Misc::Comment(content);
                        if root.is_some() {
                            epilog.push(misc);
                        } else {
                            prolog.push(misc);
                        }
                    } else {
                        attach(&mut stack, &mut root, XmlNode::Comment(content));
                    }
                }
                Ok(Event::PI(e)) => {
                    let target = String::from_utf8_lossy(e.target()).to_string();
                    // quick-xml's content() keeps the separator whitespace
                    // between target and data
                    let data = String::from_utf8_lossy(e.content())
                        .trim_start()
                        .to_string();
                    if stack.is_empty() {
                        let misc = Misc::PI { target, data };
                        if root.is_some() {
                            epilog.push(misc);
                        } else {
                            prolog.push(misc);
                        }
                    } else {
                        attach(&mut stack, &mut root, XmlNode::PI { target, data });
                    }
                }
                Ok(Event::DocType(e)) => {
                    if root.is_some() || !stack.is_empty() {
                        return Err(malformed("misplaced doctype", reader.buffer_position()));
                    }
                    let content = String::from_utf8_lossy(e.as_ref()).trim().to_string();
                    prolog.push(Misc::DocType(content));
                }
                Ok(Event::Decl(e)) => {
                    let version = e
                        .version()
                        .map_err(|err| malformed(&format!("bad XML declaration: {}", err), reader.buffer_position()))?;
                    let version = String::from_utf8_lossy(version.as_ref()).to_string();
                    let encoding = match e.encoding() {
                        Some(Ok(v)) => Some(String::from_utf8_lossy(v.as_ref()).to_string()),
                        Some(Err(err)) => {
                            return Err(malformed(
                                &format!("bad XML declaration: {}", err),
                                reader.buffer_position(),
                            ))
                        }
                        None => None,
                    };
                    let standalone = match e.standalone() {
                        Some(Ok(v)) => Some(String::from_utf8_lossy(v.as_ref()).to_string()),
                        Some(Err(err)) => {
                            return Err(malformed(
                                &format!("bad XML declaration: {}", err),
                                reader.buffer_position(),
                            ))
                        }
                        None => None,
                    };
                    decl = Some(XmlDecl {
                        version,
                        encoding,
                        standalone,
                    });
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(malformed(&e.to_string(), reader.buffer_position()));
                }
            }
        }

        if let Some(open) = stack.last() {
            return Err(SvgError::MalformedDocument(format!(
                "unclosed element <{}>",
                open.name.raw
            )));
        }
        let root = root
            .ok_or_else(|| SvgError::MalformedDocument("no root element".to_string()))?;

        Ok(Document {
            decl,
            prolog,
            root,
            epilog,
        })
    }

    /// Whether the root element looks like an SVG document
    ///
    /// Documents without namespace declarations are accepted, matching
    /// how editors sniff SVG content.
    pub fn is_svg(&self) -> bool {
        self.root.name.local.eq_ignore_ascii_case("svg")
            && match self.root.name.ns.as_deref() {
                Some(uri) => uri == ns::SVG,
                None => true,
            }
    }
}

/// Build an element from a start tag, entering its namespace scope
///
/// The caller pops the scope when the element closes (or immediately
/// for a self-closing tag).
fn open_element(e: &BytesStart<'_>, scope: &mut NamespaceScope, pos: u64) -> SvgResult<Element> {
    scope.push();

    // Bindings first: declaration order within the tag must not matter
    // for resolving the element name or sibling attributes.
    for attr in e.attributes() {
        let attr = attr.map_err(|err| malformed(&format!("bad attribute: {}", err), pos))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| malformed(&format!("bad attribute value: {}", err), pos))?;
        if key == "xmlns" {
            scope.declare("", &value);
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            scope.declare(prefix, &value);
        }
    }

    let raw = String::from_utf8_lossy(e.name().as_ref()).to_string();
    let name = element_qname(&raw, scope);

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| malformed(&format!("bad attribute: {}", err), pos))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| malformed(&format!("bad attribute value: {}", err), pos))?;
        let value = normalize_line_endings(&value);
        attributes.push(Attribute {
            name: attribute_qname(&key, scope),
            value,
        });
    }

    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn element_qname(raw: &str, scope: &NamespaceScope) -> QName {
    let (prefix, local) = split_qname(raw);
    QName {
        raw: raw.to_string(),
        prefix: prefix.map(str::to_string),
        local: local.to_string(),
        ns: scope.resolve_element(prefix),
    }
}

fn attribute_qname(raw: &str, scope: &NamespaceScope) -> QName {
    let (prefix, local) = split_qname(raw);
    QName {
        raw: raw.to_string(),
        prefix: prefix.map(str::to_string),
        local: local.to_string(),
        ns: scope.resolve_attribute(prefix),
    }
}

/// Attach a finished node to the innermost open element, or as root
fn attach(stack: &mut Vec<Element>, root: &mut Option<Element>, node: XmlNode) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else if let XmlNode::Element(el) = node {
        *root = Some(el);
    }
}

/// Append text to the innermost open element, coalescing with a
/// preceding text node (entity references split text into several
/// events)
fn push_text(stack: &mut [Element], text: String) {
    let Some(parent) = stack.last_mut() else {
        return;
    };
    if let Some(XmlNode::Text(existing)) = parent.children.last_mut() {
        existing.push_str(&text);
    } else {
        parent.children.push(XmlNode::Text(text));
    }
}

/// Resolve a general entity reference (`amp`, `#10`, `#x2014`, ...)
fn resolve_reference(name: &str) -> Option<String> {
    if let Some(digits) = name.strip_prefix('#') {
        let code_point = if let Some(hex) = digits.strip_prefix('x') {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            digits.parse::<u32>().ok()?
        };
        return char::from_u32(code_point).map(|c| c.to_string());
    }
    resolve_predefined_entity(name).map(str::to_string)
}

/// XML 1.0 section 2.11: `\r\n` and lone `\r` both become `\n`
fn normalize_line_endings(s: &str) -> String {
    if !s.contains('\r') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(ch);
        }
    }
    out
}

fn malformed(message: &str, pos: u64) -> SvgError {
    SvgError::MalformedDocument(format!("{} (at byte {})", message, pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let doc = Document::parse(b"<svg/>").unwrap();
        assert_eq!(doc.root.name.raw, "svg");
        assert!(doc.root.attributes.is_empty());
        assert!(doc.root.children.is_empty());
        assert!(doc.is_svg());
    }

    #[test]
    fn test_attribute_order_preserved() {
        let doc = Document::parse(br#"<svg c="3" a="1" b="2"/>"#).unwrap();
        let names: Vec<&str> = doc
            .root
            .attributes
            .iter()
            .map(|a| a.name.raw.as_str())
            .collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn test_namespace_resolution() {
        let doc = Document::parse(
            br#"<svg xmlns="http://www.w3.org/2000/svg"
                     xmlns:ink="http://www.inkscape.org/namespaces/inkscape"
                     ink:version="1.0"/>"#,
        )
        .unwrap();
        assert_eq!(doc.root.name.ns.as_deref(), Some(ns::SVG));
        let attr = &doc.root.attributes[2];
        assert_eq!(attr.name.local, "version");
        assert_eq!(attr.name.ns.as_deref(), Some(ns::INKSCAPE));
    }

    #[test]
    fn test_undeclared_editor_prefix_resolves() {
        let doc = Document::parse(br#"<svg inkscape:version="1.0"/>"#).unwrap();
        assert_eq!(
            doc.root.attributes[0].name.ns.as_deref(),
            Some(ns::INKSCAPE)
        );
        assert!(doc.is_svg());
    }

    #[test]
    fn test_text_and_entities() {
        let doc = Document::parse(b"<svg><title>a &amp; b &#33;</title></svg>").unwrap();
        let title = doc.root.child_elements().next().unwrap();
        assert_eq!(title.children, vec![XmlNode::Text("a & b !".to_string())]);
    }

    #[test]
    fn test_undefined_entity_is_malformed() {
        let err = Document::parse(b"<svg>&nosuch;</svg>").unwrap_err();
        assert!(matches!(err, SvgError::MalformedDocument(_)));
    }

    #[test]
    fn test_unclosed_tag_is_malformed() {
        let err = Document::parse(b"<svg><g>").unwrap_err();
        assert!(matches!(err, SvgError::MalformedDocument(_)));
    }

    #[test]
    fn test_mismatched_tag_is_malformed() {
        let err = Document::parse(b"<svg><g></svg></g>").unwrap_err();
        assert!(matches!(err, SvgError::MalformedDocument(_)));
    }

    #[test]
    fn test_multiple_roots_are_malformed() {
        let err = Document::parse(b"<svg/><svg/>").unwrap_err();
        assert!(matches!(err, SvgError::MalformedDocument(_)));
    }

    #[test]
    fn test_empty_input_is_malformed() {
        let err = Document::parse(b"").unwrap_err();
        assert!(matches!(err, SvgError::MalformedDocument(_)));
    }

    #[test]
    fn test_non_utf8_is_malformed() {
        let err = Document::parse(&[0x89, 0x50, 0x4e, 0x47]).unwrap_err();
        assert!(matches!(err, SvgError::MalformedDocument(_)));
    }

    #[test]
    fn test_decl_and_doctype_captured() {
        let doc = Document::parse(
            b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
              <!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"x.dtd\">\n\
              <svg/>",
        )
        .unwrap();
        let decl = doc.decl.unwrap();
        assert_eq!(decl.version, "1.0");
        assert_eq!(decl.encoding.as_deref(), Some("UTF-8"));
        assert!(matches!(doc.prolog[0], Misc::DocType(_)));
    }

    #[test]
    fn test_attribute_crlf_normalized() {
        let doc = Document::parse(b"<svg d=\"a\r\nb\"/>").unwrap();
        assert_eq!(doc.root.attributes[0].value, "a\nb");
    }

    #[test]
    fn test_non_svg_root() {
        let doc = Document::parse(b"<html/>").unwrap();
        assert!(!doc.is_svg());
    }
}
