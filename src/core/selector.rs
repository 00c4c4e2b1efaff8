//! Attribute path expressions
//!
//! This module parses the small XPath-like grammar used by the removal
//! table and applies a parsed selector against a document tree.
//!
//! Supported forms:
//! - `/svg:svg/@inkscape:version` - attribute on the root element
//! - `/svg:svg/sodipodi:namedview/@inkscape:zoom` - attribute on a
//!   descendant reached by an absolute element path
//! - `//@inkscape:export-xdpi` - attribute on any element at any depth
//!
//! Prefixes resolve against the canonical table in
//! [`crate::core::namespace`]; an unprefixed attribute test matches
//! attributes in no namespace.

use crate::core::document::{Attribute, Element};
use crate::core::error::{SvgError, SvgResult};
use crate::core::namespace::{canonical_prefix_uri, split_qname};

/// A namespace-aware name test for one path step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTest {
    pub ns: Option<&'static str>,
    pub local: String,
}

impl NameTest {
    fn parse(token: &str) -> SvgResult<NameTest> {
        let (prefix, local) = split_qname(token);
        if local.is_empty() || local.contains('@') {
            return Err(SvgError::BadSelector(format!("bad name test '{}'", token)));
        }
        let ns = match prefix {
            Some(p) => Some(canonical_prefix_uri(p).ok_or_else(|| {
                SvgError::BadSelector(format!("unknown prefix '{}' in '{}'", p, token))
            })?),
            None => None,
        };
        Ok(NameTest {
            ns,
            local: local.to_string(),
        })
    }

    /// Whether an element matches this test
    ///
    /// Elements that carry no namespace at all (documents written
    /// without `xmlns` declarations) match on local name alone.
    pub fn matches_element(&self, element: &Element) -> bool {
        if element.name.local != self.local {
            return false;
        }
        match (self.ns, element.name.ns.as_deref()) {
            (Some(want), Some(have)) => want == have,
            (Some(_), None) => element.name.prefix.is_none(),
            (None, Some(_)) => false,
            (None, None) => true,
        }
    }

    /// Whether an attribute matches this test
    pub fn matches_attribute(&self, attribute: &Attribute) -> bool {
        if attribute.name.local != self.local {
            return false;
        }
        match (self.ns, attribute.name.ns.as_deref()) {
            (Some(want), Some(have)) => want == have,
            (None, None) => attribute.name.prefix.is_none(),
            _ => false,
        }
    }
}

/// A parsed attribute path expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    steps: Vec<NameTest>,
    any_depth: bool,
    attr: NameTest,
}

impl Selector {
    /// Parse a path expression
    pub fn parse(expr: &str) -> SvgResult<Selector> {
        if let Some(rest) = expr.strip_prefix("//") {
            let token = rest.strip_prefix('@').ok_or_else(|| {
                SvgError::BadSelector(format!("expected '//@name', got '{}'", expr))
            })?;
            if token.contains('/') {
                return Err(SvgError::BadSelector(format!(
                    "'//' selects attributes only, got '{}'",
                    expr
                )));
            }
            return Ok(Selector {
                steps: Vec::new(),
                any_depth: true,
                attr: NameTest::parse(token)?,
            });
        }

        let rest = expr
            .strip_prefix('/')
            .ok_or_else(|| SvgError::BadSelector(format!("path must start with '/': '{}'", expr)))?;

        let mut steps = Vec::new();
        let mut attr = None;
        for token in rest.split('/') {
            if attr.is_some() {
                return Err(SvgError::BadSelector(format!(
                    "nothing may follow the attribute step in '{}'",
                    expr
                )));
            }
            if token.is_empty() {
                return Err(SvgError::BadSelector(format!("empty step in '{}'", expr)));
            }
            if let Some(name) = token.strip_prefix('@') {
                attr = Some(NameTest::parse(name)?);
            } else {
                steps.push(NameTest::parse(token)?);
            }
        }

        let attr = attr.ok_or_else(|| {
            SvgError::BadSelector(format!("path has no attribute step: '{}'", expr))
        })?;
        if steps.is_empty() {
            return Err(SvgError::BadSelector(format!(
                "absolute path needs at least one element step: '{}'",
                expr
            )));
        }
        Ok(Selector {
            steps,
            any_depth: false,
            attr,
        })
    }

    /// Delete every matching attribute under `root`, returning how many
    /// were removed
    ///
    /// Sibling attribute order is untouched and owning elements stay in
    /// place even when their last attribute goes away.
    pub fn apply(&self, root: &mut Element) -> usize {
        if self.any_depth {
            let mut removed = 0;
            root.visit_elements_mut(&mut |el| {
                removed += remove_matching(el, &self.attr);
            });
            removed
        } else {
            apply_steps(root, &self.steps, &self.attr)
        }
    }
}

fn apply_steps(element: &mut Element, steps: &[NameTest], attr: &NameTest) -> usize {
    let Some((first, rest)) = steps.split_first() else {
        return 0;
    };
    if !first.matches_element(element) {
        return 0;
    }
    if rest.is_empty() {
        remove_matching(element, attr)
    } else {
        element
            .child_elements_mut()
            .map(|child| apply_steps(child, rest, attr))
            .sum()
    }
}

fn remove_matching(element: &mut Element, attr: &NameTest) -> usize {
    let before = element.attributes.len();
    element.attributes.retain(|a| !attr.matches_attribute(a));
    before - element.attributes.len()
}
