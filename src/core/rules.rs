//! The attribute removal table
//!
//! One declarative list of path-expression/description records. The
//! stripper iterates it generically; nothing else in the crate knows
//! which attributes are targeted.

/// A single removal rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    /// Path expression selecting the attribute (see [`crate::core::selector`])
    pub path: &'static str,
    /// What the attribute stores, for logs and docs
    pub description: &'static str,
}

impl Rule {
    /// Create a rule record
    pub const fn new(path: &'static str, description: &'static str) -> Self {
        Self { path, description }
    }
}

/// Editor session attributes that never belong in version control.
///
/// Every target may be absent in a given document; rules are
/// independent deletions, so their order does not affect the result.
pub const DEFAULT_RULES: &[Rule] = &[
    // Document root state written by Inkscape on every save.
    Rule::new(
        "/svg:svg/@inkscape:export-filename",
        "last export target path",
    ),
    Rule::new(
        "/svg:svg/@inkscape:version",
        "editor version that wrote the file",
    ),
    Rule::new("/svg:svg/@sodipodi:docname", "editor document name"),
    Rule::new(
        "/svg:svg/@inkscape:output_extension",
        "preferred save-as extension",
    ),
    // Per-session view state stored on sodipodi:namedview.
    Rule::new(
        "/svg:svg/sodipodi:namedview/@inkscape:window-width",
        "editor window width",
    ),
    Rule::new(
        "/svg:svg/sodipodi:namedview/@inkscape:window-height",
        "editor window height",
    ),
    Rule::new(
        "/svg:svg/sodipodi:namedview/@inkscape:window-x",
        "editor window x position",
    ),
    Rule::new(
        "/svg:svg/sodipodi:namedview/@inkscape:window-y",
        "editor window y position",
    ),
    Rule::new(
        "/svg:svg/sodipodi:namedview/@inkscape:window-maximized",
        "editor window maximized flag",
    ),
    Rule::new(
        "/svg:svg/sodipodi:namedview/@inkscape:current-layer",
        "layer selected in the editor",
    ),
    Rule::new("/svg:svg/sodipodi:namedview/@inkscape:zoom", "view zoom level"),
    Rule::new(
        "/svg:svg/sodipodi:namedview/@inkscape:cx",
        "per-session view state",
    ),
    Rule::new(
        "/svg:svg/sodipodi:namedview/@inkscape:cy",
        "per-session view state",
    ),
    Rule::new(
        "/svg:svg/sodipodi:namedview/@inkscape:snap-nodes",
        "per-session view state",
    ),
    Rule::new(
        "/svg:svg/sodipodi:namedview/@showpageshadow",
        "canvas page shadow toggle",
    ),
    Rule::new("/svg:svg/sodipodi:namedview/@showgrid", "canvas grid toggle"),
    // Export resolution hints can sit on any element.
    Rule::new("//@inkscape:export-xdpi", "per-element export resolution"),
    Rule::new("//@inkscape:export-ydpi", "per-element export resolution"),
];
