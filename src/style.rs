//! The TeX style family (display, text, script, scriptscript).
//!
//! Only the style identities matter to the parser: lowered constructs such
//! as `cases` cells record which style a downstream builder should lay them
//! out in. The size-resolution arithmetic lives with the builders.

/// A TeX layout style. Contains a unique id, a size index shared by the
/// cramped and uncramped variants, and the cramped flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    /// Unique identifier for the style
    pub id: usize,
    /// Size level (0=display, 1=text, 2=script, 3=scriptscript)
    pub size: usize,
    /// Whether the style is cramped
    pub cramped: bool,
}

impl Style {
    /// Create a new style instance (const so it can back the constants
    /// below).
    #[must_use]
    pub const fn new(id: usize, size: usize, cramped: bool) -> Self {
        Self { id, size, cramped }
    }
}

/// Display style.
pub static DISPLAY: Style = Style::new(0, 0, false);
/// Text (inline) style.
pub static TEXT: Style = Style::new(2, 1, false);
/// Script style, used for super- and subscripts.
pub static SCRIPT: Style = Style::new(4, 2, false);
/// Scriptscript style, used for nested scripts.
pub static SCRIPTSCRIPT: Style = Style::new(6, 3, false);
