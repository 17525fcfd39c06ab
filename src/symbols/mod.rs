//! The read-only symbol table consulted while lowering atoms.
//!
//! Given a mode and a symbol name the table answers how that symbol is
//! classified: either as a spacing atom of some family (`bin`, `rel`,
//! `open`, ...) or as an ordinary symbol whose group names the node tag
//! directly. The parser's fallback for names the table does not know is a
//! `textord` node, so lookups can never lose content.
//!
//! The catalogue kept here is intentionally small: the letters, digits,
//! delimiters, relation and operator commands this notation can produce,
//! plus the Greek alphabet and infinity for the named-symbol identifiers.

mod types;

use crate::namespace::KeyMap;
pub use types::{Atom, CharInfo, Font, Group, Mode, NonAtom};

/// Symbol table with separate math-mode and text-mode mappings.
pub struct Symbols {
    math: KeyMap<String, CharInfo>,
    text: KeyMap<String, CharInfo>,
}

impl Default for Symbols {
    fn default() -> Self {
        Self::new()
    }
}

impl Symbols {
    /// Creates an empty symbol table. For the populated default catalogue
    /// use [`create_symbols`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            math: KeyMap::default(),
            text: KeyMap::default(),
        }
    }

    /// Defines a symbol in the given mode.
    pub fn define_symbol(
        &mut self,
        mode: Mode,
        font: Font,
        group: Group,
        replace: Option<char>,
        name: &str,
    ) {
        let table = match mode {
            Mode::Math => &mut self.math,
            Mode::Text => &mut self.text,
        };
        table.insert(
            name.to_owned(),
            CharInfo {
                font,
                group,
                replace,
            },
        );
    }

    /// Looks up a math-mode symbol.
    #[must_use]
    pub fn get_math(&self, name: &str) -> Option<&CharInfo> {
        self.math.get(name)
    }

    /// Looks up a text-mode symbol.
    #[must_use]
    pub fn get_text(&self, name: &str) -> Option<&CharInfo> {
        self.text.get(name)
    }

    /// Looks up a symbol in the given mode.
    #[must_use]
    pub fn get(&self, mode: Mode, name: &str) -> Option<&CharInfo> {
        match mode {
            Mode::Math => self.get_math(name),
            Mode::Text => self.get_text(name),
        }
    }

    /// Whether the table has an entry for `name` in `mode`.
    #[must_use]
    pub fn contains(&self, mode: Mode, name: &str) -> bool {
        self.get(mode, name).is_some()
    }
}

/// Builds the default symbol catalogue.
#[must_use]
pub fn create_symbols() -> Symbols {
    use Atom::{Bin, Close, Open, Punct, Rel};
    use Mode::{Math, Text};
    use NonAtom::{MathOrd, TextOrd};

    let mut s = Symbols::new();

    let mut math = |font: Font, group: Group, replace: Option<char>, name: &str| {
        s.define_symbol(Math, font, group, replace, name);
    };

    // Binary operators
    math(Font::Main, Group::Atom(Bin), Some('+'), "+");
    math(Font::Main, Group::Atom(Bin), Some('\u{2212}'), "-");
    math(Font::Main, Group::Atom(Bin), Some('\u{22c5}'), "\\cdot");

    // Relations, including the targets of the multi-character operators
    math(Font::Main, Group::Atom(Rel), Some('='), "=");
    math(Font::Main, Group::Atom(Rel), Some('<'), "<");
    math(Font::Main, Group::Atom(Rel), Some('>'), ">");
    math(Font::Main, Group::Atom(Rel), Some(':'), ":");
    math(Font::Ams, Group::Atom(Rel), Some('\u{2260}'), "\\ne");
    math(Font::Main, Group::Atom(Rel), Some('\u{2264}'), "\\leq");
    math(Font::Main, Group::Atom(Rel), Some('\u{2265}'), "\\geq");
    math(Font::Main, Group::Atom(Rel), Some('\u{2192}'), "\\to");
    math(Font::Main, Group::Atom(Rel), Some('\u{2190}'), "\\leftarrow");
    math(Font::Main, Group::Atom(Rel), Some('\u{2194}'), "\\leftrightarrow");
    math(Font::Main, Group::Atom(Rel), Some('\u{21d2}'), "\\Rightarrow");
    math(Font::Main, Group::Atom(Rel), Some('\u{21d4}'), "\\Leftrightarrow");

    // Delimiters
    math(Font::Main, Group::Atom(Open), None, "(");
    math(Font::Main, Group::Atom(Close), None, ")");
    math(Font::Main, Group::Atom(Open), None, "[");
    math(Font::Main, Group::Atom(Close), None, "]");
    math(Font::Main, Group::Atom(Open), Some('{'), "\\{");
    math(Font::Main, Group::Atom(Close), Some('}'), "\\}");
    math(Font::Main, Group::Atom(Open), Some('\u{230a}'), "\\lfloor");
    math(Font::Main, Group::Atom(Close), Some('\u{230b}'), "\\rfloor");
    math(Font::Main, Group::Atom(Open), Some('\u{2308}'), "\\lceil");
    math(Font::Main, Group::Atom(Close), Some('\u{2309}'), "\\rceil");
    math(Font::Main, Group::NonAtom(TextOrd), Some('\u{2223}'), "|");
    math(Font::Main, Group::NonAtom(TextOrd), Some('\u{2225}'), "\\|");

    // Punctuation
    math(Font::Main, Group::Atom(Punct), None, ",");
    math(Font::Main, Group::Atom(Punct), None, ";");
    math(Font::Main, Group::NonAtom(TextOrd), None, ".");
    math(Font::Main, Group::Atom(Close), None, "!");

    // Lowercase Greek
    for (name, ch) in [
        ("\\alpha", '\u{3b1}'),
        ("\\beta", '\u{3b2}'),
        ("\\gamma", '\u{3b3}'),
        ("\\delta", '\u{3b4}'),
        ("\\epsilon", '\u{3f5}'),
        ("\\zeta", '\u{3b6}'),
        ("\\eta", '\u{3b7}'),
        ("\\theta", '\u{3b8}'),
        ("\\iota", '\u{3b9}'),
        ("\\kappa", '\u{3ba}'),
        ("\\lambda", '\u{3bb}'),
        ("\\mu", '\u{3bc}'),
        ("\\nu", '\u{3bd}'),
        ("\\xi", '\u{3be}'),
        ("\\pi", '\u{3c0}'),
        ("\\rho", '\u{3c1}'),
        ("\\sigma", '\u{3c3}'),
        ("\\tau", '\u{3c4}'),
        ("\\upsilon", '\u{3c5}'),
        ("\\phi", '\u{3d5}'),
        ("\\chi", '\u{3c7}'),
        ("\\psi", '\u{3c8}'),
        ("\\omega", '\u{3c9}'),
    ] {
        s.define_symbol(Math, Font::Main, Group::NonAtom(MathOrd), Some(ch), name);
    }

    // Uppercase Greek
    for (name, ch) in [
        ("\\Gamma", '\u{393}'),
        ("\\Delta", '\u{394}'),
        ("\\Theta", '\u{398}'),
        ("\\Lambda", '\u{39b}'),
        ("\\Xi", '\u{39e}'),
        ("\\Pi", '\u{3a0}'),
        ("\\Sigma", '\u{3a3}'),
        ("\\Upsilon", '\u{3a5}'),
        ("\\Phi", '\u{3a6}'),
        ("\\Psi", '\u{3a8}'),
        ("\\Omega", '\u{3a9}'),
    ] {
        s.define_symbol(Math, Font::Main, Group::NonAtom(MathOrd), Some(ch), name);
    }

    s.define_symbol(
        Math,
        Font::Main,
        Group::NonAtom(TextOrd),
        Some('\u{221e}'),
        "\\infty",
    );

    // Letters are mathord in math mode, textord in text mode
    for ch in ('a'..='z').chain('A'..='Z') {
        let name = ch.to_string();
        s.define_symbol(Math, Font::Main, Group::NonAtom(MathOrd), Some(ch), &name);
        s.define_symbol(Text, Font::Main, Group::NonAtom(TextOrd), Some(ch), &name);
    }

    // Digits are textord in both modes
    for ch in '0'..='9' {
        let name = ch.to_string();
        s.define_symbol(Math, Font::Main, Group::NonAtom(TextOrd), Some(ch), &name);
        s.define_symbol(Text, Font::Main, Group::NonAtom(TextOrd), Some(ch), &name);
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table() {
        let symbols = Symbols::new();
        assert!(symbols.get_math("\\alpha").is_none());
        assert!(symbols.get_text("\\alpha").is_none());
    }

    #[test]
    fn test_default_catalogue() {
        let symbols = create_symbols();

        let plus = symbols.get_math("+").expect("plus should be defined");
        assert_eq!(plus.group, Group::Atom(Atom::Bin));

        let alpha = symbols.get_math("\\alpha").expect("alpha");
        assert_eq!(alpha.group, Group::NonAtom(NonAtom::MathOrd));
        assert_eq!(alpha.replace, Some('\u{3b1}'));

        // Letters are classified per mode
        assert_eq!(
            symbols.get(Mode::Math, "x").map(|i| i.group),
            Some(Group::NonAtom(NonAtom::MathOrd))
        );
        assert_eq!(
            symbols.get(Mode::Text, "x").map(|i| i.group),
            Some(Group::NonAtom(NonAtom::TextOrd))
        );

        assert!(!symbols.contains(Mode::Math, "\\nosuchsymbol"));
    }
}
