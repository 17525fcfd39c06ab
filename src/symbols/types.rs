use strum::AsRefStr;

/// Rendering mode for a symbol or node.
///
/// Math mode follows mathematical typesetting conventions (italic
/// variables, operator spacing); text mode renders characters as ordinary
/// text. The parser starts in math mode and string literals contribute
/// text-mode leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Mathematical rendering with operator spacing and italic variables.
    Math,
    /// Plain-text rendering, used for the bodies of string literals.
    Text,
}

/// Font family a symbol is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// The primary font family covering the standard symbols.
    Main,
    /// The AMS font family for extended symbols such as `\ne`.
    Ams,
}

/// Atom families in the TeXbook sense.
///
/// The family decides the spacing a downstream builder applies around the
/// symbol. Symbols whose table entry carries an atom family lower to
/// `atom` nodes tagged with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Atom {
    /// Binary operators such as `+` and `\cdot`.
    Bin,
    /// Closing delimiters such as `)` and `\rceil`.
    Close,
    /// Inner constructs with their own spacing class.
    Inner,
    /// Opening delimiters such as `(` and `\lfloor`.
    Open,
    /// Punctuation such as `,` and `;`.
    Punct,
    /// Relations such as `=`, `\leq` and the arrow commands.
    Rel,
}

/// Symbol groups that are not spacing atoms.
///
/// These map directly onto the node tag the parser emits for the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonAtom {
    /// Ordinary math symbols: variables and Greek letters.
    MathOrd,
    /// Ordinary text symbols: digits, `\infty`, unknown characters.
    TextOrd,
}

/// Classification of a symbol-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    /// A spacing atom of the given family.
    Atom(Atom),
    /// A non-atom group naming the node tag directly.
    NonAtom(NonAtom),
}

/// Everything the table knows about one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharInfo {
    /// Font family the symbol is drawn from.
    pub font: Font,
    /// Group used to pick the emitted node shape.
    pub group: Group,
    /// Unicode replacement character for command names such as `\alpha`.
    pub replace: Option<char>,
}
