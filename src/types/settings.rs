use bon::bon;

/// Configuration forwarded through the parser to function handlers and on
/// to downstream builders.
///
/// The parser itself treats settings as opaque: no field changes how input
/// is tokenized or lowered. Handlers receive the settings through their
/// [`FunctionContext`](crate::define_function::FunctionContext) and
/// external HTML/MathML builders read them when laying out the produced
/// tree.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Whether the expression is being typeset in display (block) mode.
    pub display_mode: bool,
    /// Whether the host should raise on errors rather than render them.
    pub throw_on_error: bool,
    /// CSS color used by hosts that render errors instead of raising.
    pub error_color: String,
}

#[bon]
impl Settings {
    /// Creates a [`Settings`] value, applying defaults for every option
    /// that was not supplied to the builder.
    ///
    /// # Default Values
    /// - `display_mode`: `false` (inline mode)
    /// - `throw_on_error`: `true`
    /// - `error_color`: `"#cc0000"`
    #[must_use]
    #[builder]
    pub fn new(
        /// Display mode (true for block, false for inline).
        display_mode: Option<bool>,
        /// Raise errors (true) or let the host render them (false).
        throw_on_error: Option<bool>,
        /// CSS color for rendered errors.
        error_color: Option<String>,
    ) -> Self {
        Self {
            display_mode: display_mode.unwrap_or(false),
            throw_on_error: throw_on_error.unwrap_or(true),
            error_color: error_color.unwrap_or_else(|| "#cc0000".to_owned()),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let settings = Settings::default();
        assert!(!settings.display_mode);
        assert!(settings.throw_on_error);
        assert_eq!(settings.error_color, "#cc0000");
    }

    #[test]
    fn test_builder_overrides() {
        let settings = Settings::builder()
            .display_mode(true)
            .throw_on_error(false)
            .build();
        assert!(settings.display_mode);
        assert!(!settings.throw_on_error);
    }
}
