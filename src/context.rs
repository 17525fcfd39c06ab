//! Global context for parsing operations.

use crate::define_function::{FunctionDefSpec, FunctionSpec};
use crate::functions;
use crate::namespace::KeyMap;
use crate::symbols::{Symbols, create_symbols};

/// Registry of everything the parser consults while lowering: the function
/// handlers keyed by command name and the symbol table.
///
/// The default context carries the bundled handlers and the default symbol
/// catalogue. Hosts can register additional handlers with
/// [`MathletContext::define_function`] before parsing.
pub struct MathletContext {
    /// All registered function handlers, keyed by command name.
    pub functions: KeyMap<String, FunctionSpec>,
    /// The symbol table consulted to classify atoms.
    pub symbols: Symbols,
}

impl MathletContext {
    /// Creates an empty context with no handlers and an empty symbol table.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            functions: KeyMap::default(),
            symbols: Symbols::new(),
        }
    }

    /// Registers a function definition under each of its names.
    pub fn define_function(&mut self, spec: FunctionDefSpec) {
        let data = FunctionSpec {
            node_type: spec.node_type,
            num_args: spec.props.num_args,
            num_optional_args: spec.props.num_optional_args,
            handler: spec.handler,
        };

        for name in spec.names {
            self.functions.insert((*name).to_owned(), data.clone());
        }
    }
}

impl Default for MathletContext {
    fn default() -> Self {
        let mut ctx = Self {
            functions: KeyMap::default(),
            symbols: create_symbols(),
        };

        functions::define_genfrac(&mut ctx);
        functions::define_sqrt(&mut ctx);
        functions::define_accent(&mut ctx);
        functions::define_op(&mut ctx);
        functions::define_overline(&mut ctx);
        functions::define_underline(&mut ctx);

        ctx
    }
}
