//! Function handler implementations.
//!
//! Each submodule registers the handlers for one family of lowered calls:
//! fractions, roots, accents, named operators and over/underlines. The
//! parser's call lowering maps surface names such as `frac(..)` or `hat(..)`
//! onto the command names registered here and invokes the handler through
//! [`Parser::call_function`](crate::parser::Parser::call_function).

mod accent;
mod genfrac;
mod op;
mod overline;
mod sqrt;
mod underline;

pub use accent::define_accent;
pub use genfrac::define_genfrac;
pub use op::define_op;
pub use overline::define_overline;
pub use sqrt::define_sqrt;
pub use underline::define_underline;
