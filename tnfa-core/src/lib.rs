//! tnfa Core Library
//!
//! Compiles infix regular expressions into nondeterministic finite automata
//! with Thompson's construction.
//!
//! The pipeline is strictly forward:
//!   pattern -> [`preprocess`] -> [`to_postfix`] -> [`Thompson`] -> [`serialize`]
//!
//! Supported syntax: literal characters, grouping with `(` `)`, alternation
//! `|`, and the postfix operators `*`, `+` and `?`. An epsilon marker
//! (default `ε`) stands for the empty string.

pub mod compiler;
pub mod error;
pub mod nfa;
pub mod postfix;
pub mod preprocess;
pub mod serialize;
pub mod state;
pub mod thompson;

pub use compiler::{Compilation, CompileOptions, Compiler};
pub use error::{CompileError, GroupingError, Malformed, Result};
pub use nfa::{Destinations, EPSILON, Nfa};
pub use postfix::to_postfix;
pub use preprocess::{CONCAT, DEFAULT_EPSILON_MARKER, preprocess};
pub use serialize::serialize;
pub use state::{StateAllocator, StateId};
pub use thompson::{
    OptionalStrategy, Thompson, check_arity, concat, one_or_more, union, zero_or_more, zero_or_one,
};

/// Allocator behind [`compile`], shared by the whole process
static GLOBAL_ALLOCATOR: StateAllocator = StateAllocator::new();

/// Compile a single pattern with default options
///
/// States come from one process-wide allocator, so automata returned by
/// separate calls never share an ID. Use a [`Compiler`] over your own
/// [`StateAllocator`] to control where numbering starts.
pub fn compile(pattern: &str) -> Result<Nfa> {
    Compiler::new(&GLOBAL_ALLOCATOR).compile(pattern)
}
