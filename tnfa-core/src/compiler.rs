//! Pattern compilation pipeline
//!
//! Runs a pattern through preprocessing, postfix conversion and Thompson's
//! construction, drawing state IDs from a caller-owned [`StateAllocator`].

use crate::error::{CompileError, Result};
use crate::nfa::Nfa;
use crate::postfix::to_postfix;
use crate::preprocess::{DEFAULT_EPSILON_MARKER, preprocess};
use crate::state::StateAllocator;
use crate::thompson::{OptionalStrategy, Thompson, check_arity};
use log::debug;

/// Settings that affect how patterns are compiled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Character patterns use to spell epsilon
    pub epsilon_marker: char,
    /// How `?` is built
    pub optional: OptionalStrategy,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            epsilon_marker: DEFAULT_EPSILON_MARKER,
            optional: OptionalStrategy::default(),
        }
    }
}

/// Compiles patterns into automata
///
/// All automata produced by one compiler draw from the same allocator, so
/// their state IDs never overlap.
#[derive(Debug)]
pub struct Compiler<'a> {
    alloc: &'a StateAllocator,
    options: CompileOptions,
}

impl<'a> Compiler<'a> {
    /// Create a compiler with default options
    pub fn new(alloc: &'a StateAllocator) -> Self {
        Self::with_options(alloc, CompileOptions::default())
    }

    /// Create a compiler with the given options
    pub fn with_options(alloc: &'a StateAllocator, options: CompileOptions) -> Self {
        Compiler { alloc, options }
    }

    /// The options in effect
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile a pattern into an automaton
    ///
    /// # Example
    /// ```
    /// use tnfa_core::{Compiler, StateAllocator};
    ///
    /// let alloc = StateAllocator::new();
    /// let nfa = Compiler::new(&alloc).compile("a|b").unwrap();
    /// assert_eq!(nfa.state_count(), 6);
    /// ```
    pub fn compile(&self, pattern: &str) -> Result<Nfa> {
        self.compile_debug(pattern).map(|c| c.nfa)
    }

    /// Compile a pattern, keeping every intermediate form
    pub fn compile_debug(&self, pattern: &str) -> Result<Compilation> {
        let (preprocessed, postfix) = self.forms(pattern)?;

        // arity is checked inside `build`

        let nfa = Thompson::new(self.alloc)
            .with_optional(self.options.optional)
            .build(&postfix)
            .map_err(|kind| CompileError::malformed(pattern, kind))?;
        debug!(
            "compiled '{}': {} states, {} transitions",
            pattern,
            nfa.state_count(),
            nfa.transition_count()
        );

        Ok(Compilation {
            pattern: pattern.to_string(),
            preprocessed,
            postfix,
            nfa,
        })
    }

    /// Preprocess and convert a pattern to postfix without building it
    ///
    /// The postfix stream is checked for arity, so an `Ok` result is
    /// guaranteed to build.
    pub fn postfix(&self, pattern: &str) -> Result<String> {
        let (_, postfix) = self.forms(pattern)?;
        check_arity(&postfix).map_err(|kind| CompileError::malformed(pattern, kind))?;
        Ok(postfix)
    }

    fn forms(&self, pattern: &str) -> Result<(String, String)> {
        let preprocessed = preprocess(pattern, self.options.epsilon_marker);
        debug!("preprocessed '{}' -> '{}'", pattern, preprocessed);

        let postfix =
            to_postfix(&preprocessed).map_err(|e| CompileError::malformed(pattern, e))?;
        debug!("postfix '{}' -> '{}'", preprocessed, postfix);
        Ok((preprocessed, postfix))
    }
}

/// Result of a compilation with every intermediate form
#[derive(Debug)]
pub struct Compilation {
    /// The original pattern
    pub pattern: String,
    /// The pattern with explicit concatenation and epsilon sentinels
    pub preprocessed: String,
    /// The postfix token stream
    pub postfix: String,
    /// The resulting automaton
    pub nfa: Nfa,
}

impl Compilation {
    /// Print a formatted report of the compilation
    pub fn report(&self) {
        println!("Compilation Report");
        println!("==================");
        println!("Pattern:      {}", self.pattern);
        println!("Preprocessed: {}", self.preprocessed);
        println!("Postfix:      {}", self.postfix);
        println!("States:       {}", self.nfa.state_count());
        println!("Transitions:  {}", self.nfa.transition_count());
    }
}
