//! Pattern preprocessing
//!
//! Makes implicit concatenation explicit and swaps the epsilon marker for
//! the [`EPSILON`] sentinel before postfix conversion.

use crate::nfa::EPSILON;

/// The explicit concatenation operator
pub const CONCAT: char = '.';

/// The default character patterns use to spell epsilon
pub const DEFAULT_EPSILON_MARKER: char = 'ε';

/// Insert explicit `.` operators and replace `epsilon_marker` with [`EPSILON`]
///
/// A `.` goes before the character at position `i > 0` when that character is
/// alphanumeric or `(`, and the previous character is neither `|` nor `(`.
/// The rule looks at the raw characters, so the marker takes part in it as
/// whatever character it is. Non-alphanumeric literals never get an implicit
/// concatenation.
///
/// # Example
/// ```
/// use tnfa_core::preprocess;
///
/// assert_eq!(preprocess("ab*(c|d)", 'ε'), "a.b*.(c|d)");
/// ```
pub fn preprocess(pattern: &str, epsilon_marker: char) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut prev: Option<char> = None;

    for c in pattern.chars() {
        if let Some(p) = prev {
            if (c.is_alphanumeric() || c == '(') && p != '|' && p != '(' {
                out.push(CONCAT);
            }
        }
        out.push(if c == epsilon_marker { EPSILON } else { c });
        prev = Some(c);
    }

    out
}
