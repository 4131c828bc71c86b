//! Infix to postfix conversion
//!
//! A shunting-yard pass over a preprocessed pattern. Precedence, highest to
//! lowest:
//!   `*` `+` `?`   unary postfix, emitted as soon as they are read
//!   `.`           concatenation
//!   `|`           alternation
//! All operators are left-associative. Any other character except `(` and
//! `)` is an operand.

use crate::error::GroupingError;

/// Binding strength of a binary operator, `None` for operands
fn precedence(c: char) -> Option<u8> {
    match c {
        '|' => Some(1),
        '.' => Some(2),
        _ => None,
    }
}

/// Whether `c` is one of the unary postfix operators
pub fn is_unary(c: char) -> bool {
    matches!(c, '*' | '+' | '?')
}

/// Convert a preprocessed infix pattern to postfix
///
/// # Example
/// ```
/// use tnfa_core::to_postfix;
///
/// assert_eq!(to_postfix("a.(b|c)*").unwrap(), "abc|*.");
/// ```
pub fn to_postfix(infix: &str) -> Result<String, GroupingError> {
    let mut output = String::with_capacity(infix.len());
    // Operators and open parens, each with its position for error reporting
    let mut stack: Vec<(char, usize)> = Vec::new();

    for (position, c) in infix.chars().enumerate() {
        match c {
            '(' => stack.push((c, position)),
            ')' => loop {
                match stack.pop() {
                    Some(('(', _)) => break,
                    Some((op, _)) => output.push(op),
                    None => return Err(GroupingError::UnmatchedClose { position }),
                }
            },
            c if is_unary(c) => output.push(c),
            c => match precedence(c) {
                Some(prec) => {
                    while let Some(&(top, _)) = stack.last() {
                        match precedence(top) {
                            Some(top_prec) if top_prec >= prec => {
                                output.push(top);
                                stack.pop();
                            }
                            _ => break,
                        }
                    }
                    stack.push((c, position));
                }
                None => output.push(c),
            },
        }
    }

    while let Some((op, position)) = stack.pop() {
        if op == '(' {
            return Err(GroupingError::UnmatchedOpen { position });
        }
        output.push(op);
    }

    Ok(output)
}
