//! Delimiter balance of partial input, for readers that accept a form split
//! across several lines.

use crate::lexer::{TokenKind, tokenize};

/// Count the parentheses still open at the end of `input`.
///
/// `Some(0)` means balanced (not necessarily valid). `None` means the balance
/// cannot be determined: the text does not lex, or some prefix closes more
/// than it opened. More input can never fix a `None`.
pub fn analyze_balance(input: &str) -> Option<usize> {
    let tokens = tokenize("<balance>", input).ok()?;
    let mut open = 0usize;
    for token in &tokens {
        match token.kind {
            TokenKind::Open => open += 1,
            TokenKind::Close => open = open.checked_sub(1)?,
            _ => {}
        }
    }
    Some(open)
}
