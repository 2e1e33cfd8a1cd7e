use crate::ast::Node;
use crate::error::SyntaxError;
use crate::lexer::{Token, TokenKind, tokenize};
use crate::stack::ensure_sufficient_stack;
use crate::value::Value;

/// Deepest accepted nesting of parenthesized calls.
pub const MAX_NESTING_DEPTH: usize = 1024;

// ============================================================================
// Parser
// ============================================================================
//
// program := (stmt ';'?)* EOF
// stmt    := '(' tag stmt* ')' | STRING | NUMBER | tag
// tag     := IDENT | OP

struct Parser<'a> {
    source_name: &'a str,
    tokens: Vec<Token>,
    position: usize,
    nesting: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        // tokenize always ends the stream with Eof
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    fn error(&self, token: &Token, message: impl Into<String>) -> SyntaxError {
        if token.kind == TokenKind::Eof {
            SyntaxError::unexpected_eof(self.source_name, token.position())
        } else {
            SyntaxError::new(self.source_name, token.position(), message)
        }
    }

    fn parse_program(&mut self) -> Result<Node, SyntaxError> {
        let mut statements = Vec::new();
        while self.peek().kind != TokenKind::Eof {
            statements.push(self.parse_statement()?);
            if self.peek().kind == TokenKind::Semi {
                self.next();
            }
        }
        Ok(Node::block(statements))
    }

    fn parse_statement(&mut self) -> Result<Node, SyntaxError> {
        let token = self.next();
        match token.kind {
            TokenKind::Open => {
                if self.nesting >= MAX_NESTING_DEPTH {
                    return Err(self.error(&token, "nesting too deep"));
                }
                self.nesting += 1;
                let call = ensure_sufficient_stack(|| self.parse_call());
                self.nesting -= 1;
                call
            }
            TokenKind::String(ref raw) => {
                let text = unquote(raw).map_err(|msg| self.error(&token, msg))?;
                Ok(Node::Const(Value::String(text)))
            }
            TokenKind::Number(ref digits) => {
                let n = digits
                    .parse::<i64>()
                    .map_err(|_| self.error(&token, format!("number {digits} out of range")))?;
                Ok(Node::Const(Value::Number(n)))
            }
            TokenKind::Ident(name) | TokenKind::Op(name) => Ok(Node::Ref(name)),
            _ => Err(self.error(&token, format!("unexpected {}", describe(&token.kind)))),
        }
    }

    /// The opening parenthesis has been consumed.
    fn parse_call(&mut self) -> Result<Node, SyntaxError> {
        let head = self.next();
        let callee = match head.kind {
            TokenKind::Ident(name) | TokenKind::Op(name) => name,
            ref other => {
                return Err(self.error(
                    &head,
                    format!("expected a name after '(', found {}", describe(other)),
                ));
            }
        };

        let mut args = Vec::new();
        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Close => {
                    self.next();
                    return Ok(Node::call(callee, args));
                }
                TokenKind::Eof => return Err(self.error(&token, "expected ')'")),
                _ => args.push(self.parse_statement()?),
            }
        }
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Open => "'('".to_string(),
        TokenKind::Close => "')'".to_string(),
        TokenKind::Semi => "';'".to_string(),
        TokenKind::String(s) => format!("string {s:?}"),
        TokenKind::Number(n) => format!("number {n}"),
        TokenKind::Ident(s) | TokenKind::Op(s) => format!("name {s}"),
        TokenKind::Eof => "end of input".to_string(),
    }
}

/// Decode the basic backslash escapes of a string literal body.
fn unquote(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some(other) => return Err(format!("unknown escape sequence \\{other}")),
            None => return Err("unterminated escape sequence".to_string()),
        }
    }
    Ok(out)
}

/// Parse a whole program into one root node.
///
/// An empty program is `Const(Nil)`; a single statement is returned as is;
/// several statements become a `Block`.
pub fn parse(source_name: &str, input: &str) -> Result<Node, SyntaxError> {
    let tokens = tokenize(source_name, input)?;
    Parser {
        source_name,
        tokens,
        position: 0,
        nesting: 0,
    }
    .parse_program()
}
