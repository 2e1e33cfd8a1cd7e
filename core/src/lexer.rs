use crate::error::SyntaxError;

// ============================================================================
// Lexer
// ============================================================================

/// Characters that make up operator tags such as `+`, `<=` or `!=`.
fn is_op_char(c: char) -> bool {
    matches!(
        c,
        '-' | '+' | '*' | '/' | '%' | '<' | '>' | '=' | '!' | '&' | '|' | '^'
    )
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub struct Lexer<'a> {
    source_name: &'a str,
    input: Vec<char>,
    position: usize,
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source_name: &'a str, input: &str) -> Self {
        Lexer {
            source_name,
            input: input.chars().collect(),
            position: 0,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        if let Some(c) = self.current_char() {
            self.position += 1;
            self.offset += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn here(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(c) = self.current_char() {
            if !pred(c) {
                break;
            }
            text.push(c);
            self.advance();
        }
        text
    }

    /// Everything between the opening quote and the next double quote; no
    /// escape can hide a quote from the scanner.
    fn read_string(&mut self) -> Result<String, SyntaxError> {
        let start = self.here();
        self.advance();
        let content = self.take_while(|c| c != '"');
        if self.current_char().is_none() {
            return Err(SyntaxError::new(
                self.source_name,
                start,
                "unterminated string literal",
            ));
        }
        self.advance();
        Ok(content)
    }

    // ========================================================================
    // Main Tokenization
    // ========================================================================

    pub fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_whitespace();

        let (line, column) = self.here();
        let offset = self.offset;
        let Some(ch) = self.current_char() else {
            return Ok(Token::new(TokenKind::Eof, offset, line, column));
        };

        let kind = match ch {
            '(' => {
                self.advance();
                TokenKind::Open
            }
            ')' => {
                self.advance();
                TokenKind::Close
            }
            ';' => {
                self.advance();
                TokenKind::Semi
            }
            '"' => TokenKind::String(self.read_string()?),
            c if c.is_ascii_digit() => TokenKind::Number(self.take_while(|c| c.is_ascii_digit())),
            c if is_ident_start(c) => TokenKind::Ident(self.take_while(is_ident_char)),
            c if is_op_char(c) => TokenKind::Op(self.take_while(is_op_char)),
            c => {
                return Err(SyntaxError::new(
                    self.source_name,
                    (line, column),
                    format!("unexpected character {c:?}"),
                ));
            }
        };

        Ok(Token::new(kind, offset, line, column))
    }
}

/// Lex a whole input; the final token is always `Eof`.
pub fn tokenize(source_name: &str, input: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut lexer = Lexer::new(source_name, input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

// ============================================================================
// Token Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Open,
    Close,
    Semi,
    /// Raw text between the quotes, escapes not yet decoded
    String(String),
    /// Decimal digits, not yet range checked
    Number(String),
    Ident(String),
    Op(String),
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character in the input
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, offset: usize, line: usize, column: usize) -> Self {
        Token {
            kind,
            offset,
            line,
            column,
        }
    }

    pub fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }
}
