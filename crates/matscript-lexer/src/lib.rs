//! Material script scanner: converts source text into tokens.
use matscript_syntax::error::{error_at, ErrorKind, Result};
use matscript_syntax::token::{Token, TokenKind};

/// Character scanner that produces tokens with positions.
///
/// Whitespace is kept (one token per blank, tab or line feed); comments
/// (`// ...` and `/* ... */`) are dropped.
pub struct Scanner {
    src: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Scanner {
    /// Create a new scanner over the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }
    fn peek_next(&self) -> Option<char> {
        self.src.get(self.pos + 1).copied()
    }
    fn advance(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    fn skip_line_comment(&mut self) {
        // leaves the line feed in place so it still terminates the line
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        self.advance();
        self.advance();
        while let Some(c) = self.advance() {
            if c == '*' && self.peek() == Some('/') {
                self.advance();
                return;
            }
        }
    }

    fn read_number(&mut self) -> Result<Token> {
        let start_line = self.line;
        let start_col = self.col;
        let mut s = String::new();
        let mut kind = TokenKind::Int;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.advance();
            } else if c == '.' && kind == TokenKind::Int && self.peek_next().map_or(false, |n| n.is_ascii_digit()) {
                kind = TokenKind::Float;
                s.push(c);
                self.advance();
            } else if c == 'e' || c == 'E' {
                // exponent: e, optional sign, at least one digit
                let mut lookahead = self.pos + 1;
                if matches!(self.src.get(lookahead), Some('+') | Some('-')) {
                    lookahead += 1;
                }
                if !self.src.get(lookahead).map_or(false, |d| d.is_ascii_digit()) {
                    break;
                }
                kind = TokenKind::Float;
                while self.pos < lookahead {
                    if let Some(c) = self.advance() {
                        s.push(c);
                    }
                }
            } else {
                break;
            }
        }
        if s.parse::<f64>().is_err() {
            return error_at(start_line, start_col, ErrorKind::InvalidNumber(s));
        }
        Ok(Token::with_text(kind, s, start_line, start_col))
    }

    fn read_name(&mut self) -> Token {
        let start_line = self.line;
        let start_col = self.col;
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        Token::with_text(TokenKind::Name, s, start_line, start_col)
    }

    fn read_string(&mut self) -> Result<Token> {
        let start_line = self.line;
        let start_col = self.col;
        self.advance();
        let mut s = String::new();
        while let Some(c) = self.advance() {
            match c {
                '"' => {
                    return Ok(Token::with_text(TokenKind::String, s, start_line, start_col));
                }
                '\\' => {
                    if let Some(n) = self.advance() {
                        let esc = match n {
                            'n' => '\n',
                            't' => '\t',
                            'r' => '\r',
                            '\\' => '\\',
                            '"' => '"',
                            other => other,
                        };
                        s.push(esc);
                    } else {
                        return error_at(start_line, start_col, ErrorKind::UnterminatedString);
                    }
                }
                '\n' => {
                    return error_at(start_line, start_col, ErrorKind::UnterminatedString);
                }
                other => s.push(other),
            }
        }
        error_at(start_line, start_col, ErrorKind::UnterminatedString)
    }

    /// Tokenize the entire input into a vector of tokens ending with Eof.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let line = self.line;
            let col = self.col;
            let tk = match self.peek() {
                None => {
                    tokens.push(Token::new(TokenKind::Eof, line, col));
                    break;
                }
                Some('\r') => {
                    self.advance();
                    continue;
                }
                Some('/') if self.peek_next() == Some('/') => {
                    self.skip_line_comment();
                    continue;
                }
                Some('/') if self.peek_next() == Some('*') => {
                    self.skip_block_comment();
                    continue;
                }
                Some(' ') => {
                    self.advance();
                    Token::new(TokenKind::Blank, line, col)
                }
                Some('\t') => {
                    self.advance();
                    Token::new(TokenKind::Tab, line, col)
                }
                Some('\n') => {
                    self.advance();
                    Token::new(TokenKind::Newline, line, col)
                }
                Some('"') => self.read_string()?,
                Some(c) if c.is_ascii_digit() => self.read_number()?,
                Some(c) if c.is_ascii_alphabetic() || c == '_' => self.read_name(),
                Some(c) => match TokenKind::from_symbol(c) {
                    Some(kind) => {
                        self.advance();
                        Token::new(kind, line, col)
                    }
                    None => {
                        return error_at(line, col, ErrorKind::UnexpectedCharacter(c));
                    }
                },
            };
            tokens.push(tk);
        }
        Ok(tokens)
    }
}

/// Checks that every `(`, `[` and `{` is closed by its own kind in order.
///
/// Runs over the whole token sequence before any declaration is read, so an
/// imbalance aborts the load before a single resource is created.
pub fn validate_brackets(tokens: &[Token]) -> Result<()> {
    let mut open: Vec<&Token> = Vec::new();
    for tk in tokens {
        let closes = match tk.kind {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                open.push(tk);
                continue;
            }
            TokenKind::RParen => TokenKind::LParen,
            TokenKind::RBracket => TokenKind::LBracket,
            TokenKind::RBrace => TokenKind::LBrace,
            _ => continue,
        };
        match open.pop() {
            Some(opener) if opener.kind == closes => {}
            _ => {
                let c = tk.kind.symbol().unwrap_or('?');
                return error_at(tk.row, tk.column, ErrorKind::UnbalancedBracket(c));
            }
        }
    }
    if let Some(opener) = open.pop() {
        let c = opener.kind.symbol().unwrap_or('?');
        return error_at(opener.row, opener.column, ErrorKind::UnbalancedBracket(c));
    }
    Ok(())
}

/// Scans `source` and validates its brackets in one step.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let tokens = Scanner::new(source).tokenize()?;
    validate_brackets(&tokens)?;
    Ok(tokens)
}
