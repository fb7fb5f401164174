//! Bidirectional cursor over a token sequence.

use matscript_syntax::error::{error_at, ErrorKind, Result};
use matscript_syntax::token::{Token, TokenKind};

/// Returned as the current token while the cursor sits before the first one.
static INVALID_TOKEN: Token = Token::new(TokenKind::Unknown, 0, 0);

/// Walks a token sequence forwards and backwards.
///
/// The position ranges over `0..=len`; position 0 is "before the first
/// token". Moving past the end keeps yielding the trailing end-of-file
/// token and moving before the start yields an `Unknown` sentinel, so
/// neither direction can run out of bounds.
///
/// Blanks and tabs are always whitespace. Newlines are whitespace too,
/// except while [`set_newline_significant`](Self::set_newline_significant)
/// is on; variable definitions, strings and colors use that to end at the
/// line break.
#[derive(Debug, Clone)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    pos: usize,
    newline_significant: bool,
}

impl Default for TokenCursor {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl TokenCursor {
    /// Creates a cursor before the first token. An end-of-file token is
    /// appended if the sequence does not already end with one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().map_or(false, Token::is_eof) {
            let (row, column) = tokens.last().map_or((1, 1), |t| (t.row, t.column));
            tokens.push(Token::new(TokenKind::Eof, row, column));
        }
        Self {
            tokens,
            pos: 0,
            newline_significant: false,
        }
    }

    fn skips(&self, kind: TokenKind) -> bool {
        match kind {
            TokenKind::Blank | TokenKind::Tab => true,
            TokenKind::Newline => !self.newline_significant,
            _ => false,
        }
    }

    fn token_at(&self, pos: usize) -> &Token {
        if pos == 0 {
            &INVALID_TOKEN
        } else {
            &self.tokens[pos - 1]
        }
    }

    /// Position the next forward step would land on.
    fn next_pos(&self, skip_whitespace: bool) -> usize {
        let mut pos = self.pos;
        while pos < self.tokens.len() {
            pos += 1;
            if !(skip_whitespace && self.skips(self.tokens[pos - 1].kind)) {
                break;
            }
        }
        pos
    }

    pub fn current(&self) -> &Token {
        self.token_at(self.pos)
    }

    pub fn advance(&mut self, skip_whitespace: bool) -> &Token {
        self.pos = self.next_pos(skip_whitespace);
        self.current()
    }

    /// Like [`advance`](Self::advance), but reaching end-of-file is an error.
    pub fn advance_no_eof(&mut self, skip_whitespace: bool) -> Result<&Token> {
        let tk = self.advance(skip_whitespace);
        if tk.is_eof() {
            return error_at(tk.row, tk.column, ErrorKind::UnexpectedEndOfInput);
        }
        Ok(tk)
    }

    pub fn retreat(&mut self, skip_whitespace: bool) -> &Token {
        while self.pos > 0 {
            self.pos -= 1;
            if self.pos == 0 || !(skip_whitespace && self.skips(self.tokens[self.pos - 1].kind)) {
                break;
            }
        }
        self.current()
    }

    /// Lookahead without moving.
    pub fn peek(&self, skip_whitespace: bool) -> &Token {
        self.token_at(self.next_pos(skip_whitespace))
    }

    /// Advances until a token of `kind` (or end-of-file) and returns it with
    /// the number of tokens passed over on the way.
    pub fn advance_until_kind(&mut self, kind: TokenKind, skip_whitespace: bool) -> (&Token, usize) {
        let mut skipped = 0;
        loop {
            let found = self.advance(skip_whitespace).kind;
            if found == kind || found == TokenKind::Eof {
                break;
            }
            skipped += 1;
        }
        (self.current(), skipped)
    }

    /// Sets whether newlines stop whitespace skipping; returns the previous setting.
    pub fn set_newline_significant(&mut self, significant: bool) -> bool {
        std::mem::replace(&mut self.newline_significant, significant)
    }

    /// Skips the next `{ ... }` block including nested blocks.
    ///
    /// Leaves the cursor on the closing brace.
    pub fn ignore_block(&mut self) -> Result<()> {
        let (tk, _) = self.advance_until_kind(TokenKind::LBrace, true);
        if tk.is_eof() {
            return error_at(tk.row, tk.column, ErrorKind::UnexpectedEndOfInput);
        }
        let mut depth = 1usize;
        loop {
            let tk = self.advance(true);
            match tk.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                TokenKind::Eof => {
                    return error_at(tk.row, tk.column, ErrorKind::UnexpectedEndOfInput);
                }
                _ => {}
            }
        }
    }

    /// Reads the name following an `@`. Whitespace between the two is not allowed.
    pub fn read_var_name(&mut self) -> Result<String> {
        let tk = self.advance_no_eof(false)?;
        if tk.kind != TokenKind::Name {
            return error_at(tk.row, tk.column, ErrorKind::ExpectedIdentifier);
        }
        Ok(tk.text.clone())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
