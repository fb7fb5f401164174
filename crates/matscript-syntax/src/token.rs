//! Token definitions for material scripts.
//!
//! This module defines the tokens produced by the material script scanner.
//! Tokens are the smallest meaningful units of a script: names, string and
//! number literals, single punctuation characters and whitespace.
//!
//! # Token Categories
//!
//! - **Names**: keywords and identifiers alike (`material`, `ambient`, `lessEqual`)
//! - **Literals**: strings and numbers (`"Rock"`, `42`, `0.5`)
//! - **Punctuation**: one kind per character (`{`, `}`, `@`, `=`, `+`, `,` ...)
//! - **Whitespace**: blanks, tabs and newlines are kept as tokens because a
//!   newline terminates variable definitions, strings and colors
//! - **Special**: end-of-file marker
//!
//! Unlike a classic lexer the scanner does not distinguish keywords from
//! identifiers; the reader classifies names by context.
//!
//! # Examples
//!
//! ```rust
//! use matscript_syntax::{Token, TokenKind};
//!
//! // A name token carries its text
//! let name = Token::with_text(TokenKind::Name, "material", 1, 1);
//! assert!(name.is_name("material"));
//!
//! // Punctuation carries no text
//! let brace = Token::new(TokenKind::LBrace, 1, 20);
//! assert!(brace.text.is_empty());
//! ```

use std::fmt;

/// Token types that can be produced by the material script scanner.
///
/// The set is closed: every character of a script maps to exactly one kind
/// (comments are stripped before tokens are produced).
///
/// # Variant Categories
///
/// ## Literals
/// - [`Name`](TokenKind::Name): keywords and identifiers
/// - [`String`](TokenKind::String): quoted string literals
/// - [`Int`](TokenKind::Int) and [`Float`](TokenKind::Float): number literals
///
/// ## Whitespace
/// [`Blank`](TokenKind::Blank), [`Tab`](TokenKind::Tab) and
/// [`Newline`](TokenKind::Newline). Newline is ordinarily skipped like the
/// others, except while the cursor treats it as significant.
///
/// # Examples
///
/// ```rust
/// use matscript_syntax::TokenKind;
///
/// assert_eq!(TokenKind::from_symbol('{'), Some(TokenKind::LBrace));
/// assert_eq!(TokenKind::At.symbol(), Some('@'));
/// assert!(TokenKind::Newline.is_whitespace());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Placeholder kind used by the cursor before the first token
    Unknown,

    // === Names and literals ===

    /// A keyword or identifier
    ///
    /// Examples: `material`, `ambient`, `vertexFormatDefault`
    Name,

    /// A string literal (text stored without quotes)
    ///
    /// Examples: `"Rock"`, `"shaders/terrain.glsl"`
    String,

    /// An integer literal
    ///
    /// Examples: `0`, `255`
    Int,

    /// A floating point literal
    ///
    /// Examples: `0.5`, `1.0e-3`
    Float,

    // === Punctuation ===

    /// Comma `,`
    Comma,
    /// Dot `.`
    Dot,
    /// Colon `:`
    Colon,
    /// Semicolon `;`
    Semicolon,
    /// Exclamation mark `!`
    Exclamation,
    /// Question mark `?`
    Question,
    /// Hash `#`
    Hash,
    /// At sign `@` - introduces variable definitions and references
    At,
    /// Dollar `$`
    Dollar,
    /// Left parenthesis `(`
    LParen,
    /// Right parenthesis `)`
    RParen,
    /// Left square bracket `[`
    LBracket,
    /// Right square bracket `]`
    RBracket,
    /// Left brace `{` - opens a block
    LBrace,
    /// Right brace `}` - closes a block
    RBrace,
    /// Greater-than `>`
    Greater,
    /// Less-than `<`
    Less,
    /// Equal sign `=` - assignment
    Equal,
    /// Plus `+` - string concatenation
    Plus,
    /// Minus `-` - numeric negation
    Minus,
    /// Asterisk `*`
    Star,
    /// Slash `/`
    Slash,
    /// Percent `%`
    Percent,
    /// Tilde `~`
    Tilde,
    /// Ampersand `&`
    And,
    /// Vertical bar `|`
    Or,
    /// Caret `^`
    Xor,

    // === Whitespace ===

    /// A single blank `' '`
    Blank,
    /// A single tab `'\t'`
    Tab,
    /// A line feed `'\n'`
    Newline,

    /// End-of-file marker - indicates no more tokens
    Eof,
}

const SYMBOLS: [(char, TokenKind); 27] = [
    (',', TokenKind::Comma),
    ('.', TokenKind::Dot),
    (':', TokenKind::Colon),
    (';', TokenKind::Semicolon),
    ('!', TokenKind::Exclamation),
    ('?', TokenKind::Question),
    ('#', TokenKind::Hash),
    ('@', TokenKind::At),
    ('$', TokenKind::Dollar),
    ('(', TokenKind::LParen),
    (')', TokenKind::RParen),
    ('[', TokenKind::LBracket),
    (']', TokenKind::RBracket),
    ('{', TokenKind::LBrace),
    ('}', TokenKind::RBrace),
    ('>', TokenKind::Greater),
    ('<', TokenKind::Less),
    ('=', TokenKind::Equal),
    ('+', TokenKind::Plus),
    ('-', TokenKind::Minus),
    ('*', TokenKind::Star),
    ('/', TokenKind::Slash),
    ('%', TokenKind::Percent),
    ('~', TokenKind::Tilde),
    ('&', TokenKind::And),
    ('|', TokenKind::Or),
    ('^', TokenKind::Xor),
];

impl TokenKind {
    /// Maps a punctuation character to its token kind.
    pub fn from_symbol(c: char) -> Option<TokenKind> {
        SYMBOLS.iter().find(|(s, _)| *s == c).map(|(_, k)| *k)
    }

    /// The character of a punctuation kind, `None` for every other kind.
    pub fn symbol(self) -> Option<char> {
        SYMBOLS.iter().find(|(_, k)| *k == self).map(|(s, _)| *s)
    }

    /// Blank, tab and newline.
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::Blank | TokenKind::Tab | TokenKind::Newline)
    }

    /// Integer and float literals.
    pub fn is_number(self) -> bool {
        matches!(self, TokenKind::Int | TokenKind::Float)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(c) = self.symbol() {
            return write!(f, "'{}'", c);
        }
        let name = match self {
            TokenKind::Unknown => "unknown token",
            TokenKind::Name => "identifier",
            TokenKind::String => "string",
            TokenKind::Int => "integer",
            TokenKind::Float => "float",
            TokenKind::Blank => "blank",
            TokenKind::Tab => "tab",
            TokenKind::Newline => "new-line",
            TokenKind::Eof => "end-of-file",
            _ => "token",
        };
        write!(f, "{}", name)
    }
}

/// A token with its source location information.
///
/// Tokens are immutable once produced. The `text` field is only filled for
/// [`Name`](TokenKind::Name), [`String`](TokenKind::String),
/// [`Int`](TokenKind::Int) and [`Float`](TokenKind::Float) tokens; number
/// tokens keep their lexeme so the reader can convert it to whatever
/// precision the attribute needs.
///
/// # Fields
///
/// - `kind`: The type of the token
/// - `text`: Name, string content or number lexeme
/// - `row`: 1-based line number in the script
/// - `column`: 1-based column number in the script
///
/// # Examples
///
/// ```rust
/// use matscript_syntax::{Token, TokenKind};
///
/// let number = Token::with_text(TokenKind::Int, "255", 4, 13);
/// println!("{} at line {}, column {}", number, number.row, number.column);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The type of this token
    pub kind: TokenKind,

    /// Text for names, strings and numbers; empty otherwise
    pub text: String,

    /// Line number in the script (1-based)
    pub row: usize,

    /// Column number in the script (1-based)
    pub column: usize,
}

impl Token {
    /// Creates a token without text (punctuation, whitespace, end-of-file).
    pub const fn new(kind: TokenKind, row: usize, column: usize) -> Self {
        Self {
            kind,
            text: String::new(),
            row,
            column,
        }
    }

    /// Creates a token carrying text (names, strings, numbers).
    pub fn with_text(kind: TokenKind, text: impl Into<String>, row: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            row,
            column,
        }
    }

    /// Returns true if this is a name token spelled exactly `name`.
    pub fn is_name(&self, name: &str) -> bool {
        self.kind == TokenKind::Name && self.text == name
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind.is_whitespace()
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// "row:column" as used in diagnostics.
    pub fn position(&self) -> String {
        format!("{}:{}", self.row, self.column)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Name | TokenKind::String => write!(f, "{} \"{}\"", self.kind, self.text),
            TokenKind::Int | TokenKind::Float => write!(f, "{} {}", self.kind, self.text),
            _ => write!(f, "{}", self.kind),
        }
    }
}
