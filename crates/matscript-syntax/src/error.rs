//! Error handling types for the material script toolchain.
//!
//! Every fatal condition raised while scanning or reading a script is an
//! [`ErrorKind`]. The kind is wrapped in an [`Error`] together with the
//! position of the token that triggered it, and travels up the recursive
//! descent through [`Result`] until the reader's top-level entry point
//! catches it.
//!
//! # Examples
//!
//! ```rust
//! use matscript_syntax::error::{Error, ErrorKind, Result, error_at};
//!
//! fn expect_assignment(found_equal: bool) -> Result<()> {
//!     if found_equal {
//!         Ok(())
//!     } else {
//!         error_at(3, 12, ErrorKind::ExpectedAssignment)
//!     }
//! }
//!
//! let err = expect_assignment(false).unwrap_err();
//! assert_eq!(err.to_string(), "expected assignment character at 3:12");
//! ```

use std::fmt;

/// Every fatal failure of a script load.
///
/// Soft problems (unknown keywords, unknown variables, unknown vertex format
/// names, ...) are never represented here; they are reported as diagnostics
/// and parsing continues with a fallback value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    // === Token stream ===
    #[error("unexpected end-of-file")]
    UnexpectedEndOfInput,
    #[error("unexpected {0}")]
    UnexpectedToken(String),
    #[error("unexpected identifier named \"{0}\"")]
    UnexpectedIdentifier(String),
    #[error("expected identifier")]
    ExpectedIdentifier,
    #[error("expected assignment character")]
    ExpectedAssignment,
    #[error("expected string or string variable")]
    ExpectedString,

    // === Variables ===
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    #[error("variable definition without initialization")]
    EmptyInitializer,

    // === Declarations ===
    #[error("multiple definition of {kind} named \"{name}\"")]
    DuplicateDeclaration { kind: &'static str, name: String },
    #[error("unknown texture layer type named \"{0}\"")]
    UnknownLayerType(String),
    #[error("no shader version specified")]
    MissingShaderVersion,
    #[error("invalid shader entry point")]
    InvalidEntryPoint,
    #[error("reserved vertex format name \"{0}\" (may not begin with 'vertexFormat')")]
    ReservedName(String),
    #[error("failed loading texture from \"{0}\"")]
    TextureLoad(String),

    // === Scanning ===
    #[error("invalid token stream")]
    InvalidTokenStream,
    #[error("unbalanced bracket '{0}'")]
    UnbalancedBracket(char),
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("invalid number \"{0}\"")]
    InvalidNumber(String),

    #[error("failed reading file \"{path}\": {reason}")]
    FileRead { path: String, reason: String },
}

/// An error that aborted a script load.
///
/// # Fields
///
/// - `kind`: What went wrong
/// - `line`: Optional 1-based line number in the script
/// - `col`: Optional 1-based column number in the script
///
/// Errors raised from a token carry its position; errors raised outside any
/// token (file reading, empty token stream) carry none.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// What went wrong
    pub kind: ErrorKind,

    /// Optional line number in the script (1-based)
    pub line: Option<usize>,

    /// Optional column number in the script (1-based)
    pub col: Option<usize>,
}

impl Error {
    /// Creates an error without location information.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            line: None,
            col: None,
        }
    }

    /// Creates an error located at the given 1-based line and column.
    pub fn with_span(kind: ErrorKind, line: usize, col: usize) -> Self {
        Self {
            kind,
            line: Some(line),
            col: Some(col),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(l), Some(c)) = (self.line, self.col) {
            write!(f, "{} at {}:{}", self.kind, l, c)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

/// A specialized `Result` type for script loading.
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for `Err(Error::new(kind))`.
pub fn error<T>(kind: ErrorKind) -> Result<T> {
    Err(Error::new(kind))
}

/// Shorthand for `Err(Error::with_span(kind, line, col))`.
pub fn error_at<T>(line: usize, col: usize, kind: ErrorKind) -> Result<T> {
    Err(Error::with_span(kind, line, col))
}
