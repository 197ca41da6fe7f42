//! Crate-level error type
//!
//! [`Error`] wraps the error of whichever phase stopped a run. A lexical error
//! that surfaced while the parser was pulling tokens is reported as
//! [`Error::Lex`], not as a parse error.

use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::SourceLocation;
use crate::parser::lexer::LexError;
use crate::parser::parse::ParseError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Lex(LexError),
    Parse(ParseError),
    Runtime(RuntimeError),
}

impl Error {
    /// Short name of the error class
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Lex(_) => "LexError",
            Error::Parse(_) => "ParseError",
            Error::Runtime(err) => err.kind(),
        }
    }

    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            Error::Lex(err) => Some(err.location()),
            Error::Parse(err) => Some(err.location()),
            Error::Runtime(err) => err.location().copied(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Lex(err) => write!(f, "{}", err),
            Error::Parse(err) => write!(f, "{}", err),
            Error::Runtime(err) => write!(f, "Runtime error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Lex(err) => Some(err),
            Error::Parse(err) => Some(err),
            Error::Runtime(err) => Some(err),
        }
    }
}

impl From<LexError> for Error {
    fn from(err: LexError) -> Self {
        Error::Lex(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Lex(err) => Error::Lex(err),
            err => Error::Parse(err),
        }
    }
}

impl From<RuntimeError> for Error {
    fn from(err: RuntimeError) -> Self {
        Error::Runtime(err)
    }
}
