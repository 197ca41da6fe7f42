//! Loading program text
//!
//! The lexer and parser work on whatever text they are given; the size limit
//! and file handling live here.

use crate::interpreter::constants::MAX_SOURCE_CHARS;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Legacy end-of-file mark some editors append (ASCII SUB)
const EOF_MARK: char = '\u{1a}';

#[derive(Debug)]
pub enum SourceError {
    NotFound { path: PathBuf },
    Io { path: PathBuf, source: io::Error },
    TooLarge { length: usize, limit: usize },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::NotFound { path } => {
                write!(f, "File '{}' not found", path.display())
            }
            SourceError::Io { path, source } => {
                write!(f, "IO error while loading '{}': {}", path.display(), source)
            }
            SourceError::TooLarge { length, limit } => {
                write!(
                    f,
                    "Program is {} characters long, the limit is {}",
                    length, limit
                )
            }
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Read a program from `path` and check it against [`MAX_SOURCE_CHARS`].
pub fn load_source(path: impl AsRef<Path>) -> Result<String, SourceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => SourceError::NotFound {
            path: path.to_path_buf(),
        },
        _ => SourceError::Io {
            path: path.to_path_buf(),
            source: err,
        },
    })?;

    check_source(text)
}

/// Drop a trailing end-of-file mark and enforce the size limit.
pub fn check_source(mut text: String) -> Result<String, SourceError> {
    if text.ends_with(EOF_MARK) {
        text.pop();
    }

    let length = text.chars().count();
    if length > MAX_SOURCE_CHARS {
        return Err(SourceError::TooLarge {
            length,
            limit: MAX_SOURCE_CHARS,
        });
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_eof_mark() {
        let text = check_source("incr x;\n\u{1a}".to_string()).unwrap();
        assert_eq!(text, "incr x;\n");
    }

    #[test]
    fn test_size_limit() {
        let at_limit = "a".repeat(MAX_SOURCE_CHARS);
        assert!(check_source(at_limit).is_ok());

        let over = "a".repeat(MAX_SOURCE_CHARS + 1);
        assert!(matches!(
            check_source(over),
            Err(SourceError::TooLarge { length, limit })
                if length == MAX_SOURCE_CHARS + 1 && limit == MAX_SOURCE_CHARS
        ));
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("barebones-does-not-exist.bb");
        assert!(matches!(load_source(&path), Err(SourceError::NotFound { .. })));
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("barebones-load-{}.bb", std::process::id()));
        fs::write(&path, "clear x;\nincr x;\n").unwrap();

        let text = load_source(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(text, "clear x;\nincr x;\n");
    }
}
