//! Lexer (tokenizer) for Bare Bones source code
//!
//! Converts raw source text into a lazy [`Token`] sequence pulled one token at
//! a time by the parser. The sequence ends with exactly one [`Token::Eof`];
//! pulling again after that is an error rather than an endless stream of
//! `Eof`s.

use super::ast::SourceLocation;
use std::fmt;

/// Reserved words of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Clear,
    Incr,
    Decr,
    While,
    Not,
    Do,
    End,
}

impl Keyword {
    /// Resolve a run of letters to a keyword. Matching is case-sensitive.
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "clear" => Some(Keyword::Clear),
            "incr" => Some(Keyword::Incr),
            "decr" => Some(Keyword::Decr),
            "while" => Some(Keyword::While),
            "not" => Some(Keyword::Not),
            "do" => Some(Keyword::Do),
            "end" => Some(Keyword::End),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Clear => "clear",
            Keyword::Incr => "incr",
            Keyword::Decr => "decr",
            Keyword::While => "while",
            Keyword::Not => "not",
            Keyword::Do => "do",
            Keyword::End => "end",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.as_str())
    }
}

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line and column without a separate token→location table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Ident(String, SourceLocation),
    Keyword(Keyword, SourceLocation),

    /// The literal `0`, only meaningful after `not`
    Zero(SourceLocation),

    /// Statement terminator `;`
    Semicolon(SourceLocation),

    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::Ident(_, loc)
            | Token::Keyword(_, loc)
            | Token::Zero(loc)
            | Token::Semicolon(loc)
            | Token::Eof(loc) => *loc,
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Token::Keyword(k, _) if *k == keyword)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name, _) => write!(f, "identifier '{}'", name),
            Token::Keyword(keyword, _) => write!(f, "keyword {}", keyword),
            Token::Zero(_) => write!(f, "'0'"),
            Token::Semicolon(_) => write!(f, "';'"),
            Token::Eof(_) => write!(f, "end of input"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// A character that cannot start or continue any token
    UnexpectedCharacter {
        character: char,
        location: SourceLocation,
    },

    /// The token sequence was pulled again after `Eof` was emitted
    ReadPastEnd { location: SourceLocation },
}

impl LexError {
    pub fn location(&self) -> SourceLocation {
        match self {
            LexError::UnexpectedCharacter { location, .. } | LexError::ReadPastEnd { location } => {
                *location
            }
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnexpectedCharacter {
                character,
                location,
            } => write!(
                f,
                "Lexer error at line {}, column {}: unexpected character '{}'",
                location.line,
                location.column,
                character.escape_default()
            ),
            LexError::ReadPastEnd { location } => write!(
                f,
                "Lexer error at line {}, column {}: token requested after end of input",
                location.line, location.column
            ),
        }
    }
}

impl std::error::Error for LexError {}

/// Lexer for Bare Bones source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    finished: bool,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// Restart the token sequence from the beginning of the source.
    pub fn reset(&mut self) {
        self.position = 0;
        self.line = 1;
        self.column = 1;
        self.finished = false;
    }

    /// Tokenize the remaining input, including the final `Eof`
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let at_end = matches!(token, Token::Eof(_));
            tokens.push(token);
            if at_end {
                break;
            }
        }

        Ok(tokens)
    }

    /// Pull the next token.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if self.finished {
            return Err(LexError::ReadPastEnd {
                location: self.current_location(),
            });
        }

        self.skip_whitespace();

        let loc = self.current_location();
        let Some(ch) = self.advance() else {
            self.finished = true;
            return Ok(Token::Eof(loc));
        };

        match ch {
            ';' => Ok(Token::Semicolon(loc)),
            '0' => self.zero_literal(loc),
            'a'..='z' | 'A'..='Z' => self.identifier_or_keyword(ch, loc),
            _ => Err(LexError::UnexpectedCharacter {
                character: ch,
                location: loc,
            }),
        }
    }

    /// `0` is the only numeric literal; `00` or `01` are rejected at the
    /// second digit.
    fn zero_literal(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        if let Some(next) = self.peek().filter(char::is_ascii_digit) {
            return Err(LexError::UnexpectedCharacter {
                character: next,
                location: self.current_location(),
            });
        }
        Ok(Token::Zero(loc))
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(
        &mut self,
        first_char: char,
        loc: SourceLocation,
    ) -> Result<Token, LexError> {
        let mut word = String::new();
        word.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphabetic() {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // Identifiers are letters only
        if let Some(digit) = self.peek().filter(char::is_ascii_digit) {
            return Err(LexError::UnexpectedCharacter {
                character: digit,
                location: self.current_location(),
            });
        }

        let token = match Keyword::from_word(&word) {
            Some(keyword) => Token::Keyword(keyword, loc),
            None => Token::Ident(word, loc),
        };

        Ok(token)
    }

    /// Skip spaces, tabs and line breaks
    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r' | '\n') = self.peek() {
            self.advance();
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tokens() {
        let mut lexer = Lexer::new("clear x; incr x;");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens.len(), 7);
        assert!(matches!(tokens[0], Token::Keyword(Keyword::Clear, _)));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "x"));
        assert!(matches!(tokens[2], Token::Semicolon(_)));
        assert!(matches!(tokens[3], Token::Keyword(Keyword::Incr, _)));
        assert!(matches!(tokens[4], Token::Ident(ref s, _) if s == "x"));
        assert!(matches!(tokens[5], Token::Semicolon(_)));
        assert!(matches!(tokens[6], Token::Eof(_)));
    }

    #[test]
    fn test_while_header() {
        let mut lexer = Lexer::new("while count not 0 do");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Keyword(Keyword::While, _)));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "count"));
        assert!(matches!(tokens[2], Token::Keyword(Keyword::Not, _)));
        assert!(matches!(tokens[3], Token::Zero(_)));
        assert!(matches!(tokens[4], Token::Keyword(Keyword::Do, _)));
        assert!(matches!(tokens[5], Token::Eof(_)));
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        let mut lexer = Lexer::new("Clear WHILE whilex");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Ident(ref s, _) if s == "Clear"));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "WHILE"));
        assert!(matches!(tokens[2], Token::Ident(ref s, _) if s == "whilex"));
    }

    #[test]
    fn test_locations_span_lines() {
        let mut lexer = Lexer::new("clear x;\r\n\tincr  y;\n");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[0].location(), SourceLocation::new(1, 1));
        assert_eq!(tokens[2].location(), SourceLocation::new(1, 8));
        assert_eq!(tokens[3].location(), SourceLocation::new(2, 2));
        assert_eq!(tokens[4].location(), SourceLocation::new(2, 8));
        assert_eq!(tokens[6].location(), SourceLocation::new(3, 1));
    }

    #[test]
    fn test_digit_in_identifier() {
        let mut lexer = Lexer::new("clear x1;");
        let err = lexer.tokenize().unwrap_err();

        assert_eq!(
            err,
            LexError::UnexpectedCharacter {
                character: '1',
                location: SourceLocation::new(1, 8),
            }
        );
    }

    #[test]
    fn test_only_zero_literal() {
        let mut lexer = Lexer::new("not 5");
        let err = lexer.tokenize().unwrap_err();
        assert!(matches!(err, LexError::UnexpectedCharacter { character: '5', .. }));

        let mut lexer = Lexer::new("not 01");
        let err = lexer.tokenize().unwrap_err();
        assert_eq!(err.location(), SourceLocation::new(1, 6));
    }

    #[test]
    fn test_illegal_symbol() {
        let mut lexer = Lexer::new("incr x; # comment");
        let err = lexer.tokenize().unwrap_err();

        assert!(matches!(
            err,
            LexError::UnexpectedCharacter { character: '#', location } if location.column == 9
        ));
    }

    #[test]
    fn test_single_eof_then_error() {
        let mut lexer = Lexer::new("  \n ");
        assert!(matches!(lexer.next_token(), Ok(Token::Eof(_))));
        assert!(matches!(lexer.next_token(), Err(LexError::ReadPastEnd { .. })));
    }

    #[test]
    fn test_reset_restarts_sequence() {
        let mut lexer = Lexer::new("decr y;");
        let first = lexer.tokenize().unwrap();
        lexer.reset();
        let second = lexer.tokenize().unwrap();

        assert_eq!(first, second);
    }
}
