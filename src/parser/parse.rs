//! Main parser
//!
//! This module provides the [`Parser`] struct: a single-pass recursive descent
//! over the lexer's token sequence with exactly one token of lookahead.
//!
//! # Grammar
//!
//! ```text
//! program    ::= statement* EOF
//! statement  ::= "clear" IDENT ";"
//!              | "incr" IDENT ";"
//!              | "decr" IDENT ";"
//!              | "while" IDENT "not" "0" "do" statement* "end" ";"
//! ```
//!
//! Each statement keyword selects its production, so the parser never
//! backtracks. Open `while` blocks live on a heap-allocated stack rather than
//! the call stack.

use crate::parser::ast::*;
use crate::parser::lexer::{Keyword, LexError, Lexer, Token};
use std::fmt;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The lexer failed while the parser was pulling tokens
    Lex(LexError),

    /// A token did not fit the grammar at this point
    UnexpectedToken {
        expected: String,
        found: String,
        location: SourceLocation,
    },
}

impl ParseError {
    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::Lex(err) => err.location(),
            ParseError::UnexpectedToken { location, .. } => *location,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Lex(err) => write!(f, "{}", err),
            ParseError::UnexpectedToken {
                expected,
                found,
                location,
            } => write!(
                f,
                "Parse error at line {}, column {}: expected {}, found {}",
                location.line, location.column, expected, found
            ),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Lex(err) => Some(err),
            ParseError::UnexpectedToken { .. } => None,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::Lex(err)
    }
}

/// A `while` whose body is still being parsed
struct OpenLoop {
    var: String,
    location: SourceLocation,
    /// Statements of the enclosing sequence that precede this loop
    enclosing: Vec<Statement>,
}

/// Recursive descent parser for Bare Bones
pub struct Parser {
    lexer: Lexer,
    current: Token,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the entire program
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let statements = self.parse_statement_sequence(&[])?;

        if !self.is_at_end() {
            // Only a terminator keyword can stop the top-level sequence early
            return Err(self.unexpected("statement"));
        }

        Ok(Program { statements })
    }

    /// Parse statements until `Eof` or one of `terminators` is next.
    ///
    /// The terminator itself is left in the lookahead for the caller. Nested
    /// `while` blocks are kept on an explicit stack of open loops, so nesting
    /// depth does not grow the call stack.
    pub fn parse_statement_sequence(
        &mut self,
        terminators: &[Keyword],
    ) -> Result<Vec<Statement>, ParseError> {
        let mut open: Vec<OpenLoop> = Vec::new();
        let mut statements = Vec::new();

        loop {
            if open.is_empty() && (self.is_at_end() || self.at_terminator(terminators)) {
                return Ok(statements);
            }

            let location = self.current_location();
            match self.current {
                Token::Keyword(Keyword::While, _) => {
                    self.advance()?;
                    let var = self.parse_while_header()?;
                    open.push(OpenLoop {
                        var,
                        location,
                        enclosing: std::mem::take(&mut statements),
                    });
                }
                Token::Keyword(Keyword::End, _) | Token::Eof(_) if !open.is_empty() => {
                    self.expect_block_end()?;
                    if let Some(finished) = open.pop() {
                        let body = std::mem::replace(&mut statements, finished.enclosing);
                        statements.push(Statement::WhileLoop {
                            var: finished.var,
                            body,
                            location: finished.location,
                        });
                    }
                }
                _ => statements.push(self.parse_statement()?),
            }
        }
    }

    /// Parse a single statement
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let location = self.current_location();

        let keyword = match self.current {
            Token::Keyword(keyword, _) => keyword,
            _ => return Err(self.unexpected("statement")),
        };

        match keyword {
            Keyword::Clear => {
                self.advance()?;
                let var = self.expect_identifier()?;
                self.expect_semicolon()?;
                Ok(Statement::Clear { var, location })
            }
            Keyword::Incr => {
                self.advance()?;
                let var = self.expect_identifier()?;
                self.expect_semicolon()?;
                Ok(Statement::Increment { var, location })
            }
            Keyword::Decr => {
                self.advance()?;
                let var = self.expect_identifier()?;
                self.expect_semicolon()?;
                Ok(Statement::Decrement { var, location })
            }
            Keyword::While => {
                self.advance()?;
                self.parse_while_statement(location)
            }
            Keyword::Not | Keyword::Do | Keyword::End => Err(self.unexpected("statement")),
        }
    }

    /// Parse the rest of `while x not 0 do ... end;` after the `while` keyword
    fn parse_while_statement(&mut self, location: SourceLocation) -> Result<Statement, ParseError> {
        let var = self.parse_while_header()?;
        let body = self.parse_statement_sequence(&[Keyword::End])?;
        self.expect_block_end()?;

        Ok(Statement::WhileLoop {
            var,
            body,
            location,
        })
    }

    /// `x not 0 do`, returning the condition variable
    fn parse_while_header(&mut self) -> Result<String, ParseError> {
        let var = self.expect_identifier()?;
        self.expect_keyword(Keyword::Not)?;
        self.expect_zero()?;
        self.expect_keyword(Keyword::Do)?;
        Ok(var)
    }

    fn expect_block_end(&mut self) -> Result<(), ParseError> {
        self.expect_keyword(Keyword::End)?;
        self.expect_semicolon()
    }

    // ===== Helper methods =====

    fn is_at_end(&self) -> bool {
        matches!(self.current, Token::Eof(_))
    }

    fn at_terminator(&self, terminators: &[Keyword]) -> bool {
        matches!(self.current, Token::Keyword(keyword, _) if terminators.contains(&keyword))
    }

    fn current_location(&self) -> SourceLocation {
        self.current.location()
    }

    /// Move the lookahead forward, returning the consumed token.
    ///
    /// The lexer is never pulled past `Eof`.
    fn advance(&mut self) -> Result<Token, ParseError> {
        if self.is_at_end() {
            return Ok(self.current.clone());
        }
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.current.to_string(),
            location: self.current_location(),
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.current.is_keyword(keyword) {
            self.advance()?;
            Ok(())
        } else {
            Err(self.unexpected(&keyword.to_string()))
        }
    }

    fn expect_semicolon(&mut self) -> Result<(), ParseError> {
        if matches!(self.current, Token::Semicolon(_)) {
            self.advance()?;
            Ok(())
        } else {
            Err(self.unexpected("';'"))
        }
    }

    fn expect_zero(&mut self) -> Result<(), ParseError> {
        if matches!(self.current, Token::Zero(_)) {
            self.advance()?;
            Ok(())
        } else {
            Err(self.unexpected("'0'"))
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = &self.current {
            let name = name.clone();
            self.advance()?;
            Ok(name)
        } else {
            Err(self.unexpected("identifier"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Program, ParseError> {
        Parser::new(source)?.parse_program()
    }

    #[test]
    fn test_parse_primitives() {
        let program = parse("clear x; incr x; decr y;").unwrap();

        assert_eq!(program.statements.len(), 3);
        assert!(matches!(&program.statements[0], Statement::Clear { var, .. } if var == "x"));
        assert!(matches!(&program.statements[1], Statement::Increment { var, .. } if var == "x"));
        assert!(matches!(&program.statements[2], Statement::Decrement { var, .. } if var == "y"));
    }

    #[test]
    fn test_parse_nested_while() {
        let source = "
            while x not 0 do
                decr x;
                while y not 0 do
                    decr y;
                end;
            end;
            incr z;
        ";
        let program = parse(source).unwrap();

        assert_eq!(program.statements.len(), 2);
        assert_eq!(program.statement_count(), 5);
        assert_eq!(program.max_depth(), 2);
        match &program.statements[0] {
            Statement::WhileLoop {
                var,
                body,
                location,
            } => {
                assert_eq!(var, "x");
                assert_eq!(body.len(), 2);
                assert_eq!(*location, SourceLocation::new(2, 13));
                assert!(matches!(&body[1], Statement::WhileLoop { var, .. } if var == "y"));
            }
            _ => panic!("Expected while loop"),
        }
    }

    #[test]
    fn test_parse_deep_nesting() {
        let depth = 5_000;
        let source = format!(
            "incr a; {} decr a; {}",
            "while a not 0 do ".repeat(depth),
            "end; ".repeat(depth)
        );
        let program = parse(&source).unwrap();

        assert_eq!(program.statements.len(), 2);
        assert_eq!(program.max_depth(), depth);
        assert_eq!(program.statement_count(), depth + 2);
    }

    #[test]
    fn test_parse_single_while_statement() {
        let mut parser = Parser::new("while x not 0 do while y not 0 do decr y; end; end;").unwrap();
        let stmt = parser.parse_statement().unwrap();

        assert_eq!(stmt.kind(), "while");
        match &stmt {
            Statement::WhileLoop { body, .. } => {
                assert!(matches!(&body[0], Statement::WhileLoop { body, .. } if body.len() == 1));
            }
            _ => panic!("Expected while loop"),
        }
    }

    #[test]
    fn test_unclosed_inner_block() {
        let err = parse("while x not 0 do while y not 0 do end;").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken { ref expected, ref found, .. }
                if expected == "'end'" && found == "end of input"
        ));
    }

    #[test]
    fn test_parse_empty_program_and_body() {
        assert_eq!(parse("  \n").unwrap(), Program::new());

        let program = parse("while x not 0 do end;").unwrap();
        assert!(matches!(&program.statements[0], Statement::WhileLoop { body, .. } if body.is_empty()));
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse("clear x incr x;").unwrap_err();

        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: "';'".to_string(),
                found: "keyword 'incr'".to_string(),
                location: SourceLocation::new(1, 9),
            }
        );
    }

    #[test]
    fn test_unterminated_block() {
        let err = parse("while x not 0 do incr y;").unwrap_err();

        match err {
            ParseError::UnexpectedToken {
                expected, found, ..
            } => {
                assert_eq!(expected, "'end'");
                assert_eq!(found, "end of input");
            }
            _ => panic!("Expected parse error"),
        }
    }

    #[test]
    fn test_unmatched_end() {
        let err = parse("incr x; end;").unwrap_err();

        assert!(matches!(
            err,
            ParseError::UnexpectedToken { ref expected, location, .. }
                if expected == "statement" && location == SourceLocation::new(1, 9)
        ));
    }

    #[test]
    fn test_while_requires_zero() {
        let err = parse("while x not y do end;").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { ref expected, .. } if expected == "'0'"));

        let err = parse("while x do end;").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { ref expected, .. } if expected == "'not'"));
    }

    #[test]
    fn test_end_requires_semicolon() {
        let err = parse("while x not 0 do decr x; end").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken { ref expected, ref found, .. }
                if expected == "';'" && found == "end of input"
        ));
    }

    #[test]
    fn test_keyword_as_variable() {
        let err = parse("incr do;").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { ref expected, .. } if expected == "identifier"));
    }

    #[test]
    fn test_lex_error_passes_through() {
        let err = parse("clear x1;").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Lex(LexError::UnexpectedCharacter { character: '1', .. })
        ));
    }
}
