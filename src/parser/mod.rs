//! Bare Bones source code parser
//!
//! This module transforms source text into a statement tree:
//! - [`lexer`]: Tokenization (source text → tokens, pulled lazily)
//! - [`parse`]: Parsing (tokens → [`ast::Program`])
//! - [`ast`]: AST node definitions
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with one token of lookahead. Nested
//! `while` blocks are tracked on an explicit stack, not the call stack.
//! No external parser generator dependencies.

pub mod ast;
pub mod lexer;
pub mod parse;
