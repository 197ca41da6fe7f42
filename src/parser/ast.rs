// AST (Abstract Syntax Tree) definitions for Bare Bones programs

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A single Bare Bones statement.
///
/// Loop bodies are owned by their `WhileLoop`, so a program is a plain tree
/// with no sharing between nodes. Nesting depth is bounded only by memory;
/// every walk over the tree (including `Drop`) uses an explicit worklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `clear x;`
    Clear {
        var: String,
        location: SourceLocation,
    },

    /// `incr x;`
    Increment {
        var: String,
        location: SourceLocation,
    },

    /// `decr x;`
    Decrement {
        var: String,
        location: SourceLocation,
    },

    /// `while x not 0 do ... end;`
    WhileLoop {
        var: String,
        body: Vec<Statement>,
        location: SourceLocation,
    },
}

impl Statement {
    /// The variable this statement reads or writes.
    pub fn var(&self) -> &str {
        match self {
            Statement::Clear { var, .. }
            | Statement::Increment { var, .. }
            | Statement::Decrement { var, .. }
            | Statement::WhileLoop { var, .. } => var,
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            Statement::Clear { location, .. }
            | Statement::Increment { location, .. }
            | Statement::Decrement { location, .. }
            | Statement::WhileLoop { location, .. } => *location,
        }
    }

    /// Keyword that introduces this statement, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Clear { .. } => "clear",
            Statement::Increment { .. } => "incr",
            Statement::Decrement { .. } => "decr",
            Statement::WhileLoop { .. } => "while",
        }
    }
}

impl Drop for Statement {
    fn drop(&mut self) {
        let Statement::WhileLoop { body, .. } = self else {
            return;
        };

        // Detach each body before its owner goes out of scope
        let mut pending = std::mem::take(body);
        while let Some(mut stmt) = pending.pop() {
            if let Statement::WhileLoop { body, .. } = &mut stmt {
                pending.append(body);
            }
        }
    }
}

/// Top-level program: the statements in source order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new() -> Self {
        Self {
            statements: Vec::new(),
        }
    }

    /// Total number of statements, counting loop bodies.
    pub fn statement_count(&self) -> usize {
        let mut count = 0;
        let mut pending: Vec<&[Statement]> = vec![self.statements.as_slice()];
        while let Some(statements) = pending.pop() {
            count += statements.len();
            for stmt in statements {
                if let Statement::WhileLoop { body, .. } = stmt {
                    pending.push(body.as_slice());
                }
            }
        }
        count
    }

    /// Deepest loop nesting level (0 for a program without loops).
    pub fn max_depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending: Vec<(&[Statement], usize)> = vec![(self.statements.as_slice(), 0)];
        while let Some((statements, depth)) = pending.pop() {
            for stmt in statements {
                if let Statement::WhileLoop { body, .. } = stmt {
                    deepest = deepest.max(depth + 1);
                    pending.push((body.as_slice(), depth + 1));
                }
            }
        }
        deepest
    }
}
