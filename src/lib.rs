//! # Introduction
//!
//! barebones parses and executes programs in Bare Bones, the three-statement
//! teaching language (`clear`, `incr`, `decr` and `while x not 0 do … end;`).
//! Variables hold non-negative integers of unbounded size. Optionally a
//! snapshot of every variable is captured after each step, and the history can
//! be navigated forward and backward in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Parser → Program → Interpreter → Bindings
//!                                          └─→ Snapshots → TUI
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds the statement tree.
//! 2. [`interpreter`]: walks the tree, executes statements, and optionally
//!    captures [`snapshot::Snapshot`]s at each step.
//! 3. [`memory`]: the [`memory::VariableStore`].
//! 4. [`snapshot`]: snapshot history with a configurable memory limit.
//! 5. [`source`]: loads program text and enforces the size limit.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use barebones::{interpret, RunConfig};
//! use num_bigint::BigUint;
//!
//! let bindings = interpret("clear x; incr x; incr x; decr x;", &RunConfig::default()).unwrap();
//! assert_eq!(bindings["x"], BigUint::from(1u32));
//! ```

pub mod error;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod snapshot;
pub mod source;
pub mod ui;

pub use error::Error;
pub use interpreter::config::RunConfig;
pub use memory::Bindings;

use interpreter::engine::Interpreter;
use parser::parse::Parser;

/// Parse and run `source` to completion.
///
/// Returns the final value of every variable the program touched, or the
/// first error. A failed run never yields partial bindings.
pub fn interpret(source: &str, config: &RunConfig) -> Result<Bindings, Error> {
    let program = Parser::new(source)?.parse_program()?;
    let mut interpreter = Interpreter::new(program, *config);
    Ok(interpreter.run()?)
}
