//! Loop condition checks (`while x not 0 do ... end;`).
//!
//! The condition is re-read before every iteration and the body always runs
//! to completion before the next check. Nothing here bounds the number of
//! iterations; only the step budget in [`RunConfig`] can stop a loop that
//! never reaches zero.
//!
//! [`RunConfig`]: crate::interpreter::config::RunConfig

use crate::interpreter::engine::{Interpreter, LoopHeader};
use crate::interpreter::errors::RuntimeError;

impl Interpreter {
    /// Checks a loop condition, returning whether the body runs next.
    ///
    /// Each check counts as one step and records a snapshot at the loop
    /// header, whether the loop is entered or left.
    pub(crate) fn enter_loop(&mut self, header: &LoopHeader<'_>) -> Result<bool, RuntimeError> {
        self.tick("while", header.location)?;
        self.snapshot_at(header.location)?;
        Ok(!self.is_zero(header.var))
    }
}
