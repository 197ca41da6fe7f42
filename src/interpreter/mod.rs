//! Bare Bones execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: Main interpreter walking the statement tree
//! - [`loops`]: `while` loop execution
//! - [`config`]: Per-run limits ([`config::RunConfig`])
//! - [`constants`]: Crate-wide limits
//! - [`errors`]: Runtime error types
//!
//! # Execution Model
//!
//! The interpreter walks the statement tree and executes statements one at a
//! time against a [`VariableStore`]. When history is enabled, a snapshot is
//! taken after each step to enable time-travel viewing.
//!
//! [`VariableStore`]: crate::memory::VariableStore

pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
mod loops;
