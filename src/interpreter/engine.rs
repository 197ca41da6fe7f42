// Execution engine for the Bare Bones interpreter

use crate::interpreter::config::RunConfig;
use crate::interpreter::errors::RuntimeError;
use crate::memory::{Bindings, VariableStore};
use crate::parser::ast::*;
use crate::snapshot::{Snapshot, SnapshotManager};
use tracing::debug;

/// Condition of a loop whose body is on the frame stack
pub(crate) struct LoopHeader<'a> {
    pub(crate) var: &'a str,
    pub(crate) location: SourceLocation,
}

/// A statement sequence being executed
struct Frame<'a> {
    statements: &'a [Statement],
    /// Index of the next statement to execute
    next: usize,
    /// Set when `statements` is a loop body
    header: Option<LoopHeader<'a>>,
}

impl<'a> Frame<'a> {
    fn new(statements: &'a [Statement], header: Option<LoopHeader<'a>>) -> Self {
        Frame {
            statements,
            next: 0,
            header,
        }
    }
}

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    /// Program and empty store exist, nothing executed yet
    Ready,
    Running,
    Completed,
    Failed,
}

/// The interpreter that executes a Bare Bones program
pub struct Interpreter {
    /// Parsed program, never mutated while running
    program: Program,

    /// Variable values
    store: VariableStore,

    /// Step and history limits for this run
    config: RunConfig,

    state: ExecState,

    /// Primitive statements plus loop condition checks executed so far
    steps_executed: u64,

    /// Current source location being executed
    current_location: SourceLocation,

    /// Variable written by the most recent step, recorded into the next snapshot
    last_written: Option<String>,

    /// Snapshot manager for reverse execution, present when history is enabled
    snapshot_manager: Option<SnapshotManager>,

    /// Current position in execution history (for stepping backward/forward)
    history_position: usize,
}

impl Interpreter {
    /// Create a new interpreter with the parsed program
    pub fn new(program: Program, config: RunConfig) -> Self {
        Interpreter {
            program,
            store: VariableStore::new(),
            snapshot_manager: config.snapshot_limit.map(SnapshotManager::new),
            config,
            state: ExecState::Ready,
            steps_executed: 0,
            current_location: SourceLocation::new(1, 1),
            last_written: None,
            history_position: 0,
        }
    }

    /// Run the program from start to finish.
    ///
    /// Returns the final bindings on success. On failure no bindings are
    /// returned; the recorded history (if any) stays available for inspection.
    pub fn run(&mut self) -> Result<Bindings, RuntimeError> {
        if self.state != ExecState::Ready {
            return Err(RuntimeError::InternalInvariant {
                message: format!("run() called in state {:?}", self.state),
                location: self.current_location,
            });
        }

        self.state = ExecState::Running;
        debug!(
            statements = self.program.statement_count(),
            max_steps = ?self.config.max_steps,
            history = self.config.records_history(),
            "starting run"
        );

        // Detach the program so statements can be borrowed while the store mutates
        let program = std::mem::take(&mut self.program);
        let result = self
            .take_snapshot()
            .and_then(|()| self.execute_block(&program.statements));
        self.program = program;

        match result {
            Ok(()) => {
                self.state = ExecState::Completed;
                debug!(steps = self.steps_executed, variables = self.store.len(), "run completed");
                Ok(self.store.to_bindings())
            }
            Err(err) => {
                self.state = ExecState::Failed;
                debug!(steps = self.steps_executed, error = %err, "run failed");
                Err(err)
            }
        }
    }

    /// Execute statements in order, including every loop they contain.
    ///
    /// Loop bodies run on an explicit stack of frames, so nesting depth
    /// does not grow the call stack.
    fn execute_block(&mut self, statements: &[Statement]) -> Result<(), RuntimeError> {
        let mut frames = vec![Frame::new(statements, None)];

        while let Some(frame) = frames.last_mut() {
            let statements = frame.statements;
            let Some(stmt) = statements.get(frame.next) else {
                // Body finished: re-check its loop, or leave the block
                if let Some(finished) = frames.pop() {
                    if let Some(header) = finished.header {
                        if self.enter_loop(&header)? {
                            frames.push(Frame::new(finished.statements, Some(header)));
                        }
                    }
                }
                continue;
            };
            frame.next += 1;

            match stmt {
                Statement::WhileLoop {
                    var,
                    body,
                    location,
                } => {
                    let header = LoopHeader {
                        var,
                        location: *location,
                    };
                    if self.enter_loop(&header)? {
                        frames.push(Frame::new(body, Some(header)));
                    }
                }
                _ => self.execute_primitive(stmt)?,
            }
        }

        Ok(())
    }

    /// Execute a `clear`, `incr` or `decr` statement
    fn execute_primitive(&mut self, stmt: &Statement) -> Result<(), RuntimeError> {
        let location = stmt.location();
        self.current_location = location;
        self.tick(stmt.kind(), location)?;

        match stmt {
            Statement::Clear { var, .. } => self.store.clear(var),
            Statement::Increment { var, .. } => self.store.increment(var),
            Statement::Decrement { var, .. } => self.store.decrement(var),
            Statement::WhileLoop { location, .. } => {
                return Err(RuntimeError::InternalInvariant {
                    message: "loop dispatched as a primitive statement".to_string(),
                    location: *location,
                });
            }
        }

        self.note_write(stmt.var());
        self.take_snapshot()
    }

    /// Count one step against the configured budget
    pub(crate) fn tick(
        &mut self,
        statement: &'static str,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        self.steps_executed += 1;

        match self.config.max_steps {
            Some(limit) if self.steps_executed > limit => Err(RuntimeError::StepLimitExceeded {
                limit,
                statement,
                location,
            }),
            _ => Ok(()),
        }
    }

    /// Read a variable as a loop condition
    pub(crate) fn is_zero(&self, var: &str) -> bool {
        self.store.is_zero(var)
    }

    fn note_write(&mut self, var: &str) {
        if self.snapshot_manager.is_some() {
            self.last_written = Some(var.to_string());
        }
    }

    /// Record a snapshot at `location`
    pub(crate) fn snapshot_at(&mut self, location: SourceLocation) -> Result<(), RuntimeError> {
        self.current_location = location;
        self.take_snapshot()
    }

    /// Take a snapshot of the current execution state
    fn take_snapshot(&mut self) -> Result<(), RuntimeError> {
        let Some(manager) = self.snapshot_manager.as_mut() else {
            return Ok(());
        };

        let snapshot = Snapshot::new(
            self.store.clone(),
            self.current_location,
            self.steps_executed,
            self.last_written.take(),
        );

        manager
            .push(snapshot)
            .map_err(|_| RuntimeError::SnapshotLimitExceeded {
                current: manager.memory_usage(),
                limit: manager.memory_limit(),
                location: self.current_location,
            })?;

        self.history_position = manager.len() - 1;
        Ok(())
    }

    /// Restore execution state from a snapshot
    fn restore_snapshot(&mut self, snapshot: &Snapshot) {
        self.store = snapshot.store.clone();
        self.current_location = snapshot.source_location;
        self.steps_executed = snapshot.steps_executed;
        self.last_written = snapshot.last_written.clone();
    }

    /// Move to the snapshot at `index` in history
    fn goto_snapshot(&mut self, index: usize) -> Result<(), RuntimeError> {
        let snapshot = self
            .snapshot_manager
            .as_ref()
            .and_then(|manager| manager.get(index))
            .cloned()
            .ok_or_else(|| RuntimeError::HistoryOperationFailed {
                message: format!("Snapshot {} not found in history", index),
                location: self.current_location,
            })?;

        self.history_position = index;
        self.restore_snapshot(&snapshot);
        Ok(())
    }

    /// Step backward in execution (restore previous snapshot)
    pub fn step_backward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position == 0 {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "Already at the beginning of execution".to_string(),
                location: self.current_location,
            });
        }

        self.goto_snapshot(self.history_position - 1)
    }

    /// Step forward in execution (restore next snapshot)
    pub fn step_forward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position + 1 >= self.total_snapshots() {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "No more snapshots available (execution finished)".to_string(),
                location: self.current_location,
            });
        }

        self.goto_snapshot(self.history_position + 1)
    }

    /// Rewind to the beginning of execution history
    pub fn rewind_to_start(&mut self) -> Result<(), RuntimeError> {
        self.goto_snapshot(0)
    }

    /// Jump to the last recorded snapshot
    pub fn jump_to_end(&mut self) -> Result<(), RuntimeError> {
        let total = self.total_snapshots();
        if total == 0 {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "No snapshots available".to_string(),
                location: self.current_location,
            });
        }
        self.goto_snapshot(total - 1)
    }

    // ========== Getter methods ==========

    pub fn state(&self) -> ExecState {
        self.state
    }

    /// Check if execution has finished, successfully or not
    pub fn is_finished(&self) -> bool {
        matches!(self.state, ExecState::Completed | ExecState::Failed)
    }

    /// Get a reference to the variable store
    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    pub fn steps_executed(&self) -> u64 {
        self.steps_executed
    }

    /// Get the current source location
    pub fn current_location(&self) -> SourceLocation {
        self.current_location
    }

    /// Variable written by the step that led to the current snapshot
    pub fn last_written(&self) -> Option<&str> {
        self.last_written.as_deref()
    }

    /// Get the current history position
    pub fn history_position(&self) -> usize {
        self.history_position
    }

    /// Get the total number of snapshots
    pub fn total_snapshots(&self) -> usize {
        self.snapshot_manager.as_ref().map_or(0, SnapshotManager::len)
    }
}
