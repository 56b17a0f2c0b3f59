//! Per-deck undo session state.
//!
//! # Responsibility
//! - Hold the recording switch and the ordered stack of inverse commands
//!   for one unit of work.
//!
//! # Invariants
//! - The stack is append-only from the mutation core's perspective; pops
//!   happen only on replay or when the history is cleared.
//! - One session has exactly one writer; there is no internal locking.

use crate::model::command::UndoCommand;

/// Recording switch plus undo history for one deck unit of work.
///
/// Commands are pushed in the exact order their rows were affected, so
/// LIFO replay restores rows in the reverse order they were changed.
#[derive(Debug)]
pub struct Session {
    recording: bool,
    undo_stack: Vec<UndoCommand>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates a session with undo recording enabled.
    pub fn new() -> Self {
        Self {
            recording: true,
            undo_stack: Vec::new(),
        }
    }

    /// Returns whether mutations should capture inverse commands.
    pub fn is_recording_enabled(&self) -> bool {
        self.recording
    }

    /// Switches undo recording on or off.
    ///
    /// Mutations performed while recording is off are irreversible.
    pub fn set_recording(&mut self, enabled: bool) {
        self.recording = enabled;
    }

    /// Appends one inverse command to the undo history.
    pub fn push_undo_command(&mut self, command: UndoCommand) {
        self.undo_stack.push(command);
    }

    /// Removes and returns the most recently pushed command.
    pub fn pop_undo_command(&mut self) -> Option<UndoCommand> {
        self.undo_stack.pop()
    }

    /// Number of commands currently on the stack.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Read view of the pending history, oldest first.
    pub fn history(&self) -> &[UndoCommand] {
        &self.undo_stack
    }

    /// Drops all pending undo history.
    pub fn clear_undo_history(&mut self) {
        self.undo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use crate::model::command::UndoCommand;

    #[test]
    fn new_session_records_by_default() {
        let session = Session::new();
        assert!(session.is_recording_enabled());
        assert_eq!(session.undo_depth(), 0);
    }

    #[test]
    fn pop_returns_commands_in_lifo_order() {
        let mut session = Session::new();
        session.push_undo_command(UndoCommand::revert_insert("cards", 1));
        session.push_undo_command(UndoCommand::revert_insert("cards", 2));

        assert_eq!(session.undo_depth(), 2);
        let first = session.pop_undo_command().unwrap();
        assert!(matches!(
            first.predicate,
            crate::model::command::Predicate::Row(2)
        ));
        let second = session.pop_undo_command().unwrap();
        assert!(matches!(
            second.predicate,
            crate::model::command::Predicate::Row(1)
        ));
        assert!(session.pop_undo_command().is_none());
    }

    #[test]
    fn clear_drops_all_history() {
        let mut session = Session::new();
        session.push_undo_command(UndoCommand::revert_insert("cards", 1));
        session.clear_undo_history();
        assert_eq!(session.undo_depth(), 0);
    }
}
