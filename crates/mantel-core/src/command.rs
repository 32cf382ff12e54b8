//! Wire commands understood by the mount controller
//!
//! Every command is a short ASCII string terminated by a carriage return.
//! The controller never answers; a command is just fired at it.

use serde::Serialize;

/// A literal command as sent on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Command(&'static str);

impl Command {
    /// Halt all motion
    pub const STOP: Command = Command("MMJ0\r");
    /// Jog right while repeated
    pub const RIGHT: Command = Command("MMJ1\r");
    /// Jog up while repeated
    pub const UP: Command = Command("MMJ2\r");
    /// Jog left while repeated
    pub const LEFT: Command = Command("MMJ3\r");
    /// Jog down while repeated
    pub const DOWN: Command = Command("MMJ4\r");
    /// Return to the home position
    pub const HOME: Command = Command("MMR0\r");
    pub const RECALL_1: Command = Command("MMR1\r");
    pub const RECALL_2: Command = Command("MMR2\r");
    pub const RECALL_3: Command = Command("MMR3\r");
    pub const SAVE_1: Command = Command("MMS1\r");
    pub const SAVE_2: Command = Command("MMS2\r");
    pub const SAVE_3: Command = Command("MMS3\r");

    pub const fn as_bytes(&self) -> &'static [u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The trailing CR would garble log lines
        write!(f, "{}", self.0.escape_debug())
    }
}
