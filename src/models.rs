//! Domain model shared by the session core, the persistence layer, and the
//! TUI. The type stays a light-weight data holder so other layers can focus
//! on state transitions and presentation.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One name in the draw pool or the winner history. A participant is created
/// by an add operation and never mutated afterwards; a draw only relocates it
/// from the registry to the ledger.
pub struct Participant {
    /// Identifier allocated by the session, unique for the process lifetime
    /// and across reloads. Removal flows bubble the id back to the session
    /// even though the UI only needs the display name.
    pub id: i64,
    /// Display name. Also the deduplication key: the registry never holds two
    /// participants with the same name (exact, case-sensitive match).
    pub name: String,
}

impl fmt::Display for Participant {
    /// Write the participant name to any formatter so the type plays nicely
    /// with Ratatui widgets that consume strings implicitly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
