//! Provider-neutral turn entries.

use crate::Role;
use serde::{Deserialize, Serialize};

/// One entry of the sequence sent to a backend for a single inference turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnMessage {
    /// Outbound role (never `Platform`)
    pub role: Role,
    /// Text as the backend will see it
    pub content: String,
}

impl TurnMessage {
    /// Creates a new turn entry.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}
