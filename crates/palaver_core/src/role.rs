//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Who authored a stored message.
///
/// `Platform` marks display text injected by the platform itself. Inference
/// backends only know user and assistant, see [`Role::outbound`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Platform,
}

impl Role {
    /// The role used when sending a message to a backend.
    ///
    /// ```
    /// use palaver_core::Role;
    ///
    /// assert_eq!(Role::Platform.outbound(), Role::User);
    /// assert_eq!(Role::Assistant.outbound(), Role::Assistant);
    /// ```
    pub fn outbound(self) -> Role {
        match self {
            Role::Platform => Role::User,
            other => other,
        }
    }
}
