//! Error types for the granja crate.
//!
//! Only setup paths can fail. Runtime events (frames, keys, clicks) degrade
//! to no-ops instead of returning errors.

use std::fmt;

use crate::registry::EntityId;

/// Result type for granja setup operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while assembling the controller.
#[derive(Debug)]
pub enum Error {
    /// A profile key did not name any locomotion mode.
    UnknownProfile {
        /// The key that failed to parse.
        key: String,
    },
    /// A profile has values that would break integration or damping.
    InvalidProfile {
        /// The mode whose profile is invalid.
        mode: &'static str,
        /// Description of what was invalid.
        detail: String,
    },
    /// An entity id does not exist in the world arena.
    UnknownEntity(EntityId),
    /// The avatar cannot be registered as a mount.
    AvatarNotMountable,
    /// The entity already has a mount registration.
    DuplicateMount(EntityId),
    /// Reading or parsing a profile configuration failed.
    Config {
        /// Where the configuration came from.
        origin: String,
        /// The error message.
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownProfile { key } => write!(f, "unknown movement profile '{key}'"),
            Error::InvalidProfile { mode, detail } => {
                write!(f, "invalid {mode} profile: {detail}")
            }
            Error::UnknownEntity(id) => write!(f, "entity {id} does not exist"),
            Error::AvatarNotMountable => write!(f, "the avatar cannot be registered as a mount"),
            Error::DuplicateMount(id) => write!(f, "entity {id} is already registered as a mount"),
            Error::Config { origin, message } => {
                write!(f, "failed to load profiles from {origin}: {message}")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<ron::error::SpannedError> for Error {
    fn from(e: ron::error::SpannedError) -> Self {
        Error::Config {
            origin: "<inline>".to_string(),
            message: e.to_string(),
        }
    }
}
