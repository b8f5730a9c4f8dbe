//! Error types for the Palaver conversation engine.
//!
//! Every domain error records the source location where it was raised.
//! [`PalaverError`] aggregates them so that crates can share one result type.

mod compile;
mod config;
mod context;
mod error;
mod inference;
mod json;
mod not_found;
mod storage;
mod validation;

pub use compile::{CompileError, CompileErrorKind};
pub use config::{ConfigError, ConfigErrorKind};
pub use context::{ContextError, ContextErrorKind};
pub use error::{PalaverError, PalaverErrorKind, PalaverResult};
pub use inference::{InferenceError, InferenceErrorKind};
pub use json::JsonError;
pub use not_found::{NotFoundError, NotFoundKind};
pub use storage::{StorageError, StorageErrorKind};
pub use validation::ValidationError;
