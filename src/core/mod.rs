//! Core abstractions shared by every module
//!
//! - `error`: the crate-wide error type and result alias

pub mod error;

pub use error::{AudioOperation, BackendKind, Result, TtsError};
