//! Domain model for objscope
//!
//! This module contains core domain types and errors that provide:
//! - Compile-time safety via newtype pattern
//! - Typed boundary events instead of positional argument vectors
//! - Structured error handling

pub mod errors;
pub mod events;
pub mod types;

// Re-export common types for convenience
pub use types::{ConnectionType, Descriptor, DispatchKind, ObjectId};

pub use events::{ChildEvent, ChildEventKind, ConnectEvent, DisconnectEvent, LifecycleEvent};

pub use errors::{CallbackCategory, ExportError, ProbeError};
