//! # interpose Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the interpose library. Import this module to get quick access to the essential
//! types for building models and intercepting their operations.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all interpose operations
pub use crate::Error;

/// The result type used throughout interpose
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// The interception engine
pub use crate::intercept::Interceptor;

/// Model construction and dispatch
pub use crate::runtime::{TypeBuilder, TypeRegistry};

// ================================================================================================
// Runtime Model
// ================================================================================================

/// Registered types and their operations
pub use crate::runtime::{Operation, OperationRc, RuntimeType, RuntimeTypeRc};

/// Live receivers and their identity
pub use crate::runtime::{InstanceId, Receiver};

/// Operation bodies and shapes
pub use crate::runtime::{Callable, Signature};

/// The argument and result vocabulary
pub use crate::runtime::{Value, ValueKind};

// ================================================================================================
// Interception
// ================================================================================================

/// Identity and state of active hooks
pub use crate::intercept::{HookKey, HookKind, HookRecord};

/// Wrap installation vocabulary
pub use crate::intercept::{Observer, Predicate, WrapScope, WrapSpec};

/// Resolved handles onto dispatch slots
pub use crate::intercept::OperationDescriptor;

// ================================================================================================
// Tracing and Diagnostics
// ================================================================================================

/// Per-call diagnostic selection
pub use crate::trace::TraceOptions;

/// Diagnostic records and their payloads
pub use crate::trace::{TraceRecord, TraceRecordKind};

/// Record destinations
pub use crate::trace::{LogSink, MemorySink, TraceSink};
