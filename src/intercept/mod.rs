//! Hook installation, bookkeeping, and removal.
//!
//! This module provides the interception engine built on top of the
//! [`runtime`](crate::runtime) model's dispatch slots. The [`Interceptor`]
//! owns one [`HookRecord`] per altered slot and enforces the protocol:
//! at most one hook per `(type, operation)` key, installs rejected on
//! occupied keys, restores rejected on pristine ones.
//!
//! # Key Components
//!
//! - [`Interceptor`]: The engine — suppress, restore, exchange, wrap, introspect
//! - [`WrapSpec`]: Builder for wrap installations (observers, predicate, diagnostics, scope)
//! - [`HookKey`] / [`HookKind`] / [`HookRecord`]: Identity and state of active hooks
//! - [`OperationDescriptor`]: Resolved handle naming the declaring type of a slot
//!
//! # Hook Families
//!
//! - **Suppress/restore**: Silence an operation, then reinstate pristine behavior
//! - **Exchange**: Trade the bodies of two compatible operations; self-inverse
//! - **Wrap**: Observe calls with before/after observers, predicate gating, and
//!   per-call diagnostics, type-wide or scoped to one receiver
//! - **Trace**: Canned wrap reporting entry/exit of every call to the sink
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use interpose::{Interceptor, TypeRegistry};
//! use interpose::runtime::{Signature, TypeBuilder, Value, ValueKind};
//!
//! let registry = Arc::new(TypeRegistry::new());
//! TypeBuilder::new(registry.clone(), "Job")
//!     .operation("run", Signature::returning(ValueKind::Int), |_, _| {
//!         Value::Int(1)
//!     })
//!     .register()?;
//!
//! let engine = Interceptor::new(registry);
//! engine.instrument(
//!     "Job",
//!     "run",
//!     |_| println!("about to run"),
//!     |_| println!("done"),
//! )?;
//! assert!(engine.is_hooked("Job", "run"));
//! # Ok::<(), interpose::Error>(())
//! ```

mod descriptor;
mod facade;
mod hook;
mod registry;
mod wrapper;

pub use descriptor::OperationDescriptor;
pub use hook::{HookKey, HookKind, HookRecord, Observer, Predicate, WrapScope, WrapSpec};
pub use registry::Interceptor;
