//! Runtime type model and registry-based dispatch.
//!
//! This module provides the dynamic half of the crate: a registry of named types, each
//! declaring operations with signatures and swappable bodies, and a dispatch path that
//! resolves calls through type ancestry at runtime. Every call goes through an operation's
//! dispatch slot, which is exactly what makes interception possible; the
//! [`intercept`](crate::intercept) module rewires dispatch purely by mutating these slots.
//!
//! # Key Components
//!
//! - [`TypeRegistry`]: Central registry for all types in a model
//! - [`TypeBuilder`]: Builder pattern for declaring types and operations
//! - [`RuntimeType`] / [`Operation`]: The registered model, with one mutable slot per operation
//! - [`Receiver`]: Trait implemented by live objects that dispatch against the model
//! - [`Value`] / [`ValueKind`] / [`Signature`]: The argument, result, and shape vocabulary
//!
//! # Dispatch Features
//!
//! - **Ancestry resolution**: Operation lookup walks the parent chain, nearest wins
//! - **Slot indirection**: Bodies are `Arc`d closures swapped without pausing dispatch
//! - **Instance identity**: [`InstanceId`] scopes hooks to a single live receiver
//!
//! # Examples
//!
//! ```rust
//! use std::any::Any;
//! use std::sync::Arc;
//! use interpose::runtime::{Receiver, Signature, TypeBuilder, TypeRegistry, Value, ValueKind};
//!
//! struct Account;
//!
//! impl Receiver for Account {
//!     fn type_name(&self) -> &str {
//!         "Account"
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//!
//! let registry = Arc::new(TypeRegistry::new());
//! TypeBuilder::new(registry.clone(), "Account")
//!     .operation("balance", Signature::returning(ValueKind::Int), |_, _| {
//!         Value::Int(100)
//!     })
//!     .register()?;
//!
//! assert_eq!(
//!     registry.invoke(&Account, "balance", &[])?,
//!     Value::Int(100)
//! );
//! # Ok::<(), interpose::Error>(())
//! ```

mod builder;
mod receiver;
mod registry;
mod signature;
mod types;
mod value;

pub use builder::TypeBuilder;
pub use receiver::{InstanceId, Receiver};
pub use registry::TypeRegistry;
pub use signature::Signature;
pub use types::{Callable, Operation, OperationRc, RuntimeType, RuntimeTypeRc};
pub use value::{Value, ValueKind};
