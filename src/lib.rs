// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![allow(dead_code)]
#![allow(clippy::too_many_arguments)]

//! # interpose
//!
//! [![Crates.io](https://img.shields.io/crates/v/interpose.svg)](https://crates.io/crates/interpose)
//! [![Documentation](https://docs.rs/interpose/badge.svg)](https://docs.rs/interpose)
//! [![License](https://img.shields.io/badge/license-Apache--2.0-blue.svg)](https://github.com/BinFlip/interpose/blob/main/LICENSE-APACHE)
//!
//! A thread-safe dynamic call-interception engine for registry-dispatched object models.
//! `interpose` lets you suppress, exchange, wrap, and trace the operations of live types
//! without modifying their implementations: every operation dispatches through a mutable
//! slot, and the engine rewires those slots while callers keep calling.
//!
//! ## Features
//!
//! - **🔇 Suppress & restore** - Silence an operation behind a default-returning stub, then bring it back intact
//! - **🔁 Exchange** - Trade the bodies of two signature-compatible operations; a second exchange undoes the first
//! - **🪝 Wrap** - Run before/after observers around the original, gated by per-call receiver predicates
//! - **📋 Trace** - Canned entry/exit reporting with optional stack capture, receiver dump, and timing
//! - **🎯 Instance scope** - Observe exactly one live receiver while every other instance runs untouched
//! - **🧵 Thread safe** - Install and remove hooks while other threads are mid-dispatch
//! - **🧩 Explicit model** - Registry-based dispatch with ancestry resolution, no ambient global state
//!
//! ## Quick Start
//!
//! Add `interpose` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! interpose = "0.2"
//! ```
//!
//! ### Using the Prelude
//!
//! For convenient access to the most commonly used types, import the prelude:
//!
//! ```rust
//! use std::sync::Arc;
//! use interpose::prelude::*;
//!
//! // Declare a model: one type, one operation.
//! let registry = Arc::new(TypeRegistry::new());
//! TypeBuilder::new(registry.clone(), "Logger")
//!     .operation("level", Signature::returning(ValueKind::Int), |_, _| {
//!         Value::Int(3)
//!     })
//!     .register()?;
//!
//! let engine = Interceptor::new(registry);
//! engine.suppress("Logger", "level")?;
//! engine.restore("Logger", "level")?;
//! # Ok::<(), interpose::Error>(())
//! ```
//!
//! ### Basic Usage
//!
//! ```rust
//! use std::any::Any;
//! use std::sync::Arc;
//! use interpose::{Interceptor, TypeBuilder, TypeRegistry};
//! use interpose::runtime::{Receiver, Signature, Value, ValueKind};
//!
//! struct Greeter;
//!
//! impl Receiver for Greeter {
//!     fn type_name(&self) -> &str {
//!         "Greeter"
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//!
//! let registry = Arc::new(TypeRegistry::new());
//! TypeBuilder::new(registry.clone(), "Greeter")
//!     .operation("greet", Signature::returning(ValueKind::Str), |_, _| {
//!         Value::Str("hello".to_string())
//!     })
//!     .register()?;
//!
//! let engine = Interceptor::new(registry.clone());
//!
//! // Suppressed: the original body does not run, callers get the default.
//! engine.suppress("Greeter", "greet")?;
//! assert_eq!(registry.invoke(&Greeter, "greet", &[])?, Value::Str(String::new()));
//!
//! // Restored: dispatch behaves exactly as before the suppression.
//! engine.restore("Greeter", "greet")?;
//! assert_eq!(
//!     registry.invoke(&Greeter, "greet", &[])?,
//!     Value::Str("hello".to_string())
//! );
//! # Ok::<(), interpose::Error>(())
//! ```
//!
//! ### Tracing Example
//!
//! The trace façade installs a canned observer pair reporting every call.
//! See the [`intercept`] module documentation for the full hook family.
//!
//! ## Architecture
//!
//! `interpose` is organized into several key modules:
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`runtime`] - The type registry, dispatch slots, and value/signature vocabulary
//! - [`intercept`] - The interception engine: suppress, exchange, wrap, trace
//! - [`trace`] - Diagnostic records, options, and pluggable sinks
//! - [`Error`] and [`Result`] - Comprehensive error handling
//!
//! ### The Dispatch Substrate
//!
//! Interception needs indirection: a call you cannot redirect cannot be hooked.
//! The [`runtime`] module provides that indirection as an explicit capability
//! table. Types declare operations through a [`TypeBuilder`]; each operation owns
//! a mutable dispatch slot holding its current body; callers route every
//! invocation through [`TypeRegistry::invoke`](runtime::TypeRegistry::invoke),
//! which resolves the receiver's type, walks its ancestry to the declaring type,
//! and runs whatever the slot currently holds.
//!
//! ### The Interception Engine
//!
//! The [`Interceptor`](intercept::Interceptor) is the single source of truth for
//! altered slots. It enforces one hook per `(type, operation)` key, keeps the
//! pristine body so restoration is exact, and composes wrappers out of observers,
//! predicates, and diagnostics. Hook bookkeeping serializes on an internal guard;
//! dispatch never takes it, and wrapped user code never runs under it.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result) with comprehensive error information:
//!
//! ```rust
//! use std::sync::Arc;
//! use interpose::{Error, Interceptor, TypeRegistry};
//!
//! let engine = Interceptor::new(Arc::new(TypeRegistry::new()));
//!
//! match engine.suppress("Logger", "flush") {
//!     Ok(()) => println!("Suppressed"),
//!     Err(Error::TypeNotFound(name)) => println!("Unknown type: {}", name),
//!     Err(Error::AlreadySuppressed(target)) => println!("{} already quiet", target),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Development and Testing
//!
//! The crate includes fuzzing support for the signature grammar:
//!
//! ### Fuzzing
//!
//! ```bash
//! # Install fuzzing tools
//! cargo install cargo-fuzz
//!
//! # Run fuzzer
//! cargo +nightly fuzz run signature --release
//!
//! # Multi-core fuzzing
//! cargo +nightly fuzz run signature --release -- -jobs=4 -fork=1
//! ```
//!
//! ### Testing
//!
//! The test suite covers the hook protocol, the wrapper pipeline, and concurrent
//! install/dispatch interleavings:
//!
//! ```bash
//! cargo test
//! cargo bench  # Dispatch overhead with and without hooks
//! ```
#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// This module provides a curated selection of the most frequently used types
/// from across the interpose library, allowing for convenient glob imports.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use interpose::prelude::*;
///
/// let registry = Arc::new(TypeRegistry::new());
/// let engine = Interceptor::new(registry);
/// assert_eq!(engine.hook_count(), 0);
/// ```
pub mod prelude;

/// Runtime type model and registry-based dispatch.
///
/// This module provides the dispatch substrate every hook relies on: a registry
/// of named types, each declaring operations with signatures and swappable
/// bodies, resolved through type ancestry at call time.
///
/// # Key Types
///
/// - [`runtime::TypeRegistry`] - Central registry and dispatch entry point
/// - [`runtime::TypeBuilder`] - Fluent declaration of types, parents, and operations
/// - [`runtime::Receiver`] - Trait implemented by live objects dispatching against the model
/// - [`runtime::Signature`] - Parameter/return shapes with a `(int, str) -> bool` text form
/// - [`runtime::Value`] / [`runtime::ValueKind`] - The argument and result vocabulary
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use interpose::runtime::{Signature, TypeBuilder, TypeRegistry, Value, ValueKind};
///
/// let registry = Arc::new(TypeRegistry::new());
/// TypeBuilder::new(registry.clone(), "Account")
///     .operation("balance", Signature::returning(ValueKind::Int), |_, _| {
///         Value::Int(100)
///     })
///     .register()?;
///
/// assert!(registry.contains("Account"));
/// # Ok::<(), interpose::Error>(())
/// ```
pub mod runtime;

/// Hook installation, bookkeeping, and removal.
///
/// This module provides the [`Interceptor`](intercept::Interceptor) and the hook
/// vocabulary around it. Four families of interception are supported:
///
/// - **Suppress/restore**: Swap an operation's body for a default-returning stub, then put the original back
/// - **Exchange**: Trade the bodies of two compatible operations; calling exchange again reverses it
/// - **Wrap**: Compose before/after observers and per-call predicates around the original body
/// - **Trace**: Canned wraps that report entry/exit and optional diagnostics to a sink
///
/// # Key Types
///
/// - [`intercept::Interceptor`] - The engine owning all hook state
/// - [`intercept::WrapSpec`] - Builder describing one wrap installation
/// - [`intercept::HookKey`] / [`intercept::HookKind`] - Identity and kind of active hooks
/// - [`intercept::OperationDescriptor`] - Resolved handle naming a slot's declaring type
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use interpose::{Interceptor, TypeBuilder, TypeRegistry, WrapSpec};
/// use interpose::runtime::{Signature, Value, ValueKind};
///
/// let registry = Arc::new(TypeRegistry::new());
/// TypeBuilder::new(registry.clone(), "Job")
///     .operation("run", Signature::returning(ValueKind::Int), |_, _| {
///         Value::Int(1)
///     })
///     .register()?;
///
/// let engine = Interceptor::new(registry);
/// engine.install_wrap("Job", "run", WrapSpec::new().before(|_| println!("go")))?;
/// # Ok::<(), interpose::Error>(())
/// ```
pub mod intercept;

/// Diagnostic records, trace options, and pluggable sinks.
///
/// Wrappers report what they observe as [`trace::TraceRecord`]s pushed into a
/// [`trace::TraceSink`]. The sink is an injected collaborator: the default
/// [`trace::LogSink`] forwards each record as a structured `tracing` event,
/// while [`trace::MemorySink`] accumulates records for inspection in tests
/// and embedders.
///
/// # Key Types
///
/// - [`trace::TraceOptions`] - Bit-set selecting stack capture, receiver dump, and timing
/// - [`trace::TraceRecord`] / [`trace::TraceRecordKind`] - One observation per record
/// - [`trace::TraceSink`] - Destination trait, implemented by [`trace::LogSink`] and [`trace::MemorySink`]
///
/// # Examples
///
/// ```rust
/// use interpose::trace::TraceOptions;
///
/// let options = TraceOptions::EXECUTION_TIME | TraceOptions::DUMP_RECEIVER;
/// assert!(options.contains(TraceOptions::EXECUTION_TIME));
/// assert!(!options.contains(TraceOptions::STACK_TRACE));
/// ```
pub mod trace;

/// `interpose` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
///
/// # Examples
///
/// ```rust
/// use interpose::{Interceptor, Result};
///
/// fn silence_flush(engine: &Interceptor) -> Result<()> {
///     engine.suppress("Logger", "flush")
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `interpose` Error type
///
/// The main error type for all operations in this crate. Provides detailed error
/// information for model construction, dispatch resolution, and hook protocol
/// violations.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use interpose::{Error, Interceptor, TypeRegistry};
///
/// let engine = Interceptor::new(Arc::new(TypeRegistry::new()));
/// match engine.restore("Logger", "flush") {
///     Err(Error::TypeNotFound(name)) => println!("Unknown type: {}", name),
///     Err(Error::NotHooked(target)) => println!("{} carries no hook", target),
///     other => println!("{:?}", other),
/// }
/// ```
pub use error::Error;

/// Main entry point for intercepting operations.
///
/// See [`intercept::Interceptor`] for the full hook families: suppress/restore,
/// exchange, wrap, and trace.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use interpose::{Interceptor, TypeRegistry};
///
/// let engine = Interceptor::new(Arc::new(TypeRegistry::new()));
/// assert_eq!(engine.hook_count(), 0);
/// ```
pub use intercept::Interceptor;

/// Builder-style description of a wrap installation.
///
/// Carries optional before/after observers, an optional receiver predicate,
/// diagnostic options, and the observation scope. See [`intercept::WrapSpec`].
///
/// # Example
///
/// ```rust
/// use interpose::{TraceOptions, WrapSpec};
///
/// let spec = WrapSpec::new()
///     .before(|_| println!("entering"))
///     .options(TraceOptions::EXECUTION_TIME);
/// ```
pub use intercept::WrapSpec;

/// The runtime model: type registration and dispatch.
///
/// [`TypeRegistry`] holds the model and routes calls; [`TypeBuilder`] declares
/// types into it. See the [`runtime`] module for the full vocabulary.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use interpose::{TypeBuilder, TypeRegistry};
/// use interpose::runtime::{Signature, Value, ValueKind};
///
/// let registry = Arc::new(TypeRegistry::new());
/// TypeBuilder::new(registry.clone(), "Logger")
///     .operation("level", Signature::returning(ValueKind::Int), |_, _| {
///         Value::Int(3)
///     })
///     .register()?;
/// # Ok::<(), interpose::Error>(())
/// ```
pub use runtime::{TypeBuilder, TypeRegistry};

/// Bit-set selecting the diagnostics a trace emits per observed call.
///
/// Combine [`TraceOptions::STACK_TRACE`], [`TraceOptions::DUMP_RECEIVER`], and
/// [`TraceOptions::EXECUTION_TIME`] freely; [`TraceOptions::ALL`] enables all
/// three and `empty()` leaves a plain pass-through wrap.
///
/// # Example
///
/// ```rust
/// use interpose::TraceOptions;
///
/// let options = TraceOptions::STACK_TRACE | TraceOptions::EXECUTION_TIME;
/// assert!(options.contains(TraceOptions::STACK_TRACE));
/// ```
pub use trace::TraceOptions;
