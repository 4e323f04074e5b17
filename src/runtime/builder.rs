//! Builder for runtime type declarations.
//!
//! This module provides the [`TypeBuilder`] struct, which offers a fluent API for declaring
//! types, their parent, and their operations, and for registering the finished type in a
//! [`TypeRegistry`]. Types are immutable once registered; only their operation slots change,
//! and only through interception.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use interpose::runtime::{Signature, TypeBuilder, TypeRegistry, Value, ValueKind};
//!
//! let registry = Arc::new(TypeRegistry::new());
//! let logger = TypeBuilder::new(registry.clone(), "Logger")
//!     .operation("level", Signature::returning(ValueKind::Int), |_, _| {
//!         Value::Int(3)
//!     })
//!     .operation("flush", Signature::parse("() -> unit")?, |_, _| Value::Unit)
//!     .register()?;
//!
//! assert_eq!(logger.operation_count(), 2);
//! # Ok::<(), interpose::Error>(())
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    runtime::{Callable, Operation, Receiver, RuntimeType, RuntimeTypeRc, Signature, TypeRegistry, Value},
    Error::{DuplicateOperation, TypeNotFound},
    Result,
};

/// Provides a fluent API for declaring and registering runtime types
pub struct TypeBuilder {
    /// Registry the finished type is registered into
    registry: Arc<TypeRegistry>,
    /// Name of the type being declared
    name: String,
    /// Name of the parent type, if any
    parent: Option<String>,
    /// Declared operations in declaration order
    operations: Vec<(String, Signature, Callable)>,
}

impl TypeBuilder {
    /// Create a new builder for a named type
    ///
    /// ## Arguments
    /// * 'registry' - The registry to register into
    /// * 'name'     - The name of the new type
    pub fn new(registry: Arc<TypeRegistry>, name: &str) -> Self {
        TypeBuilder {
            registry,
            name: name.to_string(),
            parent: None,
            operations: Vec::new(),
        }
    }

    /// Declare the parent this type extends
    ///
    /// The parent must already be registered when [`TypeBuilder::register`]
    /// runs. Since every parent predates its children, ancestry chains are
    /// acyclic by construction.
    ///
    /// ## Arguments
    /// * 'name' - The name of the parent type
    #[must_use]
    pub fn parent(mut self, name: &str) -> Self {
        self.parent = Some(name.to_string());
        self
    }

    /// Declare an operation with its signature and body
    ///
    /// ## Arguments
    /// * 'name'      - The operation name
    /// * 'signature' - The declared shape
    /// * 'body'      - The initial implementation
    #[must_use]
    pub fn operation<F>(mut self, name: &str, signature: Signature, body: F) -> Self
    where
        F: Fn(&dyn Receiver, &[Value]) -> Value + Send + Sync + 'static,
    {
        self.operations
            .push((name.to_string(), signature, Arc::new(body)));
        self
    }

    /// Finish the declaration and register the type
    ///
    /// # Errors
    /// Returns [`TypeNotFound`] if a declared parent is not registered,
    /// [`DuplicateOperation`] if two operations share a name, or
    /// [`crate::Error::DuplicateType`] if the type name is already taken.
    pub fn register(self) -> Result<RuntimeTypeRc> {
        let TypeBuilder {
            registry,
            name,
            parent,
            operations,
        } = self;

        let parent = match parent {
            Some(parent_name) => Some(
                registry
                    .get(&parent_name)
                    .ok_or_else(|| TypeNotFound(parent_name))?,
            ),
            None => None,
        };

        let mut table = HashMap::with_capacity(operations.len());
        for (op_name, signature, body) in operations {
            let operation = Arc::new(Operation::new(op_name.clone(), signature, body));
            if table.insert(op_name.clone(), operation).is_some() {
                return Err(DuplicateOperation {
                    type_name: name,
                    operation: op_name,
                });
            }
        }

        let built = Arc::new(RuntimeType::new(name, parent, table));
        registry.insert(built.clone())?;
        Ok(built)
    }
}
