use std::sync::Arc;

use crossbeam_skiplist::SkipMap;

use crate::{
    runtime::{OperationRc, Receiver, RuntimeTypeRc, Value},
    Error::{DuplicateType, OperationNotFound, TypeNotFound},
    Result,
};

/// Central registry of every type participating in dynamic dispatch.
///
/// The registry is the authoritative runtime model: it owns the type
/// table, resolves operations through ancestry, and drives dispatch for
/// receivers. Interception rewires dispatch by mutating the operation
/// slots reached through this registry, so a registry shared between the
/// model and an [`Interceptor`](crate::Interceptor) observes every hook.
///
/// # Concurrency Design
///
/// - Lock-free primary storage using `SkipMap`
/// - Registration and lookup may run concurrently without coordination
/// - Dispatch never blocks on registration
///
/// # Examples
///
/// ```rust
/// use std::any::Any;
/// use std::sync::Arc;
/// use interpose::runtime::{Receiver, Signature, TypeBuilder, TypeRegistry, Value};
///
/// struct Greeter;
///
/// impl Receiver for Greeter {
///     fn type_name(&self) -> &str {
///         "Greeter"
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let registry = Arc::new(TypeRegistry::new());
/// TypeBuilder::new(registry.clone(), "Greeter")
///     .operation("greet", Signature::parse("(str) -> str")?, |_, args| {
///         Value::Str(format!("hello {}", args[0].as_str().unwrap_or("")))
///     })
///     .register()?;
///
/// let greeting = registry.invoke(&Greeter, "greet", &[Value::from("world")])?;
/// assert_eq!(greeting, Value::from("hello world"));
/// # Ok::<(), interpose::Error>(())
/// ```
///
/// # Thread Safety
///
/// The registry is fully thread-safe: multiple threads can register
/// types, resolve operations, and dispatch calls simultaneously without
/// explicit locking.
pub struct TypeRegistry {
    /// Primary type storage indexed by name
    types: SkipMap<String, RuntimeTypeRc>,
}

impl TypeRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        TypeRegistry {
            types: SkipMap::new(),
        }
    }

    /// Register a fully constructed type
    ///
    /// ## Arguments
    /// * `new_type` - The type to register
    ///
    /// # Errors
    /// Returns [`DuplicateType`] if a type with the same name already
    /// exists. The existing registration is left untouched.
    pub(crate) fn insert(&self, new_type: RuntimeTypeRc) -> Result<()> {
        let entry = self
            .types
            .get_or_insert(new_type.name.clone(), new_type.clone());
        if Arc::ptr_eq(entry.value(), &new_type) {
            Ok(())
        } else {
            Err(DuplicateType(new_type.name.clone()))
        }
    }

    /// Look up a type by name
    ///
    /// ## Arguments
    /// * `name` - The registered type name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<RuntimeTypeRc> {
        self.types.get(name).map(|entry| entry.value().clone())
    }

    /// Whether a type with this name is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// The number of registered types
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry holds no types
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The names of all registered types, in sorted order
    #[must_use]
    pub fn type_names(&self) -> Vec<String> {
        self.types.iter().map(|e| e.key().clone()).collect()
    }

    /// Resolve an operation to its declaring type
    ///
    /// Starting at `type_name`, the parent chain is walked until a type
    /// declaring `operation` is found. The declaring type is returned
    /// alongside the operation, so callers hooking an inherited operation
    /// key their bookkeeping on the type that actually owns the slot.
    ///
    /// ## Arguments
    /// * `type_name` - The type to start resolution from
    /// * `operation` - The operation name to resolve
    ///
    /// # Errors
    /// Returns [`TypeNotFound`] if `type_name` is not registered, or
    /// [`OperationNotFound`] if the walk exhausts the ancestry.
    pub fn resolve(&self, type_name: &str, operation: &str) -> Result<(RuntimeTypeRc, OperationRc)> {
        let mut current = self
            .get(type_name)
            .ok_or_else(|| TypeNotFound(type_name.to_string()))?;

        loop {
            if let Some(found) = current.operation(operation).cloned() {
                return Ok((current, found));
            }
            match current.parent.clone() {
                Some(parent) => current = parent,
                None => {
                    return Err(OperationNotFound {
                        type_name: type_name.to_string(),
                        operation: operation.to_string(),
                    })
                }
            }
        }
    }

    /// Dispatch a call on a receiver through the current model
    ///
    /// The receiver's [`type_name`](Receiver::type_name) selects the type,
    /// ancestry resolves the operation, and whatever body currently
    /// occupies the slot runs. Interceptions installed on the slot apply
    /// transparently.
    ///
    /// ## Arguments
    /// * `receiver`  - The object the call is addressed to
    /// * `operation` - The operation name
    /// * `args`      - The argument list
    ///
    /// # Errors
    /// Returns [`TypeNotFound`] if the receiver's type is not registered,
    /// or [`OperationNotFound`] if no ancestor declares the operation.
    pub fn invoke(&self, receiver: &dyn Receiver, operation: &str, args: &[Value]) -> Result<Value> {
        let type_name = receiver.type_name();
        let runtime_type = self
            .get(type_name)
            .ok_or_else(|| TypeNotFound(type_name.to_string()))?;
        let found = runtime_type
            .find_operation(operation)
            .ok_or_else(|| OperationNotFound {
                type_name: type_name.to_string(),
                operation: operation.to_string(),
            })?;

        Ok(found.invoke(receiver, args))
    }

    /// Iterate all registered types in name order
    pub fn iter(&self) -> crossbeam_skiplist::map::Iter<'_, String, RuntimeTypeRc> {
        self.types.iter()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.len())
            .finish()
    }
}
