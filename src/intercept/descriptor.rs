use std::sync::Arc;

use crate::intercept::HookKey;
use crate::runtime::{
    Callable, Operation, OperationRc, Receiver, RuntimeTypeRc, Signature, TypeRegistry, Value,
};
use crate::Result;

/// A resolved handle to one dispatch slot: the declaring type paired
/// with the operation it owns.
///
/// Descriptors answer "where does this operation actually live". Asking
/// about an operation a child merely inherits yields a descriptor naming
/// the ancestor that declares it, which is why lookups through different
/// children of one base collapse onto the same slot and the same
/// [`HookKey`].
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use interpose::intercept::OperationDescriptor;
/// use interpose::runtime::{Signature, TypeBuilder, TypeRegistry, Value, ValueKind};
///
/// let registry = Arc::new(TypeRegistry::new());
/// TypeBuilder::new(registry.clone(), "Base")
///     .operation("id", Signature::returning(ValueKind::Int), |_, _| Value::Int(7))
///     .register()?;
/// TypeBuilder::new(registry.clone(), "Child").parent("Base").register()?;
///
/// let descriptor = OperationDescriptor::resolve(&registry, "Child", "id")?;
/// assert_eq!(descriptor.owner_name(), "Base");
/// assert_eq!(descriptor.key().to_string(), "Base::id");
/// # Ok::<(), interpose::Error>(())
/// ```
pub struct OperationDescriptor {
    owner: RuntimeTypeRc,
    operation: OperationRc,
}

impl OperationDescriptor {
    /// Resolve a type/operation pair against a registry
    ///
    /// ## Arguments
    /// * `registry`  - The model to resolve against
    /// * `type_name` - The type the lookup starts from
    /// * `operation` - The operation name
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if the type is not
    /// registered, or [`crate::Error::OperationNotFound`] if no ancestor
    /// declares the operation.
    pub fn resolve(registry: &TypeRegistry, type_name: &str, operation: &str) -> Result<Self> {
        let (owner, operation) = registry.resolve(type_name, operation)?;
        Ok(OperationDescriptor { owner, operation })
    }

    /// The declaring type's name
    #[must_use]
    pub fn owner_name(&self) -> &str {
        &self.owner.name
    }

    /// The operation name
    #[must_use]
    pub fn operation_name(&self) -> &str {
        &self.operation.name
    }

    /// The declared signature
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.operation.signature
    }

    /// The hook key this slot answers to
    #[must_use]
    pub fn key(&self) -> HookKey {
        HookKey::new(self.owner.name.clone(), self.operation.name.clone())
    }

    /// Dispatch a call through whatever currently occupies the slot
    ///
    /// ## Arguments
    /// * `receiver` - The object the call is addressed to
    /// * `args`     - The argument list
    pub fn invoke(&self, receiver: &dyn Receiver, args: &[Value]) -> Value {
        self.operation.invoke(receiver, args)
    }

    /// Whether two descriptors point at the same slot
    pub(crate) fn same_slot(&self, other: &OperationDescriptor) -> bool {
        Arc::ptr_eq(&self.operation, &other.operation)
    }

    /// Capture the pristine body if not yet captured, and return it
    pub(crate) fn save_original(&self) -> Callable {
        self.operation.save_original()
    }

    /// Replace the slot contents
    pub(crate) fn install(&self, body: Callable) {
        self.operation.install(body);
    }

    /// Put the pristine body back into the slot
    pub(crate) fn restore_original(&self) {
        self.operation.restore_original();
    }

    /// Atomically trade slot contents with another descriptor
    pub(crate) fn swap_with(&self, other: &OperationDescriptor) {
        Operation::swap_slots(&self.operation, &other.operation);
    }
}

impl std::fmt::Debug for OperationDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationDescriptor")
            .field("owner", &self.owner.name)
            .field("operation", &self.operation.name)
            .field("signature", &self.operation.signature)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{sample_model, NullReceiver};
    use crate::Error;

    #[test]
    fn test_resolve_names_declaring_type() {
        let registry = sample_model();

        let inherited = OperationDescriptor::resolve(&registry, "Logger", "describe").unwrap();
        assert_eq!(inherited.owner_name(), "Base");
        assert_eq!(inherited.operation_name(), "describe");
        assert_eq!(inherited.key(), HookKey::new("Base", "describe"));

        let own = OperationDescriptor::resolve(&registry, "Logger", "flush").unwrap();
        assert_eq!(own.owner_name(), "Logger");
        assert_eq!(own.key().to_string(), "Logger::flush");
    }

    #[test]
    fn test_resolve_collapses_to_one_slot() {
        let registry = sample_model();

        let via_child = OperationDescriptor::resolve(&registry, "Logger", "describe").unwrap();
        let via_base = OperationDescriptor::resolve(&registry, "Base", "describe").unwrap();
        assert!(via_child.same_slot(&via_base));

        let other = OperationDescriptor::resolve(&registry, "Logger", "flush").unwrap();
        assert!(!via_child.same_slot(&other));
    }

    #[test]
    fn test_resolve_errors() {
        let registry = sample_model();

        assert!(matches!(
            OperationDescriptor::resolve(&registry, "Ghost", "flush"),
            Err(Error::TypeNotFound(name)) if name == "Ghost"
        ));
        assert!(matches!(
            OperationDescriptor::resolve(&registry, "Logger", "ghost"),
            Err(Error::OperationNotFound { type_name, operation })
                if type_name == "Logger" && operation == "ghost"
        ));
    }

    #[test]
    fn test_swap_and_restore() {
        let registry = sample_model();
        let logger = NullReceiver::new("Logger");
        let mirror = NullReceiver::new("Mirror");

        let left = OperationDescriptor::resolve(&registry, "Logger", "flush").unwrap();
        let right = OperationDescriptor::resolve(&registry, "Mirror", "flush").unwrap();

        left.save_original();
        right.save_original();
        left.swap_with(&right);

        assert_eq!(left.invoke(&logger, &[]), Value::Int(2));
        assert_eq!(right.invoke(&mirror, &[]), Value::Int(1));

        left.restore_original();
        right.restore_original();
        assert_eq!(left.invoke(&logger, &[]), Value::Int(1));
        assert_eq!(right.invoke(&mirror, &[]), Value::Int(2));
    }
}
