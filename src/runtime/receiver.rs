use std::any::Any;
use std::fmt;

/// A live object that operations dispatch against.
///
/// Implementors declare which registered type they inhabit via
/// [`Receiver::type_name`]; dispatch resolves operations by walking that
/// type's ancestry in the [`TypeRegistry`](crate::runtime::TypeRegistry).
/// Operation bodies downcast through [`Receiver::as_any`] to reach the
/// concrete state.
///
/// Concurrent dispatch hands out shared references only, so mutable
/// receiver state lives behind interior mutability (atomics, locks).
///
/// # Examples
///
/// ```rust
/// use std::any::Any;
/// use std::sync::atomic::{AtomicI64, Ordering};
/// use interpose::runtime::Receiver;
///
/// struct Counter {
///     hits: AtomicI64,
/// }
///
/// impl Receiver for Counter {
///     fn type_name(&self) -> &str {
///         "Counter"
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
///
///     fn dump(&self) -> String {
///         format!("Counter {{ hits: {} }}", self.hits.load(Ordering::Relaxed))
///     }
/// }
/// ```
pub trait Receiver: Any {
    /// The registered type name this object dispatches as
    fn type_name(&self) -> &str;

    /// Upcast to [`Any`] so operation bodies can downcast to the concrete type
    fn as_any(&self) -> &dyn Any;

    /// Render internal state for trace output
    ///
    /// The default keeps receivers out of trace logs unless they opt in.
    fn dump(&self) -> String {
        format!("<{} instance>", self.type_name())
    }
}

/// The identity of a receiver instance, used to scope wrappers to one object.
///
/// Identity is the object's address, so it is only meaningful while the
/// receiver stays at a fixed location (boxed, `Arc`-held, or otherwise
/// pinned for the lifetime of the hook). Two live receivers never share
/// an id; an id may be reused after its receiver is dropped.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(usize);

impl InstanceId {
    /// Derive the identity of a receiver
    ///
    /// ## Arguments
    /// * `receiver` - The object to identify
    #[must_use]
    pub fn of(receiver: &dyn Receiver) -> Self {
        InstanceId(std::ptr::from_ref(receiver).cast::<()>() as usize)
    }

    /// Returns the raw address value
    #[must_use]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceId(0x{:x})", self.0)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}
