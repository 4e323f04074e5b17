use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use crate::runtime::{Receiver, Signature, Value};

/// Reference-counted handle to a [`RuntimeType`]
pub type RuntimeTypeRc = Arc<RuntimeType>;

/// Reference-counted handle to an [`Operation`]
pub type OperationRc = Arc<Operation>;

/// The callable body of an operation.
///
/// Bodies receive the dispatching receiver and the argument list, and
/// produce the result value. They are shared across threads, so they
/// must be `Send + Sync`; receiver state they touch lives behind
/// interior mutability.
pub type Callable = Arc<dyn Fn(&dyn Receiver, &[Value]) -> Value + Send + Sync>;

/// A named, dispatchable operation declared on a [`RuntimeType`].
///
/// Every operation owns a mutable dispatch slot holding its current body.
/// Plain dispatch reads the slot; interception swaps the slot while
/// remembering the pristine body so it can be reinstated later. The slot
/// lock is only ever held long enough to clone the `Arc` in or out, never
/// across a call into user code.
pub struct Operation {
    /// The operation name, unique within its declaring type
    pub name: String,
    /// The declared parameter and return kinds
    pub signature: Signature,
    /// The live dispatch slot consulted on every call
    slot: RwLock<Callable>,
    /// The pristine body, captured before the first slot mutation
    original: OnceLock<Callable>,
}

impl Operation {
    /// Create a new operation with its initial body
    ///
    /// ## Arguments
    /// * `name`      - The operation name
    /// * `signature` - The declared shape
    /// * `body`      - The initial body, which becomes the pristine original
    pub(crate) fn new(name: String, signature: Signature, body: Callable) -> Self {
        Operation {
            name,
            signature,
            slot: RwLock::new(body),
            original: OnceLock::new(),
        }
    }

    /// Dispatch a call through the current slot
    ///
    /// The body is cloned out of the slot before the call, so no lock is
    /// held while user code runs. A slot swap that races this call lands
    /// on the next dispatch.
    ///
    /// ## Arguments
    /// * `receiver` - The object the call is addressed to
    /// * `args`     - The argument list
    pub fn invoke(&self, receiver: &dyn Receiver, args: &[Value]) -> Value {
        let body = self.current();
        body(receiver, args)
    }

    /// Clone the body currently occupying the slot
    pub(crate) fn current(&self) -> Callable {
        read_lock!(self.slot).clone()
    }

    /// Replace the slot contents
    pub(crate) fn install(&self, body: Callable) {
        *write_lock!(self.slot) = body;
    }

    /// Capture the pristine body if not yet captured, and return it
    ///
    /// Interception paths call this before the first slot mutation, so the
    /// captured body is always the one the operation was declared with.
    /// Later captures return the same body regardless of slot state.
    pub(crate) fn save_original(&self) -> Callable {
        self.original.get_or_init(|| self.current()).clone()
    }

    /// Put the pristine body back into the slot
    ///
    /// Does nothing if the slot was never mutated.
    pub(crate) fn restore_original(&self) {
        if let Some(original) = self.original.get() {
            self.install(original.clone());
        }
    }

    /// Atomically trade the slot contents of two operations
    ///
    /// Locks are taken in address order so two concurrent exchanges over
    /// the same pair cannot deadlock.
    pub(crate) fn swap_slots(a: &Operation, b: &Operation) {
        if std::ptr::eq(a, b) {
            return;
        }

        let (first, second) = if std::ptr::from_ref(a) < std::ptr::from_ref(b) {
            (a, b)
        } else {
            (b, a)
        };

        let mut first_slot = write_lock!(first.slot);
        let mut second_slot = write_lock!(second.slot);
        std::mem::swap(&mut *first_slot, &mut *second_slot);
    }
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// A registered type in the runtime model.
///
/// Types declare operations and optionally extend a parent. Operation
/// lookup walks the parent chain, so a child observes every hook placed
/// on an inherited operation and a hook on a child-declared operation
/// never touches the parent.
pub struct RuntimeType {
    /// The registered type name, unique within a registry
    pub name: String,
    /// The parent type, if any
    pub parent: Option<RuntimeTypeRc>,
    /// Operations declared directly on this type, keyed by name
    operations: HashMap<String, OperationRc>,
}

impl RuntimeType {
    /// Create a new type from its parts
    pub(crate) fn new(
        name: String,
        parent: Option<RuntimeTypeRc>,
        operations: HashMap<String, OperationRc>,
    ) -> Self {
        RuntimeType {
            name,
            parent,
            operations,
        }
    }

    /// Look up an operation declared directly on this type
    ///
    /// ## Arguments
    /// * `name` - The operation name
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&OperationRc> {
        self.operations.get(name)
    }

    /// Look up an operation on this type or any ancestor
    ///
    /// The nearest declaration wins: a redeclaration on a child shadows
    /// the parent's operation of the same name.
    ///
    /// ## Arguments
    /// * `name` - The operation name
    #[must_use]
    pub fn find_operation(&self, name: &str) -> Option<&OperationRc> {
        let mut current = self;
        loop {
            if let Some(operation) = current.operations.get(name) {
                return Some(operation);
            }
            match &current.parent {
                Some(parent) => current = parent.as_ref(),
                None => return None,
            }
        }
    }

    /// Iterate the operations declared directly on this type
    pub fn operations(&self) -> impl Iterator<Item = &OperationRc> {
        self.operations.values()
    }

    /// The number of operations declared directly on this type
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }
}

impl std::fmt::Debug for RuntimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeType")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name.as_str()))
            .field("operations", &self.operations.len())
            .finish()
    }
}
