//! The interception engine.
//!
//! This module provides the [`Interceptor`], the owner of all hook state.
//! It maps hook keys to [`HookRecord`]s, enforces the one-hook-per-slot
//! protocol, and performs the slot surgery behind suppression, exchange,
//! and wrapping. Absence of a record means the operation runs unmodified.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use interpose::{Interceptor, TypeRegistry};
//! use interpose::runtime::{Signature, TypeBuilder, Value, ValueKind};
//!
//! let registry = Arc::new(TypeRegistry::new());
//! TypeBuilder::new(registry.clone(), "Logger")
//!     .operation("level", Signature::returning(ValueKind::Int), |_, _| {
//!         Value::Int(3)
//!     })
//!     .register()?;
//!
//! let engine = Interceptor::new(registry);
//! engine.suppress("Logger", "level")?;
//! assert!(engine.is_hooked("Logger", "level"));
//! engine.restore("Logger", "level")?;
//! # Ok::<(), interpose::Error>(())
//! ```

use std::sync::{atomic::AtomicU64, Arc, Mutex};

use dashmap::DashMap;

use crate::intercept::wrapper::{build_stub, build_wrapper, WrapperParts};
use crate::intercept::{
    HookKey, HookKind, HookRecord, OperationDescriptor, Predicate, WrapScope, WrapSpec,
};
use crate::runtime::{InstanceId, Receiver, TypeRegistry};
use crate::trace::{LogSink, TraceSink};
use crate::{Error, Result};

/// The interception engine: installs, inspects, and removes hooks on the
/// dispatch slots of a runtime model.
///
/// The engine owns every [`HookRecord`] and is the single source of truth
/// for "this operation is currently altered". It is an explicitly
/// constructed, explicitly scoped object; a host wanting process-wide
/// behavior shares one instance behind an `Arc`.
///
/// All methods take `&self` and are safe to call concurrently with each
/// other and with ongoing dispatch. Hook installs and removals serialize
/// on an internal guard; the guard is never held while wrapped user code
/// runs, so observers may re-enter the engine without deadlocking.
///
/// Keys name the *declaring* type. Suppressing an operation a child
/// inherits suppresses it for the ancestor and every other descendant,
/// because all of them share one dispatch slot.
pub struct Interceptor {
    /// The runtime model whose slots this engine rewires
    model: Arc<TypeRegistry>,
    /// Active hooks, exactly one per altered dispatch slot
    hooks: DashMap<HookKey, HookRecord>,
    /// Reverse index from receiver identity to its instance-scoped wraps
    instances: DashMap<InstanceId, Vec<HookKey>>,
    /// Destination for diagnostic records emitted by wrappers
    sink: Arc<dyn TraceSink>,
    /// Serializes hook installs and removals; never held during dispatch
    transitions: Mutex<()>,
}

impl Interceptor {
    /// Create an engine over a model, logging diagnostics through
    /// [`LogSink`]
    ///
    /// ## Arguments
    /// * `model` - The runtime model whose operations become hookable
    #[must_use]
    pub fn new(model: Arc<TypeRegistry>) -> Self {
        Self::with_sink(model, Arc::new(LogSink::new()))
    }

    /// Create an engine with a custom diagnostic sink
    ///
    /// ## Arguments
    /// * `model` - The runtime model whose operations become hookable
    /// * `sink`  - Destination for the records wrappers emit
    #[must_use]
    pub fn with_sink(model: Arc<TypeRegistry>, sink: Arc<dyn TraceSink>) -> Self {
        Interceptor {
            model,
            hooks: DashMap::new(),
            instances: DashMap::new(),
            sink,
            transitions: Mutex::new(()),
        }
    }

    /// The model this engine operates on
    #[must_use]
    pub fn model(&self) -> &Arc<TypeRegistry> {
        &self.model
    }

    /// The sink receiving diagnostic records
    #[must_use]
    pub fn sink(&self) -> Arc<dyn TraceSink> {
        self.sink.clone()
    }

    /// Suppress an operation: calls return the signature's default value
    /// and the original body does not run
    ///
    /// The stub counts the calls it absorbs; see
    /// [`call_count`](Interceptor::call_count).
    ///
    /// ## Arguments
    /// * `type_name` - The type the lookup starts from
    /// * `operation` - The operation name
    ///
    /// # Errors
    /// Returns [`Error::AlreadySuppressed`] if the slot is already
    /// suppressed, [`Error::AlreadyHooked`] if it carries another hook, or
    /// a resolution error if the target does not exist.
    pub fn suppress(&self, type_name: &str, operation: &str) -> Result<()> {
        let descriptor = OperationDescriptor::resolve(&self.model, type_name, operation)?;
        let key = descriptor.key();

        let _guard = lock!(self.transitions);
        if let Some(existing) = self.hooks.get(&key) {
            return Err(match existing.kind() {
                HookKind::Suppressed => Error::AlreadySuppressed(key.to_string()),
                _ => Error::AlreadyHooked(key.to_string()),
            });
        }

        let counter = Arc::new(AtomicU64::new(0));
        descriptor.save_original();
        descriptor.install(build_stub(descriptor.signature().returns, counter.clone()));
        self.hooks
            .insert(key.clone(), HookRecord::new(HookKind::Suppressed, counter));

        tracing::debug!(target: "interpose::intercept", key = %key, "suppressed");
        Ok(())
    }

    /// Remove the hook on an operation and reinstate pristine dispatch
    ///
    /// For an exchanged pair, restoring either side resets *both* slots
    /// and destroys both records.
    ///
    /// ## Arguments
    /// * `type_name` - The type the lookup starts from
    /// * `operation` - The operation name
    ///
    /// # Errors
    /// Returns [`Error::NotHooked`] if the slot carries no hook, or a
    /// resolution error if the target does not exist.
    pub fn restore(&self, type_name: &str, operation: &str) -> Result<()> {
        let descriptor = OperationDescriptor::resolve(&self.model, type_name, operation)?;
        let key = descriptor.key();

        let _guard = lock!(self.transitions);
        let Some((_, record)) = self.hooks.remove(&key) else {
            return Err(Error::NotHooked(key.to_string()));
        };

        descriptor.restore_original();
        match record.kind() {
            HookKind::Suppressed => {}
            HookKind::Wrapped { instance, .. } => {
                if let Some(id) = instance {
                    self.forget_instance(*id, &key);
                }
            }
            HookKind::Exchanged { partner } => {
                let partner_descriptor =
                    OperationDescriptor::resolve(&self.model, &partner.type_name, &partner.operation)?;
                // Only a mutual pairing takes the partner down with us. A
                // one-sided record is leftover from an interleaved
                // re-exchange and belongs to a different pairing now.
                if self.points_back(partner, &key) {
                    partner_descriptor.restore_original();
                    self.hooks.remove(partner);
                }
            }
        }

        tracing::debug!(target: "interpose::intercept", key = %key, kind = %record.kind(), "restored");
        Ok(())
    }

    /// Trade the bodies of two operations
    ///
    /// After the exchange, invoking the first operation runs what the
    /// second's body used to do, and vice versa. Calling `exchange` again
    /// with the same pair swaps the bodies back and removes both records:
    /// the operation is its own inverse as long as nothing re-exchanged
    /// either slot in between. Re-exchanging one side of a live pair with
    /// a third operation is permitted and rewires the records to the
    /// newest pairing; such interleaved exchanges must be unwound in
    /// reverse order.
    ///
    /// Exchanging an operation with itself does nothing.
    ///
    /// ## Arguments
    /// * `first_type`       - Type of the first operation
    /// * `first_operation`  - Name of the first operation
    /// * `second_type`      - Type of the second operation
    /// * `second_operation` - Name of the second operation
    ///
    /// # Errors
    /// Returns [`Error::IncompatibleSignature`] if the two signatures are
    /// not interchangeable, [`Error::AlreadyHooked`] if either slot is
    /// suppressed or wrapped, or a resolution error if a target does not
    /// exist.
    pub fn exchange(
        &self,
        first_type: &str,
        first_operation: &str,
        second_type: &str,
        second_operation: &str,
    ) -> Result<()> {
        let first = OperationDescriptor::resolve(&self.model, first_type, first_operation)?;
        let second = OperationDescriptor::resolve(&self.model, second_type, second_operation)?;
        if first.same_slot(&second) {
            return Ok(());
        }

        if !first.signature().interchangeable(second.signature()) {
            return Err(Error::IncompatibleSignature {
                left: first.signature().encode(),
                right: second.signature().encode(),
            });
        }

        let first_key = first.key();
        let second_key = second.key();

        let _guard = lock!(self.transitions);

        // A repeat of a live pairing is the inverse of the first call.
        if self.points_back(&first_key, &second_key) && self.points_back(&second_key, &first_key) {
            first.swap_with(&second);
            self.hooks.remove(&first_key);
            self.hooks.remove(&second_key);
            tracing::debug!(
                target: "interpose::intercept",
                first = %first_key,
                second = %second_key,
                "exchange undone"
            );
            return Ok(());
        }

        for key in [&first_key, &second_key] {
            if let Some(existing) = self.hooks.get(key) {
                if !matches!(existing.kind(), HookKind::Exchanged { .. }) {
                    return Err(Error::AlreadyHooked(key.to_string()));
                }
            }
        }

        first.save_original();
        second.save_original();
        first.swap_with(&second);

        self.hooks.insert(
            first_key.clone(),
            HookRecord::new(
                HookKind::Exchanged {
                    partner: second_key.clone(),
                },
                Arc::new(AtomicU64::new(0)),
            ),
        );
        self.hooks.insert(
            second_key.clone(),
            HookRecord::new(
                HookKind::Exchanged {
                    partner: first_key.clone(),
                },
                Arc::new(AtomicU64::new(0)),
            ),
        );

        tracing::debug!(
            target: "interpose::intercept",
            first = %first_key,
            second = %second_key,
            "exchanged"
        );
        Ok(())
    }

    /// Wrap an operation with the observers, predicate, diagnostics, and
    /// scope described by a [`WrapSpec`]
    ///
    /// The wrap is installed type-wide; an instance scope composes an
    /// identity test into the predicate so that only the chosen receiver
    /// is observed and every other receiver falls through to the original
    /// behavior unobserved.
    ///
    /// ## Arguments
    /// * `type_name` - The type the lookup starts from
    /// * `operation` - The operation name
    /// * `spec`      - The assembled wrap description
    ///
    /// # Errors
    /// Returns [`Error::AlreadyHooked`] if the slot already carries any
    /// hook (the existing hook is left untouched), or a resolution error
    /// if the target does not exist.
    pub fn install_wrap(&self, type_name: &str, operation: &str, spec: WrapSpec) -> Result<()> {
        let descriptor = OperationDescriptor::resolve(&self.model, type_name, operation)?;
        self.install_wrap_on(&descriptor, spec)
    }

    /// Install an assembled wrap on an already-resolved slot
    pub(crate) fn install_wrap_on(
        &self,
        descriptor: &OperationDescriptor,
        spec: WrapSpec,
    ) -> Result<()> {
        let key = descriptor.key();
        let WrapSpec {
            before,
            after,
            predicate,
            options,
            scope,
        } = spec;

        let _guard = lock!(self.transitions);
        if self.hooks.contains_key(&key) {
            return Err(Error::AlreadyHooked(key.to_string()));
        }

        let instance = match scope {
            WrapScope::Type => None,
            WrapScope::Instance(id) => Some(id),
        };
        let predicate = match instance {
            Some(id) => Some(gate_on_instance(id, predicate)),
            None => predicate,
        };

        let counter = Arc::new(AtomicU64::new(0));
        let wrapper = build_wrapper(WrapperParts {
            original: descriptor.save_original(),
            before,
            after,
            predicate,
            options,
            sink: self.sink.clone(),
            counter: counter.clone(),
            target: key.to_string(),
        });
        descriptor.install(wrapper);

        self.hooks.insert(
            key.clone(),
            HookRecord::new(HookKind::Wrapped { instance, options }, counter),
        );
        if let Some(id) = instance {
            self.instances.entry(id).or_default().push(key.clone());
        }

        tracing::debug!(target: "interpose::intercept", key = %key, ?scope, "wrapped");
        Ok(())
    }

    /// Whether the operation currently carries any hook
    ///
    /// Resolution failures read as `false`.
    #[must_use]
    pub fn is_hooked(&self, type_name: &str, operation: &str) -> bool {
        self.resolve_key(type_name, operation)
            .is_some_and(|key| self.hooks.contains_key(&key))
    }

    /// What kind of hook the operation currently carries, if any
    #[must_use]
    pub fn hook_kind(&self, type_name: &str, operation: &str) -> Option<HookKind> {
        let key = self.resolve_key(type_name, operation)?;
        self.hooks.get(&key).map(|record| record.kind().clone())
    }

    /// How many calls the operation's hook has absorbed or observed
    ///
    /// `None` when the operation carries no hook. Exchanged slots install
    /// no counting body and always report zero.
    #[must_use]
    pub fn call_count(&self, type_name: &str, operation: &str) -> Option<u64> {
        let key = self.resolve_key(type_name, operation)?;
        self.hooks.get(&key).map(|record| record.call_count())
    }

    /// Snapshot of every active hook
    ///
    /// The snapshot is not atomic with respect to concurrent installs and
    /// removals; entries reflect the moment each shard was visited.
    #[must_use]
    pub fn active_hooks(&self) -> Vec<(HookKey, HookKind)> {
        self.hooks
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().kind().clone()))
            .collect()
    }

    /// The keys of every instance-scoped wrap observing this receiver
    #[must_use]
    pub fn hooks_for_instance(&self, receiver: &dyn Receiver) -> Vec<HookKey> {
        self.instances
            .get(&InstanceId::of(receiver))
            .map(|keys| keys.value().clone())
            .unwrap_or_default()
    }

    /// The number of active hooks
    #[must_use]
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Resolve a name pair to its declaring-type key, swallowing errors
    fn resolve_key(&self, type_name: &str, operation: &str) -> Option<HookKey> {
        OperationDescriptor::resolve(&self.model, type_name, operation)
            .ok()
            .map(|descriptor| descriptor.key())
    }

    /// Whether `key` holds an Exchanged record naming `partner`
    fn points_back(&self, key: &HookKey, partner: &HookKey) -> bool {
        self.hooks.get(key).is_some_and(|record| {
            matches!(record.kind(), HookKind::Exchanged { partner: p } if p == partner)
        })
    }

    /// Drop `key` from a receiver's reverse-index entry
    fn forget_instance(&self, id: InstanceId, key: &HookKey) {
        let Some(mut keys) = self.instances.get_mut(&id) else {
            return;
        };
        keys.retain(|k| k != key);
        let emptied = keys.is_empty();
        drop(keys);
        if emptied {
            self.instances.remove(&id);
        }
    }
}

/// Compose a receiver-identity test in front of an optional user predicate
fn gate_on_instance(id: InstanceId, user: Option<Predicate>) -> Predicate {
    Arc::new(move |receiver| {
        InstanceId::of(receiver) == id && user.as_ref().is_none_or(|test| test(receiver))
    })
}

impl std::fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptor")
            .field("model", &self.model)
            .field("hooks", &self.hooks.len())
            .field("instances", &self.instances.len())
            .finish_non_exhaustive()
    }
}
