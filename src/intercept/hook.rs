use std::fmt;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::runtime::{InstanceId, Receiver};
use crate::trace::TraceOptions;

/// Shared handle to a before/after observer.
///
/// Observers receive the dispatching receiver and nothing else; arguments
/// and results stay private to the original call. They run synchronously
/// on the dispatching thread and must not re-enter the hooked operation.
pub type Observer = Arc<dyn Fn(&dyn Receiver) + Send + Sync>;

/// Shared handle to a receiver predicate.
///
/// Predicates decide per call whether a wrap's observation logic applies.
/// A failing predicate routes the call straight to the original body with
/// no observation of any kind.
pub type Predicate = Arc<dyn Fn(&dyn Receiver) -> bool + Send + Sync>;

/// Identity of one hookable dispatch slot.
///
/// Keys name the *declaring* type: hooking an operation a child inherits
/// resolves to the ancestor that owns the slot, so the key for
/// `Child::flush` declared on `Base` is `Base::flush`. One key holds at
/// most one active hook at a time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HookKey {
    /// The declaring type's registered name
    pub type_name: String,
    /// The operation name
    pub operation: String,
}

impl HookKey {
    /// Create a key from its parts
    ///
    /// ## Arguments
    /// * `type_name` - The declaring type's name
    /// * `operation` - The operation name
    pub fn new(type_name: impl Into<String>, operation: impl Into<String>) -> Self {
        HookKey {
            type_name: type_name.into(),
            operation: operation.into(),
        }
    }
}

impl fmt::Display for HookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.type_name, self.operation)
    }
}

/// The transformation an active hook applies to its dispatch slot.
#[derive(Debug, Clone, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum HookKind {
    /// The slot holds a stub returning the signature's default value
    Suppressed,
    /// The slot traded bodies with another slot
    Exchanged {
        /// The key whose body this slot now runs
        partner: HookKey,
    },
    /// The slot holds a wrapper around the original body
    Wrapped {
        /// The single receiver the wrap observes, when instance-scoped
        instance: Option<InstanceId>,
        /// The diagnostics the wrapper emits per observed call
        options: TraceOptions,
    },
}

/// One active transformation on one dispatch slot.
///
/// Records are owned exclusively by the [`Interceptor`](crate::Interceptor);
/// their existence is the single source of truth for "this operation is
/// currently altered". Suppression stubs and wrappers share the record's
/// call counter, so [`HookRecord::call_count`] reports how many calls the
/// hook absorbed or observed. Exchanges install no counting body and stay
/// at zero.
#[derive(Debug)]
pub struct HookRecord {
    kind: HookKind,
    calls: Arc<AtomicU64>,
}

impl HookRecord {
    /// Create a record with its shared call counter
    pub(crate) fn new(kind: HookKind, calls: Arc<AtomicU64>) -> Self {
        HookRecord { kind, calls }
    }

    /// What this hook does to its slot
    #[must_use]
    pub fn kind(&self) -> &HookKind {
        &self.kind
    }

    /// Calls absorbed by the stub or observed by the wrapper so far
    #[must_use]
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

/// Which receivers a wrap observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapScope {
    /// Every receiver dispatching through the hooked slot
    #[default]
    Type,
    /// Exactly one live receiver; everything else falls through unobserved
    Instance(InstanceId),
}

/// Everything a wrap installation carries: observers, predicate,
/// diagnostics, and scope.
///
/// Specs are assembled in builder style and consumed by
/// [`Interceptor::install_wrap`](crate::Interceptor::install_wrap). Every
/// part is optional; the empty spec is a plain pass-through wrap, useful
/// as a cheap call counter.
///
/// # Examples
///
/// ```rust
/// use interpose::intercept::WrapSpec;
/// use interpose::trace::TraceOptions;
///
/// let spec = WrapSpec::new()
///     .before(|_| println!("entering"))
///     .after(|_| println!("left"))
///     .passing(|receiver| receiver.type_name() == "Logger")
///     .options(TraceOptions::EXECUTION_TIME);
/// ```
#[derive(Clone)]
pub struct WrapSpec {
    pub(crate) before: Option<Observer>,
    pub(crate) after: Option<Observer>,
    pub(crate) predicate: Option<Predicate>,
    pub(crate) options: TraceOptions,
    pub(crate) scope: WrapScope,
}

impl Default for WrapSpec {
    fn default() -> Self {
        WrapSpec {
            before: None,
            after: None,
            predicate: None,
            options: TraceOptions::empty(),
            scope: WrapScope::Type,
        }
    }
}

impl WrapSpec {
    /// Create an empty spec: no observers, no predicate, no diagnostics,
    /// type-wide scope
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run an observer before every observed call
    #[must_use]
    pub fn before<F>(mut self, observer: F) -> Self
    where
        F: Fn(&dyn Receiver) + Send + Sync + 'static,
    {
        self.before = Some(Arc::new(observer));
        self
    }

    /// Run an observer after every observed call
    #[must_use]
    pub fn after<F>(mut self, observer: F) -> Self
    where
        F: Fn(&dyn Receiver) + Send + Sync + 'static,
    {
        self.after = Some(Arc::new(observer));
        self
    }

    /// Observe only calls whose receiver passes the test
    ///
    /// Calls that fail the test run the original body directly, with no
    /// observers, no diagnostics, and no counting.
    #[must_use]
    pub fn passing<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&dyn Receiver) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Select the diagnostics emitted per observed call
    #[must_use]
    pub fn options(mut self, options: TraceOptions) -> Self {
        self.options = options;
        self
    }

    /// Select which receivers the wrap observes
    #[must_use]
    pub fn scope(mut self, scope: WrapScope) -> Self {
        self.scope = scope;
        self
    }

    /// Observe exactly this live receiver
    ///
    /// The receiver's identity is its address, so the wrap only matches
    /// while the receiver stays at its current location.
    #[must_use]
    pub fn for_instance(mut self, receiver: &dyn Receiver) -> Self {
        self.scope = WrapScope::Instance(InstanceId::of(receiver));
        self
    }
}

impl fmt::Debug for WrapSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapSpec")
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .field("predicate", &self.predicate.is_some())
            .field("options", &self.options)
            .field("scope", &self.scope)
            .finish()
    }
}
