//! Integration tests for wrapping operations with observers.
//!
//! Wrappers leave the original body in place and surround it with user
//! callbacks. These tests pin down the observation order, predicate and
//! instance gating, call counting, slot exclusivity, and the guarantee
//! that results and side effects pass through unchanged.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use interpose::prelude::*;

struct Gauge {
    reading: AtomicI64,
}

impl Gauge {
    fn new() -> Self {
        Gauge {
            reading: AtomicI64::new(0),
        }
    }

    fn reading(&self) -> i64 {
        self.reading.load(Ordering::SeqCst)
    }
}

impl Receiver for Gauge {
    fn type_name(&self) -> &str {
        "Gauge"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dump(&self) -> String {
        format!("<Gauge reading={}>", self.reading())
    }
}

/// Builds a model whose `bump` body appends to `events` so tests can
/// interleave body execution with observer callbacks.
fn gauge_model(events: Arc<Mutex<Vec<&'static str>>>) -> Result<Arc<TypeRegistry>> {
    let registry = Arc::new(TypeRegistry::new());
    TypeBuilder::new(registry.clone(), "Gauge")
        .operation("bump", Signature::returning(ValueKind::Int), move |receiver, _| {
            let gauge = receiver.as_any().downcast_ref::<Gauge>().unwrap();
            events.lock().unwrap().push("body");
            Value::Int(gauge.reading.fetch_add(1, Ordering::SeqCst) + 1)
        })
        .operation("read", Signature::returning(ValueKind::Int), |receiver, _| {
            let gauge = receiver.as_any().downcast_ref::<Gauge>().unwrap();
            Value::Int(gauge.reading())
        })
        .register()?;
    Ok(registry)
}

fn push(
    events: &Arc<Mutex<Vec<&'static str>>>,
    label: &'static str,
) -> impl Fn(&dyn Receiver) + Send + Sync + 'static {
    let events = events.clone();
    move |_| events.lock().unwrap().push(label)
}

/// Test that a wrapped operation still runs the original body and returns
/// its result unchanged.
#[test]
fn test_wrap_preserves_results_and_side_effects() -> Result<()> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let model = gauge_model(events.clone())?;
    let engine = Interceptor::new(model.clone());
    let gauge = Gauge::new();

    engine.instrument("Gauge", "bump", |_| {}, |_| {})?;

    assert_eq!(model.invoke(&gauge, "bump", &[])?, Value::Int(1));
    assert_eq!(model.invoke(&gauge, "bump", &[])?, Value::Int(2));
    assert_eq!(gauge.reading(), 2);

    Ok(())
}

/// Test that observers run in before, body, after order on every call.
#[test]
fn test_observer_ordering_around_body() -> Result<()> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let model = gauge_model(events.clone())?;
    let engine = Interceptor::new(model.clone());
    let gauge = Gauge::new();

    engine.instrument(
        "Gauge",
        "bump",
        push(&events, "before"),
        push(&events, "after"),
    )?;

    model.invoke(&gauge, "bump", &[])?;
    model.invoke(&gauge, "bump", &[])?;

    assert_eq!(
        *events.lock().unwrap(),
        vec!["before", "body", "after", "before", "body", "after"]
    );

    Ok(())
}

/// Test that a rejecting predicate routes the call straight to the
/// original body with no observation and no counting.
#[test]
fn test_predicate_gates_observation() -> Result<()> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let model = gauge_model(events.clone())?;
    let engine = Interceptor::new(model.clone());
    let gauge = Gauge::new();

    // Observe only once the reading has passed 1.
    engine.instrument_instances_passing(
        "Gauge",
        "bump",
        |receiver| {
            receiver
                .as_any()
                .downcast_ref::<Gauge>()
                .is_some_and(|gauge| gauge.reading() > 1)
        },
        push(&events, "before"),
        push(&events, "after"),
    )?;

    model.invoke(&gauge, "bump", &[])?;
    model.invoke(&gauge, "bump", &[])?;
    model.invoke(&gauge, "bump", &[])?;

    // Rejected calls still ran the body; only the third was observed.
    assert_eq!(gauge.reading(), 3);
    assert_eq!(
        *events.lock().unwrap(),
        vec!["body", "body", "before", "body", "after"]
    );
    assert_eq!(engine.call_count("Gauge", "bump"), Some(1));

    Ok(())
}

/// Test that an instance-scoped wrapper fires for its chosen receiver only.
#[test]
fn test_instance_scope_observes_only_chosen_receiver() -> Result<()> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let model = gauge_model(events.clone())?;
    let engine = Interceptor::new(model.clone());
    let watched = Gauge::new();
    let other = Gauge::new();

    engine.instrument_instance(
        "Gauge",
        "bump",
        &watched,
        push(&events, "before"),
        push(&events, "after"),
    )?;

    model.invoke(&other, "bump", &[])?;
    model.invoke(&watched, "bump", &[])?;
    model.invoke(&other, "bump", &[])?;

    assert_eq!(
        *events.lock().unwrap(),
        vec!["body", "before", "body", "after", "body"]
    );
    assert_eq!(engine.call_count("Gauge", "bump"), Some(1));

    // The reverse index knows which hooks watch this receiver.
    assert_eq!(
        engine.hooks_for_instance(&watched),
        vec![HookKey::new("Gauge", "bump")]
    );
    assert!(engine.hooks_for_instance(&other).is_empty());

    engine.restore("Gauge", "bump")?;
    assert!(engine.hooks_for_instance(&watched).is_empty());

    Ok(())
}

/// Test that installing over an occupied slot is rejected and the
/// existing wrapper keeps working.
#[test]
fn test_double_install_rejected_and_existing_intact() -> Result<()> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let model = gauge_model(events.clone())?;
    let engine = Interceptor::new(model.clone());
    let gauge = Gauge::new();

    engine.instrument(
        "Gauge",
        "bump",
        push(&events, "before"),
        push(&events, "after"),
    )?;

    let second = engine.instrument("Gauge", "bump", |_| {}, |_| {});
    assert!(matches!(
        second,
        Err(Error::AlreadyHooked(target)) if target == "Gauge::bump"
    ));
    assert!(matches!(
        engine.suppress("Gauge", "bump"),
        Err(Error::AlreadyHooked(target)) if target == "Gauge::bump"
    ));

    model.invoke(&gauge, "bump", &[])?;
    assert_eq!(*events.lock().unwrap(), vec!["before", "body", "after"]);

    Ok(())
}

/// Test that the hook record reports the wrapped kind, its scope, and its
/// trace options.
#[test]
fn test_wrapped_kind_introspection() -> Result<()> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let engine = Interceptor::new(gauge_model(events)?);

    engine.install_wrap(
        "Gauge",
        "bump",
        WrapSpec::new().options(TraceOptions::EXECUTION_TIME),
    )?;

    assert_eq!(
        engine.hook_kind("Gauge", "bump"),
        Some(HookKind::Wrapped {
            instance: None,
            options: TraceOptions::EXECUTION_TIME,
        })
    );
    let hooks = engine.active_hooks();
    assert_eq!(hooks.len(), 1);
    assert_eq!(hooks[0].0, HookKey::new("Gauge", "bump"));

    Ok(())
}

/// Test that restoring a wrapper stops all observation and counting.
#[test]
fn test_restore_removes_wrapper() -> Result<()> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let model = gauge_model(events.clone())?;
    let engine = Interceptor::new(model.clone());
    let gauge = Gauge::new();

    engine.instrument(
        "Gauge",
        "bump",
        push(&events, "before"),
        push(&events, "after"),
    )?;
    model.invoke(&gauge, "bump", &[])?;
    engine.restore("Gauge", "bump")?;
    model.invoke(&gauge, "bump", &[])?;

    assert_eq!(
        *events.lock().unwrap(),
        vec!["before", "body", "after", "body"]
    );
    assert_eq!(engine.call_count("Gauge", "bump"), None);
    assert_eq!(gauge.reading(), 2);

    Ok(())
}

/// Test that a panic in a before observer propagates to the caller and
/// the original body does not run.
#[test]
fn test_before_observer_panic_skips_body() -> Result<()> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let model = gauge_model(events.clone())?;
    let engine = Interceptor::new(model.clone());
    let gauge = Gauge::new();

    engine.instrument(
        "Gauge",
        "bump",
        |_| panic!("observer failure"),
        |_| {},
    )?;

    let outcome = catch_unwind(AssertUnwindSafe(|| model.invoke(&gauge, "bump", &[])));
    assert!(outcome.is_err());
    assert_eq!(gauge.reading(), 0);
    assert!(events.lock().unwrap().is_empty());

    Ok(())
}

/// Test that a panic in an after observer propagates while the body's
/// side effects stand.
#[test]
fn test_after_observer_panic_keeps_side_effects() -> Result<()> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let model = gauge_model(events.clone())?;
    let engine = Interceptor::new(model.clone());
    let gauge = Gauge::new();

    engine.instrument("Gauge", "bump", |_| {}, |_| panic!("observer failure"))?;

    let outcome = catch_unwind(AssertUnwindSafe(|| model.invoke(&gauge, "bump", &[])));
    assert!(outcome.is_err());
    assert_eq!(gauge.reading(), 1);
    assert_eq!(*events.lock().unwrap(), vec!["body"]);

    Ok(())
}

/// Test that an empty spec acts as a pure call counter.
#[test]
fn test_empty_spec_counts_calls() -> Result<()> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let model = gauge_model(events)?;
    let engine = Interceptor::new(model.clone());
    let gauge = Gauge::new();

    engine.install_wrap("Gauge", "bump", WrapSpec::new())?;

    for expected in 1..=5 {
        assert_eq!(
            model.invoke(&gauge, "bump", &[])?,
            Value::Int(expected)
        );
    }
    assert_eq!(engine.call_count("Gauge", "bump"), Some(5));

    Ok(())
}
