//! Benchmarks for dispatch overhead under interception.
//!
//! Measures a single operation call in each slot state:
//! - Pristine dispatch with no hook installed
//! - Suppressed dispatch absorbed by the default-value stub
//! - Wrapped dispatch through an empty pass-through spec
//! - Wrapped dispatch rejected by an instance predicate
//! - Traced dispatch emitting entry/exit records

extern crate interpose;

use std::any::Any;
use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use interpose::prelude::*;

struct Probe;

impl Receiver for Probe {
    fn type_name(&self) -> &str {
        "Probe"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn probe_model() -> Arc<TypeRegistry> {
    let registry = Arc::new(TypeRegistry::new());
    TypeBuilder::new(registry.clone(), "Probe")
        .operation("ping", Signature::returning(ValueKind::Int), |_, _| {
            Value::Int(42)
        })
        .register()
        .unwrap();
    registry
}

/// Benchmark a call through an untouched dispatch slot.
fn bench_dispatch_pristine(c: &mut Criterion) {
    let model = probe_model();
    let probe = Probe;

    c.bench_function("dispatch_pristine", |b| {
        b.iter(|| black_box(model.invoke(black_box(&probe), "ping", &[]).unwrap()));
    });
}

/// Benchmark a call absorbed by a suppression stub.
fn bench_dispatch_suppressed(c: &mut Criterion) {
    let model = probe_model();
    let engine = Interceptor::new(model.clone());
    engine.suppress("Probe", "ping").unwrap();
    let probe = Probe;

    c.bench_function("dispatch_suppressed", |b| {
        b.iter(|| black_box(model.invoke(black_box(&probe), "ping", &[]).unwrap()));
    });
}

/// Benchmark a call through an empty pass-through wrapper.
fn bench_dispatch_wrapped_passthrough(c: &mut Criterion) {
    let model = probe_model();
    let engine = Interceptor::new(model.clone());
    engine.install_wrap("Probe", "ping", WrapSpec::new()).unwrap();
    let probe = Probe;

    c.bench_function("dispatch_wrapped_passthrough", |b| {
        b.iter(|| black_box(model.invoke(black_box(&probe), "ping", &[]).unwrap()));
    });
}

/// Benchmark a call that an instance-scoped predicate rejects, taking the
/// early path straight to the original body.
fn bench_dispatch_predicate_rejected(c: &mut Criterion) {
    let model = probe_model();
    let engine = Interceptor::new(model.clone());
    let watched = Probe;
    engine
        .instrument_instance("Probe", "ping", &watched, |_| {}, |_| {})
        .unwrap();
    let other = Probe;

    c.bench_function("dispatch_predicate_rejected", |b| {
        b.iter(|| black_box(model.invoke(black_box(&other), "ping", &[]).unwrap()));
    });
}

/// Benchmark a traced call emitting entry and exit records into the
/// default log sink.
fn bench_dispatch_traced(c: &mut Criterion) {
    let model = probe_model();
    let engine = Interceptor::new(model.clone());
    engine.trace("Probe", "ping").unwrap();
    let probe = Probe;

    c.bench_function("dispatch_traced", |b| {
        b.iter(|| black_box(model.invoke(black_box(&probe), "ping", &[]).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_dispatch_pristine,
    bench_dispatch_suppressed,
    bench_dispatch_wrapped_passthrough,
    bench_dispatch_predicate_rejected,
    bench_dispatch_traced
);
criterion_main!(benches);
