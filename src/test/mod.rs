//! Shared fixtures for unit tests.
//!
//! Receivers and prebuilt models used across the crate's `#[cfg(test)]`
//! modules. Integration tests under `tests/` assemble their own models
//! through the public API instead.

use std::any::Any;
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use crate::runtime::{Receiver, Signature, TypeBuilder, TypeRegistry, Value, ValueKind};

/// A receiver carrying nothing but a type name, for tests that only
/// exercise routing
pub struct NullReceiver {
    name: String,
}

impl NullReceiver {
    pub fn new(name: &str) -> Self {
        NullReceiver {
            name: name.to_string(),
        }
    }
}

impl Receiver for NullReceiver {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A receiver with observable state, for asserting whether a body
/// actually ran
#[derive(Default)]
pub struct Counter {
    hits: AtomicI64,
}

impl Counter {
    pub fn new() -> Self {
        Counter::default()
    }

    pub fn hits(&self) -> i64 {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Receiver for Counter {
    fn type_name(&self) -> &str {
        "Counter"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dump(&self) -> String {
        format!("<Counter hits={}>", self.hits())
    }
}

// Helper function to build a model holding the stateful Counter type
pub fn counter_model() -> Arc<TypeRegistry> {
    let registry = Arc::new(TypeRegistry::new());
    TypeBuilder::new(registry.clone(), "Counter")
        .operation(
            "increment",
            Signature::returning(ValueKind::Int),
            |receiver, _| match receiver.as_any().downcast_ref::<Counter>() {
                Some(counter) => Value::Int(counter.hits.fetch_add(1, Ordering::SeqCst) + 1),
                None => Value::Int(0),
            },
        )
        .register()
        .unwrap();
    registry
}

// Helper function to build a model with an ancestry chain and a pair of
// exchange-compatible operations on unrelated types
pub fn sample_model() -> Arc<TypeRegistry> {
    let registry = Arc::new(TypeRegistry::new());

    TypeBuilder::new(registry.clone(), "Base")
        .operation("describe", Signature::returning(ValueKind::Str), |_, _| {
            Value::Str("base".to_string())
        })
        .register()
        .unwrap();

    TypeBuilder::new(registry.clone(), "Logger")
        .parent("Base")
        .operation("flush", Signature::returning(ValueKind::Int), |_, _| {
            Value::Int(1)
        })
        .operation(
            "write",
            Signature::new(vec![ValueKind::Str], ValueKind::Int),
            |_, args| {
                let written = args.first().and_then(Value::as_str).map_or(0, str::len);
                Value::Int(written as i64)
            },
        )
        .register()
        .unwrap();

    TypeBuilder::new(registry.clone(), "Mirror")
        .operation("flush", Signature::returning(ValueKind::Int), |_, _| {
            Value::Int(2)
        })
        .operation(
            "shout",
            Signature::new(vec![ValueKind::Int], ValueKind::Str),
            |_, args| {
                let loudness = args.first().and_then(Value::as_i64).unwrap_or(0);
                Value::Str(format!("mirror says {loudness}"))
            },
        )
        .register()
        .unwrap();

    registry
}
