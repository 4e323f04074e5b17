//! # Tracing a Live Object Model
//!
//! **What this example teaches:**
//! - Registering types and operations with [`TypeBuilder`]
//! - Attaching entry/exit tracing to an operation
//! - Selecting extra context with [`TraceOptions`]
//! - Scoping a trace to one receiver instance
//! - Collecting and inspecting records with [`MemorySink`]
//!
//! **When to use this pattern:**
//! - Watching what a subsystem actually calls at runtime
//! - Narrowing an investigation to a single suspect object
//! - Capturing timing for a hot operation without touching its code

use std::any::Any;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use interpose::prelude::*;

/// A worker whose operations we want to watch.
struct Session {
    name: &'static str,
    requests: AtomicI64,
}

impl Session {
    fn new(name: &'static str) -> Self {
        Session {
            name,
            requests: AtomicI64::new(0),
        }
    }
}

impl Receiver for Session {
    fn type_name(&self) -> &str {
        "Session"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dump(&self) -> String {
        format!(
            "<Session {} requests={}>",
            self.name,
            self.requests.load(Ordering::SeqCst)
        )
    }
}

fn main() -> Result<()> {
    // === Build the runtime model ===
    let model = Arc::new(TypeRegistry::new());
    TypeBuilder::new(model.clone(), "Session")
        .operation(
            "handle",
            Signature::new(vec![ValueKind::Str], ValueKind::Int),
            |receiver, args| {
                let session = receiver.as_any().downcast_ref::<Session>().unwrap();
                let request = args.first().and_then(Value::as_str).unwrap_or("");
                println!("    [body] {} handling {:?}", session.name, request);
                Value::Int(session.requests.fetch_add(1, Ordering::SeqCst) + 1)
            },
        )
        .register()?;

    let sink = Arc::new(MemorySink::new());
    let engine = Interceptor::with_sink(model.clone(), sink.clone());

    let alpha = Session::new("alpha");
    let beta = Session::new("beta");

    // === Trace every call to Session::handle ===
    println!("🔎 Tracing Session::handle with timing");
    engine.trace_with_options("Session", "handle", TraceOptions::EXECUTION_TIME)?;

    model.invoke(&alpha, "handle", &[Value::Str("GET /".to_string())])?;
    model.invoke(&beta, "handle", &[Value::Str("GET /health".to_string())])?;

    println!("  {} records collected:", sink.count());
    for record in sink.iter() {
        println!("    {record}");
    }

    engine.restore("Session", "handle")?;

    // === Narrow the trace to one instance ===
    println!("\n🎯 Tracing only the alpha session, with receiver dumps");
    engine.trace_instance_with_options(
        "Session",
        "handle",
        &alpha,
        TraceOptions::DUMP_RECEIVER,
    )?;

    model.invoke(&alpha, "handle", &[Value::Str("POST /jobs".to_string())])?;
    model.invoke(&beta, "handle", &[Value::Str("POST /jobs".to_string())])?;

    let new_records = sink.by_target("Session::handle").len() - 6;
    println!("  beta stayed invisible; {new_records} new records for alpha:");
    for record in sink.iter().skip(6) {
        println!("    {record}");
    }
    println!(
        "  alpha was observed {} time(s)",
        engine.call_count("Session", "handle").unwrap_or(0)
    );

    engine.restore("Session", "handle")?;
    println!("\n✅ Model restored, no hooks remain: {}", engine.hook_count());

    Ok(())
}
