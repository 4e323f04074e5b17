//! # Suppressing and Exchanging Operations at Runtime
//!
//! **What this example teaches:**
//! - Silencing a noisy operation with [`Interceptor::suppress`]
//! - Swapping two implementations with [`Interceptor::exchange`]
//! - Counting absorbed calls through hook records
//! - Inspecting live hooks with [`Interceptor::active_hooks`]
//! - Unwinding every change with [`Interceptor::restore`]
//!
//! **When to use this pattern:**
//! - Muting a side-effecting operation during an experiment
//! - A/B-switching two compatible implementations on a live system
//! - Verifying how often a code path is actually reached

use std::any::Any;
use std::sync::Arc;

use interpose::prelude::*;

struct Named(&'static str);

impl Receiver for Named {
    fn type_name(&self) -> &str {
        self.0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn main() -> Result<()> {
    // === Build a model with two render strategies ===
    let model = Arc::new(TypeRegistry::new());
    TypeBuilder::new(model.clone(), "Stable")
        .operation("render", Signature::returning(ValueKind::Str), |_, _| {
            Value::Str("stable output".to_string())
        })
        .operation("log", Signature::returning(ValueKind::Unit), |_, _| {
            println!("    [body] Stable::log wrote a line");
            Value::Unit
        })
        .register()?;
    TypeBuilder::new(model.clone(), "Experimental")
        .operation("render", Signature::returning(ValueKind::Str), |_, _| {
            Value::Str("experimental output".to_string())
        })
        .register()?;

    let engine = Interceptor::new(model.clone());
    let stable = Named("Stable");
    let experimental = Named("Experimental");

    // === Mute the log while we experiment ===
    println!("🔇 Suppressing Stable::log");
    engine.suppress("Stable", "log")?;
    for _ in 0..3 {
        model.invoke(&stable, "log", &[])?;
    }
    println!(
        "  3 calls made, {} absorbed by the stub",
        engine.call_count("Stable", "log").unwrap_or(0)
    );

    // === Swap the render strategies ===
    println!("\n🔁 Exchanging Stable::render with Experimental::render");
    engine.exchange("Stable", "render", "Experimental", "render")?;
    println!(
        "  Stable::render now says: {:?}",
        model.invoke(&stable, "render", &[])?.as_str().unwrap_or("")
    );
    println!(
        "  Experimental::render now says: {:?}",
        model
            .invoke(&experimental, "render", &[])?
            .as_str()
            .unwrap_or("")
    );

    // === Inspect what is installed ===
    println!("\n📋 Active hooks:");
    for (key, kind) in engine.active_hooks() {
        println!("    {key} -> {kind}");
    }

    // === Unwind everything ===
    engine.exchange("Stable", "render", "Experimental", "render")?;
    engine.restore("Stable", "log")?;
    model.invoke(&stable, "log", &[])?;
    println!(
        "\n✅ All hooks removed ({} remain); Stable::render says {:?} again",
        engine.hook_count(),
        model.invoke(&stable, "render", &[])?.as_str().unwrap_or("")
    );

    Ok(())
}
