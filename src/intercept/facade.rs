//! Convenience entry points over [`Interceptor::install_wrap`].
//!
//! The `trace` family installs a canned enter/exit observer pair that
//! reports every call to the engine's sink, optionally combined with the
//! diagnostics selected by [`TraceOptions`]. The `instrument` family takes
//! user observers instead. Both come in type-wide, single-instance, and
//! predicate-gated flavors; every method is a thin delegation and obeys
//! the same one-hook-per-slot protocol as a direct `install_wrap`.

use crate::intercept::{Interceptor, OperationDescriptor, WrapSpec};
use crate::runtime::{InstanceId, Receiver};
use crate::trace::{TraceOptions, TraceRecord, TraceRecordKind};
use crate::Result;

impl Interceptor {
    /// Report every call to an operation to the sink
    ///
    /// Equivalent to [`trace_with_options`](Interceptor::trace_with_options)
    /// with no diagnostics: each call produces one entry and one exit
    /// record and nothing else.
    ///
    /// ## Arguments
    /// * `type_name` - The type the lookup starts from
    /// * `operation` - The operation name
    ///
    /// # Errors
    /// Returns [`crate::Error::AlreadyHooked`] if the slot already carries
    /// a hook, or a resolution error if the target does not exist.
    pub fn trace(&self, type_name: &str, operation: &str) -> Result<()> {
        self.trace_with_options(type_name, operation, TraceOptions::empty())
    }

    /// Report every call to an operation, with selected diagnostics
    ///
    /// ## Arguments
    /// * `type_name` - The type the lookup starts from
    /// * `operation` - The operation name
    /// * `options`   - Extra diagnostics to emit per call
    ///
    /// # Errors
    /// Returns [`crate::Error::AlreadyHooked`] if the slot already carries
    /// a hook, or a resolution error if the target does not exist.
    pub fn trace_with_options(
        &self,
        type_name: &str,
        operation: &str,
        options: TraceOptions,
    ) -> Result<()> {
        let descriptor = OperationDescriptor::resolve(self.model(), type_name, operation)?;
        let spec = self.trace_spec(&descriptor, options);
        self.install_wrap_on(&descriptor, spec)
    }

    /// Report calls to an operation made on one specific receiver
    ///
    /// Calls on every other receiver run the original body unobserved.
    ///
    /// ## Arguments
    /// * `type_name` - The type the lookup starts from
    /// * `operation` - The operation name
    /// * `receiver`  - The single receiver to observe
    ///
    /// # Errors
    /// Returns [`crate::Error::AlreadyHooked`] if the slot already carries
    /// a hook, or a resolution error if the target does not exist.
    pub fn trace_instance(
        &self,
        type_name: &str,
        operation: &str,
        receiver: &dyn Receiver,
    ) -> Result<()> {
        self.trace_instance_with_options(type_name, operation, receiver, TraceOptions::empty())
    }

    /// Report calls on one specific receiver, with selected diagnostics
    ///
    /// ## Arguments
    /// * `type_name` - The type the lookup starts from
    /// * `operation` - The operation name
    /// * `receiver`  - The single receiver to observe
    /// * `options`   - Extra diagnostics to emit per observed call
    ///
    /// # Errors
    /// Returns [`crate::Error::AlreadyHooked`] if the slot already carries
    /// a hook, or a resolution error if the target does not exist.
    pub fn trace_instance_with_options(
        &self,
        type_name: &str,
        operation: &str,
        receiver: &dyn Receiver,
        options: TraceOptions,
    ) -> Result<()> {
        let descriptor = OperationDescriptor::resolve(self.model(), type_name, operation)?;
        let spec = self.trace_spec(&descriptor, options).for_instance(receiver);
        self.install_wrap_on(&descriptor, spec)
    }

    /// Report calls whose receiver passes a test
    ///
    /// Calls failing the test run the original body unobserved.
    ///
    /// ## Arguments
    /// * `type_name` - The type the lookup starts from
    /// * `operation` - The operation name
    /// * `predicate` - Per-call test over the dispatching receiver
    ///
    /// # Errors
    /// Returns [`crate::Error::AlreadyHooked`] if the slot already carries
    /// a hook, or a resolution error if the target does not exist.
    pub fn trace_instances_passing<P>(
        &self,
        type_name: &str,
        operation: &str,
        predicate: P,
    ) -> Result<()>
    where
        P: Fn(&dyn Receiver) -> bool + Send + Sync + 'static,
    {
        self.trace_instances_passing_with_options(
            type_name,
            operation,
            predicate,
            TraceOptions::empty(),
        )
    }

    /// Report calls whose receiver passes a test, with selected diagnostics
    ///
    /// ## Arguments
    /// * `type_name` - The type the lookup starts from
    /// * `operation` - The operation name
    /// * `predicate` - Per-call test over the dispatching receiver
    /// * `options`   - Extra diagnostics to emit per observed call
    ///
    /// # Errors
    /// Returns [`crate::Error::AlreadyHooked`] if the slot already carries
    /// a hook, or a resolution error if the target does not exist.
    pub fn trace_instances_passing_with_options<P>(
        &self,
        type_name: &str,
        operation: &str,
        predicate: P,
        options: TraceOptions,
    ) -> Result<()>
    where
        P: Fn(&dyn Receiver) -> bool + Send + Sync + 'static,
    {
        let descriptor = OperationDescriptor::resolve(self.model(), type_name, operation)?;
        let spec = self.trace_spec(&descriptor, options).passing(predicate);
        self.install_wrap_on(&descriptor, spec)
    }

    /// Wrap an operation with user before/after observers
    ///
    /// ## Arguments
    /// * `type_name` - The type the lookup starts from
    /// * `operation` - The operation name
    /// * `before`    - Runs before the original on every call
    /// * `after`     - Runs after the original on every call
    ///
    /// # Errors
    /// Returns [`crate::Error::AlreadyHooked`] if the slot already carries
    /// a hook, or a resolution error if the target does not exist.
    pub fn instrument<B, A>(
        &self,
        type_name: &str,
        operation: &str,
        before: B,
        after: A,
    ) -> Result<()>
    where
        B: Fn(&dyn Receiver) + Send + Sync + 'static,
        A: Fn(&dyn Receiver) + Send + Sync + 'static,
    {
        self.install_wrap(
            type_name,
            operation,
            WrapSpec::new().before(before).after(after),
        )
    }

    /// Wrap an operation with user observers scoped to one receiver
    ///
    /// ## Arguments
    /// * `type_name` - The type the lookup starts from
    /// * `operation` - The operation name
    /// * `receiver`  - The single receiver to observe
    /// * `before`    - Runs before the original on observed calls
    /// * `after`     - Runs after the original on observed calls
    ///
    /// # Errors
    /// Returns [`crate::Error::AlreadyHooked`] if the slot already carries
    /// a hook, or a resolution error if the target does not exist.
    pub fn instrument_instance<B, A>(
        &self,
        type_name: &str,
        operation: &str,
        receiver: &dyn Receiver,
        before: B,
        after: A,
    ) -> Result<()>
    where
        B: Fn(&dyn Receiver) + Send + Sync + 'static,
        A: Fn(&dyn Receiver) + Send + Sync + 'static,
    {
        self.install_wrap(
            type_name,
            operation,
            WrapSpec::new()
                .before(before)
                .after(after)
                .for_instance(receiver),
        )
    }

    /// Wrap an operation with user observers gated by a receiver test
    ///
    /// ## Arguments
    /// * `type_name` - The type the lookup starts from
    /// * `operation` - The operation name
    /// * `predicate` - Per-call test over the dispatching receiver
    /// * `before`    - Runs before the original on observed calls
    /// * `after`     - Runs after the original on observed calls
    ///
    /// # Errors
    /// Returns [`crate::Error::AlreadyHooked`] if the slot already carries
    /// a hook, or a resolution error if the target does not exist.
    pub fn instrument_instances_passing<P, B, A>(
        &self,
        type_name: &str,
        operation: &str,
        predicate: P,
        before: B,
        after: A,
    ) -> Result<()>
    where
        P: Fn(&dyn Receiver) -> bool + Send + Sync + 'static,
        B: Fn(&dyn Receiver) + Send + Sync + 'static,
        A: Fn(&dyn Receiver) + Send + Sync + 'static,
    {
        self.install_wrap(
            type_name,
            operation,
            WrapSpec::new()
                .before(before)
                .after(after)
                .passing(predicate),
        )
    }

    /// Build the canned enter/exit observer pair for a resolved slot
    fn trace_spec(&self, descriptor: &OperationDescriptor, options: TraceOptions) -> WrapSpec {
        let target = descriptor.key().to_string();

        let enter_sink = self.sink();
        let enter_target = target.clone();
        let exit_sink = self.sink();

        WrapSpec::new()
            .before(move |receiver| {
                enter_sink.record(
                    TraceRecord::new(enter_target.clone(), TraceRecordKind::Enter)
                        .with_instance(InstanceId::of(receiver)),
                );
            })
            .after(move |receiver| {
                exit_sink.record(
                    TraceRecord::new(target.clone(), TraceRecordKind::Exit)
                        .with_instance(InstanceId::of(receiver)),
                );
            })
            .options(options)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::runtime::Value;
    use crate::test::{counter_model, Counter};
    use crate::trace::{MemorySink, TraceOptions, TraceRecordKind};
    use crate::Interceptor;

    #[test]
    fn test_trace_reports_every_call() {
        let model = counter_model();
        let sink = Arc::new(MemorySink::new());
        let engine = Interceptor::with_sink(model.clone(), sink.clone());
        let counter = Counter::new();

        engine.trace("Counter", "increment").unwrap();
        assert_eq!(
            model.invoke(&counter, "increment", &[]).unwrap(),
            Value::Int(1)
        );
        assert_eq!(
            model.invoke(&counter, "increment", &[]).unwrap(),
            Value::Int(2)
        );

        let kinds: Vec<_> = sink.iter().map(|r| r.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TraceRecordKind::Enter,
                TraceRecordKind::Exit,
                TraceRecordKind::Enter,
                TraceRecordKind::Exit,
            ]
        );
        assert!(sink.iter().all(|r| r.target == "Counter::increment"));
    }

    #[test]
    fn test_trace_with_options_appends_diagnostics() {
        let model = counter_model();
        let sink = Arc::new(MemorySink::new());
        let engine = Interceptor::with_sink(model.clone(), sink.clone());
        let counter = Counter::new();

        engine
            .trace_with_options("Counter", "increment", TraceOptions::EXECUTION_TIME)
            .unwrap();
        model.invoke(&counter, "increment", &[]).unwrap();

        let kinds: Vec<_> = sink.iter().map(|r| r.kind.clone()).collect();
        assert_eq!(kinds.len(), 3);
        assert_eq!(kinds[0], TraceRecordKind::Enter);
        assert_eq!(kinds[1], TraceRecordKind::Exit);
        assert!(matches!(kinds[2], TraceRecordKind::Elapsed(_)));
    }

    #[test]
    fn test_trace_instance_ignores_other_receivers() {
        let model = counter_model();
        let sink = Arc::new(MemorySink::new());
        let engine = Interceptor::with_sink(model.clone(), sink.clone());
        let chosen = Counter::new();
        let other = Counter::new();

        engine
            .trace_instance("Counter", "increment", &chosen)
            .unwrap();

        model.invoke(&other, "increment", &[]).unwrap();
        assert!(!sink.has_any());

        model.invoke(&chosen, "increment", &[]).unwrap();
        assert_eq!(sink.count(), 2);

        // Both receivers kept their real behavior.
        assert_eq!(chosen.hits(), 1);
        assert_eq!(other.hits(), 1);
    }

    #[test]
    fn test_instrument_runs_user_observers() {
        let model = counter_model();
        let engine = Interceptor::new(model.clone());
        let counter = Counter::new();

        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let before_log = log.clone();
        let after_log = log.clone();
        engine
            .instrument(
                "Counter",
                "increment",
                move |_| before_log.lock().unwrap().push("enter"),
                move |_| after_log.lock().unwrap().push("exit"),
            )
            .unwrap();

        assert_eq!(
            model.invoke(&counter, "increment", &[]).unwrap(),
            Value::Int(1)
        );
        assert_eq!(*log.lock().unwrap(), vec!["enter", "exit"]);
    }

    #[test]
    fn test_trace_instances_passing_gates_observation() {
        let model = counter_model();
        let sink = Arc::new(MemorySink::new());
        let engine = Interceptor::with_sink(model.clone(), sink.clone());
        let counter = Counter::new();

        engine
            .trace_instances_passing("Counter", "increment", |receiver| {
                receiver.dump().contains("hits=2")
            })
            .unwrap();

        // First call: dump says hits=0, rejected. Second: hits=1, rejected.
        model.invoke(&counter, "increment", &[]).unwrap();
        model.invoke(&counter, "increment", &[]).unwrap();
        assert!(!sink.has_any());

        // Third call: dump says hits=2, observed.
        model.invoke(&counter, "increment", &[]).unwrap();
        assert_eq!(sink.count(), 2);
        assert_eq!(counter.hits(), 3);
    }
}
