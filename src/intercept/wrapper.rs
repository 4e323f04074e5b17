use std::backtrace::Backtrace;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Instant;

use crate::intercept::{Observer, Predicate};
use crate::runtime::{Callable, InstanceId, ValueKind};
use crate::trace::{TraceOptions, TraceRecord, TraceRecordKind, TraceSink};

/// Everything [`build_wrapper`] folds into one replacement body.
pub(crate) struct WrapperParts {
    /// The pristine body the wrapper delegates to
    pub(crate) original: Callable,
    /// Observer invoked before the original on observed calls
    pub(crate) before: Option<Observer>,
    /// Observer invoked after the original on observed calls
    pub(crate) after: Option<Observer>,
    /// Gate deciding per call whether observation applies
    pub(crate) predicate: Option<Predicate>,
    /// Diagnostics emitted per observed call
    pub(crate) options: TraceOptions,
    /// Destination for diagnostic records
    pub(crate) sink: Arc<dyn TraceSink>,
    /// Observed-call counter shared with the hook record
    pub(crate) counter: Arc<AtomicU64>,
    /// Label stamped on every emitted record
    pub(crate) target: String,
}

/// Fold observers, predicate, and diagnostics around an original body.
///
/// Per observed call: predicate, counter, timing start, before, original,
/// after, stack record, receiver dump record, elapsed record. Calls the
/// predicate rejects run the original directly with none of the rest.
/// The original's result is returned unchanged either way. Observer and
/// predicate panics are not caught; a panic before the original means the
/// original never ran, a panic after it leaves its side effects standing.
pub(crate) fn build_wrapper(parts: WrapperParts) -> Callable {
    let WrapperParts {
        original,
        before,
        after,
        predicate,
        options,
        sink,
        counter,
        target,
    } = parts;

    Arc::new(move |receiver, args| {
        if let Some(predicate) = &predicate {
            if !predicate(receiver) {
                return original(receiver, args);
            }
        }
        counter.fetch_add(1, Ordering::Relaxed);

        let started = options
            .contains(TraceOptions::EXECUTION_TIME)
            .then(Instant::now);

        if let Some(before) = &before {
            before(receiver);
        }
        let result = original(receiver, args);
        if let Some(after) = &after {
            after(receiver);
        }

        let instance = InstanceId::of(receiver);
        if options.contains(TraceOptions::STACK_TRACE) {
            let captured = Backtrace::force_capture().to_string();
            sink.record(
                TraceRecord::new(target.clone(), TraceRecordKind::Stack(captured))
                    .with_instance(instance),
            );
        }
        if options.contains(TraceOptions::DUMP_RECEIVER) {
            sink.record(
                TraceRecord::new(target.clone(), TraceRecordKind::Receiver(receiver.dump()))
                    .with_instance(instance),
            );
        }
        if let Some(started) = started {
            sink.record(
                TraceRecord::new(target.clone(), TraceRecordKind::Elapsed(started.elapsed()))
                    .with_instance(instance),
            );
        }

        result
    })
}

/// Produce a suppression stub: counts the calls it absorbs and returns
/// the declared return kind's default value.
pub(crate) fn build_stub(returns: ValueKind, counter: Arc<AtomicU64>) -> Callable {
    Arc::new(move |_, _| {
        counter.fetch_add(1, Ordering::Relaxed);
        returns.default_value()
    })
}
