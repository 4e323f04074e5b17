use thiserror::Error;

macro_rules! signature_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvalidSignature {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidSignature {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers all possible error conditions that can occur during runtime model
/// construction, dispatch, and interception. Each variant provides specific context about
/// the failure mode to enable appropriate error handling.
///
/// # Error Categories
///
/// ## Model Errors
/// - [`Error::TypeNotFound`] - Requested type not registered in the model
/// - [`Error::OperationNotFound`] - Operation missing from a type and its ancestry
/// - [`Error::DuplicateType`] - Type name registered twice
/// - [`Error::DuplicateOperation`] - Operation name declared twice on one type
///
/// ## Interception Errors
/// - [`Error::AlreadySuppressed`] - Suppressing a target that is already suppressed
/// - [`Error::AlreadyHooked`] - Installing over a target that already carries a hook
/// - [`Error::NotHooked`] - Restoring a target that carries no hook
/// - [`Error::IncompatibleSignature`] - Exchanging implementations across signature shapes
///
/// ## Signature Errors
/// - [`Error::InvalidSignature`] - Signature text could not be parsed
///
/// # Examples
///
/// ```rust
/// use interpose::{Error, Interceptor, TypeRegistry};
/// use std::sync::Arc;
///
/// let engine = Interceptor::new(Arc::new(TypeRegistry::new()));
///
/// match engine.suppress("Logger", "flush") {
///     Ok(()) => println!("Suppressed"),
///     Err(Error::TypeNotFound(name)) => eprintln!("Unknown type: {}", name),
///     Err(Error::AlreadySuppressed(target)) => eprintln!("{} already quiet", target),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    // Model Errors
    /// Failed to find a type in the registry.
    ///
    /// This error occurs when looking up a type by name that was never
    /// registered in the runtime model.
    ///
    /// The associated value is the name that was not found.
    #[error("Failed to find type in registry - {0}")]
    TypeNotFound(String),

    /// Failed to find an operation on a type.
    ///
    /// This error occurs when an operation lookup misses on the named type
    /// and on every ancestor along its parent chain.
    #[error("Failed to find operation {operation} on type {type_name} or its ancestors")]
    OperationNotFound {
        /// The type the lookup started from
        type_name: String,
        /// The operation that was requested
        operation: String,
    },

    /// A type with this name is already registered.
    ///
    /// Type names are the identity of the runtime model. Registering the
    /// same name twice would make dispatch ambiguous, so the second
    /// registration is rejected.
    #[error("A type with this name is already registered - {0}")]
    DuplicateType(String),

    /// An operation with this name is already declared on the type.
    ///
    /// This error occurs during type construction when two operations with
    /// the same name are declared on a single type.
    #[error("Operation {operation} is already declared on type {type_name}")]
    DuplicateOperation {
        /// The type under construction
        type_name: String,
        /// The operation name that collided
        operation: String,
    },

    // Interception Errors
    /// The target is already suppressed.
    ///
    /// Suppression is not reference counted. A second suppression of the
    /// same target would be undone by a single restore, so it is rejected
    /// instead of silently stacking.
    ///
    /// The associated value is the target in `Type::operation` form.
    #[error("Target is already suppressed - {0}")]
    AlreadySuppressed(String),

    /// The target already carries an interception.
    ///
    /// Only one hook may occupy a dispatch slot at a time. Installing a
    /// second suppression, exchange, or wrapper over an occupied slot is
    /// rejected until the existing hook is restored.
    ///
    /// The associated value is the target in `Type::operation` form.
    #[error("Target already carries an interception - {0}")]
    AlreadyHooked(String),

    /// The target carries no interception to remove.
    ///
    /// This error occurs when restoring a target whose dispatch slot is
    /// pristine, which usually indicates unbalanced suppress/restore calls.
    ///
    /// The associated value is the target in `Type::operation` form.
    #[error("Target carries no interception - {0}")]
    NotHooked(String),

    /// The two signatures are not interchangeable.
    ///
    /// Exchanging implementations across different arities or parameter
    /// shapes would feed callables arguments they were never written for.
    /// Both signatures are reported in their encoded text form.
    #[error("Signatures are not interchangeable - {left} vs {right}")]
    IncompatibleSignature {
        /// Encoded signature of the first operation
        left: String,
        /// Encoded signature of the second operation
        right: String,
    },

    // Signature Errors
    /// The signature text could not be parsed.
    ///
    /// This error indicates that a signature string does not conform to the
    /// `(kind, kind) -> kind` grammar. The error includes the source
    /// location where the malformation was detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Invalid signature - {file}:{line}: {message}")]
    InvalidSignature {
        /// The message to be printed for the `InvalidSignature` error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },
}
