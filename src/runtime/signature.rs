use std::fmt;

use crate::{runtime::ValueKind, Result};

/// The declared shape of an operation: parameter kinds and a return kind.
///
/// Signatures travel with every operation in the model and gate
/// implementation exchange. The textual form is `(kind, kind) -> kind`,
/// produced by [`Signature::encode`] and accepted by [`Signature::parse`].
///
/// # Examples
///
/// ```rust
/// use interpose::runtime::{Signature, ValueKind};
///
/// let sig = Signature::parse("(int, str) -> bool")?;
/// assert_eq!(sig.params, vec![ValueKind::Int, ValueKind::Str]);
/// assert_eq!(sig.returns, ValueKind::Bool);
/// assert_eq!(sig.encode(), "(int, str) -> bool");
/// # Ok::<(), interpose::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Parameter kinds in declaration order, excluding the receiver
    pub params: Vec<ValueKind>,
    /// The kind of the produced result
    pub returns: ValueKind,
}

impl Signature {
    /// Create a new signature
    ///
    /// ## Arguments
    /// * `params`  - Parameter kinds in declaration order
    /// * `returns` - The return kind
    #[must_use]
    pub fn new(params: Vec<ValueKind>, returns: ValueKind) -> Self {
        Signature { params, returns }
    }

    /// Create a signature that takes no parameters
    ///
    /// ## Arguments
    /// * `returns` - The return kind
    #[must_use]
    pub fn returning(returns: ValueKind) -> Self {
        Signature {
            params: Vec::new(),
            returns,
        }
    }

    /// The number of declared parameters, excluding the receiver
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Encode this signature into its textual form
    #[must_use]
    pub fn encode(&self) -> String {
        let params = self
            .params
            .iter()
            .map(ValueKind::name)
            .collect::<Vec<_>>()
            .join(", ");
        format!("({}) -> {}", params, self.returns.name())
    }

    /// Parse a signature from its textual form
    ///
    /// Accepts the grammar `( kind [, kind]* ) -> kind` with arbitrary
    /// whitespace around tokens. An empty parameter list is written `()`.
    ///
    /// ## Arguments
    /// * `text` - The signature text to parse
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidSignature`] if the text does not
    /// conform to the grammar or names an unknown kind.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let rest = trimmed
            .strip_prefix('(')
            .ok_or_else(|| signature_error!("Expected '(' at start of signature '{}'", text))?;
        let (params_text, rest) = rest
            .split_once(')')
            .ok_or_else(|| signature_error!("Missing ')' in signature '{}'", text))?;
        let rest = rest
            .trim_start()
            .strip_prefix("->")
            .ok_or_else(|| signature_error!("Expected '->' after parameters in '{}'", text))?;
        let returns = ValueKind::from_name(rest.trim())?;

        let params_text = params_text.trim();
        let mut params = Vec::new();
        if !params_text.is_empty() {
            for part in params_text.split(',') {
                params.push(ValueKind::from_name(part.trim())?);
            }
        }

        Ok(Signature { params, returns })
    }

    /// Whether two signatures may safely trade implementations
    ///
    /// The check is positional: arities must match, and each parameter
    /// position (and the return) must hold equal kinds or a wildcard.
    /// This is an advisory compatibility gate, not a type system; callers
    /// that exchange across `any` positions own the consequences.
    #[must_use]
    pub fn interchangeable(&self, other: &Signature) -> bool {
        self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(other.params.iter())
                .all(|(a, b)| a.accepts(*b))
            && self.returns.accepts(other.returns)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}
