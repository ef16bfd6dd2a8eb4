/// Why the registry turned a request down.
///
/// Rejections are expected, recoverable answers rather than faults: the
/// caller may retry with different input (another username, a fresh
/// signature, more quota).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Rejection {
    /// The signature does not validate for the claimed signer and payload
    #[error("signature does not validate")]
    Authentication,
    /// The signer is not the principal this operation requires
    #[error("signer is not authorized")]
    Authorization,
    /// A referenced username, sharing key, lookup key or request is unknown
    #[error("not found")]
    NotFound,
    /// Duplicate username, key, storage node or metadata key
    #[error("conflicts with existing state")]
    Conflict,
    /// Not enough remaining capacity (storage or follow-request mailbox)
    #[error("quota exceeded")]
    QuotaExceeded,
    /// Malformed donation fractions
    #[error("invalid argument")]
    InvalidArgument,
}

impl Rejection {
    /// Stable snake_case name, used on the wire and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::Authentication => "authentication",
            Rejection::Authorization => "authorization",
            Rejection::NotFound => "not_found",
            Rejection::Conflict => "conflict",
            Rejection::QuotaExceeded => "quota_exceeded",
            Rejection::InvalidArgument => "invalid_argument",
        }
    }
}

/// The outcome of a mutating registry call.
///
/// A `Rejected` verdict guarantees that no registry state was changed.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Accepted,
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Verdict::Accepted => None,
            Verdict::Rejected(rejection) => Some(*rejection),
        }
    }
}

impl From<Result<(), Rejection>> for Verdict {
    fn from(result: Result<(), Rejection>) -> Self {
        match result {
            Ok(()) => Verdict::Accepted,
            Err(rejection) => Verdict::Rejected(rejection),
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Accepted => write!(f, "accepted"),
            Verdict::Rejected(rejection) => write!(f, "rejected: {}", rejection),
        }
    }
}

/// Turn an internal decision into a [`Verdict`], tracing rejections.
pub(crate) fn settle(op: &'static str, subject: &str, result: Result<(), Rejection>) -> Verdict {
    if let Err(rejection) = result {
        tracing::debug!(op, subject, reason = rejection.as_str(), "request rejected");
    }
    result.into()
}
