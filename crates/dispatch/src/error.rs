/// Result type for platform capability calls.
pub type CapabilityResult<T> = Result<T, CapabilityError>;

/// Failure reported by a platform adapter.
///
/// The dispatcher never lets these escape; each one selects a fallback or
/// an outcome message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    #[error("not supported: {0}")]
    Unsupported(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("platform call failed: {0}")]
    Failed(String),
}
