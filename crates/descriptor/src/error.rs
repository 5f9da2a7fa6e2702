use thiserror::Error;

/// Errors raised while constructing descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DescriptorError {
    /// The component vector does not have the required length.
    #[error("descriptor length mismatch: expected {expected} components, got {found}")]
    LengthMismatch { expected: usize, found: usize },
}
