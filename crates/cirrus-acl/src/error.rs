use thiserror::Error;

/// Error raised by [`AcpBuilder::build`](crate::AcpBuilder::build).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BuilderError {
    /// `build()` was called before an owner was set.
    #[error("an owner must be set before an access control policy can be built")]
    MissingOwner,
}
