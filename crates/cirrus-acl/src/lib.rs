//! Cirrus access-control-policy model.
//!
//! Builds the in-memory access-control policy attached to storage objects:
//! a [`Grantee`] owner plus an ordered sequence of permission [`Grant`]s,
//! accumulated through the chainable [`AcpBuilder`] and frozen into an
//! immutable [`Acp`] snapshot.
//!
//! Serialization to the provider's wire ACL format lives with the request
//! layer, not here.

pub mod builder;
pub mod error;
pub mod types;

pub use builder::AcpBuilder;
pub use error::BuilderError;
pub use types::{Acp, Grant, Grantee, Group, Permission};
