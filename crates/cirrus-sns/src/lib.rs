//! Cirrus notification message validation.
//!
//! Verifies that inbound webhook-style notification payloads genuinely
//! originated from the provider:
//!
//! - [`Message`] — immutable typed payload, dispatched on the `Type`
//!   discriminator, with the variant-specific canonical string-to-sign.
//! - [`SignatureValidator`] — fetches the signing certificate (host
//!   allow-listed, HTTPS only) and verifies the RSA signature over the
//!   canonical string.
//! - [`CertificateSource`] — transport seam; [`HttpCertificateSource`] for
//!   production, [`CachingSource`] to memoize certificates by URL.
//!
//! Validation is synchronous and stateless across calls: one certificate
//! fetch per validation (unless cached), no retries, no shared mutable
//! state.

pub mod cert;
pub mod error;
pub mod message;
pub mod validator;

pub use cert::{CachingSource, CertificateSource, HttpCertificateSource};
pub use error::{MessageError, SignatureError};
pub use message::{Message, MessageKind, NotificationMessage, SubscriptionConfirmationMessage};
pub use validator::SignatureValidator;
