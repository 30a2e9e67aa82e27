use thiserror::Error;

/// Error raised while constructing a [`Message`](crate::Message) from raw
/// payload data.
///
/// Construction either yields a fully-populated message or fails here;
/// a message is never partially built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("invalid notification payload: {0}")]
    InvalidInput(String),
}

/// Error raised while verifying a message signature.
///
/// Every variant is terminal for that validation attempt; the validator
/// performs no retries and no fallback.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// The signature does not verify against the message contents.
    #[error("message signature does not match the message contents")]
    Mismatch,

    /// The signing certificate could not be retrieved.
    #[error("signing certificate could not be retrieved: {0}")]
    UnreachableCert(String),

    /// The certificate URL points outside the provider-controlled domain.
    /// Checked before any fetch; an attacker-supplied certificate host must
    /// never be contacted.
    #[error("signing certificate host is not trusted: {0}")]
    UntrustedHost(String),

    /// The certificate was retrieved but is not a parseable X.509 RSA
    /// certificate.
    #[error("signing certificate could not be parsed: {0}")]
    BadCertificate(String),

    /// The message carries a `SignatureVersion` this validator does not
    /// implement.
    #[error("unsupported signature version: {0}")]
    UnsupportedVersion(String),
}
