//! Message signature verification.
//!
//! The validation pipeline, in order:
//! 1. Parse the `SigningCertURL` and check it against the provider host
//!    allow-list. This gates the fetch: an attacker-supplied certificate
//!    host is rejected before any network traffic.
//! 2. Retrieve the certificate through the configured [`CertificateSource`].
//! 3. Extract the RSA public key from the X.509 certificate.
//! 4. Verify the PKCS#1 v1.5 signature over the message's canonical
//!    string-to-sign, with SHA-1 or SHA-256 per `SignatureVersion`.
//!
//! One-shot and synchronous; no retries, no fallback.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rsa::pkcs8::DecodePublicKey as _;
use rsa::{pkcs1v15, RsaPublicKey};
use sha1::Sha1;
use sha2::Sha256;
use signature::Verifier as _;
use url::Url;
use x509_parser::parse_x509_certificate;
use x509_parser::pem::parse_x509_pem;

use crate::cert::{CachingSource, CertificateSource, HttpCertificateSource};
use crate::error::SignatureError;
use crate::message::Message;

/// Hash algorithm selected by the message's `SignatureVersion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignatureAlgorithm {
    /// Version "1": SHA-1 with RSA.
    Sha1Rsa,
    /// Version "2": SHA-256 with RSA.
    Sha256Rsa,
}

// ---------------------------------------------------------------------------
// SignatureValidator
// ---------------------------------------------------------------------------

/// Verifies that a [`Message`] was signed by the provider.
pub struct SignatureValidator {
    source: Box<dyn CertificateSource>,
}

impl SignatureValidator {
    /// Create a validator over an explicit certificate source.
    pub fn new(source: Box<dyn CertificateSource>) -> Self {
        Self { source }
    }

    /// Create a validator that fetches certificates over HTTPS, caching
    /// them by URL.
    pub fn over_https() -> Result<Self, SignatureError> {
        let http = HttpCertificateSource::new()?;
        Ok(Self::new(Box::new(CachingSource::new(http))))
    }

    /// Validate the message signature.
    ///
    /// Returns `Ok(())` only when the certificate host is trusted, the
    /// certificate was retrieved and parsed, and the signature verifies
    /// over the message's canonical string.
    pub fn validate(&self, message: &Message) -> Result<(), SignatureError> {
        let url = trusted_cert_url(message.signing_cert_url())?;
        let algorithm = resolve_algorithm(message.signature_version())?;

        let raw = self.source.fetch(&url)?;
        let public_key = rsa_public_key_from_cert(&raw)?;

        let signature = BASE64
            .decode(message.signature().trim())
            .map_err(|_| SignatureError::Mismatch)?;
        let string_to_sign = message.string_to_sign();

        verify_rsa(algorithm, &public_key, string_to_sign.as_bytes(), &signature)?;

        tracing::debug!(
            message_id = message.message_id(),
            cert_url = %url,
            "message signature verified"
        );
        Ok(())
    }

    /// Boolean form of [`SignatureValidator::validate`].
    pub fn is_valid(&self, message: &Message) -> bool {
        self.validate(message).is_ok()
    }
}

/// Parse the certificate URL and enforce the provider host allow-list.
///
/// Anything that cannot be positively established as a provider-controlled
/// HTTPS endpoint is rejected as untrusted, including malformed URLs.
fn trusted_cert_url(raw: &str) -> Result<Url, SignatureError> {
    let untrusted = || SignatureError::UntrustedHost(raw.to_string());

    let url = Url::parse(raw).map_err(|_| untrusted())?;
    if url.scheme() != "https" {
        return Err(untrusted());
    }
    let host = url.host_str().ok_or_else(untrusted)?;
    if !is_trusted_cert_host(host) {
        return Err(SignatureError::UntrustedHost(host.to_string()));
    }
    Ok(url)
}

/// Check a host against the provider certificate-host pattern:
/// `sns.<region>.amazonaws.com` or `sns.<region>.amazonaws.com.cn`, where
/// the region label is at least three characters of `[a-z0-9-]`.
fn is_trusted_cert_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    let rest = host
        .strip_suffix(".amazonaws.com.cn")
        .or_else(|| host.strip_suffix(".amazonaws.com"));
    let Some(rest) = rest else {
        return false;
    };
    let Some(region) = rest.strip_prefix("sns.") else {
        return false;
    };
    region.len() >= 3
        && region
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn resolve_algorithm(version: &str) -> Result<SignatureAlgorithm, SignatureError> {
    match version {
        "1" => Ok(SignatureAlgorithm::Sha1Rsa),
        "2" => Ok(SignatureAlgorithm::Sha256Rsa),
        other => Err(SignatureError::UnsupportedVersion(other.to_string())),
    }
}

/// Extract the RSA public key from a PEM or DER X.509 certificate.
fn rsa_public_key_from_cert(raw: &[u8]) -> Result<RsaPublicKey, SignatureError> {
    let der;
    let der_bytes: &[u8] = if raw.starts_with(b"-----BEGIN") {
        let (_, pem) = parse_x509_pem(raw)
            .map_err(|e| SignatureError::BadCertificate(format!("invalid PEM: {e}")))?;
        der = pem.contents;
        &der
    } else {
        raw
    };

    let (_, cert) = parse_x509_certificate(der_bytes)
        .map_err(|e| SignatureError::BadCertificate(format!("invalid X.509: {e}")))?;

    RsaPublicKey::from_public_key_der(cert.tbs_certificate.subject_pki.raw)
        .map_err(|e| SignatureError::BadCertificate(format!("not an RSA public key: {e}")))
}

fn verify_rsa(
    algorithm: SignatureAlgorithm,
    public_key: &RsaPublicKey,
    data: &[u8],
    signature: &[u8],
) -> Result<(), SignatureError> {
    let signature =
        pkcs1v15::Signature::try_from(signature).map_err(|_| SignatureError::Mismatch)?;
    match algorithm {
        SignatureAlgorithm::Sha1Rsa => pkcs1v15::VerifyingKey::<Sha1>::new(public_key.clone())
            .verify(data, &signature)
            .map_err(|_| SignatureError::Mismatch),
        SignatureAlgorithm::Sha256Rsa => pkcs1v15::VerifyingKey::<Sha256>::new(public_key.clone())
            .verify(data, &signature)
            .map_err(|_| SignatureError::Mismatch),
    }
}
