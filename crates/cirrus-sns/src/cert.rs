//! Signing-certificate retrieval.
//!
//! The validator never talks to the network directly; it goes through the
//! [`CertificateSource`] trait so tests and embedders can substitute their
//! own transport. [`HttpCertificateSource`] is the production implementation,
//! [`CachingSource`] an optional memoizing decorator (each certificate URL is
//! long-lived provider infrastructure, so caching by URL is safe).

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use url::Url;

use crate::error::SignatureError;

/// Upper bound on an accepted certificate body. Real signing certificates
/// are around 1-2 KiB.
const MAX_CERT_BYTES: u64 = 64 * 1024;

/// Fetch timeout for the one-shot certificate request.
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// CertificateSource — transport seam for certificate retrieval
// ---------------------------------------------------------------------------

pub trait CertificateSource: Send + Sync {
    /// Retrieve the certificate bytes (PEM or DER) at `url`.
    ///
    /// The caller has already established that `url` is trusted; sources
    /// must not follow redirects to other hosts.
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, SignatureError>;
}

// ---------------------------------------------------------------------------
// HttpCertificateSource — blocking HTTPS retrieval
// ---------------------------------------------------------------------------

/// Blocking HTTPS certificate retrieval.
///
/// Redirects are disabled: a redirect off the allow-listed host would
/// otherwise reopen the signature-bypass hole the host check closes.
pub struct HttpCertificateSource {
    client: reqwest::blocking::Client,
}

impl HttpCertificateSource {
    pub fn new() -> Result<Self, SignatureError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("cirrus-sns/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| SignatureError::UnreachableCert(format!("http client setup: {e}")))?;
        Ok(Self { client })
    }
}

impl CertificateSource for HttpCertificateSource {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, SignatureError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| SignatureError::UnreachableCert(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SignatureError::UnreachableCert(format!(
                "certificate endpoint returned {status}"
            )));
        }

        if let Some(length) = response.content_length() {
            if length > MAX_CERT_BYTES {
                return Err(SignatureError::UnreachableCert(format!(
                    "certificate body too large: {length} bytes"
                )));
            }
        }

        let body = response
            .bytes()
            .map_err(|e| SignatureError::UnreachableCert(e.to_string()))?;
        if body.len() as u64 > MAX_CERT_BYTES {
            return Err(SignatureError::UnreachableCert(format!(
                "certificate body too large: {} bytes",
                body.len()
            )));
        }

        Ok(body.to_vec())
    }
}

// ---------------------------------------------------------------------------
// CachingSource — memoize fetched certificates by URL
// ---------------------------------------------------------------------------

/// Decorator that caches fetched certificate bytes keyed by URL.
///
/// Fetch failures are not cached; the next validation retries the source.
pub struct CachingSource<S> {
    inner: S,
    cache: Mutex<HashMap<String, Vec<u8>>>,
}

impl<S: CertificateSource> CachingSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }
}

impl<S: CertificateSource> CertificateSource for CachingSource<S> {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, SignatureError> {
        let key = url.as_str().to_string();
        {
            let cache = self.cache.lock().unwrap_or_else(|p| p.into_inner());
            if let Some(bytes) = cache.get(&key) {
                return Ok(bytes.clone());
            }
        }

        // The lock is released across the fetch so a slow source does not
        // serialize unrelated lookups.
        let bytes = self.inner.fetch(url)?;

        let mut cache = self.cache.lock().unwrap_or_else(|p| p.into_inner());
        cache.insert(key, bytes.clone());
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
    }

    impl CertificateSource for CountingSource {
        fn fetch(&self, _url: &Url) -> Result<Vec<u8>, SignatureError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1, 2, 3])
        }
    }

    struct FailingSource;

    impl CertificateSource for FailingSource {
        fn fetch(&self, _url: &Url) -> Result<Vec<u8>, SignatureError> {
            Err(SignatureError::UnreachableCert("boom".to_string()))
        }
    }

    // Trait objects must stay object-safe; the validator boxes its source.
    fn _assert_object_safe(_: &dyn CertificateSource) {}

    #[test]
    fn test_caching_source_fetches_each_url_once() {
        let source = CachingSource::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let url = Url::parse("https://sns.us-east-1.amazonaws.com/cert.pem").unwrap();

        assert_eq!(source.fetch(&url).unwrap(), vec![1, 2, 3]);
        assert_eq!(source.fetch(&url).unwrap(), vec![1, 2, 3]);
        assert_eq!(source.inner.calls.load(Ordering::SeqCst), 1);

        let other = Url::parse("https://sns.eu-west-1.amazonaws.com/cert.pem").unwrap();
        source.fetch(&other).unwrap();
        assert_eq!(source.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_caching_source_does_not_cache_failures() {
        let source = CachingSource::new(FailingSource);
        let url = Url::parse("https://sns.us-east-1.amazonaws.com/cert.pem").unwrap();
        assert!(source.fetch(&url).is_err());
        let cache = source.cache.lock().unwrap();
        assert!(cache.is_empty());
    }
}
