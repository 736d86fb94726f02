//! Bucket endpoint URLs.
//!
//! All endpoints derive from one template containing a single `%s`, for
//! example `https://bucket.example/api/%s`.

use super::{PublishError, PublishResult};
use crate::config::URL_PLACEHOLDER;

/// Upload endpoint for pack archives.
pub const PACK_ENDPOINT: &str = "pack";

/// Endpoint serving the companion mod bundle.
pub const MODFOLDER_ENDPOINT: &str = "modfolder";

/// URLs of the remote bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketEndpoints {
    template: String,
}

impl BucketEndpoints {
    /// Parse a URL template.
    ///
    /// The template must contain exactly one placeholder.
    pub fn new(template: impl Into<String>) -> PublishResult<Self> {
        let template = template.into();
        let placeholders = template.matches(URL_PLACEHOLDER).count();
        if placeholders != 1 {
            return Err(PublishError::InvalidUrl(format!(
                "bucket URL '{}' must contain exactly one '{}'",
                template, URL_PLACEHOLDER
            )));
        }
        Ok(Self { template })
    }

    /// URL for an arbitrary endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        self.template.replacen(URL_PLACEHOLDER, path, 1)
    }

    pub fn pack_url(&self) -> String {
        self.endpoint(PACK_ENDPOINT)
    }

    pub fn modfolder_url(&self) -> String {
        self.endpoint(MODFOLDER_ENDPOINT)
    }

    /// Public download URL for the pack with `hash`.
    ///
    /// Only unreserved URL characters are accepted in `hash`; anything else
    /// would change the meaning of the query string.
    pub fn download_url(&self, hash: &str) -> PublishResult<String> {
        if !is_url_safe(hash) {
            return Err(PublishError::InvalidHash(hash.to_string()));
        }
        Ok(self.endpoint(&format!("{}?hash={}", PACK_ENDPOINT, hash)))
    }
}

/// Whether `value` is non-empty and made only of unreserved URL characters.
fn is_url_safe(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "https://bucket.example/api/%s";

    #[test]
    fn test_endpoints() {
        let endpoints = BucketEndpoints::new(TEMPLATE).unwrap();
        assert_eq!(endpoints.pack_url(), "https://bucket.example/api/pack");
        assert_eq!(
            endpoints.modfolder_url(),
            "https://bucket.example/api/modfolder"
        );
        assert_eq!(
            endpoints.download_url("abc123").unwrap(),
            "https://bucket.example/api/pack?hash=abc123"
        );
    }

    #[test]
    fn test_download_url_rejects_query_characters() {
        let endpoints = BucketEndpoints::new(TEMPLATE).unwrap();
        for hash in ["a b", "abc&admin=1", "x#frag", "a/b", "h?hash=other", "caf\u{e9}"] {
            assert!(
                matches!(
                    endpoints.download_url(hash),
                    Err(PublishError::InvalidHash(_))
                ),
                "accepted {:?}",
                hash
            );
        }
        assert!(endpoints.download_url("v1.2_beta-3~x").is_ok());
    }

    #[test]
    fn test_placeholder_required() {
        assert!(matches!(
            BucketEndpoints::new("https://bucket.example/api/pack"),
            Err(PublishError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_single_placeholder_only() {
        assert!(BucketEndpoints::new("https://%s.example/%s").is_err());
    }
}
