//! Cache key derivation from endpoint URLs.
//!
//! Two spellings of the same endpoint must land on the same cache entry, so
//! keys are the canonical form of the URL rather than the raw input.

use url::Url;

#[derive(Debug, Clone, thiserror::Error)]
pub enum KeyError {
    #[error("empty endpoint URL")]
    Empty,

    #[error("endpoint must use http or https, got {0}")]
    UnsupportedScheme(String),

    #[error("malformed endpoint URL: {0}")]
    Malformed(String),
}

/// Canonical cache key for an endpoint.
///
/// Surrounding whitespace is ignored, a missing scheme means `https`, the host
/// is lowercased and any fragment is dropped. The query string is part of the
/// resource identity and kept verbatim.
pub fn cache_key(endpoint: &str) -> Result<String, KeyError> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(KeyError::Empty);
    }

    let with_scheme =
        if endpoint.contains("://") { endpoint.to_string() } else { format!("https://{endpoint}") };
    let mut url = Url::parse(&with_scheme).map_err(|e| KeyError::Malformed(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(KeyError::UnsupportedScheme(url.scheme().to_string()));
    }

    if let Some(host) = url.host_str().map(str::to_ascii_lowercase) {
        url.set_host(Some(&host)).map_err(|e| KeyError::Malformed(e.to_string()))?;
    }
    url.set_fragment(None);

    Ok(url.into())
}
