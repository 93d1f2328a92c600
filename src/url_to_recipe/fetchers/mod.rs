use crate::error::ImportError;
use async_trait::async_trait;
use url::Url;

mod request;

pub use request::RequestFetcher;

/// Retrieves the raw HTML of a page.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String, ImportError>;
}

/// Parse a caller-supplied URL, rejecting anything we could not fetch.
pub fn parse_url(url: &str) -> Result<Url, ImportError> {
    let parsed = Url::parse(url.trim())
        .map_err(|e| ImportError::InvalidInput(format!("'{url}' is not a valid URL: {e}")))?;

    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(parsed),
        scheme => Err(ImportError::InvalidInput(format!(
            "unsupported URL '{url}' (scheme {scheme})"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_accepts_http_and_https() {
        assert!(parse_url("https://example.com/recipe").is_ok());
        assert!(parse_url("  http://example.com  ").is_ok());
    }

    #[test]
    fn test_parse_url_rejects_bad_input() {
        for bad in ["", "example.com/recipe", "ftp://example.com/file", "not a url"] {
            assert!(
                matches!(parse_url(bad), Err(ImportError::InvalidInput(_))),
                "expected {bad:?} to be rejected"
            );
        }
    }
}
