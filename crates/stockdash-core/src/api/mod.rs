//! HTTP clients for the analysis service and the quote provider

pub mod analysis_service;
pub mod quote_provider;

pub use analysis_service::{AnalysisService, HttpAnalysisClient, classify_response};
pub use quote_provider::{HttpQuoteProvider, QuoteProvider, RawQuote, parse_quote_body};

use url::Url;

/// Resolve `path` beneath `base`, keeping any path prefix on the base
pub(crate) fn endpoint(base: &str, path: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    if !url.path().ends_with('/') {
        let with_slash = format!("{}/", url.path());
        url.set_path(&with_slash);
    }
    url.join(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        assert_eq!(
            endpoint("http://localhost:8000", "analyze").unwrap().as_str(),
            "http://localhost:8000/analyze"
        );
        assert_eq!(
            endpoint("https://api.example.com/v2", "quotes").unwrap().as_str(),
            "https://api.example.com/v2/quotes"
        );
        assert_eq!(
            endpoint("https://api.example.com/v2/", "quotes").unwrap().as_str(),
            "https://api.example.com/v2/quotes"
        );
        assert!(endpoint("localhost", "analyze").is_err());
    }
}
