//! Error type for a single resource load.
//!
//! Every variant is local to one resource: the loader turns it into a
//! rejected `LoadResult` and never lets it escape a batch.

use thiserror::Error;

/// Why one resource failed to load.
///
/// `Clone` because a shared completion signal hands the same outcome to
/// every caller that joined the load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The request could not be resolved against the document base.
    #[error("invalid resource URL {input:?}: {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    /// The URL's extension is neither a stylesheet nor a script.
    #[error("the type of resource {url} could not be recognized")]
    UnrecognizedResourceType { url: String },

    /// The node reported an error event.
    #[error("resource {url} failed to load: {reason}")]
    ResourceLoadFailed { url: String, reason: String },

    /// The document refused a mutation (e.g. nothing to insert before).
    #[error("document rejected {url}: {message}")]
    Document { url: String, message: String },

    /// The document released the event listener without firing it.
    #[error("load signal for {url} was dropped before settling")]
    SignalDropped { url: String },
}

impl LoadError {
    /// URL (or raw input) the error is about.
    pub fn url(&self) -> &str {
        match self {
            LoadError::InvalidUrl { input, .. } => input,
            LoadError::UnrecognizedResourceType { url }
            | LoadError::ResourceLoadFailed { url, .. }
            | LoadError::Document { url, .. }
            | LoadError::SignalDropped { url } => url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_url() {
        let e = LoadError::UnrecognizedResourceType {
            url: "https://example.com/logo.png".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "the type of resource https://example.com/logo.png could not be recognized"
        );
        assert_eq!(e.url(), "https://example.com/logo.png");
    }

    #[test]
    fn invalid_url_keeps_parser_source() {
        let e = LoadError::InvalidUrl {
            input: "http://[::1".to_string(),
            source: url::ParseError::InvalidIpv6Address,
        };
        assert!(std::error::Error::source(&e).is_some());
        assert_eq!(e.url(), "http://[::1");
    }
}
