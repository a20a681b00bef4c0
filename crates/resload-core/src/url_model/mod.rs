//! URL modeling: canonical resolution and resource classification.
//!
//! Every request is resolved against the document base with WHATWG URL
//! parsing (the algorithm browsers use when assigning `a.href`), so the
//! canonical string matches the names the load history reports.

mod kind;

pub use kind::{classify, extension_of, ResourceKind};

use std::fmt;

use url::Url;

use crate::error::LoadError;

/// Absolute, resolved form of a resource URL. The only deduplication key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl(Url);

impl CanonicalUrl {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<Url> for CanonicalUrl {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

/// Resolves requests against a fixed document base.
#[derive(Debug, Clone)]
pub struct UrlResolver {
    base: Url,
}

impl UrlResolver {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// Parse `base` and build a resolver from it.
    pub fn from_base_str(base: &str) -> Result<Self, LoadError> {
        let base = Url::parse(base).map_err(|source| LoadError::InvalidUrl {
            input: base.to_string(),
            source,
        })?;
        Ok(Self::new(base))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve `input` (absolute or relative) to its canonical form.
    ///
    /// Pure: nothing is registered anywhere. Parser errors are passed through
    /// unchanged.
    pub fn resolve(&self, input: &str) -> Result<CanonicalUrl, LoadError> {
        self.base
            .join(input)
            .map(CanonicalUrl)
            .map_err(|source| LoadError::InvalidUrl {
                input: input.to_string(),
                source,
            })
    }
}
