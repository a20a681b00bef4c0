//! Resource kind from the URL path extension.

use serde::Serialize;
use std::fmt;

use super::CanonicalUrl;
use crate::error::LoadError;

/// What a URL points at, and therefore how it gets inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Script,
    Style,
}

impl ResourceKind {
    /// Attribute holding the URL on the node for this kind.
    pub fn url_attribute(self) -> &'static str {
        match self {
            ResourceKind::Script => "src",
            ResourceKind::Style => "href",
        }
    }

    /// Element tag used for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            ResourceKind::Script => "script",
            ResourceKind::Style => "link",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Script => f.write_str("script"),
            ResourceKind::Style => f.write_str("style"),
        }
    }
}

/// Extracts the extension of the last path segment.
///
/// Query and fragment are ignored. Returns `None` when the segment has no
/// dot or nothing before it (`/.css`).
pub fn extension_of(url: &CanonicalUrl) -> Option<&str> {
    let segment = url.as_url().path().rsplit('/').next()?;
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}

/// Classifies a canonical URL. Anything but `.css`, `.js` or `.mjs` is an error.
pub fn classify(url: &CanonicalUrl) -> Result<ResourceKind, LoadError> {
    match extension_of(url) {
        Some(ext) if ext.eq_ignore_ascii_case("css") => Ok(ResourceKind::Style),
        Some(ext) if ext.eq_ignore_ascii_case("js") || ext.eq_ignore_ascii_case("mjs") => {
            Ok(ResourceKind::Script)
        }
        _ => Err(LoadError::UnrecognizedResourceType {
            url: url.to_string(),
        }),
    }
}
