pub mod config;
pub mod logging;

pub mod detect;
pub mod document;
pub mod error;
pub mod headless;
pub mod insert;
pub mod loader;
pub mod locate;
pub mod probe;
pub mod registry;
pub mod signal;
pub mod url_model;

pub use document::{Document, LoadHistory, NodeEvent};
pub use error::LoadError;
pub use loader::{LoadResult, ResourceLoader};
pub use url_model::{classify, CanonicalUrl, ResourceKind, UrlResolver};
