use async_trait::async_trait;
use thiserror::Error;

/// A tab as reported by the external tab provider. Content and timestamps
/// are owned by the registry, not the host.
#[derive(Debug, Clone)]
pub struct TabDescriptor {
    pub id: String,
    pub title: String,
    pub url: String,
    pub favicon: String,
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("tab not found: {0}")]
    NotFound(String),
    #[error("host error: {0}")]
    Other(String),
}

/// The external tab provider: enumeration and activation/closure
/// primitives. The registry mirrors this state; host calls are
/// best-effort side effects applied after resolution.
#[async_trait]
pub trait TabHost: Send + Sync {
    async fn list_open_tabs(&self) -> Result<Vec<TabDescriptor>, HostError>;
    async fn activate(&self, id: &str) -> Result<(), HostError>;
    async fn close(&self, id: &str) -> Result<(), HostError>;
    /// Open a new tab and return the host's id for it.
    async fn open_new(&self, url: &str) -> Result<String, HostError>;
}

#[derive(Debug, Error)]
pub enum ReadError {
    /// Protected pages (browser-internal schemes) refuse extraction.
    #[error("page is restricted")]
    Restricted,
    #[error("content unavailable: {0}")]
    Unavailable(String),
}

/// The external page-content extractor.
#[async_trait]
pub trait ContentReader: Send + Sync {
    async fn read_visible_text(&self, tab_id: &str) -> Result<String, ReadError>;
}
