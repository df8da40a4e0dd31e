use crate::api::types::{DeckImages, DeckList, JobEnvelope, JobRequest, ModelKind, ModelList};
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Network, DNS, TLS or body-streaming failure.
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("could not read {path}: {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// The service answered, but not with the JSON we expected.
    #[error("unexpected response ({status}): {reason}")]
    Decode { status: u16, reason: String },

    /// Failure reported by a transport that does not speak HTTP, such as an
    /// in-process stand-in for the service.
    #[error("{0}")]
    Other(String),
}

/// Everything the console needs from the job service.
///
/// A single request per call; implementations must not retry or time out on
/// their own.
#[async_trait]
pub trait JobTransport: Send + Sync {
    async fn submit(&self, request: &JobRequest) -> Result<JobEnvelope, TransportError>;

    async fn list_decks(&self) -> Result<DeckList, TransportError>;

    async fn list_models(&self, kind: ModelKind, refresh: bool)
        -> Result<ModelList, TransportError>;

    async fn deck_images(&self, deck: &str) -> Result<DeckImages, TransportError>;
}
