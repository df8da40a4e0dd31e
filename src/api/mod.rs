mod http;
mod transport;
mod types;

pub use http::HttpTransport;
pub use transport::{JobTransport, TransportError};
pub use types::{
    AudioRequest, DeckImage, DeckImages, DeckList, ImageRequest, JobEnvelope, JobKind, JobRequest,
    ModelKind, ModelList, PendingFile, SyncRequest,
};
