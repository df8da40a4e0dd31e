use crate::api::transport::{JobTransport, TransportError};
use crate::api::types::{
    DeckImages, DeckList, JobEnvelope, JobRequest, ModelKind, ModelList, SyncRequest,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

/// [`JobTransport`] backed by the deck service's HTTP API.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // The service reports job failures as `ok: false` with a 4xx/5xx status,
    // so the body is decoded regardless of status.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TransportError> {
        let status = response.status();
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| TransportError::Decode {
            status: status.as_u16(),
            reason: e.to_string(),
        })
    }

    async fn sync_form(request: &SyncRequest) -> Result<Form, TransportError> {
        let bytes = tokio::fs::read(&request.file.path)
            .await
            .map_err(|source| TransportError::ReadFile {
                path: request.file.path.display().to_string(),
                source,
            })?;

        let part = Part::bytes(bytes)
            .file_name(request.file.name.clone())
            .mime_str("application/pdf")?;

        Ok(Form::new()
            .part("file", part)
            .text("deck", request.deck.clone())
            .text("model", request.model.clone())
            .text("romanized", romanized_field(request.romanized)))
    }
}

pub(crate) fn romanized_field(romanized: bool) -> &'static str {
    if romanized {
        "true"
    } else {
        "false"
    }
}

#[async_trait]
impl JobTransport for HttpTransport {
    async fn submit(&self, request: &JobRequest) -> Result<JobEnvelope, TransportError> {
        let url = self.url(request.kind().endpoint());
        tracing::debug!(%url, "sending job request");

        let builder = match request {
            JobRequest::Sync(sync) => self.client.post(&url).multipart(Self::sync_form(sync).await?),
            JobRequest::Audio(audio) => self.client.post(&url).json(audio),
            JobRequest::Images(images) => self.client.post(&url).json(images),
        };

        let response = builder.send().await?;
        Self::decode(response).await
    }

    async fn list_decks(&self) -> Result<DeckList, TransportError> {
        let response = self.client.get(self.url("/api/decks")).send().await?;
        Self::decode(response).await
    }

    async fn list_models(
        &self,
        kind: ModelKind,
        refresh: bool,
    ) -> Result<ModelList, TransportError> {
        let mut builder = self
            .client
            .get(self.url(&format!("/api/models/{}", kind.as_str())));
        if refresh {
            builder = builder.query(&[("refresh", "1")]);
        }
        let response = builder.send().await?;
        Self::decode(response).await
    }

    async fn deck_images(&self, deck: &str) -> Result<DeckImages, TransportError> {
        let response = self
            .client
            .get(self.url("/api/deck-images"))
            .query(&[("deck", deck)])
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::PendingFile;
    use crate::api::types::AudioRequest;
    use assert_matches::assert_matches;
    use std::io::Write;
    use std::path::PathBuf;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answers a single request with a canned response and hands back the raw
    /// request it received.
    async fn serve_once(
        status: &'static str,
        content_type: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 8192];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                if request_complete(&raw) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&raw).into_owned()
        });

        (base_url, handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let Some(header_end) = raw.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&raw[..header_end]).to_ascii_lowercase();
        let body = &raw[header_end + 4..];

        if head.contains("transfer-encoding: chunked") {
            return body.ends_with(b"0\r\n\r\n");
        }
        let length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        body.len() >= length
    }

    fn audio_request() -> JobRequest {
        JobRequest::Audio(AudioRequest {
            deck: "Korean".to_string(),
            model: Some("gpt-4o-mini-tts".to_string()),
            workers: Some(3),
            voice: None,
            instructions: None,
        })
    }

    #[test]
    fn base_url_is_normalised() {
        let transport = HttpTransport::new("http://localhost:5000/");
        assert_eq!(
            transport.url("/generate/audio"),
            "http://localhost:5000/generate/audio"
        );
    }

    #[test]
    fn romanized_is_sent_as_text_flag() {
        assert_eq!(romanized_field(true), "true");
        assert_eq!(romanized_field(false), "false");
    }

    #[tokio::test]
    async fn missing_pdf_is_a_transport_failure() {
        let transport = HttpTransport::new("http://127.0.0.1:9");
        let request = JobRequest::Sync(SyncRequest {
            file: PendingFile {
                path: PathBuf::from("/definitely/not/here/lesson.pdf"),
                name: "lesson.pdf".to_string(),
                size: None,
            },
            deck: String::new(),
            model: "gpt-4.1-mini".to_string(),
            romanized: true,
        });

        let err = transport.submit(&request).await.unwrap_err();
        assert_matches!(err, TransportError::ReadFile { .. });
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_failure() {
        let transport = HttpTransport::new("http://127.0.0.1:9");
        let err = transport.list_decks().await.unwrap_err();
        assert_matches!(err, TransportError::Request(_));
    }

    #[tokio::test]
    async fn error_status_with_envelope_is_a_rejection() {
        let (base_url, server) = serve_once(
            "500 INTERNAL SERVER ERROR",
            "application/json",
            r#"{"ok":false,"message":"Audio generation failed.","stdout":null,"stderr":"boom"}"#,
        )
        .await;

        let envelope = HttpTransport::new(base_url)
            .submit(&audio_request())
            .await
            .unwrap();
        assert!(!envelope.ok);
        assert_eq!(envelope.message, "Audio generation failed.");
        assert_eq!(envelope.stderr(), "boom");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /generate/audio "), "{request}");
        assert!(request.contains(r#""deck":"Korean""#), "{request}");
    }

    #[tokio::test]
    async fn html_error_page_is_a_decode_failure() {
        let (base_url, server) =
            serve_once("502 Bad Gateway", "text/html", "<html>Bad Gateway</html>").await;

        let err = HttpTransport::new(base_url)
            .submit(&audio_request())
            .await
            .unwrap_err();
        assert_matches!(err, TransportError::Decode { status: 502, .. });
        server.await.unwrap();
    }

    #[tokio::test]
    async fn sync_uploads_pdf_with_form_fields() {
        let mut pdf = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        pdf.write_all(b"%PDF-1.4 lesson").unwrap();

        let (base_url, server) = serve_once(
            "200 OK",
            "application/json",
            r#"{"ok":true,"message":"Deck synced successfully."}"#,
        )
        .await;

        let request = JobRequest::Sync(SyncRequest {
            file: PendingFile {
                path: pdf.path().to_path_buf(),
                name: "lesson.pdf".to_string(),
                size: Some(15),
            },
            deck: "Lesson 1".to_string(),
            model: "gpt-4.1-mini".to_string(),
            romanized: false,
        });
        let envelope = HttpTransport::new(base_url).submit(&request).await.unwrap();
        assert!(envelope.ok);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /sync "), "{raw}");
        assert!(raw.contains(r#"name="file"; filename="lesson.pdf""#), "{raw}");
        assert!(
            raw.to_ascii_lowercase().contains("content-type: application/pdf"),
            "{raw}"
        );
        assert!(raw.contains("%PDF-1.4 lesson"), "{raw}");
        assert!(raw.contains("name=\"deck\"\r\n\r\nLesson 1"), "{raw}");
        assert!(raw.contains("name=\"model\"\r\n\r\ngpt-4.1-mini"), "{raw}");
        assert!(raw.contains("name=\"romanized\"\r\n\r\nfalse"), "{raw}");
    }

    #[tokio::test]
    async fn forced_model_refresh_adds_query_flag() {
        let (base_url, server) = serve_once(
            "200 OK",
            "application/json",
            r#"{"ok":true,"models":["gpt-image-1"]}"#,
        )
        .await;

        let models = HttpTransport::new(base_url)
            .list_models(ModelKind::Image, true)
            .await
            .unwrap();
        assert_eq!(models.models, vec!["gpt-image-1".to_string()]);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("GET /api/models/image?refresh=1 "), "{raw}");
    }

    #[tokio::test]
    async fn deck_images_are_requested_by_deck_name() {
        let (base_url, server) =
            serve_once("200 OK", "application/json", r#"{"ok":true,"images":[]}"#).await;

        let images = HttpTransport::new(base_url)
            .deck_images("Korean")
            .await
            .unwrap();
        assert!(images.ok);
        assert!(images.images.is_empty());

        let raw = server.await.unwrap();
        assert!(raw.starts_with("GET /api/deck-images?deck=Korean "), "{raw}");
    }
}
