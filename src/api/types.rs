use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    Sync,
    Audio,
    Images,
}

impl JobKind {
    pub const ALL: [JobKind; 3] = [JobKind::Sync, JobKind::Audio, JobKind::Images];

    pub fn endpoint(&self) -> &'static str {
        match self {
            JobKind::Sync => "/sync",
            JobKind::Audio => "/generate/audio",
            JobKind::Images => "/generate/images",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            JobKind::Sync => "Sync PDF to deck",
            JobKind::Audio => "Generate audio",
            JobKind::Images => "Generate images",
        }
    }

    pub fn busy_phrase(&self) -> &'static str {
        match self {
            JobKind::Sync => "Uploading and syncing deck...",
            JobKind::Audio => "Generating audio...",
            JobKind::Images => "Generating images...",
        }
    }

    pub fn completion_phrase(&self) -> &'static str {
        match self {
            JobKind::Sync => "Sync finished",
            JobKind::Audio => "Audio generation finished",
            JobKind::Images => "Image generation finished",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            JobKind::Sync => 0,
            JobKind::Audio => 1,
            JobKind::Images => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Text,
    Audio,
    Image,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [ModelKind::Text, ModelKind::Audio, ModelKind::Image];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Text => "text",
            ModelKind::Audio => "audio",
            ModelKind::Image => "image",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response returned by every job-triggering endpoint.
///
/// The service sends `null` for stdout/stderr when the underlying script
/// never ran. Optional fields that are absent or of the wrong type read as
/// `None`, so a completed job is never reported as a failed request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobEnvelope {
    #[serde(default)]
    pub ok: bool,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: String,
    #[serde(default, deserialize_with = "lenient")]
    pub stdout: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub stderr: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub items_processed: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub eta_text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub eta_seconds: Option<u64>,
}

impl JobEnvelope {
    pub fn stdout(&self) -> &str {
        self.stdout.as_deref().unwrap_or_default()
    }

    pub fn stderr(&self) -> &str {
        self.stderr.as_deref().unwrap_or_default()
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(lenient::<D, String>(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeckList {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub decks: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeckImage {
    pub card_id: u64,
    #[serde(default)]
    pub english: String,
    #[serde(default)]
    pub korean: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeckImages {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub images: Vec<DeckImage>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A local PDF chosen for upload. The bytes are only read at submit time.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFile {
    pub path: PathBuf,
    pub name: String,
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncRequest {
    pub file: PendingFile,
    pub deck: String,
    pub model: String,
    pub romanized: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioRequest {
    pub deck: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRequest {
    pub deck: String,
    pub image_model: String,
    pub skip_gating: bool,
    pub workers: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobRequest {
    Sync(SyncRequest),
    Audio(AudioRequest),
    Images(ImageRequest),
}

impl JobRequest {
    pub fn kind(&self) -> JobKind {
        match self {
            JobRequest::Sync(_) => JobKind::Sync,
            JobRequest::Audio(_) => JobKind::Audio,
            JobRequest::Images(_) => JobKind::Images,
        }
    }
}
