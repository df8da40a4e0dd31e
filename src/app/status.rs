use crate::api::{JobEnvelope, JobKind, TransportError};
use crate::app::state::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
    Failure,
    Invalid,
}

/// Text shown in a slot's status area.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub tone: Tone,
    pub text: String,
    /// Replaces the busy label once the job has finished.
    pub headline: Option<String>,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Info,
            text: text.into(),
            headline: None,
        }
    }

    pub fn invalid(error: &ValidationError) -> Self {
        Self {
            tone: Tone::Invalid,
            text: format!("ℹ️ {}", error),
            headline: None,
        }
    }
}

/// How a submitted job ended, from the console's point of view.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Completed(JobEnvelope),
    Rejected(JobEnvelope),
    RequestFailed(String),
}

impl JobOutcome {
    pub fn from_result(result: Result<JobEnvelope, TransportError>) -> Self {
        match result {
            Ok(envelope) if envelope.ok => JobOutcome::Completed(envelope),
            Ok(envelope) => JobOutcome::Rejected(envelope),
            Err(e) => JobOutcome::RequestFailed(e.to_string()),
        }
    }

    pub fn render(&self, kind: JobKind) -> StatusMessage {
        match self {
            JobOutcome::Completed(envelope) => {
                let processed = envelope
                    .items_processed
                    .map(|count| format!(" (cards processed: {})", count))
                    .unwrap_or_default();
                let mut text = format!("✅ {}{}\n\n{}", envelope.message, processed, envelope.stdout());
                if !envelope.stderr().is_empty() {
                    text.push('\n');
                    text.push_str(envelope.stderr());
                }

                let headline = match envelope.eta_text.as_deref() {
                    Some(eta) if !eta.is_empty() => {
                        format!("{}. Estimated time: {}", kind.completion_phrase(), eta)
                    }
                    _ => format!("{}.", kind.completion_phrase()),
                };

                StatusMessage {
                    tone: Tone::Success,
                    text,
                    headline: Some(headline),
                }
            }
            JobOutcome::Rejected(envelope) => StatusMessage {
                tone: Tone::Warning,
                text: format!(
                    "⚠️ {}\n\n{}\n{}",
                    envelope.message,
                    envelope.stdout(),
                    envelope.stderr()
                ),
                headline: None,
            },
            JobOutcome::RequestFailed(error) => StatusMessage {
                tone: Tone::Failure,
                text: format!("❌ Request failed: Error: {}", error),
                headline: None,
            },
        }
    }
}
