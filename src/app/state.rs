use crate::api::{
    AudioRequest, ImageRequest, JobKind, JobRequest, ModelKind, PendingFile, SyncRequest,
};
use crate::app::status::{JobOutcome, StatusMessage};
use std::path::Path;

pub const DEFAULT_WORKERS: u8 = 3;
pub const MAX_WORKERS: u8 = 8;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please choose a PDF file.")]
    NotPdf,
    #[error("Please rename the file: its name is not valid UTF-8.")]
    UnreadableName,
    #[error("Drop or choose a PDF to sync first.")]
    MissingFile,
    #[error("Please select a {0} model.")]
    MissingModel(ModelKind),
    #[error("Please select a deck.")]
    MissingDeck,
    #[error("Please select the number of workers.")]
    MissingWorkers,
}

pub fn is_pdf_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}

/// A selection control fed from a list the service returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChoiceList {
    entries: Vec<String>,
    selected: Option<String>,
    placeholder: Option<String>,
}

impl ChoiceList {
    pub fn with_placeholder(text: impl Into<String>) -> Self {
        Self {
            placeholder: Some(text.into()),
            ..Default::default()
        }
    }

    /// Replaces the entries with a freshly loaded listing.
    ///
    /// The previous selection survives if it is still listed, otherwise the
    /// first entry is selected. An empty or failed listing leaves a single
    /// placeholder carrying `message`, or `fallback` when there is none.
    pub fn apply_listing(
        &mut self,
        ok: bool,
        entries: Vec<String>,
        message: Option<&str>,
        fallback: &str,
    ) {
        if !ok || entries.is_empty() {
            let text = message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(fallback);
            self.fail(text);
            return;
        }

        let keep = self
            .selected
            .take()
            .filter(|current| entries.contains(current))
            .or_else(|| entries.first().cloned());
        self.entries = entries;
        self.selected = keep;
        self.placeholder = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.entries.clear();
        self.selected = None;
        self.placeholder = Some(message.into());
    }

    pub fn select(&mut self, value: &str) -> bool {
        if self.entries.iter().any(|entry| entry == value) {
            self.selected = Some(value.to_string());
            true
        } else {
            false
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// What the control shows: the entries, or the lone placeholder.
    pub fn display_entries(&self) -> Vec<&str> {
        if self.entries.is_empty() {
            self.placeholder.as_deref().into_iter().collect()
        } else {
            self.entries.iter().map(String::as_str).collect()
        }
    }
}

/// Every input the console collects, read at submit time.
#[derive(Debug, Clone)]
pub struct Selections {
    pub pending_file: Option<PendingFile>,
    pub deck_name: String,
    pub text_models: ChoiceList,
    pub romanized: bool,

    pub audio_deck: ChoiceList,
    pub audio_models: ChoiceList,
    pub audio_workers: Option<u8>,
    pub voice: String,
    pub instructions: String,

    pub image_deck: ChoiceList,
    pub image_models: ChoiceList,
    pub image_workers: Option<u8>,
    pub skip_gating: bool,
    pub prompt: String,
}

impl Default for Selections {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}

impl Selections {
    pub fn new(default_workers: u8) -> Self {
        Self {
            pending_file: None,
            deck_name: String::new(),
            text_models: ChoiceList::with_placeholder("Loading models..."),
            romanized: true,
            audio_deck: ChoiceList::with_placeholder("Loading decks..."),
            audio_models: ChoiceList::with_placeholder("Loading models..."),
            audio_workers: Some(default_workers),
            voice: String::new(),
            instructions: String::new(),
            image_deck: ChoiceList::with_placeholder("Loading decks..."),
            image_models: ChoiceList::with_placeholder("Loading models..."),
            image_workers: Some(default_workers),
            skip_gating: false,
            prompt: String::new(),
        }
    }

    pub fn models_mut(&mut self, kind: ModelKind) -> &mut ChoiceList {
        match kind {
            ModelKind::Text => &mut self.text_models,
            ModelKind::Audio => &mut self.audio_models,
            ModelKind::Image => &mut self.image_models,
        }
    }

    /// Accepts `path` as the file to sync if it names a PDF. Anything else
    /// clears the pending selection.
    ///
    /// The name is uploaded as the multipart filename, so it must be UTF-8.
    pub fn choose_file(
        &mut self,
        path: &Path,
        size: Option<u64>,
    ) -> Result<&PendingFile, ValidationError> {
        let name = match path.file_name().map(|n| n.to_str()) {
            Some(Some(name)) => name.to_string(),
            Some(None) => {
                self.pending_file = None;
                return Err(ValidationError::UnreadableName);
            }
            None => String::new(),
        };

        if !is_pdf_name(&name) {
            self.pending_file = None;
            return Err(ValidationError::NotPdf);
        }

        Ok(&*self.pending_file.insert(PendingFile {
            path: path.to_path_buf(),
            name,
            size,
        }))
    }

    pub fn build_request(&self, kind: JobKind) -> Result<JobRequest, ValidationError> {
        match kind {
            JobKind::Sync => {
                let file = self
                    .pending_file
                    .clone()
                    .ok_or(ValidationError::MissingFile)?;
                let model = required(self.text_models.selected())
                    .ok_or(ValidationError::MissingModel(ModelKind::Text))?;
                Ok(JobRequest::Sync(SyncRequest {
                    file,
                    deck: self.deck_name.trim().to_string(),
                    model,
                    romanized: self.romanized,
                }))
            }
            JobKind::Audio => {
                let deck = required(self.audio_deck.selected()).ok_or(ValidationError::MissingDeck)?;
                let model = required(self.audio_models.selected())
                    .ok_or(ValidationError::MissingModel(ModelKind::Audio))?;
                let workers = self.audio_workers.ok_or(ValidationError::MissingWorkers)?;
                Ok(JobRequest::Audio(AudioRequest {
                    deck,
                    model: Some(model),
                    workers: Some(workers),
                    voice: required(Some(&self.voice)),
                    instructions: required(Some(&self.instructions)),
                }))
            }
            JobKind::Images => {
                let deck = required(self.image_deck.selected()).ok_or(ValidationError::MissingDeck)?;
                let image_model = required(self.image_models.selected())
                    .ok_or(ValidationError::MissingModel(ModelKind::Image))?;
                let workers = self.image_workers.ok_or(ValidationError::MissingWorkers)?;
                Ok(JobRequest::Images(ImageRequest {
                    deck,
                    image_model,
                    skip_gating: self.skip_gating,
                    workers,
                    prompt: required(Some(&self.prompt)),
                }))
            }
        }
    }

    pub fn can_submit(&self, kind: JobKind) -> bool {
        self.build_request(kind).is_ok()
    }
}

fn required(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotPhase {
    #[default]
    Idle,
    Submitting,
    Done,
}

/// One independent action (sync, audio, images) and what it last showed.
#[derive(Debug, Clone)]
pub struct JobSlot {
    kind: JobKind,
    phase: SlotPhase,
    status: Option<StatusMessage>,
}

impl JobSlot {
    pub fn new(kind: JobKind) -> Self {
        Self {
            kind,
            phase: SlotPhase::Idle,
            status: None,
        }
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    pub fn phase(&self) -> SlotPhase {
        self.phase
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.phase == SlotPhase::Submitting
    }

    /// Label for the busy indicator, or the completion headline afterwards.
    pub fn busy_label(&self) -> Option<&str> {
        match self.phase {
            SlotPhase::Submitting => Some(self.kind.busy_phrase()),
            _ => self.status.as_ref().and_then(|s| s.headline.as_deref()),
        }
    }

    /// Moves to `Submitting`. Refused while a request is already outstanding.
    pub fn begin(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.phase = SlotPhase::Submitting;
        self.status = Some(StatusMessage::info(self.kind.busy_phrase()));
        true
    }

    pub fn reject(&mut self, error: &ValidationError) {
        if self.is_busy() {
            return;
        }
        self.phase = SlotPhase::Idle;
        self.status = Some(StatusMessage::invalid(error));
    }

    pub fn finish(&mut self, outcome: &JobOutcome) {
        self.phase = SlotPhase::Done;
        self.status = Some(outcome.render(self.kind));
    }

    /// Informational text, ignored while a request is outstanding.
    pub fn note(&mut self, status: StatusMessage) {
        if !self.is_busy() {
            self.status = Some(status);
        }
    }
}
