use crate::api::{
    DeckImage, DeckImages, DeckList, JobKind, JobTransport, ModelKind, ModelList, TransportError,
};
use crate::app::state::{JobSlot, Selections, ValidationError};
use crate::app::status::{JobOutcome, StatusMessage};
use crate::utils::file_size::FileSizeUtils;
use derivative::Derivative;
use std::path::Path;
use std::sync::mpsc::{self as std_mpsc, Receiver, Sender};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Results of background work, applied on the UI thread by [`JobConsole::poll`].
#[derive(Debug)]
pub enum ConsoleUpdate {
    JobFinished {
        kind: JobKind,
        outcome: JobOutcome,
    },
    DecksLoaded(Result<DeckList, TransportError>),
    ModelsLoaded {
        kind: ModelKind,
        result: Result<ModelList, TransportError>,
    },
    DeckImagesLoaded {
        deck: String,
        result: Result<DeckImages, TransportError>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DeckGallery {
    pub deck: Option<String>,
    pub images: Vec<DeckImage>,
    pub loading: bool,
    pub message: Option<String>,
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct JobConsole {
    pub selections: Selections,
    pub gallery: DeckGallery,
    slots: [JobSlot; 3],
    pending_lists: usize,
    #[derivative(Debug = "ignore")]
    transport: Arc<dyn JobTransport>,
    #[derivative(Debug = "ignore")]
    runtime: Handle,
    #[derivative(Debug = "ignore")]
    update_sender: Sender<ConsoleUpdate>,
    #[derivative(Debug = "ignore")]
    update_receiver: Receiver<ConsoleUpdate>,
}

impl JobConsole {
    pub fn new(transport: Arc<dyn JobTransport>, runtime: Handle, default_workers: u8) -> Self {
        let (update_sender, update_receiver) = std_mpsc::channel();
        Self {
            selections: Selections::new(default_workers),
            gallery: DeckGallery::default(),
            slots: JobKind::ALL.map(JobSlot::new),
            pending_lists: 0,
            transport,
            runtime,
            update_sender,
            update_receiver,
        }
    }

    pub fn slot(&self, kind: JobKind) -> &JobSlot {
        &self.slots[kind.index()]
    }

    fn slot_mut(&mut self, kind: JobKind) -> &mut JobSlot {
        &mut self.slots[kind.index()]
    }

    pub fn can_submit(&self, kind: JobKind) -> bool {
        !self.slot(kind).is_busy() && self.selections.can_submit(kind)
    }

    pub fn is_loading_lists(&self) -> bool {
        self.pending_lists > 0
    }

    pub fn has_work_in_flight(&self) -> bool {
        self.is_loading_lists()
            || self.gallery.loading
            || self.slots.iter().any(JobSlot::is_busy)
    }

    /// Picks the file to sync. Returns whether it was accepted.
    pub fn select_file(&mut self, path: &Path) -> bool {
        let size = std::fs::metadata(path).ok().map(|m| m.len());
        let status = match self.selections.choose_file(path, size) {
            Ok(file) => {
                tracing::info!(file = %file.path.display(), "selected PDF for sync");
                let size = file
                    .size
                    .map(|s| format!(" ({})", FileSizeUtils::format_size(s)))
                    .unwrap_or_default();
                StatusMessage::info(format!("Ready to sync: {}{}", file.name, size))
            }
            Err(e) => {
                tracing::info!(file = %path.display(), reason = %e, "rejected file selection");
                StatusMessage::invalid(&e)
            }
        };
        self.slot_mut(JobKind::Sync).note(status);
        self.selections.pending_file.is_some()
    }

    /// Validates the slot's inputs and, if they hold, sends its one request.
    ///
    /// Returns `true` only when a request was actually issued.
    pub fn submit(&mut self, kind: JobKind) -> bool {
        if self.slot(kind).is_busy() {
            tracing::debug!(?kind, "ignoring submit while request is outstanding");
            return false;
        }

        let request = match self.selections.build_request(kind) {
            Ok(request) => request,
            Err(e) => {
                self.reject(kind, &e);
                return false;
            }
        };

        self.slot_mut(kind).begin();
        tracing::info!(?kind, endpoint = kind.endpoint(), "submitting job");

        let transport = Arc::clone(&self.transport);
        let sender = self.update_sender.clone();
        self.runtime.spawn(async move {
            let outcome = JobOutcome::from_result(transport.submit(&request).await);
            let _ = sender.send(ConsoleUpdate::JobFinished { kind, outcome });
        });
        true
    }

    fn reject(&mut self, kind: JobKind, error: &ValidationError) {
        tracing::info!(?kind, %error, "job not submitted");
        self.slot_mut(kind).reject(error);
    }

    pub fn refresh_decks(&mut self) {
        tracing::info!("loading deck list");
        self.pending_lists += 1;
        let transport = Arc::clone(&self.transport);
        let sender = self.update_sender.clone();
        self.runtime.spawn(async move {
            let result = transport.list_decks().await;
            let _ = sender.send(ConsoleUpdate::DecksLoaded(result));
        });
    }

    /// `force` asks the service to drop its cached model catalogue first.
    pub fn refresh_models(&mut self, kind: ModelKind, force: bool) {
        tracing::info!(%kind, force, "loading model list");
        self.pending_lists += 1;
        let transport = Arc::clone(&self.transport);
        let sender = self.update_sender.clone();
        self.runtime.spawn(async move {
            let result = transport.list_models(kind, force).await;
            let _ = sender.send(ConsoleUpdate::ModelsLoaded { kind, result });
        });
    }

    pub fn refresh_all(&mut self, force: bool) {
        self.refresh_decks();
        for kind in ModelKind::ALL {
            self.refresh_models(kind, force);
        }
    }

    pub fn load_deck_images(&mut self, deck: &str) {
        let deck = deck.trim().to_string();
        if deck.is_empty() {
            self.gallery.message = Some(ValidationError::MissingDeck.to_string());
            return;
        }

        tracing::info!(%deck, "loading deck images");
        self.gallery.loading = true;
        self.gallery.deck = Some(deck.clone());
        let transport = Arc::clone(&self.transport);
        let sender = self.update_sender.clone();
        self.runtime.spawn(async move {
            let result = transport.deck_images(&deck).await;
            let _ = sender.send(ConsoleUpdate::DeckImagesLoaded { deck, result });
        });
    }

    /// Applies every finished background result. Returns whether anything changed.
    pub fn poll(&mut self) -> bool {
        let mut had_updates = false;
        while let Ok(update) = self.update_receiver.try_recv() {
            had_updates = true;
            self.apply(update);
        }
        had_updates
    }

    fn apply(&mut self, update: ConsoleUpdate) {
        match update {
            ConsoleUpdate::JobFinished { kind, outcome } => {
                match &outcome {
                    JobOutcome::Completed(envelope) => tracing::info!(
                        ?kind,
                        items = ?envelope.items_processed,
                        "job completed"
                    ),
                    JobOutcome::Rejected(envelope) => {
                        tracing::warn!(?kind, message = %envelope.message, "job rejected by service")
                    }
                    JobOutcome::RequestFailed(error) => {
                        tracing::error!(?kind, %error, "job request failed")
                    }
                }
                self.slot_mut(kind).finish(&outcome);
            }
            ConsoleUpdate::DecksLoaded(result) => {
                self.pending_lists = self.pending_lists.saturating_sub(1);
                let decks = [
                    &mut self.selections.audio_deck,
                    &mut self.selections.image_deck,
                ];
                match result {
                    Ok(list) => {
                        tracing::info!(count = list.decks.len(), ok = list.ok, "deck list loaded");
                        for deck in decks {
                            deck.apply_listing(
                                list.ok,
                                list.decks.clone(),
                                list.message.as_deref(),
                                "No decks found.",
                            );
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to load deck list");
                        for deck in decks {
                            deck.fail(format!("Failed to load decks: {}", e));
                        }
                    }
                }
            }
            ConsoleUpdate::ModelsLoaded { kind, result } => {
                self.pending_lists = self.pending_lists.saturating_sub(1);
                let models = self.selections.models_mut(kind);
                match result {
                    Ok(list) => {
                        tracing::info!(%kind, count = list.models.len(), ok = list.ok, "model list loaded");
                        models.apply_listing(
                            list.ok,
                            list.models,
                            list.message.as_deref(),
                            &format!("No {} models found.", kind),
                        );
                    }
                    Err(e) => {
                        tracing::error!(%kind, error = %e, "failed to load model list");
                        models.fail(format!("Failed to load {} models: {}", kind, e));
                    }
                }
            }
            ConsoleUpdate::DeckImagesLoaded { deck, result } => {
                // A newer request for another deck supersedes this one.
                if self.gallery.deck.as_deref() != Some(deck.as_str()) {
                    return;
                }
                self.gallery.loading = false;
                match result {
                    Ok(listing) if listing.ok => {
                        self.gallery.message = if listing.images.is_empty() {
                            Some(format!("No generated images found for {}.", deck))
                        } else {
                            None
                        };
                        self.gallery.images = listing.images;
                    }
                    Ok(listing) => {
                        self.gallery.images.clear();
                        self.gallery.message = Some(
                            listing
                                .message
                                .unwrap_or_else(|| "Could not load deck images.".to_string()),
                        );
                    }
                    Err(e) => {
                        tracing::error!(%deck, error = %e, "failed to load deck images");
                        self.gallery.images.clear();
                        self.gallery.message = Some(format!("Request failed: Error: {}", e));
                    }
                }
            }
        }
    }
}
