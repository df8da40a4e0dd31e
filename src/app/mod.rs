mod console;
mod state;
mod status;
mod ui;

use eframe::{egui, App};
use std::time::Duration;

pub use console::{ConsoleUpdate, DeckGallery, JobConsole};
pub use state::{
    is_pdf_name, ChoiceList, JobSlot, Selections, SlotPhase, ValidationError, DEFAULT_WORKERS,
    MAX_WORKERS,
};
pub use status::{JobOutcome, StatusMessage, Tone};

pub struct DeckConsoleApp {
    console: JobConsole,
    server_url: String,
    hovering_files: bool,
}

impl DeckConsoleApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, console: JobConsole, server_url: String) -> Self {
        tracing::info!(%server_url, "initializing deck console");
        Self {
            console,
            server_url,
            hovering_files: false,
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.clone(),
            )
        });
        self.hovering_files = hovering;

        // Only the first dropped file is considered.
        if let Some(file) = dropped.first() {
            match &file.path {
                Some(path) => {
                    self.console.select_file(path);
                }
                None => tracing::warn!(name = %file.name, "dropped file has no local path"),
            }
        }
    }
}

impl App for DeckConsoleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        if self.console.poll() {
            ctx.request_repaint();
        }

        self.render(ctx);

        // Keep spinners moving and pick up background results promptly.
        if self.console.has_work_in_flight() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
