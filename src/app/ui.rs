use super::DeckConsoleApp;
use crate::api::JobKind;
use crate::app::console::JobConsole;
use crate::app::state::{ChoiceList, JobSlot, MAX_WORKERS};
use crate::app::status::Tone;
use crate::utils::color::{accent, tone_color};
use eframe::egui::{self, Align, RichText};
use rfd::FileDialog;

impl DeckConsoleApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let footer_height = 40.0;
            let content_height = ui.available_height() - footer_height;

            egui::ScrollArea::vertical()
                .max_height(content_height)
                .show(ui, |ui| {
                    ui.add_space(20.0);
                    ui.vertical_centered(|ui| {
                        ui.heading("Deck Console");
                        ui.add_space(5.0);
                        ui.label(
                            RichText::new("Turn PDFs into decks, then give them audio and images")
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                        );
                    });

                    ui.add_space(20.0);
                    self.render_sync(ui);
                    ui.add_space(16.0);
                    self.render_audio(ui);
                    ui.add_space(16.0);
                    self.render_images(ui);
                    ui.add_space(16.0);
                    self.render_gallery(ui);
                    ui.add_space(20.0);
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(10.0);
                self.render_footer(ui);
            });
        });
    }

    fn render_sync(&mut self, ui: &mut egui::Ui) {
        let hovering = self.hovering_files;
        ui.group(|ui| {
            ui.label(RichText::new(JobKind::Sync.title()).strong());
            ui.add_space(8.0);

            let stroke_color = if hovering {
                accent()
            } else {
                ui.visuals().widgets.noninteractive.bg_stroke.color
            };
            egui::Frame::none()
                .stroke(egui::Stroke::new(1.5, stroke_color))
                .rounding(6.0)
                .inner_margin(16.0)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.vertical_centered(|ui| {
                        match &self.console.selections.pending_file {
                            Some(file) => ui.label(format!("📄 {}", file.name)),
                            None => ui.label("Drop a PDF here"),
                        };
                        ui.add_space(4.0);
                        if ui.button("📁 Choose PDF").clicked() {
                            if let Some(path) = FileDialog::new()
                                .add_filter("PDF", &["pdf", "PDF"])
                                .pick_file()
                            {
                                self.console.select_file(&path);
                            }
                        }
                    });
                });

            ui.add_space(8.0);
            let selections = &mut self.console.selections;
            ui.horizontal(|ui| {
                ui.label("Deck name");
                ui.add(
                    egui::TextEdit::singleline(&mut selections.deck_name)
                        .hint_text("defaults to the PDF name"),
                );
            });
            ui.horizontal(|ui| {
                ui.label("Text model");
                choice_combo(ui, "text_model", &mut selections.text_models);
            });
            ui.checkbox(&mut selections.romanized, "Include romanized text");

            submit_row(ui, &mut self.console, JobKind::Sync, "🔄 Sync Deck");
            status_area(ui, self.console.slot(JobKind::Sync));
        });
    }

    fn render_audio(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(RichText::new(JobKind::Audio.title()).strong());
            ui.add_space(8.0);

            let selections = &mut self.console.selections;
            egui::Grid::new("audio_inputs")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    ui.label("Deck");
                    choice_combo(ui, "audio_deck", &mut selections.audio_deck);
                    ui.end_row();

                    ui.label("Audio model");
                    choice_combo(ui, "audio_model", &mut selections.audio_models);
                    ui.end_row();

                    ui.label("Workers");
                    workers_combo(ui, "audio_workers", &mut selections.audio_workers);
                    ui.end_row();

                    ui.label("Voice");
                    ui.add(
                        egui::TextEdit::singleline(&mut selections.voice)
                            .hint_text("service default"),
                    );
                    ui.end_row();

                    ui.label("Instructions");
                    ui.add(
                        egui::TextEdit::singleline(&mut selections.instructions)
                            .hint_text("optional speaking style"),
                    );
                    ui.end_row();
                });

            submit_row(ui, &mut self.console, JobKind::Audio, "🔊 Generate Audio");
            status_area(ui, self.console.slot(JobKind::Audio));
        });
    }

    fn render_images(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(RichText::new(JobKind::Images.title()).strong());
            ui.add_space(8.0);

            let selections = &mut self.console.selections;
            egui::Grid::new("image_inputs")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    ui.label("Deck");
                    choice_combo(ui, "image_deck", &mut selections.image_deck);
                    ui.end_row();

                    ui.label("Image model");
                    choice_combo(ui, "image_model", &mut selections.image_models);
                    ui.end_row();

                    ui.label("Workers");
                    workers_combo(ui, "image_workers", &mut selections.image_workers);
                    ui.end_row();

                    ui.label("Prompt");
                    ui.add(
                        egui::TextEdit::multiline(&mut selections.prompt)
                            .desired_rows(2)
                            .hint_text("optional prompt override"),
                    );
                    ui.end_row();
                });
            ui.checkbox(
                &mut self.console.selections.skip_gating,
                "Skip gating (generate for every card)",
            );

            submit_row(ui, &mut self.console, JobKind::Images, "🖼 Generate Images");
            status_area(ui, self.console.slot(JobKind::Images));
        });
    }

    fn render_gallery(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Deck images")
            .default_open(false)
            .show(ui, |ui| {
                let deck = self
                    .console
                    .selections
                    .image_deck
                    .selected()
                    .map(str::to_string);

                ui.horizontal(|ui| {
                    let label = match &deck {
                        Some(deck) => format!("Show images for {}", deck),
                        None => "Select a deck above".to_string(),
                    };
                    let enabled = deck.is_some() && !self.console.gallery.loading;
                    if ui.add_enabled(enabled, egui::Button::new(label)).clicked() {
                        if let Some(deck) = &deck {
                            self.console.load_deck_images(deck);
                        }
                    }
                    if self.console.gallery.loading {
                        ui.spinner();
                    }
                });

                if let Some(message) = &self.console.gallery.message {
                    ui.colored_label(tone_color(Tone::Info), message);
                }

                let base_url = self.server_url.clone();
                egui::ScrollArea::vertical()
                    .id_source("deck_images")
                    .max_height(220.0)
                    .show(ui, |ui| {
                        for image in &self.console.gallery.images {
                            ui.horizontal(|ui| {
                                ui.label(RichText::new(format!("#{}", image.card_id)).monospace());
                                ui.label(&image.korean);
                                ui.label(
                                    RichText::new(&image.english)
                                        .color(ui.visuals().text_color().gamma_multiply(0.7)),
                                );
                                if ui.small_button("Open").clicked() {
                                    let url = format!("{}{}", base_url, image.image_url);
                                    if let Err(e) = open::that(&url) {
                                        tracing::warn!(%url, error = %e, "failed to open image");
                                    }
                                }
                            });
                        }
                    });
            });
    }

    fn render_footer(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format!("Server: {}", self.server_url))
                    .color(ui.visuals().text_color().gamma_multiply(0.7)),
            );
            ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                let loading = self.console.is_loading_lists();
                if ui
                    .add_enabled(!loading, egui::Button::new("⟳ Refresh lists"))
                    .clicked()
                {
                    self.console.refresh_all(true);
                }
                if loading {
                    ui.spinner();
                }
            });
        });
    }
}

fn choice_combo(ui: &mut egui::Ui, id: &str, list: &mut ChoiceList) {
    let selected_text = list
        .selected()
        .or(list.placeholder())
        .unwrap_or("Select")
        .to_string();
    let mut picked = None;

    egui::ComboBox::from_id_source(id)
        .selected_text(selected_text)
        .width(260.0)
        .show_ui(ui, |ui| {
            if list.entries().is_empty() {
                for placeholder in list.display_entries() {
                    ui.add_enabled(false, egui::SelectableLabel::new(false, placeholder));
                }
            }
            for entry in list.entries() {
                let is_selected = list.selected() == Some(entry.as_str());
                if ui.selectable_label(is_selected, entry).clicked() {
                    picked = Some(entry.clone());
                }
            }
        });

    if let Some(entry) = picked {
        list.select(&entry);
    }
}

fn workers_combo(ui: &mut egui::Ui, id: &str, workers: &mut Option<u8>) {
    let selected_text = workers
        .map(|w| w.to_string())
        .unwrap_or_else(|| "Select".to_string());

    egui::ComboBox::from_id_source(id)
        .selected_text(selected_text)
        .show_ui(ui, |ui| {
            ui.selectable_value(workers, None, "Select");
            for count in 1..=MAX_WORKERS {
                ui.selectable_value(workers, Some(count), count.to_string());
            }
        });
}

fn submit_row(ui: &mut egui::Ui, console: &mut JobConsole, kind: JobKind, label: &str) {
    ui.add_space(10.0);
    ui.vertical_centered(|ui| {
        let enabled = console.can_submit(kind);
        let button = egui::Button::new(label).min_size(egui::vec2(200.0, 36.0));
        if ui.add_enabled(enabled, button).clicked() {
            console.submit(kind);
        }

        if !console.slot(kind).is_busy() {
            if let Err(e) = console.selections.build_request(kind) {
                ui.colored_label(tone_color(Tone::Invalid), e.to_string());
            }
        }
    });
}

fn status_area(ui: &mut egui::Ui, slot: &JobSlot) {
    if slot.is_busy() {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(slot.busy_label().unwrap_or_default());
        });
        return;
    }

    if let Some(headline) = slot.busy_label() {
        ui.add_space(6.0);
        ui.label(RichText::new(headline).strong());
    }

    if let Some(status) = slot.status() {
        ui.add_space(6.0);
        egui::Frame::none()
            .fill(ui.style().visuals.extreme_bg_color)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                egui::ScrollArea::vertical()
                    .id_source(("status", slot.kind().index()))
                    .max_height(200.0)
                    .show(ui, |ui| {
                        ui.colored_label(
                            tone_color(status.tone),
                            RichText::new(&status.text).monospace(),
                        );
                    });
            });
    }
}
