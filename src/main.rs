use clap::Parser;
use deck_console::api::HttpTransport;
use deck_console::app::{DeckConsoleApp, JobConsole};
use deck_console::config::{Cli, ConfigError, ConsoleConfig};
use eframe::egui;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Ui(#[from] eframe::Error),
}

fn main() -> Result<(), StartupError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deck_console=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ConsoleConfig::from_cli(Cli::parse())?;
    tracing::info!(server_url = %config.server_url, "starting deck console");

    let runtime = tokio::runtime::Runtime::new()?;
    let transport = Arc::new(HttpTransport::new(config.server_url.clone()));
    let mut console = JobConsole::new(transport, runtime.handle().clone(), config.default_workers);
    console.refresh_all(false);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 820.0])
            .with_min_inner_size([480.0, 600.0]),
        ..Default::default()
    };

    let server_url = config.server_url;
    eframe::run_native(
        "Deck Console",
        options,
        Box::new(move |cc: &eframe::CreationContext<'_>| -> Box<dyn eframe::App> {
            Box::new(DeckConsoleApp::new(cc, console, server_url))
        }),
    )?;

    drop(runtime);
    Ok(())
}
