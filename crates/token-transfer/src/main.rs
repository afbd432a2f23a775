//! Token Transfer: send USDC or USDT on Base through a sponsored wallet batch

use eframe::egui;

mod app;
mod bridge;
mod ui;

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Token Transfer");

    let bridge = bridge::TransferBridge::from_env();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Token Transfer")
            .with_inner_size([520.0, 480.0])
            .with_min_inner_size([420.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Token Transfer",
        native_options,
        Box::new(move |cc| Ok(Box::new(app::App::new(cc, bridge)))),
    )
    .map_err(|e| eyre::eyre!("failed to start window: {e}"))
}
