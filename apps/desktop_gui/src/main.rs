mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = client_core::DEFAULT_SERVICE_URL)]
    server_url: String,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(args.server_url, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Hustle 2 CV")
            .with_inner_size([760.0, 820.0])
            .with_min_inner_size([560.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Hustle 2 CV",
        options,
        Box::new(|_cc| Ok(Box::new(ui::app::HustleApp::new(cmd_tx, ui_rx)))),
    )
}
