//! Binary crate for the `weather-gui` desktop window.
//!
//! Lookups run on a worker thread so the window stays responsive; all state
//! changes are applied on the UI thread in the order lookups were issued.

use eframe::egui;
use tracing::warn;
use weather_core::{Config, WeatherClient, config::load_dotenv};

mod app;
mod controller;
mod worker;

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();
    let config = Config::load().unwrap_or_else(|err| {
        warn!(error = %err, "falling back to default configuration");
        Config::default()
    });
    let client = config.client_config().and_then(WeatherClient::new);
    let controller = controller::Controller::new(client);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([700.0, 650.0])
            .with_min_inner_size([650.0, 600.0])
            .with_title("Weather App"),
        ..Default::default()
    };

    eframe::run_native(
        "Weather App",
        options,
        Box::new(|_cc| Ok(Box::new(app::WeatherGuiApp::new(controller)))),
    )
}
