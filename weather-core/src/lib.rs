//! Core library for the weather app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather client and its error taxonomy
//! - Shared domain models and the per-run search history
//! - Text formatting shared by every front-end
//!
//! It is used by `weather-cli` and `weather-gui`, which are thin adapters over
//! [`WeatherSession`].

pub mod client;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod present;
pub mod session;
pub mod transport;

pub use client::WeatherClient;
pub use config::{ClientConfig, Config};
pub use error::{ErrorKind, WeatherError};
pub use history::HistoryStore;
pub use model::{HistoryEntry, WeatherData};
pub use session::WeatherSession;
pub use transport::{HttpResponse, Transport, TransportError};
