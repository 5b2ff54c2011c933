use egui::ColorImage;
use tracing::debug;
use weather_core::{
    WeatherClient, WeatherError, WeatherSession,
    present::{self, WeatherCard},
};

use crate::worker::{FetchOutcome, FetchWorker};

const ICON_SIZE: u32 = 100;

/// What the central display region shows.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Welcome,
    Loading(String),
    Weather(WeatherCard),
    Error { title: String, message: String },
}

#[derive(Debug)]
struct Backend {
    session: WeatherSession,
    worker: FetchWorker,
}

/// UI-thread state behind the window, independent of any widget code.
///
/// History and displayed state change only here, when an outcome is polled.
#[derive(Debug)]
pub struct Controller {
    backend: Option<Backend>,
    pub input: String,
    pub history_open: bool,
    view: View,
    status: String,
    icon_update: Option<Option<ColorImage>>,
}

impl Controller {
    pub fn new(client: Result<WeatherClient, WeatherError>) -> Self {
        match client {
            Ok(client) => Self {
                backend: Some(Backend {
                    session: WeatherSession::new(client.clone()),
                    worker: FetchWorker::new(client),
                }),
                input: String::new(),
                history_open: false,
                view: View::Welcome,
                status: "Ready".to_string(),
                icon_update: None,
            },
            Err(err) => Self {
                backend: None,
                input: String::new(),
                history_open: false,
                view: error_view(&err),
                status: format!("Error: {} ERROR", err.kind()),
                icon_update: None,
            },
        }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.backend.as_ref().is_some_and(|b| b.worker.is_busy())
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Start a lookup for the current input. `notify` wakes the UI when it finishes.
    pub fn search<F>(&mut self, notify: F)
    where
        F: Fn() + Send + 'static,
    {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };

        let query = self.input.trim().to_string();
        if let Some(pending) = backend.worker.pending_query() {
            debug!(rejected = %query, pending, "search already in flight");
            self.status = format!("Still fetching weather for {pending}; please wait.");
            return;
        }

        if query.is_empty() {
            self.view = error_view(&WeatherError::EmptyQuery);
            self.status = present::EMPTY_QUERY.to_string();
            return;
        }

        match backend.worker.start(&query, notify) {
            Ok(()) => {
                self.status = format!("Fetching weather data for {query}...");
                self.view = View::Loading(query);
            }
            Err(busy) => {
                debug!(rejected = %query, pending = %busy.pending_query, "search already in flight");
                self.status = format!(
                    "Still fetching weather for {}; please wait.",
                    busy.pending_query
                );
            }
        }
    }

    /// Apply a finished lookup, if any. Returns `true` when something changed.
    pub fn poll(&mut self) -> bool {
        let Some(outcome) = self.backend.as_mut().and_then(|b| b.worker.poll()) else {
            return false;
        };
        self.apply(outcome);
        true
    }

    fn apply(&mut self, outcome: FetchOutcome) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };

        match backend.session.complete(&outcome.query, outcome.result) {
            Ok(data) => {
                self.view = View::Weather(WeatherCard::from(&data));
                self.status = format!("Displaying weather for {}", outcome.query);
                self.icon_update = Some(outcome.icon.as_deref().and_then(decode_icon));
            }
            Err(err) => {
                self.view = error_view(&err);
                self.status = format!("Error: {} ERROR", err.kind());
                self.icon_update = Some(None);
            }
        }
    }

    /// Icon change since the last call: `Some(None)` clears the current icon.
    pub fn take_icon_update(&mut self) -> Option<Option<ColorImage>> {
        self.icon_update.take()
    }

    /// `None` when there is nothing to list yet.
    pub fn history_lines(&self) -> Option<Vec<String>> {
        let history = self.backend.as_ref()?.session.history();
        if history.is_empty() {
            None
        } else {
            Some(present::history_lines(history, None))
        }
    }
}

fn error_view(err: &WeatherError) -> View {
    View::Error {
        title: format!("{} ERROR", err.kind()),
        message: present::error_message(err),
    }
}

/// Decode and scale the condition icon; undecodable bytes mean no icon.
pub fn decode_icon(bytes: &[u8]) -> Option<ColorImage> {
    let image = match image::load_from_memory(bytes) {
        Ok(image) => image,
        Err(err) => {
            debug!(error = %err, "icon is not a readable image");
            return None;
        }
    };

    let rgba = image
        .resize(ICON_SIZE, ICON_SIZE, image::imageops::FilterType::Lanczos3)
        .to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];

    Some(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}
