//! Off-UI-thread fetching.
//!
//! At most one lookup is in flight; a second request while one is pending is
//! rejected rather than queued. The worker never touches history or display
//! state, it only hands the outcome back over a channel.

use std::{
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
};
use tracing::{debug, warn};
use weather_core::{WeatherClient, WeatherData, WeatherError};

/// Result of one lookup plus the best-effort icon download.
#[derive(Debug)]
pub struct FetchOutcome {
    pub query: String,
    pub result: Result<WeatherData, WeatherError>,
    pub icon: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Busy {
    pub pending_query: String,
}

#[derive(Debug)]
struct Pending {
    query: String,
    rx: Receiver<FetchOutcome>,
}

#[derive(Debug)]
pub struct FetchWorker {
    client: WeatherClient,
    pending: Option<Pending>,
}

impl FetchWorker {
    pub fn new(client: WeatherClient) -> Self {
        Self {
            client,
            pending: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_query(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.query.as_str())
    }

    /// Start a lookup on a background thread; `notify` runs once it has finished.
    pub fn start<F>(&mut self, query: &str, notify: F) -> Result<(), Busy>
    where
        F: Fn() + Send + 'static,
    {
        if let Some(pending) = &self.pending {
            return Err(Busy {
                pending_query: pending.query.clone(),
            });
        }

        let (tx, rx) = mpsc::channel();
        let client = self.client.clone();
        let thread_query = query.to_string();

        thread::spawn(move || {
            let outcome = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt.block_on(fetch_with_icon(&client, thread_query)),
                Err(err) => FetchOutcome {
                    query: thread_query,
                    result: Err(WeatherError::Connection(format!(
                        "failed to start async runtime: {err}"
                    ))),
                    icon: None,
                },
            };

            if tx.send(outcome).is_err() {
                debug!("fetch finished after the window closed");
            }
            notify();
        });

        self.pending = Some(Pending {
            query: query.to_string(),
            rx,
        });
        Ok(())
    }

    /// Non-blocking check for a finished lookup.
    pub fn poll(&mut self) -> Option<FetchOutcome> {
        let pending = self.pending.as_ref()?;

        match pending.rx.try_recv() {
            Ok(outcome) => {
                self.pending = None;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!(query = %pending.query, "fetch worker exited without a result");
                let query = pending.query.clone();
                self.pending = None;
                Some(FetchOutcome {
                    query,
                    result: Err(WeatherError::Connection("fetch worker stopped".to_string())),
                    icon: None,
                })
            }
        }
    }
}

async fn fetch_with_icon(client: &WeatherClient, query: String) -> FetchOutcome {
    let result = client.fetch(&query).await;

    let icon = match &result {
        Ok(WeatherData {
            icon_url: Some(url), ..
        }) => client.fetch_icon(url).await,
        _ => None,
    };

    FetchOutcome {
        query,
        result,
        icon,
    }
}
