use crate::{
    client::WeatherClient,
    error::WeatherError,
    history::HistoryStore,
    model::{HistoryEntry, WeatherData},
};

/// Shared lookup flow for every front-end: fetch, then record on success.
#[derive(Debug)]
pub struct WeatherSession {
    client: WeatherClient,
    history: HistoryStore,
}

impl WeatherSession {
    pub fn new(client: WeatherClient) -> Self {
        Self {
            client,
            history: HistoryStore::new(),
        }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub async fn lookup(&mut self, query: &str) -> Result<WeatherData, WeatherError> {
        let result = self.client.fetch(query).await;
        self.complete(query, result)
    }

    /// Apply the outcome of a fetch that ran elsewhere.
    ///
    /// Only successes reach the history; failures pass through untouched.
    pub fn complete(
        &mut self,
        query: &str,
        result: Result<WeatherData, WeatherError>,
    ) -> Result<WeatherData, WeatherError> {
        if let Ok(data) = &result {
            self.history.record(HistoryEntry::new(query.trim(), data.clone()));
        }
        result
    }
}
