//! The single outbound HTTP seam.
//!
//! [`crate::WeatherClient`] only ever talks to a [`Transport`]; production code uses
//! [`ReqwestTransport`], tests swap in a scripted one.

use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};
use thiserror::Error;

/// Status and raw body of a completed exchange, success or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The remote could not be reached or the exchange broke off midway.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse, TransportError>;

    async fn get_bytes(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.get(url, &[]).await
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| TransportError(format!("failed to build HTTP client: {err}")))?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse, TransportError> {
        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|err| TransportError(describe(&err)))?;

        let status = res.status().as_u16();
        let body = res
            .bytes()
            .await
            .map_err(|err| TransportError(describe(&err)))?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    }
}

/// In-memory transport replaying canned responses in order.
#[cfg(any(test, feature = "testing"))]
pub mod scripted {
    use super::*;
    use std::{
        collections::VecDeque,
        sync::{Arc, Mutex},
    };

    /// A recorded outbound call.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Call {
        pub url: String,
        pub query: Vec<(String, String)>,
    }

    /// Clones share the same script and call log.
    #[derive(Debug, Clone, Default)]
    pub struct ScriptedTransport {
        replies: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, status: u16, body: impl Into<Vec<u8>>) -> Self {
            self.push(Ok(HttpResponse::new(status, body)));
            self
        }

        pub fn fail(self, message: &str) -> Self {
            self.push(Err(TransportError(message.to_string())));
            self
        }

        pub fn push(&self, reply: Result<HttpResponse, TransportError>) {
            self.replies.lock().unwrap().push_back(reply);
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse, TransportError> {
            self.calls.lock().unwrap().push(Call {
                url: url.to_string(),
                query: query
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            });

            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError("no scripted reply left".to_string())))
        }
    }
}
