#![forbid(unsafe_code)]

use log::debug;
use tokens::{PredictRequest, PredictionResponse, ResponseError};

use crate::config::ClientConfig;

/// Why a prediction could not be obtained.
///
/// Transport and status failures share the generic "network error" text;
/// no server-provided detail is surfaced.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    /// Connection refused, timeout, interrupted body, ...
    #[error("network error")]
    Transport(#[source] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("network error (HTTP {0})")]
    Status(u16),
    /// The body is not a prediction response.
    #[error("malformed prediction response: {0}")]
    Malformed(#[source] serde_json::Error),
    /// The body parsed but is structurally invalid.
    #[error("invalid prediction response: {0}")]
    Invalid(#[from] ResponseError),
}

/// Something that can turn input text into a prediction response.
pub trait Predictor: Send + Sync {
    /// Run one prediction. Called from a worker thread, never retried.
    fn predict(&self, input_text: &str) -> Result<PredictionResponse, PredictError>;
}

/// `Predictor` backed by a JSON POST to the configured endpoint.
pub struct HttpPredictor {
    endpoint: String,
    http: reqwest::blocking::Client,
}

impl HttpPredictor {
    /// Build a client with the endpoint and timeout from `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, PredictError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(PredictError::Transport)?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            http,
        })
    }

    /// Endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Predictor for HttpPredictor {
    fn predict(&self, input_text: &str) -> Result<PredictionResponse, PredictError> {
        let body = PredictRequest {
            input_text: input_text.to_owned(),
        };
        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(PredictError::Transport)?;

        let status = response.status();
        debug!("POST {} -> {}", self.endpoint, status);
        if !status.is_success() {
            return Err(PredictError::Status(status.as_u16()));
        }

        let bytes = response.bytes().map_err(PredictError::Transport)?;
        serde_json::from_slice(&bytes).map_err(PredictError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::echo::EchoModel;
    use crate::server;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;
    use tiny_http::{Response, Server, StatusCode};

    fn predictor(addr: SocketAddr) -> HttpPredictor {
        HttpPredictor::new(&ClientConfig {
            endpoint: format!("http://{addr}/predict"),
            timeout: Duration::from_secs(5),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    // answers every request with a fixed status and body
    fn canned(status: u16, body: &'static str) -> SocketAddr {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        thread::spawn(move || {
            for request in server.incoming_requests() {
                let response = Response::from_string(body).with_status_code(StatusCode(status));
                let _ = request.respond(response);
            }
        });
        addr
    }

    #[test]
    fn posts_input_text_and_parses_response() {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        thread::spawn(move || server::serve(server, Arc::new(EchoModel::default())));

        let response = predictor(addr).predict("a girl in a hat").unwrap();
        assert_eq!(response, EchoModel::default().predict("a girl in a hat"));
        let tags: Vec<String> = response
            .into_translation()
            .unwrap()
            .tokens
            .into_iter()
            .map(|t| t.token)
            .collect();
        assert_eq!(tags, vec!["1girl", "hat"]);
    }

    #[test]
    fn server_error_is_status() {
        let addr = canned(500, "boom: internal detail");
        let err = predictor(addr).predict("anything").unwrap_err();
        assert!(matches!(err, PredictError::Status(500)));
        assert_eq!(err.to_string(), "network error (HTTP 500)");
    }

    #[test]
    fn non_json_body_is_malformed() {
        let addr = canned(200, "<html>not json</html>");
        let err = predictor(addr).predict("anything").unwrap_err();
        assert!(matches!(err, PredictError::Malformed(_)));
    }

    #[test]
    fn missing_logits_is_malformed() {
        let addr = canned(200, r#"{"vocab":{"a":0}}"#);
        let err = predictor(addr).predict("anything").unwrap_err();
        assert!(matches!(err, PredictError::Malformed(_)));
    }

    #[test]
    fn refused_connection_is_transport() {
        // bind then drop to get a port nobody listens on
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let err = predictor(addr).predict("anything").unwrap_err();
        assert!(matches!(err, PredictError::Transport(_)));
        assert_eq!(err.to_string(), "network error");
    }
}
