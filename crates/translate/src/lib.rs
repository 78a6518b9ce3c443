#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]
#![deny(missing_docs, unused_must_use)]

//! Interactive translation client: debounced requests, per-token candidates.
//!
//! Free text goes in, a prediction server answers with one probability
//! vector per output position, and the client shows the argmax tokens with
//! their ranked alternatives on hover.
//!
//! Layout (important files):
//! - `config.rs` - `ClientConfig` and the shared command-line flags
//! - `client.rs` - `Predictor` trait, `HttpPredictor`, `PredictError`
//! - `controller.rs` - debounce + request lifecycle (`RequestState`)
//! - `render.rs` - plain-text rendering for the terminal client
//! - `echo.rs` - deterministic toy model for local development
//! - `server.rs` - tiny_http server exposing the toy model
//! - `bin/gui.rs` - egui desktop client
//! - `bin/translate.rs` - terminal client
//! - `bin/server.rs` - development prediction server

/// Client configuration and flags.
pub mod config;
pub use config::{ClientArgs, ClientConfig};
/// Predict endpoint client.
pub mod client;
pub use client::{HttpPredictor, PredictError, Predictor};
/// Debounced request controller.
pub mod controller;
pub use controller::{Controller, RequestState};
/// Terminal rendering.
pub mod render;
/// Toy model used by the development server.
pub mod echo;
pub use echo::EchoModel;
/// Development prediction server.
pub mod server;

use log::LevelFilter;

/// Install the process-wide logger at `level`.
pub fn init_logging(level: LevelFilter) -> anyhow::Result<()> {
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .init()?;
    Ok(())
}
