#![forbid(unsafe_code)]

use std::time::Duration;

use clap::builder::TypedValueParser;
use clap::Args;
use log::LevelFilter;
use tokens::DEFAULT_TOP_N;

/// Predict endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/predict";
/// Environment variable that overrides the endpoint.
pub const ENDPOINT_ENV: &str = "TRANSLATE_ENDPOINT";
/// Quiet period before a typed value is considered settled.
pub const DEFAULT_QUIET_MS: u64 = 500;
/// Per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime settings shared by the GUI and terminal clients.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// full URL of the predict endpoint
    pub endpoint: String,
    /// input must stay unchanged this long before a request is sent
    pub quiet_period: Duration,
    /// candidates listed per token
    pub top_n: usize,
    /// HTTP request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            quiet_period: Duration::from_millis(DEFAULT_QUIET_MS),
            top_n: DEFAULT_TOP_N,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Command-line flags for the clients; flatten into a binary's parser.
#[derive(Args, Clone, Debug)]
pub struct ClientArgs {
    /// Predict endpoint URL
    #[arg(long, env = ENDPOINT_ENV, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Quiet period in milliseconds before a request is sent
    #[arg(long, default_value_t = DEFAULT_QUIET_MS)]
    pub quiet_ms: u64,

    /// Number of candidates shown per token
    #[arg(long, default_value_t = DEFAULT_TOP_N, value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    pub top_n: usize,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, default_value = "warn")]
    pub log_level: LevelFilter,
}

impl ClientArgs {
    /// Resolve flags into a `ClientConfig`.
    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            endpoint: self.endpoint.clone(),
            quiet_period: Duration::from_millis(self.quiet_ms),
            top_n: self.top_n,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        client: ClientArgs,
    }

    #[test]
    fn defaults_match_config_default() {
        let cli = Cli::try_parse_from(["translate"]).unwrap();
        // the env override may be set on a developer machine
        let expected = ClientConfig {
            endpoint: cli.client.endpoint.clone(),
            ..ClientConfig::default()
        };
        assert_eq!(cli.client.config(), expected);
        assert_eq!(cli.client.log_level, LevelFilter::Warn);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "translate",
            "--endpoint",
            "http://10.0.0.2:9000/predict",
            "--quiet-ms",
            "250",
            "--top-n",
            "3",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let config = cli.client.config();
        assert_eq!(config.endpoint, "http://10.0.0.2:9000/predict");
        assert_eq!(config.quiet_period, Duration::from_millis(250));
        assert_eq!(config.top_n, 3);
        assert_eq!(cli.client.log_level, LevelFilter::Debug);
    }

    #[test]
    fn zero_candidates_rejected() {
        assert!(Cli::try_parse_from(["translate", "--top-n", "0"]).is_err());
    }
}
