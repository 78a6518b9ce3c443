use std::sync::Arc;

use anyhow::anyhow;
use clap::Parser;
use log::{info, LevelFilter};
use tiny_http::Server;

use translate::{server, EchoModel};

/// Development prediction server speaking the `/predict` wire format.
#[derive(Parser)]
#[command(name = "translate-server")]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    addr: String,

    /// Seed for the toy model's score noise
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    translate::init_logging(cli.log_level)?;

    let model = Arc::new(EchoModel::new(cli.seed));
    let server = Server::http(&cli.addr).map_err(|e| anyhow!("failed to bind {}: {e}", cli.addr))?;
    info!(
        "serving {} tokens on http://{}/predict",
        model.vocab().len(),
        cli.addr
    );

    server::serve(server, model);
    Ok(())
}
