use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Instant;

use anyhow::bail;
use clap::Parser;

use translate::render::render_state;
use translate::{ClientArgs, Controller, HttpPredictor, RequestState};

/// Terminal translation client.
///
/// With TEXT, translates once and exits. Without it, reads one input per
/// line; an empty line clears the output.
#[derive(Parser)]
#[command(name = "translate")]
struct Cli {
    #[command(flatten)]
    client: ClientArgs,

    /// List ranked candidates under every token
    #[arg(short, long)]
    candidates: bool,

    /// Text to translate (omit for interactive mode)
    text: Vec<String>,
}

// feed one input through the controller and block until it resolves
fn run_once(controller: &mut Controller<HttpPredictor>, text: &str, cli: &Cli) -> RequestState {
    controller.set_input(text, Instant::now());
    while let Some(deadline) = controller.next_deadline() {
        thread::sleep(deadline.saturating_duration_since(Instant::now()));
        controller.poll(Instant::now());
    }
    let timeout = cli.client.config().timeout;
    if !controller.wait(timeout) {
        return RequestState::Failed("timed out waiting for a response".to_string());
    }
    controller.state().clone()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    translate::init_logging(cli.client.log_level)?;
    let config = cli.client.config();
    let mut controller = Controller::new(HttpPredictor::new(&config)?, config.quiet_period);

    if !cli.text.is_empty() {
        let text = cli.text.join(" ");
        let state = run_once(&mut controller, &text, &cli);
        println!("{}", render_state(&state, config.top_n, cli.candidates));
        if let RequestState::Failed(msg) = state {
            bail!(msg);
        }
        return Ok(());
    }

    println!("Interactive translation: enter text, empty line clears, Ctrl-D to exit");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        let state = run_once(&mut controller, &line, &cli);
        println!("{}", render_state(&state, config.top_n, cli.candidates));
        stdout.flush()?;
    }
    Ok(())
}
