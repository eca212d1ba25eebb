//! A console client for the codebreaker service.
//!
//! You pick a secret code in your head; the service proposes guesses and you
//! tell it how many positions each guess got right until it cracks the code.

use anyhow::{Context, Result};
use codebreaker::SessionMachine;
use log::info;
use pico_args::Arguments;

use cb_client::{
    api_client::ApiClient,
    config::{ClientConfig, ConfigOverrides},
    console::Console,
};

const HELP: &str = "\
Play codebreaker against a remote solver

USAGE:
  cb_client [OPTIONS]

OPTIONS:
  --server URL          Service URL      [default: http://localhost:5000]
  --colors N            Palette size     [default: 4, range 3-9]
  --timeout SECS        Request timeout  [default: 10]

FLAGS:
  -h, --help            Print help information

ENVIRONMENT:
  CODEBREAKER_SERVER_URL, CODEBREAKER_PALETTE_SIZE and CODEBREAKER_TIMEOUT_SECS
  are read when the matching option isn't given. A .env file is honored.
";

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = ConfigOverrides {
        server_url: pargs.opt_value_from_str("--server")?,
        palette_size: pargs.opt_value_from_str("--colors")?,
        timeout_secs: pargs.opt_value_from_str("--timeout")?,
    };

    env_logger::builder().format_target(false).init();

    let config = ClientConfig::from_env(overrides)?;
    config.validate()?;
    info!(
        "Using {} with {} colors",
        config.server_url, config.palette_size
    );

    let api_client = ApiClient::with_timeout(config.server_url.clone(), config.request_timeout)
        .context("Failed to create API client")?;
    let console = Console::new(SessionMachine::new(api_client), config.palette_size);

    console.run().await
}
