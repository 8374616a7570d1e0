mod defines;
mod impls;
mod logging;
mod types;
mod util;

use clap::{ErrorKind, Parser};
use tracing::error;

use defines::*;
use types::*;

fn main() {
    // pick up a .env file before anything reads the environment
    dotenvy::dotenv().ok();

    if let Err(e) = logging::init(LOG_FILE_NAME) {
        eprintln!("Error: failed to set up logging: {:#}", e);
        std::process::exit(1);
    }

    // parse and validate arguments; exits the process on bad input
    let request = parse_and_validate();

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("API keys not loaded. Check your .env file. ({})", e);
            println!("Error: API_KEY or API_SECRET not found.");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(credentials, &request) {
        error!("Main execution failed: {:#}", e);
        std::process::exit(1);
    }
}

/// Turn raw command-line input into a validated `OrderRequest`. This is
/// the only place allowed to exit the process over bad input; a rejected
/// request never gets as far as constructing a client.
fn parse_and_validate() -> OrderRequest {
    let args = match CommandlineArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            // help/version are a normal exit, not a usage error
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    match args.into_order_request() {
        Ok(request) => request,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Everything past validation. An `Err` out of here is an unexpected
/// failure; expected exchange rejections were already reported inside
/// `submit_order` and still count as a normal run.
fn run(credentials: Credentials, request: &OrderRequest) -> anyhow::Result<()> {
    // testnet only; pointing this at mainnet is a deliberate code change
    let ctx = util::connect(credentials, true)?;
    util::submit_order(&ctx, request)?;
    Ok(())
}
