use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use brokersim::api::{Cli, Command, run_http_server, run_simulate_command};

fn init_tracing() {
    let log_format = std::env::var("BROKERSIM_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port } => {
            if let Err(e) = run_http_server(port).await {
                tracing::error!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Simulate(args) => match run_simulate_command(&args) {
            Ok(output) => print!("{output}"),
            Err(e) => {
                tracing::error!("{e}");
                std::process::exit(1);
            }
        },
    }
}
