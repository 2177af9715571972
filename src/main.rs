use clap::Parser;
use lansweep::cli::{self, Cli};
use lansweep::output;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = cli::run(cli).await {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}
