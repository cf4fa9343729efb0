use clap::Parser;
use inwestor_pro::{Brochure, HttpFetcher, OpenAiClient};
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command-line arguments; clap exits on its own for --help and usage errors
    let args = Args::parse();

    // Initialize logging, RUST_LOG takes precedence
    let default_level = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let settings = match args.settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    ::log::debug!(
        "Using model {} at {}",
        settings.model,
        settings.api_base_url
    );

    let fetcher = match HttpFetcher::new(&settings.user_agent, settings.fetch_timeout_secs) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("Error: cannot create HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let client = match OpenAiClient::new(&settings.api_base_url, settings.llm_timeout_secs) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: cannot create API client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let brochure = Brochure::new(&args.url, settings)
        .with_output(args.output)
        .with_verbose(args.verbose);

    match brochure.run(&fetcher, &client).await {
        Ok(path) => {
            ::log::info!("Brochure written to {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
