use clap::Parser;
use colored::Colorize;
use iterablectl::infrastructure::http_client::HyperHttpClient;
use iterablectl::infrastructure::logging;
use iterablectl::presentation::cli::Cli;

/// iterablectl: a command-line client for the Iterable API
///
/// Looks up, updates, merges and deletes user profiles, and lists the
/// project's mailing lists, list members and campaigns. Each invocation
/// sends a single request and prints the decoded result as a table or JSON.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(err) = run(&cli).await {
        eprintln!("{} {:#}", "Error:".red(), err);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.config()?;
    let request_service = HyperHttpClient::new()?.create_request_service(&config);
    cli.run(&request_service).await
}
