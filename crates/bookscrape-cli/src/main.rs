mod export;
mod handler;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::handler::{
    crawl_settings, handle_invocation, resolve_exchange_rate, InvocationEvent, InvocationResponse,
};

#[derive(Debug, Parser)]
#[command(name = "bookscrape-cli")]
#[command(about = "Book catalogue crawler command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl the catalogue and export every listing to CSV
    Run {
        /// Name used in the output file and the response
        #[arg(long)]
        scraper_name: Option<String>,
        /// Run identifier used in the output file and the response
        #[arg(long)]
        run_id: Option<String>,
    },
    /// Run the handler with an invocation event read from a JSON file
    Invoke {
        /// Path to a JSON document shaped like `{"scraper_input": {...}}`
        event: PathBuf,
    },
    /// Print the crawl targets without walking them
    Categories,
    /// Print the exchange rate a run would use
    Rate,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = bookscrape_core::load_app_config()?;
    logging::init_tracing(&config)?;

    match cli.command {
        Commands::Run {
            scraper_name,
            run_id,
        } => {
            let event = InvocationEvent::new(scraper_name, run_id);
            print_response(&handle_invocation(&event, &config).await)
        }
        Commands::Invoke { event } => {
            let raw = std::fs::read_to_string(&event)
                .with_context(|| format!("failed to read event file {}", event.display()))?;
            let event: InvocationEvent = serde_json::from_str(&raw)
                .with_context(|| format!("invalid invocation event in {}", event.display()))?;
            print_response(&handle_invocation(&event, &config).await)
        }
        Commands::Categories => {
            let crawler = bookscrape_scraper::Crawler::new(crawl_settings(&config))?;
            for target in crawler.targets().await? {
                println!("{target}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Rate => {
            match resolve_exchange_rate(&config).await {
                Some(rate) => println!(
                    "1 {} = {} {}",
                    config.source_currency, rate, config.target_currency
                ),
                None => println!("currency conversion disabled"),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_response(response: &InvocationResponse) -> anyhow::Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests;
