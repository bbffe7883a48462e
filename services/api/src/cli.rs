use crate::browse::{run_analytics, run_browse, AnalyticsArgs, BrowseArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use estate_listings::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Estate Listings",
    about = "Browse, analyze, and serve a real-estate property catalog",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Filter and sort the catalog from the terminal
    Browse(BrowseArgs),
    /// Print market analytics for the catalog as JSON
    Analytics(AnalyticsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// JSON catalog to serve instead of CATALOG_PATH or the bundled sample
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Browse(args) => run_browse(args),
        Command::Analytics(args) => run_analytics(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["estate-listings-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn browse_flags_parse() {
        let cli = Cli::try_parse_from([
            "estate-listings-api",
            "browse",
            "--type",
            "Condo",
            "--min-price",
            "300000.0",
            "--sort",
            "price-high",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Browse(args)) => {
                assert_eq!(args.property_type.as_deref(), Some("Condo"));
                assert_eq!(args.min_price, Some(300_000.0));
                assert_eq!(args.sort, estate_listings::listings::SortKey::PriceDesc);
                assert!(args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_sort_is_rejected() {
        let result = Cli::try_parse_from(["estate-listings-api", "browse", "--sort", "cheapest"]);
        assert!(result.is_err());
    }
}
