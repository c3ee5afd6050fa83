//! CLI entry point: one subcommand per façade operation, result printed as
//! pretty JSON for piping into other tools.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use gorbscan::config::{self, CliArgs};
use gorbscan::Explorer;

/// Gorbscan - chain explorer data service
///
/// Queries a Solana-fork RPC node and prints typed view models as JSON.
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug)]
#[command(name = "gorbscan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chain explorer data service", long_about = None)]
struct Cli {
    #[command(flatten)]
    opts: CliArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cluster-wide dashboard statistics
    Stats,
    /// Walk recent blocks downward from the tip
    Blocks {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Recent transactions referencing the system program
    Transactions {
        #[arg(long, default_value_t = 25)]
        limit: usize,
    },
    /// Current and delinquent validators
    Validators,
    /// Look up a single account by address
    Account { address: String },
    /// Scan all mint accounts of the token program
    Tokens,
    /// Search by address, signature, or slot (classified by shape)
    Search { query: String },
    /// Total supply of a token mint
    TokenSupply { mint: String },
    /// Inflation governor parameters
    InflationGovernor,
    /// Current inflation rate
    InflationRate,
    /// Program-parsed account info
    ParsedAccount { address: String },
    /// Balance of a token account
    TokenBalance { address: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let cfg = config::load(&cli.opts).context("Failed to load configuration")?;
    log::info!("using RPC endpoint {}", cfg.rpc_url);

    let explorer = Explorer::new(&cfg);

    let output = match cli.command {
        Command::Stats => serde_json::to_value(explorer.cluster_stats().await?)?,
        Command::Blocks { limit } => serde_json::to_value(explorer.recent_blocks(limit).await?)?,
        Command::Transactions { limit } => {
            serde_json::to_value(explorer.recent_transactions(limit).await?)?
        }
        Command::Validators => serde_json::to_value(explorer.validators().await?)?,
        Command::Account { address } => serde_json::to_value(explorer.account(&address).await)?,
        Command::Tokens => serde_json::to_value(explorer.tokens().await)?,
        Command::Search { query } => serde_json::to_value(explorer.search(&query).await)?,
        Command::TokenSupply { mint } => json!(explorer.token_supply(&mint).await),
        Command::InflationGovernor => json!(explorer.inflation_governor().await),
        Command::InflationRate => json!(explorer.inflation_rate().await),
        Command::ParsedAccount { address } => json!(explorer.parsed_account_info(&address).await),
        Command::TokenBalance { address } => json!(explorer.token_account_balance(&address).await),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
