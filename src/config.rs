use anyhow::{anyhow, Result};
use clap::Args;

use crate::constants::service;

/// Commitment level requested from the RPC node
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

impl std::str::FromStr for Commitment {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "processed" => Ok(Commitment::Processed),
            "confirmed" => Ok(Commitment::Confirmed),
            "finalized" => Ok(Commitment::Finalized),
            _ => Err(anyhow!(
                "Invalid commitment '{s}'. Valid options: processed, confirmed, finalized"
            )),
        }
    }
}

impl std::fmt::Display for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service options shared by every subcommand.
///
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Args, Debug)]
pub struct CliArgs {
    /// Chain RPC endpoint URL
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Bearer token sent with every RPC request
    #[arg(long, env = "RPC_AUTH_TOKEN")]
    pub rpc_auth_token: Option<String>,

    /// RPC request timeout in milliseconds (1000-60000)
    #[arg(long, env = "RPC_TIMEOUT_MS")]
    pub rpc_timeout_ms: Option<u64>,

    /// Cache freshness window in milliseconds (0-600000; 0 disables caching)
    #[arg(long, env = "CACHE_TTL_MS")]
    pub cache_ttl_ms: Option<u64>,

    /// Signatures resolved per batch in the transaction feed (1-50)
    #[arg(long, env = "TX_BATCH_SIZE")]
    pub tx_batch_size: Option<usize>,

    /// Commitment level: processed, confirmed, or finalized
    #[arg(long, env = "COMMITMENT", value_parser = clap::value_parser!(Commitment))]
    pub commitment: Option<Commitment>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub rpc_url: String,
    pub rpc_auth_token: Option<String>,
    pub rpc_timeout_ms: u64,
    pub cache_ttl_ms: u64,
    pub tx_batch_size: usize,
    pub commitment: Commitment,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: "https://rpc.gorbchain.xyz".to_string(),
            rpc_auth_token: None,
            rpc_timeout_ms: 8000,
            cache_ttl_ms: service::CACHE_TTL_MS,
            tx_batch_size: service::TX_BATCH_SIZE,
            commitment: Commitment::Confirmed,
        }
    }
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Validate URL format (basic scheme check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

/// Build a validated `Config` from parsed CLI args.
///
/// clap already folded environment variables into `args`, so only defaults
/// remain to apply here.
pub fn load(args: &CliArgs) -> Result<Config> {
    let defaults = Config::default();

    let rpc_url = args.rpc_url.clone().unwrap_or(defaults.rpc_url);
    validate_url(&rpc_url, "RPC_URL")?;

    let rpc_timeout_ms = args.rpc_timeout_ms.unwrap_or(defaults.rpc_timeout_ms);
    let rpc_timeout_ms = validate_in_range(rpc_timeout_ms, 1000, 60000, "RPC_TIMEOUT_MS")?;

    let cache_ttl_ms = args.cache_ttl_ms.unwrap_or(defaults.cache_ttl_ms);
    let cache_ttl_ms = validate_in_range(cache_ttl_ms, 0, 600_000, "CACHE_TTL_MS")?;

    let tx_batch_size = args.tx_batch_size.unwrap_or(defaults.tx_batch_size);
    let tx_batch_size = validate_in_range(tx_batch_size, 1, 50, "TX_BATCH_SIZE")?;

    Ok(Config {
        rpc_url,
        rpc_auth_token: args.rpc_auth_token.clone(),
        rpc_timeout_ms,
        cache_ttl_ms,
        tx_batch_size,
        commitment: args.commitment.unwrap_or(defaults.commitment),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_args() -> CliArgs {
        CliArgs {
            rpc_url: None,
            rpc_auth_token: None,
            rpc_timeout_ms: None,
            cache_ttl_ms: None,
            tx_batch_size: None,
            commitment: None,
        }
    }

    #[test]
    fn defaults_apply_when_nothing_set() {
        let cfg = load(&empty_args()).unwrap();
        assert_eq!(cfg.rpc_url, "https://rpc.gorbchain.xyz");
        assert_eq!(cfg.cache_ttl_ms, 30_000);
        assert_eq!(cfg.tx_batch_size, 10);
        assert_eq!(cfg.commitment, Commitment::Confirmed);
    }

    #[test]
    fn out_of_range_values_rejected() {
        let mut args = empty_args();
        args.rpc_timeout_ms = Some(100);
        assert!(load(&args).is_err());

        let mut args = empty_args();
        args.tx_batch_size = Some(0);
        assert!(load(&args).is_err());
    }

    #[test]
    fn bad_url_scheme_rejected() {
        let mut args = empty_args();
        args.rpc_url = Some("ftp://example.com".into());
        assert!(load(&args).is_err());
    }

    #[test]
    fn commitment_parses_case_insensitively() {
        assert_eq!(
            "Finalized".parse::<Commitment>().unwrap(),
            Commitment::Finalized
        );
        assert!("final".parse::<Commitment>().is_err());
    }
}
