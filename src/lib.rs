//! Gorbscan - data service for a Solana-fork chain explorer
//!
//! This library is the aggregation layer a chain explorer sits on: a typed
//! façade over a JSON-RPC node that folds independent reads into dashboard
//! statistics, reshapes blocks, transactions, accounts, validators, and
//! token mints into plain view models, and memoizes aggregate results for a
//! short freshness window so a re-rendering frontend does not hammer the
//! node.
//!
//! All chain semantics live on the node; nothing here validates, signs, or
//! submits anything.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gorbscan::{config::Config, Explorer};
//!
//! let explorer = Explorer::new(&Config::default());
//! let stats = explorer.cluster_stats().await?;
//! println!("slot {} at {} TPS", stats.slot, stats.tps);
//! ```

pub mod cache;
pub mod config;
pub mod constants;
pub mod mint;
pub mod rpc;
pub mod search;
pub mod service;
pub mod types;
pub mod util_text;

pub use service::Explorer;
