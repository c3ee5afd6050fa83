//! The RPC aggregation façade.
//!
//! `Explorer` is the single point of contact with the chain node: it issues
//! the parallel reads behind each view, reshapes the responses into the
//! types of [`crate::types`], and memoizes aggregate results per query key
//! for one freshness window. Aggregate operations degrade on partial
//! failure (a skipped block shortens the list, a failed signature lookup is
//! dropped); single-entity lookups collapse both absence and failure to
//! `None`.

use anyhow::{Context, Result};
use futures::future;
use serde_json::Value;
use std::time::Duration;

use crate::cache::TtlCache;
use crate::config::Config;
use crate::constants::{chain, service};
use crate::rpc::RpcClient;
use crate::search::{self, QueryKind};
use crate::types::{
    self, Account, Block, ClusterStats, SearchResult, Token, Transaction, TxStatus, Validator,
};
use crate::util_text::{format_address, format_sol};

const STATS_KEY: &str = "cluster-stats";
const VALIDATORS_KEY: &str = "validators";
const TOKENS_KEY: &str = "tokens";

pub struct Explorer {
    rpc: RpcClient,
    tx_batch_size: usize,
    stats: TtlCache<ClusterStats>,
    blocks: TtlCache<Vec<Block>>,
    transactions: TtlCache<Vec<Transaction>>,
    validators: TtlCache<Vec<Validator>>,
    tokens: TtlCache<Vec<Token>>,
}

impl Explorer {
    pub fn new(cfg: &Config) -> Self {
        let ttl = Duration::from_millis(cfg.cache_ttl_ms);
        Self {
            rpc: RpcClient::new(cfg),
            tx_batch_size: cfg.tx_batch_size.max(1),
            stats: TtlCache::new(ttl),
            blocks: TtlCache::new(ttl),
            transactions: TtlCache::new(ttl),
            validators: TtlCache::new(ttl),
            tokens: TtlCache::new(ttl),
        }
    }

    /// Cluster-wide dashboard figures, folded from seven parallel calls.
    ///
    /// The first-available-block and largest-accounts calls tolerate
    /// failure individually (not every node serves them); the rest fail the
    /// whole operation.
    pub async fn cluster_stats(&self) -> Result<ClusterStats> {
        if let Some(hit) = self.stats.get(STATS_KEY) {
            return Ok(hit);
        }

        let (epoch_info, supply, perf_latest, perf_recent, slot, first_block, largest) = tokio::join!(
            self.rpc.get_epoch_info(),
            self.rpc.get_supply(),
            self.rpc.get_recent_performance_samples(1),
            self.rpc
                .get_recent_performance_samples(service::TPS_SAMPLE_COUNT),
            self.rpc.get_slot(),
            self.rpc.get_first_available_block(),
            self.rpc.get_largest_accounts(),
        );

        let epoch_info = epoch_info.context("epoch info")?;
        let supply = supply.context("supply")?;
        let perf_latest = perf_latest.context("performance samples")?;
        let perf_recent = perf_recent.context("performance samples")?;
        let current_slot = slot.context("slot")?;
        let first_block = first_block.unwrap_or(0);
        let largest = largest.ok();

        log::debug!("cluster stats at slot {current_slot}, first available block {first_block}");

        let stats = ClusterStats::fold(
            &epoch_info,
            &supply,
            &perf_latest,
            &perf_recent,
            current_slot,
            largest.as_ref(),
        );
        self.stats.put(STATS_KEY, stats.clone());
        Ok(stats)
    }

    /// The most recent blocks, walking slots downward from the tip.
    ///
    /// Skipped or pruned slots are omitted, so the result may hold fewer
    /// than `limit` blocks; slot numbers are strictly decreasing.
    pub async fn recent_blocks(&self, limit: usize) -> Result<Vec<Block>> {
        let key = format!("blocks-{limit}");
        if let Some(hit) = self.blocks.get(&key) {
            return Ok(hit);
        }

        let tip = self.rpc.get_slot().await.context("slot")?;
        let mut blocks = Vec::with_capacity(limit);
        for i in 0..limit as u64 {
            let Some(slot) = tip.checked_sub(i) else {
                break;
            };
            match self.rpc.get_block(slot).await {
                Ok(v) if !v.is_null() => blocks.push(Block::from_rpc(slot, &v)),
                Ok(_) => log::debug!("slot {slot} has no block"),
                Err(e) => log::debug!("skipping slot {slot}: {e}"),
            }
        }

        self.blocks.put(&key, blocks.clone());
        Ok(blocks)
    }

    /// Recent transactions referencing the system program, resolved from
    /// its signature history in sequential batches (requests within a batch
    /// run in parallel to bound the fan-out). Failed lookups are dropped.
    pub async fn recent_transactions(&self, limit: usize) -> Result<Vec<Transaction>> {
        let key = format!("transactions-{limit}");
        if let Some(hit) = self.transactions.get(&key) {
            return Ok(hit);
        }

        let listing = self
            .rpc
            .get_signatures_for_address(chain::SYSTEM_PROGRAM, limit)
            .await
            .context("signatures for address")?;

        let infos: Vec<(String, Option<u64>, Option<i64>)> = listing
            .as_array()
            .map(|sigs| {
                sigs.iter()
                    .take(limit)
                    .filter_map(|s| {
                        Some((
                            s["signature"].as_str()?.to_string(),
                            s["slot"].as_u64(),
                            s["blockTime"].as_i64(),
                        ))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut transactions = Vec::with_capacity(infos.len());
        for batch in infos.chunks(self.tx_batch_size) {
            let lookups = batch.iter().map(|(sig, _, _)| self.rpc.get_transaction(sig));
            for ((sig, slot, block_time), res) in batch.iter().zip(future::join_all(lookups).await)
            {
                match res {
                    Ok(v) if !v.is_null() => {
                        transactions.push(Transaction::from_lookup(sig, *slot, *block_time, &v));
                    }
                    Ok(_) => log::debug!("transaction {sig} unknown to the node"),
                    Err(e) => log::debug!("dropping transaction {sig}: {e}"),
                }
            }
        }

        self.transactions.put(&key, transactions.clone());
        Ok(transactions)
    }

    /// Current and delinquent validators merged into one flat list.
    pub async fn validators(&self) -> Result<Vec<Validator>> {
        if let Some(hit) = self.validators.get(VALIDATORS_KEY) {
            return Ok(hit);
        }

        let vote_accounts = self
            .rpc
            .get_vote_accounts()
            .await
            .context("vote accounts")?;
        let validators = types::merge_vote_accounts(&vote_accounts);

        self.validators.put(VALIDATORS_KEY, validators.clone());
        Ok(validators)
    }

    /// A single account, or None when it does not exist (or the lookup
    /// failed: the two are indistinguishable to callers by design).
    pub async fn account(&self, address: &str) -> Option<Account> {
        match self.rpc.get_account_info(address).await {
            Ok(v) if !v.is_null() => Some(Account::from_rpc(address, &v)),
            Ok(_) => None,
            Err(e) => {
                log::warn!("account {address}: {e}");
                None
            }
        }
    }

    /// Every mint account owned by the token program. Symbol, name, and
    /// holder count stay empty: no registry lookup is performed. Degrades
    /// to an empty list on failure.
    pub async fn tokens(&self) -> Vec<Token> {
        if let Some(hit) = self.tokens.get(TOKENS_KEY) {
            return hit;
        }

        let accounts = match self
            .rpc
            .get_program_accounts(chain::TOKEN_PROGRAM, chain::MINT_ACCOUNT_SIZE)
            .await
        {
            Ok(v) => v,
            Err(e) => {
                log::error!("token scan failed: {e}");
                return Vec::new();
            }
        };

        let entries: &[Value] = accounts.as_array().map(Vec::as_slice).unwrap_or(&[]);
        let mut tokens = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(pubkey) = entry["pubkey"].as_str() else {
                continue;
            };
            let Some(data) = entry["account"]["data"][0].as_str() else {
                continue;
            };
            match crate::mint::decode_base64(data) {
                Ok(mint) => tokens.push(Token {
                    mint: pubkey.to_string(),
                    symbol: String::new(),
                    name: String::new(),
                    decimals: mint.decimals,
                    supply: mint.supply,
                    holders: 0,
                }),
                Err(e) => log::debug!("skipping mint {pubkey}: {e}"),
            }
        }

        self.tokens.put(TOKENS_KEY, tokens.clone());
        tokens
    }

    /// Heterogeneous search: the query's shape decides which lookups are
    /// attempted (see [`crate::search::classify`]); whichever succeed are
    /// collected. A malformed query yields zero results, not an error.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        let query = query.trim();
        let mut results = Vec::new();

        for kind in search::classify(query) {
            match kind {
                QueryKind::Address => {
                    if let Some(account) = self.account(query).await {
                        results.push(SearchResult::Account {
                            title: format!("Account {}", format_address(query, 8, 4)),
                            subtitle: format!("Balance: {} SOL", format_sol(account.lamports)),
                            data: account,
                        });
                    }
                }
                QueryKind::Signature => match self.rpc.get_transaction(query).await {
                    Ok(v) if !v.is_null() => {
                        let tx = Transaction::from_lookup(query, None, None, &v);
                        results.push(SearchResult::Transaction {
                            title: format!("Transaction {}", format_address(query, 8, 4)),
                            subtitle: format!(
                                "Status: {}",
                                match tx.status {
                                    TxStatus::Success => "Success",
                                    TxStatus::Failed => "Failed",
                                }
                            ),
                            data: tx,
                        });
                    }
                    Ok(_) => {}
                    Err(e) => log::debug!("search signature {query}: {e}"),
                },
                QueryKind::Slot(slot) => match self.rpc.get_block(slot).await {
                    Ok(v) if !v.is_null() => {
                        let block = Block::from_rpc(slot, &v);
                        results.push(SearchResult::Block {
                            title: format!("Block #{slot}"),
                            subtitle: format!("{} transactions", block.transactions.len()),
                            data: block,
                        });
                    }
                    Ok(_) => {}
                    Err(e) => log::debug!("search slot {slot}: {e}"),
                },
            }
        }

        results
    }

    /// Total supply of a token mint, in the mint's minor units.
    pub async fn token_supply(&self, mint: &str) -> Option<u64> {
        match self.rpc.get_token_supply(mint).await {
            Ok(v) => v["amount"].as_str().and_then(|s| s.parse().ok()),
            Err(e) => {
                log::warn!("token supply {mint}: {e}");
                None
            }
        }
    }

    pub async fn inflation_governor(&self) -> Option<Value> {
        match self.rpc.get_inflation_governor().await {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("inflation governor: {e}");
                None
            }
        }
    }

    pub async fn inflation_rate(&self) -> Option<Value> {
        match self.rpc.get_inflation_rate().await {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("inflation rate: {e}");
                None
            }
        }
    }

    /// Program-parsed account info, as the node returns it.
    pub async fn parsed_account_info(&self, address: &str) -> Option<Value> {
        match self.rpc.get_parsed_account_info(address).await {
            Ok(v) if !v.is_null() => Some(v),
            Ok(_) => None,
            Err(e) => {
                log::warn!("parsed account {address}: {e}");
                None
            }
        }
    }

    /// Balance of a token account (amount, decimals, uiAmount).
    pub async fn token_account_balance(&self, address: &str) -> Option<Value> {
        match self.rpc.get_token_account_balance(address).await {
            Ok(v) if !v.is_null() => Some(v),
            Ok(_) => None,
            Err(e) => {
                log::warn!("token balance {address}: {e}");
                None
            }
        }
    }
}
