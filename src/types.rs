//! View models reshaped from raw RPC responses.
//!
//! Everything here is an immutable projection of remote chain state: fetched,
//! reshaped once, cached for a freshness window, never mutated locally. The
//! `from_*` constructors take the node's JSON as-is and tolerate missing
//! fields by falling back to zero values rather than failing the whole
//! aggregate.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{chain, estimate, inflation};
use crate::util_text::unix_now;

/// Snapshot of cluster-wide dashboard figures.
///
/// The fields come from independent RPC calls issued at roughly the same
/// wall-clock instant; nothing ties them together transactionally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterStats {
    pub slot: u64,
    pub block_height: u64,
    pub absolute_slot: u64,
    pub transaction_count: u64,
    pub epoch: u64,
    pub epoch_progress: f64,
    pub slots_in_epoch: u64,
    pub tps: u64,
    pub average_tps: u64,
    pub total_transactions: u64,
    /// Estimated, not observed. See [`estimate_total_accounts`].
    pub total_accounts: u64,
    pub circulating_supply: f64,
    pub total_supply: f64,
    pub inflation: f64,
}

impl ClusterStats {
    /// Folds the independent dashboard calls into one record.
    ///
    /// `supply` is the unwrapped value of `getSupply` (lamports);
    /// `perf_latest`/`perf_recent` are `getRecentPerformanceSamples` results
    /// with 1 and 30 samples; `largest_accounts` is the unwrapped
    /// `getLargestAccounts` value when the node supports it.
    pub fn fold(
        epoch_info: &Value,
        supply: &Value,
        perf_latest: &Value,
        perf_recent: &Value,
        current_slot: u64,
        largest_accounts: Option<&Value>,
    ) -> ClusterStats {
        let absolute_slot = epoch_info["absoluteSlot"].as_u64().unwrap_or(current_slot);
        let epoch = epoch_info["epoch"].as_u64().unwrap_or(0);
        let slot_index = epoch_info["slotIndex"].as_u64().unwrap_or(0);
        let slots_in_epoch = epoch_info["slotsInEpoch"].as_u64().unwrap_or(0);

        let latest = perf_latest.as_array().and_then(|a| a.first());
        let (transaction_count, tps) = match latest {
            Some(sample) => (
                sample["numTransactions"].as_u64().unwrap_or(0),
                sample_tps(sample).round() as u64,
            ),
            None => (0, 0),
        };

        let samples: &[Value] = perf_recent.as_array().map(Vec::as_slice).unwrap_or(&[]);
        let average_tps = if samples.is_empty() {
            0
        } else {
            let sum: f64 = samples.iter().map(sample_tps).sum();
            (sum / samples.len() as f64).round() as u64
        };
        let total_transactions = samples
            .iter()
            .map(|s| s["numTransactions"].as_u64().unwrap_or(0))
            .sum();

        let largest_len = largest_accounts
            .and_then(|v| v.as_array())
            .map(|a| a.len())
            .unwrap_or(0);

        ClusterStats {
            slot: absolute_slot,
            block_height: epoch_info["blockHeight"].as_u64().unwrap_or(0),
            absolute_slot,
            transaction_count,
            epoch,
            epoch_progress: if slots_in_epoch > 0 {
                slot_index as f64 / slots_in_epoch as f64
            } else {
                0.0
            },
            slots_in_epoch,
            tps,
            average_tps,
            total_transactions,
            total_accounts: estimate_total_accounts(largest_len, absolute_slot, epoch),
            circulating_supply: lamports_to_sol(supply["circulating"].as_u64().unwrap_or(0)),
            total_supply: lamports_to_sol(supply["total"].as_u64().unwrap_or(0)),
            inflation: estimate_inflation(epoch),
        }
    }
}

fn sample_tps(sample: &Value) -> f64 {
    let txs = sample["numTransactions"].as_u64().unwrap_or(0) as f64;
    let period = sample["samplePeriodSecs"].as_u64().unwrap_or(0);
    if period == 0 {
        0.0
    } else {
        txs / period as f64
    }
}

fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / chain::LAMPORTS_PER_SOL as f64
}

/// Guess the total account count of the cluster.
///
/// The RPC surface exposes no authoritative number, so this is an estimate
/// by construction: scale the largest-accounts list when present, otherwise
/// derive from slot age with a clamp, otherwise from the epoch. Treat the
/// output as a dashboard figure, never as an observation.
pub fn estimate_total_accounts(largest_len: usize, absolute_slot: u64, epoch: u64) -> u64 {
    if largest_len > 0 {
        return largest_len as u64 * estimate::PER_LARGEST_ACCOUNT;
    }
    if absolute_slot > 0 {
        return (absolute_slot / estimate::SLOTS_PER_ACCOUNT)
            .max(estimate::SLOT_ESTIMATE_MIN)
            .min(estimate::SLOT_ESTIMATE_MAX);
    }
    (epoch * estimate::PER_EPOCH).max(estimate::EPOCH_ESTIMATE_MIN)
}

/// Simplified inflation figure: base rate tapering per "year" of epochs,
/// floored and rounded to one decimal. A fork's real schedule may differ;
/// this mirrors what the dashboard has always displayed.
pub fn estimate_inflation(epoch: u64) -> f64 {
    let years = (epoch as f64 / inflation::EPOCHS_PER_YEAR).max(1.0);
    let rate = (inflation::BASE_RATE - inflation::TAPER * years).max(inflation::FLOOR);
    (rate * 10.0).round() / 10.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub slot: u64,
    pub blockhash: String,
    pub parent_slot: u64,
    pub block_time: i64,
    pub transactions: Vec<Transaction>,
    pub rewards: Vec<Reward>,
    pub block_height: u64,
}

impl Block {
    /// Reshape a `getBlock` response fetched for `slot`.
    pub fn from_rpc(slot: u64, block: &Value) -> Block {
        let block_time = block["blockTime"].as_i64().unwrap_or_else(unix_now);
        let transactions = block["transactions"]
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|e| Transaction::from_block_entry(slot, block_time, e))
                    .collect()
            })
            .unwrap_or_default();
        let rewards = block["rewards"]
            .as_array()
            .map(|rs| rs.iter().map(Reward::from_rpc).collect())
            .unwrap_or_default();

        Block {
            slot,
            blockhash: block["blockhash"].as_str().unwrap_or("").to_string(),
            parent_slot: block["parentSlot"].as_u64().unwrap_or(0),
            block_time,
            transactions,
            rewards,
            block_height: block["blockHeight"].as_u64().unwrap_or(slot),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub signature: String,
    pub slot: u64,
    pub block_time: i64,
    pub fee: u64,
    pub status: TxStatus,
    pub instructions: Vec<Instruction>,
    pub logs: Vec<String>,
    pub compute_units_consumed: Option<u64>,
    /// Every account address the transaction references, in key-table order.
    pub accounts: Vec<String>,
}

impl Transaction {
    /// Reshape one entry of a block's `transactions` array.
    ///
    /// Returns None when the entry carries no signature (nothing useful can
    /// be displayed for it).
    pub fn from_block_entry(slot: u64, block_time: i64, entry: &Value) -> Option<Transaction> {
        let signature = entry["transaction"]["signatures"][0].as_str()?.to_string();
        Some(Self::reshape(
            signature,
            slot,
            block_time,
            &entry["transaction"]["message"],
            &entry["meta"],
            0,
        ))
    }

    /// Reshape a `getTransaction` response.
    ///
    /// `slot` and `block_time` may come from the signature listing that led
    /// here; the response's own fields back them up.
    pub fn from_lookup(
        signature: &str,
        slot: Option<u64>,
        block_time: Option<i64>,
        tx: &Value,
    ) -> Transaction {
        let slot = slot.or_else(|| tx["slot"].as_u64()).unwrap_or(0);
        let block_time = block_time
            .or_else(|| tx["blockTime"].as_i64())
            .unwrap_or_else(unix_now);
        Self::reshape(
            signature.to_string(),
            slot,
            block_time,
            &tx["transaction"]["message"],
            &tx["meta"],
            chain::FALLBACK_FEE_LAMPORTS,
        )
    }

    fn reshape(
        signature: String,
        slot: u64,
        block_time: i64,
        message: &Value,
        meta: &Value,
        default_fee: u64,
    ) -> Transaction {
        let account_keys: Vec<String> = message["accountKeys"]
            .as_array()
            .map(|keys| {
                keys.iter()
                    .filter_map(|k| k.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let mut instructions: Vec<Instruction> = message["instructions"]
            .as_array()
            .map(|ixs| {
                ixs.iter()
                    .map(|ix| Instruction::from_compiled(ix, &account_keys))
                    .collect()
            })
            .unwrap_or_default();

        // Inner instructions arrive separately in the meta, grouped by the
        // index of the outer instruction that spawned them.
        if let Some(groups) = meta["innerInstructions"].as_array() {
            for group in groups {
                let Some(outer_index) = group["index"].as_u64() else {
                    continue;
                };
                let inner: Vec<Instruction> = group["instructions"]
                    .as_array()
                    .map(|ixs| {
                        ixs.iter()
                            .map(|ix| Instruction::from_compiled(ix, &account_keys))
                            .collect()
                    })
                    .unwrap_or_default();
                if let Some(outer) = instructions.get_mut(outer_index as usize) {
                    outer.inner_instructions = Some(inner);
                }
            }
        }

        let status = if meta.get("err").map_or(true, Value::is_null) {
            TxStatus::Success
        } else {
            TxStatus::Failed
        };

        Transaction {
            signature,
            slot,
            block_time,
            fee: meta["fee"].as_u64().unwrap_or(default_fee),
            status,
            instructions,
            logs: meta["logMessages"]
                .as_array()
                .map(|ls| {
                    ls.iter()
                        .filter_map(|l| l.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default(),
            compute_units_consumed: meta["computeUnitsConsumed"].as_u64(),
            accounts: account_keys,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub program_id: String,
    pub accounts: Vec<String>,
    /// Opaque payload, base64-encoded (the node sends base58).
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_instructions: Option<Vec<Instruction>>,
}

impl Instruction {
    /// Resolve a compiled instruction's indices through the account-key table.
    pub fn from_compiled(ix: &Value, account_keys: &[String]) -> Instruction {
        let resolve = |idx: &Value| {
            idx.as_u64()
                .and_then(|i| account_keys.get(i as usize))
                .cloned()
        };

        let data = ix["data"]
            .as_str()
            .and_then(|d| bs58::decode(d).into_vec().ok())
            .map(|bytes| STANDARD.encode(bytes))
            .unwrap_or_default();

        Instruction {
            program_id: resolve(&ix["programIdIndex"]).unwrap_or_default(),
            accounts: ix["accounts"]
                .as_array()
                .map(|idxs| idxs.iter().filter_map(resolve).collect())
                .unwrap_or_default(),
            data,
            inner_instructions: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardType {
    Fee,
    Rent,
    Staking,
    Voting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub pubkey: String,
    pub lamports: i64,
    pub post_balance: u64,
    pub reward_type: RewardType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission: Option<u8>,
}

impl Reward {
    pub fn from_rpc(reward: &Value) -> Reward {
        let reward_type = match reward["rewardType"].as_str() {
            Some(s) if s.eq_ignore_ascii_case("fee") => RewardType::Fee,
            Some(s) if s.eq_ignore_ascii_case("rent") => RewardType::Rent,
            Some(s) if s.eq_ignore_ascii_case("voting") => RewardType::Voting,
            _ => RewardType::Staking,
        };
        Reward {
            pubkey: reward["pubkey"].as_str().unwrap_or("").to_string(),
            lamports: reward["lamports"].as_i64().unwrap_or(0),
            post_balance: reward["postBalance"].as_u64().unwrap_or(0),
            reward_type,
            commission: reward["commission"].as_u64().map(|c| c as u8),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub pubkey: String,
    pub lamports: u64,
    pub owner: String,
    pub executable: bool,
    pub rent_epoch: u64,
    pub data: AccountData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountData {
    /// Owner program of the data blob.
    pub program: String,
    /// Data length in bytes.
    pub space: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed: Option<Value>,
}

impl Account {
    /// Reshape the unwrapped value of a `getAccountInfo` (base64) response.
    pub fn from_rpc(pubkey: &str, value: &Value) -> Account {
        let owner = value["owner"].as_str().unwrap_or("").to_string();
        let space = value["space"].as_u64().unwrap_or_else(|| {
            value["data"][0]
                .as_str()
                .and_then(|d| STANDARD.decode(d).ok())
                .map(|b| b.len() as u64)
                .unwrap_or(0)
        });
        Account {
            pubkey: pubkey.to_string(),
            lamports: value["lamports"].as_u64().unwrap_or(0),
            owner: owner.clone(),
            executable: value["executable"].as_bool().unwrap_or(false),
            rent_epoch: value["rentEpoch"].as_u64().unwrap_or(0),
            data: AccountData {
                program: owner,
                space,
                parsed: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub mint: String,
    /// Empty: no registry lookup is performed.
    pub symbol: String,
    /// Empty: no registry lookup is performed.
    pub name: String,
    pub decimals: u8,
    pub supply: u64,
    /// Always zero: holder counts are not computed.
    pub holders: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validator {
    pub identity: String,
    pub vote_account: String,
    pub commission: u8,
    pub last_vote: u64,
    /// Cumulative credits: the sum of the middle element of every
    /// epoch-credit triple.
    pub credits: u64,
    /// Raw `(epoch, credits, previous_credits)` triples from the node.
    pub epoch_credits: Vec<(u64, u64, u64)>,
    pub activated_stake: u64,
    pub version: String,
}

impl Validator {
    /// Reshape one entry of `getVoteAccounts` (current or delinquent).
    pub fn from_vote_account(v: &Value) -> Validator {
        let epoch_credits: Vec<(u64, u64, u64)> = v["epochCredits"]
            .as_array()
            .map(|triples| {
                triples
                    .iter()
                    .filter_map(|t| {
                        Some((
                            t[0].as_u64()?,
                            t[1].as_u64()?,
                            t[2].as_u64().unwrap_or(0),
                        ))
                    })
                    .collect()
            })
            .unwrap_or_default();
        let credits = epoch_credits.iter().map(|(_, c, _)| c).sum();

        Validator {
            identity: v["nodePubkey"].as_str().unwrap_or("").to_string(),
            vote_account: v["votePubkey"].as_str().unwrap_or("").to_string(),
            commission: v["commission"].as_u64().unwrap_or(0) as u8,
            last_vote: v["lastVote"].as_u64().unwrap_or(0),
            credits,
            epoch_credits,
            activated_stake: v["activatedStake"].as_u64().unwrap_or(0),
            version: chain::VALIDATOR_VERSION.to_string(),
        }
    }
}

/// Flattens the `current` and `delinquent` sets of a `getVoteAccounts`
/// response into one list, current first.
pub fn merge_vote_accounts(vote_accounts: &Value) -> Vec<Validator> {
    let mut validators = Vec::new();
    for set in ["current", "delinquent"] {
        if let Some(entries) = vote_accounts[set].as_array() {
            validators.extend(entries.iter().map(Validator::from_vote_account));
        }
    }
    validators
}

/// One hit of a heterogeneous search, tagged by entity kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchResult {
    Account {
        title: String,
        subtitle: String,
        data: Account,
    },
    Transaction {
        title: String,
        subtitle: String,
        data: Transaction,
    },
    Block {
        title: String,
        subtitle: String,
        data: Block,
    },
}
