//! JSON-RPC transport to the chain node.
//!
//! One shared `reqwest` client, one envelope helper, and a typed wrapper per
//! upstream method. Every call is single-shot: a failure is final for that
//! call (callers degrade or surface it, they never retry).

use anyhow::{anyhow, Result};
use serde_json::{json, Value};
use std::sync::OnceLock;
use std::time::Duration;

use crate::config::{Commitment, Config};

static HTTP: OnceLock<reqwest::Client> = OnceLock::new();

fn http_client() -> &'static reqwest::Client {
    HTTP.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .tcp_nodelay(true)
            .build()
            .expect("reqwest client")
    })
}

pub struct RpcClient {
    url: String,
    timeout: Duration,
    commitment: Commitment,
    auth_token: Option<String>,
}

impl RpcClient {
    pub fn new(cfg: &Config) -> Self {
        Self {
            url: cfg.rpc_url.clone(),
            timeout: Duration::from_millis(cfg.rpc_timeout_ms),
            commitment: cfg.commitment,
            auth_token: cfg.rpc_auth_token.clone(),
        }
    }

    /// POST one JSON-RPC request and unwrap its `result`.
    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": "gorbscan",
            "method": method,
            "params": params,
        });

        let mut req = http_client()
            .post(&self.url)
            .json(&body)
            .timeout(self.timeout);
        if let Some(token) = &self.auth_token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let res = req.send().await?;
        if !res.status().is_success() {
            return Err(anyhow!("http {}", res.status()));
        }

        let v: Value = res.json().await?;
        if let Some(err) = v.get("error") {
            let code = err.get("code").and_then(|c| c.as_i64()).unwrap_or_default();
            let msg = err
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("rpc error");
            return Err(anyhow!("rpc {code} {msg}"));
        }
        match v.get("result") {
            Some(r) => Ok(r.clone()),
            None => Err(anyhow!("invalid rpc payload (no result)")),
        }
    }

    /// Like `call`, for methods whose result is a `{context, value}` wrapper.
    async fn call_value(&self, method: &str, params: Value) -> Result<Value> {
        let result = self.call(method, params).await?;
        Ok(result["value"].clone())
    }

    fn commitment_param(&self) -> Value {
        json!({ "commitment": self.commitment.as_str() })
    }

    pub async fn get_epoch_info(&self) -> Result<Value> {
        self.call("getEpochInfo", json!([self.commitment_param()]))
            .await
    }

    /// Supply figures in lamports (the `{context, value}` wrapper removed).
    pub async fn get_supply(&self) -> Result<Value> {
        self.call_value("getSupply", json!([self.commitment_param()]))
            .await
    }

    pub async fn get_recent_performance_samples(&self, limit: usize) -> Result<Value> {
        self.call("getRecentPerformanceSamples", json!([limit]))
            .await
    }

    pub async fn get_slot(&self) -> Result<u64> {
        self.call("getSlot", json!([self.commitment_param()]))
            .await?
            .as_u64()
            .ok_or_else(|| anyhow!("getSlot returned a non-integer"))
    }

    pub async fn get_first_available_block(&self) -> Result<u64> {
        self.call("getFirstAvailableBlock", json!([]))
            .await?
            .as_u64()
            .ok_or_else(|| anyhow!("getFirstAvailableBlock returned a non-integer"))
    }

    /// The 20 largest accounts, or whatever subset the node supports.
    pub async fn get_largest_accounts(&self) -> Result<Value> {
        self.call_value("getLargestAccounts", json!([self.commitment_param()]))
            .await
    }

    /// Full block at `slot`. The node returns an error for skipped or
    /// pruned slots; `Value::Null` never means "present".
    pub async fn get_block(&self, slot: u64) -> Result<Value> {
        self.call(
            "getBlock",
            json!([slot, {
                "encoding": "json",
                "maxSupportedTransactionVersion": 0,
                "transactionDetails": "full",
                "rewards": true,
            }]),
        )
        .await
    }

    /// Transaction by signature; null result when unknown to the node.
    pub async fn get_transaction(&self, signature: &str) -> Result<Value> {
        self.call(
            "getTransaction",
            json!([signature, {
                "encoding": "json",
                "maxSupportedTransactionVersion": 0,
            }]),
        )
        .await
    }

    pub async fn get_signatures_for_address(&self, address: &str, limit: usize) -> Result<Value> {
        self.call(
            "getSignaturesForAddress",
            json!([address, { "limit": limit }]),
        )
        .await
    }

    pub async fn get_vote_accounts(&self) -> Result<Value> {
        self.call("getVoteAccounts", json!([self.commitment_param()]))
            .await
    }

    /// Accounts owned by `program` whose data is exactly `data_size` bytes,
    /// data returned base64-encoded.
    pub async fn get_program_accounts(&self, program: &str, data_size: u64) -> Result<Value> {
        self.call(
            "getProgramAccounts",
            json!([program, {
                "encoding": "base64",
                "filters": [{ "dataSize": data_size }],
            }]),
        )
        .await
    }

    pub async fn get_token_supply(&self, mint: &str) -> Result<Value> {
        self.call_value("getTokenSupply", json!([mint])).await
    }

    /// Raw account info value; null when the account does not exist.
    pub async fn get_account_info(&self, address: &str) -> Result<Value> {
        self.call_value(
            "getAccountInfo",
            json!([address, { "encoding": "base64" }]),
        )
        .await
    }

    /// Account info with program-specific parsing where the node supports it.
    pub async fn get_parsed_account_info(&self, address: &str) -> Result<Value> {
        self.call_value(
            "getAccountInfo",
            json!([address, { "encoding": "jsonParsed" }]),
        )
        .await
    }

    pub async fn get_token_account_balance(&self, address: &str) -> Result<Value> {
        self.call_value("getTokenAccountBalance", json!([address]))
            .await
    }

    pub async fn get_inflation_governor(&self) -> Result<Value> {
        self.call("getInflationGovernor", json!([])).await
    }

    pub async fn get_inflation_rate(&self) -> Result<Value> {
        self.call("getInflationRate", json!([])).await
    }
}
