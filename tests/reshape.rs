//! Reshaping tests: raw node JSON fixtures in, view models out.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};

use gorbscan::types::{
    estimate_inflation, estimate_total_accounts, merge_vote_accounts, Account, Block, ClusterStats,
    RewardType, Transaction, TxStatus, Validator,
};

fn b58(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

fn block_fixture() -> Value {
    json!({
        "blockhash": "9yrmhMyM6pgGsjM9eAAJTbCjbBBGgN1ubmgQdBvYKA61",
        "parentSlot": 41,
        "blockTime": 1_700_000_000,
        "blockHeight": 40,
        "transactions": [
            {
                "transaction": {
                    "signatures": ["sigAAA"],
                    "message": {
                        "accountKeys": ["feePayer111", "dest222", "program333"],
                        "instructions": [
                            { "programIdIndex": 2, "accounts": [0, 1], "data": b58(b"hello") }
                        ],
                    },
                },
                "meta": {
                    "fee": 5000,
                    "err": null,
                    "logMessages": ["Program log: ok"],
                    "computeUnitsConsumed": 1234,
                    "innerInstructions": [
                        {
                            "index": 0,
                            "instructions": [
                                { "programIdIndex": 1, "accounts": [2], "data": b58(b"inner") }
                            ],
                        }
                    ],
                },
            },
            {
                "transaction": {
                    "signatures": ["sigBBB"],
                    "message": {
                        "accountKeys": ["feePayer111"],
                        "instructions": [],
                    },
                },
                "meta": { "err": { "InstructionError": [0, "Custom"] } },
            }
        ],
        "rewards": [
            { "pubkey": "validator444", "lamports": 100, "postBalance": 5000,
              "rewardType": "fee", "commission": 5 }
        ],
    })
}

#[test]
fn block_reshapes_transactions_and_rewards() {
    let block = Block::from_rpc(42, &block_fixture());

    assert_eq!(block.slot, 42);
    assert_eq!(block.blockhash, "9yrmhMyM6pgGsjM9eAAJTbCjbBBGgN1ubmgQdBvYKA61");
    assert_eq!(block.parent_slot, 41);
    assert_eq!(block.block_time, 1_700_000_000);
    assert_eq!(block.block_height, 40);
    assert_eq!(block.transactions.len(), 2);

    assert_eq!(block.rewards.len(), 1);
    assert_eq!(block.rewards[0].pubkey, "validator444");
    assert_eq!(block.rewards[0].reward_type, RewardType::Fee);
    assert_eq!(block.rewards[0].commission, Some(5));
}

#[test]
fn transaction_instruction_indices_resolve_to_addresses() {
    let block = Block::from_rpc(42, &block_fixture());
    let tx = &block.transactions[0];

    assert_eq!(tx.signature, "sigAAA");
    assert_eq!(tx.slot, 42);
    assert_eq!(tx.status, TxStatus::Success);
    assert_eq!(tx.fee, 5000);
    assert_eq!(tx.logs, vec!["Program log: ok"]);
    assert_eq!(tx.compute_units_consumed, Some(1234));
    assert_eq!(tx.accounts, vec!["feePayer111", "dest222", "program333"]);

    let ix = &tx.instructions[0];
    assert_eq!(ix.program_id, "program333");
    assert_eq!(ix.accounts, vec!["feePayer111", "dest222"]);
    // Payload is transcoded from the node's base58 to base64.
    assert_eq!(ix.data, STANDARD.encode(b"hello"));

    let inner = ix.inner_instructions.as_ref().unwrap();
    assert_eq!(inner.len(), 1);
    assert_eq!(inner[0].program_id, "dest222");
    assert_eq!(inner[0].data, STANDARD.encode(b"inner"));
    assert!(inner[0].inner_instructions.is_none());
}

#[test]
fn failed_transaction_collapses_to_failed_status() {
    let block = Block::from_rpc(42, &block_fixture());
    let tx = &block.transactions[1];
    assert_eq!(tx.status, TxStatus::Failed);
    // No fee in meta: the block path reports zero.
    assert_eq!(tx.fee, 0);
    assert!(tx.logs.is_empty());
    assert_eq!(tx.compute_units_consumed, None);
}

#[test]
fn lookup_reshape_prefers_listing_slot_and_time() {
    let tx_value = json!({
        "slot": 50,
        "blockTime": 1_700_000_100,
        "transaction": {
            "signatures": ["sigCCC"],
            "message": { "accountKeys": ["a111"], "instructions": [] },
        },
        "meta": { "fee": 7000, "err": null },
    });

    let tx = Transaction::from_lookup("sigCCC", Some(49), Some(1_699_999_999), &tx_value);
    assert_eq!(tx.slot, 49);
    assert_eq!(tx.block_time, 1_699_999_999);
    assert_eq!(tx.fee, 7000);

    // Without listing context, the response's own fields apply.
    let tx = Transaction::from_lookup("sigCCC", None, None, &tx_value);
    assert_eq!(tx.slot, 50);
    assert_eq!(tx.block_time, 1_700_000_100);
}

#[test]
fn lookup_without_meta_defaults_fee_and_succeeds() {
    let tx_value = json!({
        "slot": 50,
        "blockTime": 1_700_000_100,
        "transaction": {
            "signatures": ["sigDDD"],
            "message": { "accountKeys": ["a111"], "instructions": [] },
        },
    });
    let tx = Transaction::from_lookup("sigDDD", None, None, &tx_value);
    assert_eq!(tx.fee, 5000);
    assert_eq!(tx.status, TxStatus::Success);
}

#[test]
fn validators_merge_and_sum_epoch_credits() {
    let vote_accounts = json!({
        "current": [
            {
                "nodePubkey": "nodeAAA",
                "votePubkey": "voteAAA",
                "commission": 10,
                "lastVote": 12345,
                "activatedStake": 5_000_000_000u64,
                "epochCredits": [[10, 5, 5]],
            }
        ],
        "delinquent": [
            {
                "nodePubkey": "nodeBBB",
                "votePubkey": "voteBBB",
                "commission": 100,
                "lastVote": 11111,
                "activatedStake": 0,
                "epochCredits": [[10, 3, 3]],
            }
        ],
    });

    let validators = merge_vote_accounts(&vote_accounts);
    assert_eq!(validators.len(), 2);
    assert_eq!(validators[0].identity, "nodeAAA");
    assert_eq!(validators[0].vote_account, "voteAAA");
    assert_eq!(validators[0].credits, 5);
    assert_eq!(validators[1].credits, 3);
    assert_eq!(validators[1].commission, 100);
}

#[test]
fn validator_credits_accumulate_across_epochs() {
    let v = json!({
        "nodePubkey": "nodeCCC",
        "votePubkey": "voteCCC",
        "commission": 0,
        "lastVote": 999,
        "activatedStake": 42,
        "epochCredits": [[8, 100, 0], [9, 250, 100], [10, 400, 250]],
    });
    let validator = Validator::from_vote_account(&v);
    assert_eq!(validator.credits, 750);
    assert_eq!(validator.epoch_credits.len(), 3);
    assert_eq!(validator.epoch_credits[1], (9, 250, 100));
}

#[test]
fn cluster_stats_fold() {
    let epoch_info = json!({
        "absoluteSlot": 1_000_000,
        "blockHeight": 900_000,
        "epoch": 730,
        "slotIndex": 250,
        "slotsInEpoch": 1000,
    });
    // 500M SOL total, 400M circulating, in lamports.
    let supply = json!({
        "total": 500_000_000_000_000_000u64,
        "circulating": 400_000_000_000_000_000u64,
    });
    let perf_latest = json!([{ "numTransactions": 3000, "samplePeriodSecs": 60 }]);
    let perf_recent = json!([
        { "numTransactions": 3000, "samplePeriodSecs": 60 },
        { "numTransactions": 1200, "samplePeriodSecs": 60 },
    ]);

    let stats = ClusterStats::fold(&epoch_info, &supply, &perf_latest, &perf_recent, 999_999, None);

    assert_eq!(stats.slot, 1_000_000);
    assert_eq!(stats.absolute_slot, 1_000_000);
    assert_eq!(stats.block_height, 900_000);
    assert_eq!(stats.epoch, 730);
    assert!((stats.epoch_progress - 0.25).abs() < 1e-9);
    assert_eq!(stats.tps, 50);
    assert_eq!(stats.average_tps, 35);
    assert_eq!(stats.transaction_count, 3000);
    assert_eq!(stats.total_transactions, 4200);
    assert!((stats.total_supply - 500_000_000.0).abs() < 1e-3);
    assert!((stats.circulating_supply - 400_000_000.0).abs() < 1e-3);
    // Slot-based estimate: 1M / 50 = 20k, floored at 50k.
    assert_eq!(stats.total_accounts, 50_000);
}

#[test]
fn cluster_stats_fold_tolerates_empty_samples() {
    let epoch_info = json!({ "epoch": 1, "slotIndex": 0, "slotsInEpoch": 0 });
    let supply = json!({});
    let empty = json!([]);

    let stats = ClusterStats::fold(&epoch_info, &supply, &empty, &empty, 777, None);
    assert_eq!(stats.slot, 777);
    assert_eq!(stats.tps, 0);
    assert_eq!(stats.average_tps, 0);
    assert_eq!(stats.total_transactions, 0);
    assert_eq!(stats.epoch_progress, 0.0);
}

#[test]
fn account_estimate_branches() {
    // Largest-accounts data wins when present.
    assert_eq!(estimate_total_accounts(20, 1_000_000, 10), 10_000);
    // Slot-based estimate inside the clamp.
    assert_eq!(estimate_total_accounts(0, 5_000_000, 10), 100_000);
    // Clamped at the ceiling.
    assert_eq!(estimate_total_accounts(0, u64::MAX / 2, 10), 50_000_000);
    // Epoch fallback when no slot information exists.
    assert_eq!(estimate_total_accounts(0, 0, 3), 100_000);
    assert_eq!(estimate_total_accounts(0, 0, 50), 500_000);
}

#[test]
fn inflation_estimate_tapers_and_floors() {
    // Two "years" of epochs: 8.0 - 2 * 0.15 = 7.7.
    assert_eq!(estimate_inflation(730), 7.7);
    // Young chains are treated as one year old.
    assert_eq!(estimate_inflation(0), estimate_inflation(365));
    // Far future hits the floor.
    assert_eq!(estimate_inflation(1_000_000), 1.5);
}

#[test]
fn account_reshape_reads_space_from_data_when_missing() {
    let payload = [7u8; 10];
    let value = json!({
        "lamports": 1_000_000u64,
        "owner": "ownerProgram111",
        "executable": false,
        "rentEpoch": 3,
        "data": [STANDARD.encode(payload), "base64"],
    });

    let account = Account::from_rpc("acct555", &value);
    assert_eq!(account.pubkey, "acct555");
    assert_eq!(account.lamports, 1_000_000);
    assert_eq!(account.owner, "ownerProgram111");
    assert!(!account.executable);
    assert_eq!(account.rent_epoch, 3);
    assert_eq!(account.data.program, "ownerProgram111");
    assert_eq!(account.data.space, 10);
    assert!(account.data.parsed.is_none());

    // An explicit space field takes precedence.
    let value = json!({ "owner": "o", "space": 82, "data": ["", "base64"] });
    assert_eq!(Account::from_rpc("x", &value).data.space, 82);
}

#[test]
fn empty_block_reshapes_to_empty_lists() {
    let block = Block::from_rpc(7, &json!({ "blockhash": "h", "parentSlot": 6 }));
    assert!(block.transactions.is_empty());
    assert!(block.rewards.is_empty());
    assert_eq!(block.block_height, 7);
}
