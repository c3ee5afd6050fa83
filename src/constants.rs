//! Chain and service constants
//!
//! Centralized constants for on-chain layouts, well-known addresses, caching,
//! and the heuristics used by the dashboard statistics.

/// On-chain units and well-known addresses
pub mod chain {
    /// Lamports per SOL (minor units of the native token)
    pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

    /// Address whose signature history seeds the recent-transaction feed
    pub const SYSTEM_PROGRAM: &str = "11111111111111111111111111111112";

    /// SPL token program that owns every mint account
    pub const TOKEN_PROGRAM: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

    /// Byte size of an SPL mint account (the `dataSize` filter for mint scans)
    pub const MINT_ACCOUNT_SIZE: u64 = 82;

    /// Fee assumed for a transaction whose meta is unavailable (lamports)
    pub const FALLBACK_FEE_LAMPORTS: u64 = 5_000;

    /// Version string reported for validators
    ///
    /// The RPC surface exposes no per-validator version, so this placeholder
    /// stands in for every entry.
    pub const VALIDATOR_VERSION: &str = "1.17.15";
}

/// Service behavior defaults (overridable via `Config`)
pub mod service {
    /// Cache freshness window in milliseconds
    pub const CACHE_TTL_MS: u64 = 30_000;

    /// Signatures resolved per sequential batch in the transaction feed
    pub const TX_BATCH_SIZE: usize = 10;

    /// Performance samples averaged for the smoothed TPS figure
    pub const TPS_SAMPLE_COUNT: usize = 30;
}

/// Constants behind the total-account-count estimate
///
/// No authoritative account count is exposed by the RPC surface, so the
/// dashboard shows an estimate built from these knobs. The numbers are
/// deliberate guesses, not observations.
pub mod estimate {
    /// Accounts assumed to exist per entry of the largest-accounts list
    pub const PER_LARGEST_ACCOUNT: u64 = 500;

    /// Assumed slots elapsed per account created
    pub const SLOTS_PER_ACCOUNT: u64 = 50;

    /// Floor for the slot-based estimate
    pub const SLOT_ESTIMATE_MIN: u64 = 50_000;

    /// Ceiling for the slot-based estimate
    pub const SLOT_ESTIMATE_MAX: u64 = 50_000_000;

    /// Accounts assumed per elapsed epoch (last-resort fallback)
    pub const PER_EPOCH: u64 = 10_000;

    /// Floor for the epoch-based fallback
    pub const EPOCH_ESTIMATE_MIN: u64 = 100_000;
}

/// Constants behind the inflation estimate
pub mod inflation {
    /// Starting annual inflation rate, percent
    pub const BASE_RATE: f64 = 8.0;

    /// Annual decrease of the rate, percentage points
    pub const TAPER: f64 = 0.15;

    /// Long-term floor, percent
    pub const FLOOR: f64 = 1.5;

    /// Epochs treated as one "year" when tapering
    pub const EPOCHS_PER_YEAR: f64 = 365.0;
}
