//! Display helpers for addresses, balances, and timestamps.

use crate::constants::chain::LAMPORTS_PER_SOL;

/// Current unix time in seconds.
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Truncate an address for display: "CnY8hv3R...9WzQ"
pub fn format_address(address: &str, lead: usize, trail: usize) -> String {
    if address.len() <= lead + trail {
        return address.to_string();
    }
    format!(
        "{}...{}",
        &address[..lead],
        &address[address.len() - trail..]
    )
}

/// Format a lamport amount as SOL with six decimal places.
pub fn format_sol(lamports: u64) -> String {
    format!("{:.6}", lamports as f64 / LAMPORTS_PER_SOL as f64)
}

/// Relative-time display for a unix timestamp: "42s ago", "3m ago", ...
pub fn format_time_ago(timestamp: i64) -> String {
    let diff = (unix_now() - timestamp).max(0);
    if diff < 60 {
        format!("{diff}s ago")
    } else if diff < 3600 {
        format!("{}m ago", diff / 60)
    } else if diff < 86400 {
        format!("{}h ago", diff / 3600)
    } else {
        format!("{}d ago", diff / 86400)
    }
}
