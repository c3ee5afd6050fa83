//! SPL mint account layout decoding.
//!
//! Mint accounts are exactly 82 bytes:
//! `[0..4]` authority option tag, `[4..36]` mint authority, `[36..44]` supply
//! (u64 LE), `[44]` decimals, `[45]` initialized flag, `[46..50]` freeze
//! option tag, `[50..82]` freeze authority.

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::constants::chain::MINT_ACCOUNT_SIZE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintAccount {
    pub supply: u64,
    pub decimals: u8,
    pub is_initialized: bool,
    pub mint_authority: Option<String>,
    pub freeze_authority: Option<String>,
}

/// Decodes the base64 payload of a program-account entry.
pub fn decode_base64(data: &str) -> Result<MintAccount> {
    let bytes = STANDARD.decode(data).context("mint data is not base64")?;
    decode_bytes(&bytes)
}

/// Decodes a raw 82-byte mint account.
pub fn decode_bytes(bytes: &[u8]) -> Result<MintAccount> {
    if bytes.len() != MINT_ACCOUNT_SIZE as usize {
        bail!(
            "mint account must be {MINT_ACCOUNT_SIZE} bytes, got {}",
            bytes.len()
        );
    }
    let supply = u64::from_le_bytes(bytes[36..44].try_into().context("supply field")?);
    Ok(MintAccount {
        supply,
        decimals: bytes[44],
        is_initialized: bytes[45] != 0,
        mint_authority: read_optional_pubkey(&bytes[0..36]),
        freeze_authority: read_optional_pubkey(&bytes[46..82]),
    })
}

/// Reads a 4-byte option tag followed by a 32-byte public key.
fn read_optional_pubkey(field: &[u8]) -> Option<String> {
    let tag = u32::from_le_bytes(field[0..4].try_into().ok()?);
    if tag == 0 {
        return None;
    }
    Some(bs58::encode(&field[4..36]).into_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mint_bytes(supply: u64, decimals: u8) -> Vec<u8> {
        let mut b = vec![0u8; MINT_ACCOUNT_SIZE as usize];
        b[36..44].copy_from_slice(&supply.to_le_bytes());
        b[44] = decimals;
        b[45] = 1;
        b
    }

    #[test]
    fn decodes_supply_and_decimals() {
        let mint = decode_bytes(&mint_bytes(1_000_000_000, 9)).unwrap();
        assert_eq!(mint.supply, 1_000_000_000);
        assert_eq!(mint.decimals, 9);
        assert!(mint.is_initialized);
        assert_eq!(mint.mint_authority, None);
        assert_eq!(mint.freeze_authority, None);
    }

    #[test]
    fn decodes_authorities_when_tagged() {
        let mut b = mint_bytes(5, 6);
        b[0..4].copy_from_slice(&1u32.to_le_bytes());
        b[4..36].copy_from_slice(&[7u8; 32]);
        let mint = decode_bytes(&b).unwrap();
        assert_eq!(
            mint.mint_authority.as_deref(),
            Some(bs58::encode(&[7u8; 32]).into_string().as_str())
        );
        assert_eq!(mint.freeze_authority, None);
    }

    #[test]
    fn rejects_wrong_size() {
        assert!(decode_bytes(&[0u8; 81]).is_err());
        assert!(decode_bytes(&[0u8; 83]).is_err());
        assert!(decode_bytes(&[]).is_err());
    }

    #[test]
    fn decodes_from_base64() {
        let encoded = STANDARD.encode(mint_bytes(42, 2));
        let mint = decode_base64(&encoded).unwrap();
        assert_eq!(mint.supply, 42);
        assert_eq!(mint.decimals, 2);
    }

    #[test]
    fn rejects_bad_base64() {
        assert!(decode_base64("not base64 at all!!!").is_err());
    }
}
