//! # Custody Address Derivation
//!
//! Each escrow record holds its deposit at a deterministic custody
//! address derived from the platform wallet and the escrow id. One
//! custody account per record keeps the token balance attributable to
//! exactly one escrow, so the custody invariant (balance equals deposit
//! between funding and settlement) is checkable per record.

use sha2::{Digest, Sha256};

use deedlock_core::{Address, EscrowId};

/// Domain-separation tag for custody derivation.
const CUSTODY_TAG: &[u8] = b"deedlock:custody:v1";

/// Derive the custody address for an escrow.
///
/// The derivation is a SHA-256 over a fixed tag, the platform wallet,
/// and the big-endian escrow id, truncated to the address width. The
/// same `(platform_wallet, id)` pair always derives the same address.
pub fn custody_address(platform_wallet: &Address, id: EscrowId) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(CUSTODY_TAG);
    hasher.update(platform_wallet.as_bytes());
    hasher.update(id.as_u64().to_be_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&digest[..20]);
    Address::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet() -> Address {
        Address::from_bytes([0xAB; 20])
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = custody_address(&wallet(), EscrowId(7));
        let b = custody_address(&wallet(), EscrowId(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_ids_distinct_custody() {
        let a = custody_address(&wallet(), EscrowId(0));
        let b = custody_address(&wallet(), EscrowId(1));
        assert_ne!(a, b);
    }

    #[test]
    fn test_distinct_wallets_distinct_custody() {
        let other = Address::from_bytes([0xCD; 20]);
        let a = custody_address(&wallet(), EscrowId(0));
        let b = custody_address(&other, EscrowId(0));
        assert_ne!(a, b);
    }

    #[test]
    fn test_custody_is_never_zero() {
        // The tag makes an all-zero digest prefix practically impossible;
        // assert on a sample to document the expectation.
        for n in 0..16 {
            assert!(!custody_address(&wallet(), EscrowId(n)).is_zero());
        }
    }
}
