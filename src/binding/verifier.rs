//! Address syntax and ownership-proof checks.

use alloy::primitives::Address;

use crate::blockchain::recover_message_signer;

const ADDRESS_HEX_LEN: usize = 40;

/// Stateless checks over owner-supplied addresses and signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureVerifier;

impl SignatureVerifier {
    /// `0x` followed by exactly 40 hex digits, either case. No checksum rule.
    pub fn is_valid_address(addr: &str) -> bool {
        addr.strip_prefix("0x").is_some_and(|hex| {
            hex.len() == ADDRESS_HEX_LEN && hex.bytes().all(|b| b.is_ascii_hexdigit())
        })
    }

    /// Parse an address that passed [`Self::is_valid_address`].
    pub fn parse_address(addr: &str) -> Option<Address> {
        if !Self::is_valid_address(addr) {
            return None;
        }
        addr.parse().ok()
    }

    /// Decode a hex signature. `None` for anything that is not hex.
    pub fn decode_signature(signature: &str) -> Option<Vec<u8>> {
        let raw = signature.strip_prefix("0x").unwrap_or(signature);
        hex::decode(raw).ok()
    }

    /// Whether `signature` is an EIP-191 personal-message signature over
    /// `message` by `claimed`. Malformed input verifies as `false`.
    pub fn verify(message: &str, signature: &[u8], claimed: Address) -> bool {
        match recover_message_signer(message, signature) {
            Ok(signer) => signer == claimed,
            Err(e) => {
                tracing::debug!(claimed = %claimed, error = %e, "Signature did not recover");
                false
            }
        }
    }
}
