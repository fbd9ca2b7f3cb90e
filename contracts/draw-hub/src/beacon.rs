use drand_verify::Pubkey;
use sha2::{Digest, Sha256};

/// Quicknet public key (G2, 96 bytes), hex encoded.
/// Network: drand quicknet (bls-unchained-g1-rfc9380)
pub const QUICKNET_PK_HEX: &str = "83cf0f2896adee7eb8b5f01fcad3912212c437e0073e911fb90022d3e760183c8c4b450b6a0a6c3ac6a5776a2d1064510d1fec758c921cc22b0e17e63aaf4bcb5ed66304de9cf809bd274ca73bab4af5a6e9c76a4bc09e76eae8991ef5ece45a";

/// Quicknet genesis time (unix seconds) and round period.
pub const QUICKNET_GENESIS: u64 = 1692803367;
pub const QUICKNET_PERIOD: u64 = 3;

/// Errors from BLS verification.
#[derive(Debug)]
pub enum VerifyError {
    InvalidPubkeyLength,
    InvalidPubkey,
    VerificationFailed(String),
    InvalidSignature,
}

impl std::fmt::Display for VerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifyError::InvalidPubkeyLength => {
                write!(f, "invalid pubkey length (expected 96 bytes)")
            }
            VerifyError::InvalidPubkey => write!(f, "invalid pubkey (failed to parse G2 point)"),
            VerifyError::VerificationFailed(msg) => write!(f, "verification failed: {}", msg),
            VerifyError::InvalidSignature => write!(f, "invalid BLS signature"),
        }
    }
}

/// Verify a quicknet beacon signature for a round and derive randomness.
///
/// Returns 32-byte randomness = sha256(signature) on success.
///
/// Uses drand-verify's pure-Rust BLS12-381 implementation; quicknet runs
/// scheme bls-unchained-g1-rfc9380, hence G2PubkeyRfc.
pub fn verify_round_signature(
    pubkey_bytes: &[u8],
    round: u64,
    signature: &[u8],
) -> Result<[u8; 32], VerifyError> {
    let pk_fixed: [u8; 96] = pubkey_bytes
        .try_into()
        .map_err(|_| VerifyError::InvalidPubkeyLength)?;

    let pk = drand_verify::G2PubkeyRfc::from_fixed(pk_fixed)
        .map_err(|_| VerifyError::InvalidPubkey)?;

    // Quicknet is unchained: previous_signature is empty
    let is_valid = pk
        .verify(round, &[], signature)
        .map_err(|e| VerifyError::VerificationFailed(format!("{:?}", e)))?;

    if !is_valid {
        return Err(VerifyError::InvalidSignature);
    }

    let randomness: [u8; 32] = Sha256::digest(signature).into();
    Ok(randomness)
}

/// Unix time at which a round's signature becomes public.
/// Round 1 is published at genesis.
pub fn publish_time(genesis_time: u64, period_seconds: u64, round: u64) -> u64 {
    genesis_time + (round - 1) * period_seconds
}

/// First round published strictly after the given unix time. A draw claimed
/// at that time cannot have seen this round's signature.
pub fn round_after(genesis_time: u64, period_seconds: u64, time_seconds: u64) -> u64 {
    if time_seconds < genesis_time {
        return 1;
    }
    (time_seconds - genesis_time) / period_seconds + 2
}
