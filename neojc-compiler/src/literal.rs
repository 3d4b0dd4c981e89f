//! Compile-time conversion of string literals: addresses, hex strings,
//! decimal numbers and contract script hashes.
//!
//! Errors are plain reasons; callers attach the helper and literal.

use num_bigint::BigInt;
use sha2::{Digest, Sha256};

use crate::devpack::ADDRESS_VERSION;

/// Script hash of an N3 address, in little-endian order.
pub fn address_to_script_hash(address: &str) -> Result<[u8; 20], String> {
    let data = bs58::decode(address).into_vec().map_err(|e| e.to_string())?;
    if data.len() != 25 {
        return Err(format!("decodes to {} bytes, expected 25", data.len()));
    }
    if data[0] != ADDRESS_VERSION {
        return Err(format!("address version {:#04x}, expected {ADDRESS_VERSION:#04x}", data[0]));
    }
    let checksum = Sha256::digest(Sha256::digest(&data[..21]));
    if checksum[..4] != data[21..] {
        return Err("checksum mismatch".to_string());
    }
    let mut hash = [0u8; 20];
    hash.copy_from_slice(&data[1..21]);
    hash.reverse();
    Ok(hash)
}

/// Bytes of a hex string, with or without a `0x` prefix.
pub fn hex_to_bytes(text: &str) -> Result<Vec<u8>, String> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(digits).map_err(|e| e.to_string())
}

pub fn string_to_int(text: &str) -> Result<BigInt, String> {
    text.parse::<BigInt>().map_err(|e| e.to_string())
}

/// A contract script hash given as 40 big-endian hex digits, returned in
/// little-endian order.
pub fn script_hash(text: &str) -> Result<[u8; 20], String> {
    let bytes = hex_to_bytes(text)?;
    let mut hash: [u8; 20] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| format!("{} bytes, expected 20", b.len()))?;
    hash.reverse();
    Ok(hash)
}
