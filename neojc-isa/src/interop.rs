use sha2::{Digest, Sha256};

/// SYSCALL operand for an interop service: the first four bytes of the SHA-256
/// digest of its ASCII name, read little-endian.
pub fn interop_hash(name: &str) -> u32 {
    let digest = Sha256::digest(name.as_bytes());
    u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}
