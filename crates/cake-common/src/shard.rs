//! Deterministic shard routing: map a hash's first bytes to a bucket in
//! `[0, MAX_SHARDS)`.

use crate::basen::BASE36;

#[cfg(feature = "std")]
use std::string::String;

/// Number of shard buckets. Storage/DB layers outside this crate use this to
/// size their bucket arrays.
pub const MAX_SHARDS: u32 = 8192;

/// Compute the shard bucket for a hash (or hash-like) byte string.
///
/// The general rule is `(bytes[0] * 256 + bytes[1]) mod base`. Two
/// below-2-byte fallbacks exist for INLINE Cakes whose payload is shorter
/// than a real hash: a 1-byte payload returns `bytes[0]` directly (NOT
/// reduced mod `base` — preserved exactly as the reference behavior
/// specifies), and a 0-byte payload returns `0`.
pub fn shard_num(bytes: &[u8], base: u32) -> u32 {
    match bytes.len() {
        0 => 0,
        1 => u32::from(bytes[0]),
        _ => (u32::from(bytes[0]) * 256 + u32::from(bytes[1])) % base,
    }
}

/// Base-36 rendering of [`shard_num`], minimum length 1 (e.g. shard 0 is
/// `"0"`, not `""`).
#[cfg(feature = "std")]
pub fn shard_name(bytes: &[u8], base: u32) -> String {
    BASE36.encode_int(u128::from(shard_num(bytes, base)))
}

/// Check whether `name` is a syntactically valid shard name: 1-3 base-36
/// characters (case-insensitive) decoding to an integer below `max`.
#[cfg(feature = "std")]
pub fn is_it_shard(name: &str, max: u32) -> bool {
    if name.is_empty() || name.len() > 3 {
        return false;
    }
    match BASE36.decode_int(name) {
        Ok(n) => n < u128::from(max),
        Err(_) => false,
    }
}
