//! Tunable constants and the DoS-protection limits a caller can override.
//!
//! Mirrors the teacher's pattern of keeping hard limits as plain `const`s
//! next to a small overridable struct, rather than scattering magic numbers
//! through the modules that use them.

pub use cake_common::MAX_SHARDS;

/// Payloads at or below this size are stored inline in a Cake rather than
/// hashed. Matches the header's own length budget: a [`crate::cake::Cake`]
/// with an inline payload and one with a resolved hash look the same size on
/// the wire up to this threshold.
pub const INLINE_THRESHOLD: usize = 32;

/// Default chunk size used by [`crate::hasher::process_stream`] when the
/// caller has no better number (e.g. no knowledge of the underlying
/// transport's framing). Deliberately not a round power of two so that
/// accidental alignment with unrelated buffer sizes is less likely.
pub const DEFAULT_CHUNK_SIZE: usize = 65_355;

/// Hop budget for [`crate::resolver::resolve`]: a portal chain longer than
/// this is treated as a resolution failure rather than followed further.
pub const MAX_RESOLVER_HOPS: usize = 10;

/// Byte length of a SHA-256 digest, i.e. a resolved Cake's payload length.
pub const SHA256_DIGEST_LEN: usize = 32;

/// Byte length of the salt in a [`crate::salted_sha::SaltedSha`] digest.
pub const SALTED_SHA_SALT_LEN: usize = 4;

/// Caller-overridable limits. Currently just the stream chunk size; kept as
/// its own struct (rather than a bare argument) so future limits can be
/// added without changing call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Chunk size used when streaming a payload through the hasher.
    pub chunk_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}
