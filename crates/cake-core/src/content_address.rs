//! ContentAddress: the canonical, case-insensitive base-36 form of a
//! 32-byte hash, used as a storage key.

use std::fmt;

use cake_common::BASE36;

use crate::cake::Cake;
use crate::errors::{CakeError, EncodingError};
use crate::hasher::Hasher;
use crate::limits::MAX_SHARDS;

/// A canonical hash-derived identifier with a precomputed shard name.
#[derive(Debug, Clone)]
pub struct ContentAddress {
    hash: [u8; 32],
    id: String,
    shard_name: String,
}

impl ContentAddress {
    /// Build from a raw 32-byte hash.
    pub fn from_hash(hash: [u8; 32]) -> Self {
        let id = BASE36.encode(&hash);
        let shard_name = cake_common::shard_name(&hash, MAX_SHARDS);
        Self {
            hash,
            id,
            shard_name,
        }
    }

    /// Build from an in-progress [`Hasher`]'s current digest, without
    /// consuming it.
    pub fn from_hasher(hasher: &Hasher) -> Self {
        Self::from_hash(hasher.digest_so_far())
    }

    /// Build from a hash-bearing Cake. Fails if the Cake's type is not
    /// resolved (INLINE Cakes must go through [`Cake::digest`] first).
    pub fn from_cake(cake: &Cake) -> Result<Self, CakeError> {
        let bytes = cake.hash_bytes()?;
        let mut hash = [0u8; 32];
        hash.copy_from_slice(bytes);
        Ok(Self::from_hash(hash))
    }

    /// Parse from a base-36 string (case-insensitive).
    pub fn parse(s: &str) -> Result<Self, CakeError> {
        let bytes = BASE36
            .decode(&s.to_ascii_lowercase())
            .map_err(|e| EncodingError::InvalidDigit {
                base: 36,
                digit: e.0,
            })?;
        if bytes.len() != 32 {
            return Err(EncodingError::WrongPayloadLength {
                cake_type: crate::cake::CakeType::Sha256,
                actual: bytes.len(),
            }
            .into());
        }
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes);
        Ok(Self::from_hash(hash))
    }

    /// The raw 32-byte hash.
    pub const fn hash_bytes(&self) -> &[u8; 32] {
        &self.hash
    }

    /// The canonical lowercase base-36 id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The precomputed shard name.
    pub fn shard_name(&self) -> &str {
        &self.shard_name
    }

    /// True iff `cake`'s `hash_bytes()` equals this address's hash.
    pub fn matches(&self, cake: &Cake) -> bool {
        cake.hash_bytes()
            .map(|bytes| bytes == self.hash)
            .unwrap_or(false)
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl PartialEq for ContentAddress {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for ContentAddress {}

impl std::hash::Hash for ContentAddress {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Polymorphic construction over `{Hasher, Cake, string}`, per §4.4: build
/// from an in-progress hasher's current digest. Infallible, but `TryFrom`
/// keeps the same trait shape as the `Cake`/`str` conversions below.
impl TryFrom<&Hasher> for ContentAddress {
    type Error = CakeError;

    fn try_from(hasher: &Hasher) -> Result<Self, Self::Error> {
        Ok(Self::from_hasher(hasher))
    }
}

/// Build from a hash-bearing Cake; fails if the Cake's type is not
/// resolved.
impl TryFrom<&Cake> for ContentAddress {
    type Error = CakeError;

    fn try_from(cake: &Cake) -> Result<Self, Self::Error> {
        Self::from_cake(cake)
    }
}

/// Parse from a base-36 string (case-insensitive).
impl TryFrom<&str> for ContentAddress {
    type Error = CakeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s3_content_address_of_46_a_bytes() {
        let data = vec![b'a'; 46];
        let cake = Cake::from_bytes(&data);
        let addr = ContentAddress::from_cake(&cake).unwrap();
        assert_eq!(
            addr.id(),
            "2jr7e7m1dz6uky4soq7eaflekjlgzwsvech6skma3ojl4tc0zv"
        );
        assert!(addr.matches(&cake));

        let other = Cake::from_bytes(&vec![b'a'; 47]);
        assert!(!addr.matches(&other));
    }

    #[test]
    fn round_trip_preserves_hash() {
        let hash = [7u8; 32];
        let addr = ContentAddress::from_hash(hash);
        let parsed = ContentAddress::parse(addr.id()).unwrap();
        assert_eq!(parsed.hash_bytes(), &hash);
    }

    #[test]
    fn parse_is_case_insensitive() {
        let addr = ContentAddress::from_hash([1u8; 32]);
        let upper = addr.id().to_ascii_uppercase();
        let parsed = ContentAddress::parse(&upper).unwrap();
        assert_eq!(parsed, addr);
    }

    #[test]
    fn from_cake_fails_for_inline() {
        let cake = Cake::from_bytes(b"short");
        assert!(ContentAddress::from_cake(&cake).is_err());
    }

    #[test]
    fn try_from_hasher_does_not_consume_it() {
        let mut hasher = Hasher::new();
        hasher.update(b"streamed content");
        let addr = ContentAddress::try_from(&hasher).unwrap();
        assert_eq!(addr.hash_bytes(), &hasher.digest_so_far());
    }

    #[test]
    fn try_from_cake_and_str_match_inherent_constructors() {
        let cake = Cake::from_bytes(&vec![b'b'; 40]);
        let via_try_from = ContentAddress::try_from(&cake).unwrap();
        let via_inherent = ContentAddress::from_cake(&cake).unwrap();
        assert_eq!(via_try_from, via_inherent);

        let via_str = ContentAddress::try_from(via_inherent.id()).unwrap();
        assert_eq!(via_str, via_inherent);
    }
}
