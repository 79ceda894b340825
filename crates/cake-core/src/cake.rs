//! The Cake: a compact, self-describing content/identity key.
//!
//! A Cake is a sum type with two payload shapes sharing one external
//! encoding: an INLINE Cake carries its raw payload (≤32 bytes); every
//! other type carries a fixed 32-byte value (a digest, or 32 random bytes
//! for a portal). The header byte packs both the type and the role so the
//! wire form stays a single base-62 string.

use std::fmt;
use std::fs::File;
use std::hash::{Hash, Hasher as StdHasher};
use std::io::Read;
use std::str::FromStr;

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use cake_common::BASE62;

use crate::errors::{CakeError, EncodingError, TypeRoleError};
use crate::hasher::process_stream;
use crate::limits::Limits;

/// Structural hint carried in the low bit of a Cake's header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CakeRole {
    /// Leaf / data-bearing.
    Synapse = 0,
    /// Structural / directory-like.
    Neuron = 1,
}

impl CakeRole {
    /// Decode from the header byte's low bit.
    pub const fn from_bit(bit: u8) -> Self {
        if bit & 1 == 1 {
            CakeRole::Neuron
        } else {
            CakeRole::Synapse
        }
    }

    /// Encode as the header byte's low bit.
    pub const fn as_bit(self) -> u8 {
        self as u8
    }
}

/// Semantic kind of a Cake, packed as the top 7 bits of the header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CakeType {
    Inline = 0,
    Sha256 = 1,
    Portal = 2,
    Vtree = 3,
    Dmount = 4,
    Event = 5,
    DagState = 6,
    JsonWrap = 7,
}

impl CakeType {
    /// Decode from the header byte's top 7 bits.
    pub fn from_code(code: u8) -> Result<Self, EncodingError> {
        Ok(match code {
            0 => CakeType::Inline,
            1 => CakeType::Sha256,
            2 => CakeType::Portal,
            3 => CakeType::Vtree,
            4 => CakeType::Dmount,
            5 => CakeType::Event,
            6 => CakeType::DagState,
            7 => CakeType::JsonWrap,
            other => return Err(EncodingError::UnknownType(other)),
        })
    }

    /// Encode as the header byte's top 7 bits.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Whether this type is a mutable reference resolved via external
    /// lookup.
    pub const fn is_portal(self) -> bool {
        matches!(
            self,
            CakeType::Portal | CakeType::Vtree | CakeType::Dmount | CakeType::DagState
        )
    }

    /// Whether this type is a structural portal (a portal whose resolution
    /// target is itself versioned/tree-shaped).
    pub const fn is_vtree(self) -> bool {
        matches!(self, CakeType::Vtree | CakeType::DagState)
    }

    /// Whether this type's payload is a cryptographic digest of known
    /// content (as opposed to raw inline data or random portal bytes).
    pub const fn is_resolved(self) -> bool {
        matches!(self, CakeType::Sha256 | CakeType::Event | CakeType::JsonWrap)
    }

    /// The role implied by this type, if the type pins one. `INLINE`,
    /// `SHA256`, and the portal types carry no implied role — the caller
    /// chooses.
    pub const fn implied_role(self) -> Option<CakeRole> {
        match self {
            CakeType::Event | CakeType::JsonWrap => Some(CakeRole::Synapse),
            CakeType::DagState => Some(CakeRole::Neuron),
            _ => None,
        }
    }
}

/// A content/identity key: `(type, role, data)`.
///
/// `data` is at most 32 bytes when `type == INLINE`, and exactly 32 bytes
/// otherwise. Equality is structural over all three fields; the in-memory
/// [`Hash`] impl is over [`Cake::digest`] instead, so that an INLINE Cake
/// and a `SHA256` Cake over the same bytes land in the same hash bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cake {
    cake_type: CakeType,
    role: CakeRole,
    data: Vec<u8>,
}

impl Cake {
    /// Build a Cake directly from its parts. Internal: callers should go
    /// through [`Cake::from_bytes`], [`Cake::new_portal`], or
    /// [`Cake::from_digest_and_inline_data`] instead.
    fn from_parts(cake_type: CakeType, role: CakeRole, data: Vec<u8>) -> Result<Self, CakeError> {
        match cake_type {
            CakeType::Inline => {
                if data.len() > 32 {
                    return Err(EncodingError::InlineTooLarge(data.len()).into());
                }
            }
            _ => {
                if data.len() != 32 {
                    return Err(EncodingError::WrongPayloadLength {
                        cake_type,
                        actual: data.len(),
                    }
                    .into());
                }
            }
        }
        Ok(Self {
            cake_type,
            role,
            data,
        })
    }

    /// Parse a Cake from its base-62 string form.
    pub fn parse(s: &str) -> Result<Self, CakeError> {
        let bytes = BASE62
            .decode(s)
            .map_err(|e| EncodingError::InvalidDigit {
                base: 62,
                digit: e.0,
            })?;
        let (&header, data) = bytes.split_first().ok_or(EncodingError::EmptyInput)?;
        let cake_type = CakeType::from_code(header >> 1)?;
        let role = CakeRole::from_bit(header & 1);
        Self::from_parts(cake_type, role, data.to_vec())
    }

    /// Build a Cake from a digest and, if available, the matching inline
    /// payload. Used both by [`Cake::from_bytes`] and by [`crate::rack`]
    /// for a Rack's self-address.
    pub(crate) fn from_digest_and_inline_data(
        digest: [u8; 32],
        inline_data: Option<Vec<u8>>,
        role: CakeRole,
    ) -> Self {
        match inline_data {
            Some(data) => Self::from_parts(CakeType::Inline, role, data)
                .expect("inline data already bounded to <=32 bytes by the hasher"),
            None => Self::from_parts(CakeType::Sha256, role, digest.to_vec())
                .expect("digest is always exactly 32 bytes"),
        }
    }

    /// Build a Cake from an in-memory byte string, inlining it if short
    /// enough and hashing it otherwise. Role defaults to `SYNAPSE`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_bytes_with_role(bytes, CakeRole::Synapse)
    }

    /// As [`Cake::from_bytes`], but with an explicit role. Used by
    /// [`crate::rack::CakeRack`] to self-address with role `NEURON`.
    pub(crate) fn from_bytes_with_role(bytes: &[u8], role: CakeRole) -> Self {
        let (digest, inline) = process_stream(bytes, Limits::default(), |_| {})
            .expect("reading from a byte slice cannot fail");
        Self::from_digest_and_inline_data(digest, inline, role)
    }

    /// Build a Cake by streaming `reader` to completion. Role defaults to
    /// `SYNAPSE`.
    pub fn from_stream<R: Read>(reader: R) -> Result<Self, CakeError> {
        let (digest, inline) = process_stream(reader, Limits::default(), |_| {})?;
        Ok(Self::from_digest_and_inline_data(digest, inline, CakeRole::Synapse))
    }

    /// Build a Cake by hashing the contents of a file. The file handle is
    /// closed on every exit path, including errors.
    pub fn from_file(path: &std::path::Path) -> Result<Self, CakeError> {
        let file = File::open(path)?;
        Self::from_stream(file)
    }

    /// Draw 32 cryptographically random bytes and wrap them as a portal
    /// Cake. Fails if `cake_type` is not a portal type.
    pub fn new_portal(role: CakeRole, cake_type: CakeType) -> Result<Self, CakeError> {
        if !cake_type.is_portal() {
            return Err(TypeRoleError::NotPortal(cake_type).into());
        }
        let mut data = vec![0u8; 32];
        OsRng.fill_bytes(&mut data);
        Self::from_parts(cake_type, role, data)
    }

    /// Reissue this Cake with the same random bytes but a new type/role.
    /// Idempotent if both are already equal to the current ones. Fails
    /// unless both the current type and the target type are portals.
    pub fn transform_portal(&self, role: CakeRole, cake_type: CakeType) -> Result<Self, CakeError> {
        if !self.cake_type.is_portal() || !cake_type.is_portal() {
            return Err(TypeRoleError::TransformNotPortal {
                from: self.cake_type,
                to: cake_type,
            }
            .into());
        }
        Self::from_parts(cake_type, role, self.data.clone())
    }

    /// This Cake's type.
    pub const fn cake_type(&self) -> CakeType {
        self.cake_type
    }

    /// This Cake's role.
    pub const fn role(&self) -> CakeRole {
        self.role
    }

    /// Whether this Cake carries its payload inline (`type == INLINE`).
    pub const fn has_data(&self) -> bool {
        matches!(self.cake_type, CakeType::Inline)
    }

    /// The inline payload, if any.
    pub fn data(&self) -> Option<&[u8]> {
        self.has_data().then_some(self.data.as_slice())
    }

    /// The 32-byte digest: `SHA-256(payload)` for INLINE, else the raw
    /// 32-byte value itself.
    pub fn digest(&self) -> [u8; 32] {
        if self.has_data() {
            Sha256::digest(&self.data).into()
        } else {
            let mut out = [0u8; 32];
            out.copy_from_slice(&self.data);
            out
        }
    }

    /// Whether this Cake's identity is fixed by its content: true for
    /// INLINE (immutable by construction) and for any resolved type.
    pub const fn is_immutable(&self) -> bool {
        self.has_data() || self.cake_type.is_resolved()
    }

    /// The raw 32-byte value for a resolved Cake. Fails for INLINE and for
    /// portal types — callers that want to hash-address an INLINE Cake
    /// must use [`Cake::digest`] instead.
    pub fn hash_bytes(&self) -> Result<&[u8], CakeError> {
        if self.cake_type.is_resolved() {
            Ok(&self.data)
        } else {
            Err(TypeRoleError::NotResolved(self.cake_type).into())
        }
    }

    /// Shard bucket for this Cake's raw `data`, per §4.3.
    pub fn shard_num(&self, base: u32) -> u32 {
        cake_common::shard_num(&self.data, base)
    }

    /// Shard name for this Cake's raw `data`, per §4.3.
    pub fn shard_name(&self, base: u32) -> String {
        cake_common::shard_name(&self.data, base)
    }

    /// Hex rendering of [`Cake::digest`], handy in logs alongside the
    /// base-62 canonical form.
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }
}

impl fmt::Display for Cake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = (self.cake_type.code() << 1) | self.role.as_bit();
        let mut bytes = Vec::with_capacity(1 + self.data.len());
        bytes.push(header);
        bytes.extend_from_slice(&self.data);
        write!(f, "{}", BASE62.encode(&bytes))
    }
}

impl FromStr for Cake {
    type Err = CakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Hash for Cake {
    fn hash<H: StdHasher>(&self, state: &mut H) {
        self.digest().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_inline_cake_string_form() {
        let cake = Cake::from_bytes(b"The quick brown fox jumps over");
        assert_eq!(cake.cake_type(), CakeType::Inline);
        assert_eq!(
            cake.to_string(),
            "01aMUQDApalaaYbXFjBVMMvyCAMfSPcTojI0745igi"
        );
    }

    #[test]
    fn s2_33_byte_payload_is_sha256() {
        let data = vec![b'a'; 33];
        let cake = Cake::from_bytes(&data);
        assert_eq!(cake.cake_type(), CakeType::Sha256);
        assert_eq!(cake.to_string().len(), 44);
        assert!(!cake.has_data());
        assert_eq!(&cake.digest()[..], &Sha256::digest(&data)[..]);
    }

    #[test]
    fn round_trip_through_string_for_inline_and_resolved() {
        for bytes in [&b""[..], b"x", &vec![9u8; 32], &vec![9u8; 33]] {
            let cake = Cake::from_bytes(bytes);
            let s = cake.to_string();
            let parsed = Cake::parse(&s).unwrap();
            assert_eq!(cake, parsed);
        }
    }

    #[test]
    fn inline_boundary_at_32_and_33_bytes() {
        let at_32 = Cake::from_bytes(&vec![1u8; 32]);
        assert_eq!(at_32.cake_type(), CakeType::Inline);
        assert_eq!(at_32.data(), Some(&vec![1u8; 32][..]));

        let at_33 = Cake::from_bytes(&vec![1u8; 33]);
        assert_eq!(at_33.cake_type(), CakeType::Sha256);
        assert!(!at_33.has_data());
    }

    #[test]
    fn new_portal_rejects_non_portal_types() {
        assert!(Cake::new_portal(CakeRole::Synapse, CakeType::Inline).is_err());
        assert!(Cake::new_portal(CakeRole::Synapse, CakeType::Portal).is_ok());
    }

    #[test]
    fn transform_portal_keeps_bytes_and_requires_both_sides_portal() {
        let portal = Cake::new_portal(CakeRole::Synapse, CakeType::Portal).unwrap();
        let vtree = portal.transform_portal(CakeRole::Neuron, CakeType::Vtree).unwrap();
        assert_eq!(vtree.data, portal.data);
        assert_eq!(vtree.cake_type(), CakeType::Vtree);

        let resolved = Cake::from_bytes(b"hello");
        assert!(resolved.transform_portal(CakeRole::Synapse, CakeType::Portal).is_err());
    }

    #[test]
    fn hash_bytes_fails_on_inline_and_portal() {
        let inline = Cake::from_bytes(b"x");
        assert!(inline.hash_bytes().is_err());
        let portal = Cake::new_portal(CakeRole::Synapse, CakeType::Portal).unwrap();
        assert!(portal.hash_bytes().is_err());
        let resolved = Cake::from_bytes(&vec![1u8; 40]);
        assert!(resolved.hash_bytes().is_ok());
    }

    #[test]
    fn equal_data_type_role_implies_equal_cake_and_hash() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::Hasher as _;

        let a = Cake::from_bytes(b"same content");
        let b = Cake::from_bytes(b"same content");
        assert_eq!(a, b);

        let mut ha = DefaultHasher::new();
        let mut hb = DefaultHasher::new();
        a.hash(&mut ha);
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }
}
