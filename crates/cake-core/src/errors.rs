//! Error categories for the Cake core, grouped by the condition that raises
//! them rather than by module. The core surfaces these unchanged to its
//! caller: no retries, no recovery, no logging beyond the occasional
//! `tracing::debug!`/`trace!` call site.

use thiserror::Error;

use crate::cake::CakeType;

/// Malformed on-the-wire encoding: bad Base-N input, wrong header byte, or a
/// payload length that doesn't match the declared type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("invalid base-{base} digit {digit:?}")]
    InvalidDigit { base: usize, digit: char },

    #[error("cake string is empty")]
    EmptyInput,

    #[error("unknown cake type code {0}")]
    UnknownType(u8),

    #[error("{cake_type:?} requires a 32-byte payload, got {actual} bytes")]
    WrongPayloadLength { cake_type: CakeType, actual: usize },

    #[error("INLINE payload must be at most 32 bytes, got {0}")]
    InlineTooLarge(usize),
}

/// Misuse of a Cake's type/role contract: asking an INLINE Cake for its
/// hash bytes, asserting portal-ness on a non-portal Cake, or transforming
/// a portal into/from a non-portal type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeRoleError {
    #[error("{0:?} is not a resolved (hash-bearing) cake type")]
    NotResolved(CakeType),

    #[error("{0:?} is not a portal cake type")]
    NotPortal(CakeType),

    #[error("transform_portal requires both source and target types to be portals, got {from:?} -> {to:?}")]
    TransformNotPortal { from: CakeType, to: CakeType },
}

/// Failure while chasing a portal Cake to its resolution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("portal has no known resolution target")]
    UnknownPortal,

    #[error("resolution chain revisited a cake it had already seen")]
    Loop,

    #[error("resolution chain exceeded {max_hops} hops")]
    ChainTooLong { max_hops: usize },
}

/// Top-level error type for the Cake core.
#[derive(Debug, Error)]
pub enum CakeError {
    #[error("malformed encoding: {0}")]
    Encoding(#[from] EncodingError),

    #[error("type/role contract violation: {0}")]
    TypeRole(#[from] TypeRoleError),

    #[error("resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("invalid salted-sha encoding: {0}")]
    Authentication(String),

    #[error("reserved or invalid name: {0:?}")]
    ReservedName(String),

    #[error("remote store error: {0}")]
    Remote(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("not authorized: {0}")]
    NotAuthorized(String),

    #[error("I/O error reading stream")]
    Io(#[from] std::io::Error),
}
