//! Portal resolution: chasing a mutable portal Cake to the immutable Cake
//! it currently points at.
//!
//! The lookup itself is external (a storage/relational layer owns the
//! portal → target relation); the loop-guard and hop cap are the core's
//! contract and live here regardless of who supplies the lookup. This
//! replaces the spec's ambient thread-local session with an explicit
//! `&dyn PortalResolver` argument, per the spec's own Design Notes
//! redesign flag.

use std::collections::HashSet;

use crate::cake::Cake;
use crate::errors::{CakeError, ResolutionError};
use crate::limits::MAX_RESOLVER_HOPS;

/// External lookup for a single portal hop. Implementations typically wrap
/// a database or in-memory map of `portal Cake -> current target Cake`.
pub trait PortalResolver {
    /// Resolve one hop: given a portal Cake, return the Cake it currently
    /// points at. Fails with [`ResolutionError::UnknownPortal`] (wrapped in
    /// [`CakeError::Resolution`]) if the portal is unknown.
    fn resolve_one(&self, portal: &Cake) -> Result<Cake, CakeError>;
}

/// Chase `start` through portal indirections until an immutable Cake is
/// reached, using `resolver` for each hop.
///
/// Stops immediately if `start.is_immutable()`. Otherwise repeatedly looks
/// up the next Cake, failing if any Cake repeats in the chain or if the
/// chain exceeds [`MAX_RESOLVER_HOPS`] hops.
pub fn resolve(start: Cake, resolver: &dyn PortalResolver) -> Result<Cake, CakeError> {
    let mut current = start;
    let mut seen: HashSet<[u8; 32]> = HashSet::new();

    for hop in 0..MAX_RESOLVER_HOPS {
        if current.is_immutable() {
            tracing::debug!(hop, "portal chain resolved");
            return Ok(current);
        }
        if !seen.insert(current.digest()) {
            tracing::debug!(hop, "portal chain looped");
            return Err(ResolutionError::Loop.into());
        }
        current = resolver.resolve_one(&current)?;
    }

    if current.is_immutable() {
        Ok(current)
    } else {
        Err(ResolutionError::ChainTooLong {
            max_hops: MAX_RESOLVER_HOPS,
        }
        .into())
    }
}
