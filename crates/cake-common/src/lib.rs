//! Dependency-light primitives shared across the Cake content-address core:
//! the Base-N codec and the shard-routing function. Kept separate from
//! `cake-core` so consumers that only need shard routing (e.g. a storage
//! layer picking a bucket for an already-computed hash) don't have to pull
//! in hashing/serde machinery.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod basen;
pub mod shard;

pub use basen::{BaseN, BASE36, BASE62};
pub use shard::{is_it_shard, shard_name, shard_num, MAX_SHARDS};
