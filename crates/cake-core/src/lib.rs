//! Content-addressed identity and bundling core: the Cake key algebra,
//! ContentAddress, CakeRack, CakePath, and the auxiliary identity
//! primitives (streaming hasher, salted-SHA, Event) built around them.
//!
//! The core is synchronous and holds no global mutable state: portal
//! resolution takes an explicit [`resolver::PortalResolver`] rather than
//! reaching for a thread-local session, and all value types other than
//! [`rack::CakeRack`] are immutable and freely shareable once constructed.

pub mod cake;
pub mod content_address;
pub mod errors;
pub mod event;
pub mod hasher;
pub mod limits;
pub mod naming;
pub mod path;
pub mod rack;
pub mod resolver;
pub mod salted_sha;

pub use cake::{Cake, CakeRole, CakeType};
pub use content_address::ContentAddress;
pub use errors::{CakeError, EncodingError, ResolutionError, TypeRoleError};
pub use event::{Event, EventState, JsonWrap};
pub use hasher::{process_stream, Hasher};
pub use limits::Limits;
pub use naming::validate_bookmark_name;
pub use path::{cake_or_path, CakeOrPath, CakePath};
pub use rack::{CakeRack, Patch, PatchAction};
pub use resolver::{resolve, PortalResolver};
pub use salted_sha::SaltedSha;
