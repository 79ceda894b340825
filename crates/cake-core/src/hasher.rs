//! Streaming SHA-256 hashing with simultaneous inline-payload capture.
//!
//! A payload is hashed exactly once as it streams through, and in the same
//! pass the first [`INLINE_THRESHOLD`] bytes are retained so a caller that
//! turns out to have a small payload can build an INLINE Cake without a
//! second read.

use std::io::{self, Read};

use sha2::{Digest, Sha256};

use crate::limits::{Limits, INLINE_THRESHOLD};

/// Incremental SHA-256 hasher that also captures up to
/// [`INLINE_THRESHOLD`] leading bytes for inline storage.
#[derive(Debug, Default)]
pub struct Hasher {
    inner: Sha256,
    inline: Vec<u8>,
    total_len: u64,
}

impl Hasher {
    /// Start a new hasher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed more bytes into the hash.
    pub fn update(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
        self.total_len += bytes.len() as u64;
        if self.inline.len() < INLINE_THRESHOLD {
            let take = (INLINE_THRESHOLD - self.inline.len()).min(bytes.len());
            self.inline.extend_from_slice(&bytes[..take]);
        }
    }

    /// Total number of bytes fed so far.
    pub fn len(&self) -> u64 {
        self.total_len
    }

    /// Whether any bytes have been fed.
    pub fn is_empty(&self) -> bool {
        self.total_len == 0
    }

    /// The captured inline prefix, present only while the total length seen
    /// so far is at most [`INLINE_THRESHOLD`].
    pub fn inline_payload(&self) -> Option<&[u8]> {
        if self.total_len as usize <= INLINE_THRESHOLD {
            Some(&self.inline)
        } else {
            None
        }
    }

    /// Consume the hasher, producing the final 32-byte digest.
    pub fn finalize(self) -> [u8; 32] {
        self.inner.finalize().into()
    }

    /// The digest of the bytes fed so far, without consuming the hasher
    /// (clones the internal state and finalizes the clone). Lets a
    /// [`crate::content_address::ContentAddress`] be derived from a
    /// still-in-progress hasher.
    pub fn digest_so_far(&self) -> [u8; 32] {
        self.inner.clone().finalize().into()
    }
}

/// Read `reader` to completion in `limits.chunk_size`-sized chunks, hashing
/// as it goes and invoking `on_chunk` with each chunk (e.g. to forward it to
/// a sink). Returns the final digest and, when the whole payload was at
/// most [`INLINE_THRESHOLD`] bytes, the captured inline payload.
pub fn process_stream<R: Read>(
    mut reader: R,
    limits: Limits,
    mut on_chunk: impl FnMut(&[u8]),
) -> io::Result<([u8; 32], Option<Vec<u8>>)> {
    let mut hasher = Hasher::new();
    let mut buf = vec![0u8; limits.chunk_size.max(1)];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        on_chunk(&buf[..n]);
    }
    let inline = hasher.inline_payload().map(<[u8]>::to_vec);
    Ok((hasher.finalize(), inline))
}
