//! Legacy LDAP-compatible salted-SHA password digest.
//!
//! SHA-1 with a 4-byte salt is not a recommendation — it's a
//! compatibility constraint for interoperating with LDAP-style stores
//! that already speak `{SSHA}`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

use crate::errors::CakeError;
use crate::limits::SALTED_SHA_SALT_LEN;

const PREFIX: &str = "{SSHA}";
const DIGEST_LEN: usize = 20;

/// A salted SHA-1 password digest in `{SSHA}`-compatible form.
#[derive(Clone)]
pub struct SaltedSha {
    digest: [u8; DIGEST_LEN],
    salt: [u8; SALTED_SHA_SALT_LEN],
}

impl SaltedSha {
    /// Draw a fresh random salt and digest `secret ∥ salt` (secret first,
    /// then salt — the LDAP-compatible ordering).
    pub fn from_secret(secret: &str) -> Self {
        let mut salt = [0u8; SALTED_SHA_SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        Self::from_secret_and_salt(secret, salt)
    }

    fn from_secret_and_salt(secret: &str, salt: [u8; SALTED_SHA_SALT_LEN]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(secret.as_bytes());
        hasher.update(salt);
        let digest = hasher.finalize();
        let mut out = [0u8; DIGEST_LEN];
        out.copy_from_slice(&digest);
        Self { digest: out, salt }
    }

    /// Recompute the digest for `candidate` with this instance's stored
    /// salt and compare it against the stored digest in constant time.
    /// Returns a bare boolean; this never raises.
    pub fn check_secret(&self, candidate: &str) -> bool {
        let recomputed = Self::from_secret_and_salt(candidate, self.salt);
        recomputed.digest[..].ct_eq(&self.digest[..]).into()
    }

    /// Parse from `"{SSHA}" + base64(digest ∥ salt)`. Fails unless the
    /// prefix matches exactly and the decoded payload is exactly
    /// `DIGEST_LEN + SALT_LEN` bytes.
    pub fn parse(s: &str) -> Result<Self, CakeError> {
        let encoded = s
            .strip_prefix(PREFIX)
            .ok_or_else(|| CakeError::Authentication(format!("missing {PREFIX} prefix")))?;
        let payload = BASE64
            .decode(encoded)
            .map_err(|e| CakeError::Authentication(format!("invalid base64 payload: {e}")))?;
        if payload.len() != DIGEST_LEN + SALTED_SHA_SALT_LEN {
            return Err(CakeError::Authentication(format!(
                "expected {} byte payload, got {}",
                DIGEST_LEN + SALTED_SHA_SALT_LEN,
                payload.len()
            )));
        }
        let mut digest = [0u8; DIGEST_LEN];
        let mut salt = [0u8; SALTED_SHA_SALT_LEN];
        digest.copy_from_slice(&payload[..DIGEST_LEN]);
        salt.copy_from_slice(&payload[DIGEST_LEN..]);
        Ok(Self { digest, salt })
    }

    /// Serialize as `"{SSHA}" + base64(digest ∥ salt)`.
    pub fn to_canonical_string(&self) -> String {
        let mut payload = Vec::with_capacity(DIGEST_LEN + SALTED_SHA_SALT_LEN);
        payload.extend_from_slice(&self.digest);
        payload.extend_from_slice(&self.salt);
        format!("{PREFIX}{}", BASE64.encode(payload))
    }
}

impl std::fmt::Display for SaltedSha {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl std::str::FromStr for SaltedSha {
    type Err = CakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
