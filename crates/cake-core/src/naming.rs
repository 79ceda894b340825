//! Bookmark name validation: the handful of names reserved for structural
//! use in a path/rack hierarchy, plus the blanket rule against embedding a
//! path separator in a single segment name.

use crate::errors::CakeError;

/// Names that a bookmark (a named root entry) may never take.
pub const RESERVED_NAMES: [&str; 3] = ["_", "~", "-"];

/// Reject reserved bookmark names and any name containing `/`.
pub fn validate_bookmark_name(name: &str) -> Result<(), CakeError> {
    if RESERVED_NAMES.contains(&name) {
        return Err(CakeError::ReservedName(name.to_string()));
    }
    if name.contains('/') {
        return Err(CakeError::ReservedName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_each_reserved_name() {
        for name in RESERVED_NAMES {
            assert!(validate_bookmark_name(name).is_err());
        }
    }

    #[test]
    fn rejects_names_with_a_slash() {
        assert!(validate_bookmark_name("a/b").is_err());
    }

    #[test]
    fn accepts_ordinary_names() {
        assert!(validate_bookmark_name("my-bookmark").is_ok());
        assert!(validate_bookmark_name("report_2026").is_ok());
    }
}
