//! CakePath: a rooted or relative path of names whose root, if any, is a
//! Cake.

use std::fmt;

use crate::cake::Cake;
use crate::errors::CakeError;

/// A path into the Cake graph: an optional root Cake plus an ordered list
/// of name segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CakePath {
    root: Option<Cake>,
    segments: Vec<String>,
}

impl CakePath {
    /// Build an absolute path rooted at `root`.
    pub fn absolute(root: Cake, segments: Vec<String>) -> Self {
        Self {
            root: Some(root),
            segments,
        }
    }

    /// Build a relative path with no root.
    pub fn relative(segments: Vec<String>) -> Self {
        Self {
            root: None,
            segments,
        }
    }

    /// Parse a path string. A leading `/` marks an absolute path: the
    /// segment immediately after it is parsed as the root Cake, and the
    /// remaining segments form the path. Without a leading `/` the path is
    /// relative.
    pub fn parse(s: &str) -> Result<Self, CakeError> {
        if let Some(rest) = s.strip_prefix('/') {
            let mut parts = rest.split('/');
            let root_str = parts.next().unwrap_or("");
            let root = Cake::parse(root_str)?;
            let segments = parts
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            Ok(Self::absolute(root, segments))
        } else if s.is_empty() {
            Ok(Self::relative(Vec::new()))
        } else {
            let segments = s.split('/').map(String::from).collect();
            Ok(Self::relative(segments))
        }
    }

    /// Whether this path has a root Cake.
    pub fn is_absolute(&self) -> bool {
        self.root.is_some()
    }

    /// The root Cake, if any.
    pub fn root(&self) -> Option<&Cake> {
        self.root.as_ref()
    }

    /// The path's name segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether this path is absolute with no segments (i.e. names the root
    /// itself).
    pub fn is_root(&self) -> bool {
        self.is_absolute() && self.segments.is_empty()
    }

    /// Append `name` as a new last segment.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self {
            root: self.root.clone(),
            segments,
        }
    }

    /// Drop the last segment. Returns `None` if this path is relative or
    /// has no segments.
    pub fn parent(&self) -> Option<Self> {
        if self.root.is_none() || self.segments.is_empty() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(Self {
            root: self.root.clone(),
            segments,
        })
    }

    /// On a relative path, split into `(head, tail)`, where `tail` is
    /// `None` once only one segment remains. Fails on an absolute path.
    pub fn next_in_relative_path(&self) -> Result<(String, Option<Self>), CakeError> {
        if self.is_absolute() {
            return Err(CakeError::NotFound(
                "next_in_relative_path called on an absolute path".into(),
            ));
        }
        let (head, rest) = self
            .segments
            .split_first()
            .ok_or_else(|| CakeError::NotFound("relative path has no segments".into()))?;
        let tail = if rest.is_empty() {
            None
        } else {
            Some(Self::relative(rest.to_vec()))
        };
        Ok((head.clone(), tail))
    }

    /// If `self` is already absolute, returns it unchanged. Otherwise
    /// builds a new absolute path `(base.root, base.segments ++
    /// self.segments)`.
    pub fn make_absolute(&self, base: &Self) -> Self {
        if self.is_absolute() {
            return self.clone();
        }
        let mut segments = base.segments.clone();
        segments.extend(self.segments.iter().cloned());
        Self {
            root: base.root.clone(),
            segments,
        }
    }

    /// The last non-empty segment, if any.
    pub fn filename(&self) -> Option<&str> {
        self.segments
            .iter()
            .rev()
            .find(|s| !s.is_empty())
            .map(String::as_str)
    }
}

impl fmt::Display for CakePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => {
                write!(f, "/{root}")?;
                for seg in &self.segments {
                    write!(f, "/{seg}")?;
                }
                Ok(())
            }
            None => write!(f, "{}", self.segments.join("/")),
        }
    }
}

/// Either a bare Cake or a CakePath, as produced by dispatching a
/// user-supplied string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CakeOrPath {
    /// A bare Cake string.
    Cake(Cake),
    /// A path string.
    Path(CakePath),
}

/// Dispatch a user string: a leading `/` parses as a [`CakePath`];
/// otherwise, if `relative_to_root` and the string contains a `/`, it is
/// treated as a path relative to some root and parsed with a synthesized
/// leading `/`; otherwise it is parsed as a bare [`Cake`].
pub fn cake_or_path(s: &str, relative_to_root: bool) -> Result<CakeOrPath, CakeError> {
    if s.starts_with('/') {
        CakePath::parse(s).map(CakeOrPath::Path)
    } else if relative_to_root && s.contains('/') {
        let prefixed = format!("/{s}");
        CakePath::parse(&prefixed).map(CakeOrPath::Path)
    } else {
        Cake::parse(s).map(CakeOrPath::Cake)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_root() -> Cake {
        Cake::from_bytes(b"root contents")
    }

    #[test]
    fn parse_absolute_and_relative() {
        let root = sample_root();
        let s = format!("/{root}/a/b");
        let parsed = CakePath::parse(&s).unwrap();
        assert!(parsed.is_absolute());
        assert_eq!(parsed.segments(), ["a", "b"]);

        let rel = CakePath::parse("a/b/c").unwrap();
        assert!(!rel.is_absolute());
        assert_eq!(rel.segments(), ["a", "b", "c"]);
    }

    #[test]
    fn child_and_parent() {
        let base = CakePath::relative(vec!["a".into()]);
        let child = base.child("b");
        assert_eq!(child.segments(), ["a", "b"]);

        let root = sample_root();
        let abs = CakePath::absolute(root, vec!["x".into(), "y".into()]);
        let parent = abs.parent().unwrap();
        assert_eq!(parent.segments(), ["x"]);

        assert!(base.parent().is_none());
    }

    #[test]
    fn next_in_relative_path_splits_head_and_tail() {
        let path = CakePath::relative(vec!["a".into(), "b".into(), "c".into()]);
        let (head, tail) = path.next_in_relative_path().unwrap();
        assert_eq!(head, "a");
        let (head2, tail2) = tail.unwrap().next_in_relative_path().unwrap();
        assert_eq!(head2, "b");
        let (head3, tail3) = tail2.unwrap().next_in_relative_path().unwrap();
        assert_eq!(head3, "c");
        assert!(tail3.is_none());
    }

    #[test]
    fn next_in_relative_path_fails_on_absolute() {
        let abs = CakePath::absolute(sample_root(), vec![]);
        assert!(abs.next_in_relative_path().is_err());
    }

    #[test]
    fn make_absolute_is_identity_for_absolute_paths() {
        let root = sample_root();
        let abs = CakePath::absolute(root, vec!["x".into()]);
        let base = CakePath::absolute(sample_root(), vec!["z".into()]);
        assert_eq!(abs.make_absolute(&base), abs);
    }

    #[test]
    fn make_absolute_prepends_base_segments_for_relative_paths() {
        let root = sample_root();
        let base = CakePath::absolute(root.clone(), vec!["base".into()]);
        let rel = CakePath::relative(vec!["leaf".into()]);
        let made = rel.make_absolute(&base);
        assert_eq!(
            made.to_string(),
            format!("/{root}/base/leaf")
        );
    }

    #[test]
    fn is_root_only_for_absolute_with_no_segments() {
        let root = sample_root();
        assert!(CakePath::absolute(root.clone(), vec![]).is_root());
        assert!(!CakePath::absolute(root, vec!["a".into()]).is_root());
        assert!(!CakePath::relative(vec![]).is_root());
    }

    #[test]
    fn cake_or_path_dispatch() {
        let root = sample_root();
        let abs_str = format!("/{root}/a");
        assert!(matches!(
            cake_or_path(&abs_str, false).unwrap(),
            CakeOrPath::Path(_)
        ));

        let bare = root.to_string();
        assert!(matches!(
            cake_or_path(&bare, false).unwrap(),
            CakeOrPath::Cake(_)
        ));

        assert!(matches!(
            cake_or_path("a/b", true).unwrap(),
            CakeOrPath::Path(_)
        ));
        assert!(matches!(
            cake_or_path("a/b", false).unwrap_err(),
            CakeError::Encoding(_)
        ));
    }
}
