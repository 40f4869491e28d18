//! Component paths and resource locators.
//!
//! A [`Uri`] is an immutable `(scheme, absolute, segments)` triple.
//! The `cpath` scheme addresses components in the tree and is assumed
//! when no scheme is written:
//!
//! ```text
//! cpath:/                 the root
//! cpath:/solver/bc/inlet  absolute
//! cpath:../time           relative, resolved against a caller location
//! /mesh/topology          same as cpath:/mesh/topology
//! file:/tmp/case.cf3      a file on disk
//! ```
//!
//! Parsing normalises the path: `.` segments are dropped, `x/..` pairs
//! collapse, leading `..` segments are kept on relative paths and a
//! `..` that would climb above an absolute root is rejected.
//!
//! # Example
//!
//! ```
//! use cf3_types::Uri;
//!
//! let bc: Uri = "cpath:/solver/bc".parse().unwrap();
//! let inlet = &bc / "inlet";
//! assert_eq!(inlet.to_string(), "cpath:/solver/bc/inlet");
//!
//! let rel: Uri = "cpath:../../time".parse().unwrap();
//! assert_eq!(rel.resolve_against(&inlet).unwrap().to_string(), "cpath:/solver/time");
//! ```

use crate::ErrorCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Div;
use std::str::FromStr;
use thiserror::Error;

/// URI scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Scheme {
    /// Component path.
    #[default]
    Cpath,
    /// Local file.
    File,
    /// Remote resource over HTTP.
    Http,
    /// Remote resource over HTTPS.
    Https,
}

impl Scheme {
    /// Lower-case scheme name as written before the `:`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cpath => "cpath",
            Self::File => "file",
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    /// Case-insensitive lookup.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "cpath" => Some(Self::Cpath),
            "file" => Some(Self::File),
            "http" => Some(Self::Http),
            "https" => Some(Self::Https),
            _ => None,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// URI parsing and resolution failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    #[error("unknown scheme '{scheme}' in '{uri}'")]
    UnknownScheme { uri: String, scheme: String },

    #[error("'{uri}' climbs above the root")]
    EscapesRoot { uri: String },
}

impl ErrorCode for UriError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownScheme { .. } => "URI_UNKNOWN_SCHEME",
            Self::EscapesRoot { .. } => "URI_ESCAPES_ROOT",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

/// Immutable, normalised URI.
///
/// `Uri::default()` is the empty relative `cpath` URI, used as the
/// "not set" value of component-reference options.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Uri {
    scheme: Scheme,
    absolute: bool,
    segments: Vec<String>,
}

impl Uri {
    /// The tree root, `cpath:/`.
    #[must_use]
    pub fn root() -> Self {
        Self {
            scheme: Scheme::Cpath,
            absolute: true,
            segments: Vec::new(),
        }
    }

    /// A relative `cpath` URI made of a single segment.
    #[must_use]
    pub fn relative(segment: &str) -> Self {
        Self {
            scheme: Scheme::Cpath,
            absolute: false,
            segments: vec![segment.to_string()],
        }
    }

    /// Parses and normalises a URI.
    ///
    /// # Errors
    ///
    /// [`UriError::UnknownScheme`] for an unrecognised `scheme:` prefix,
    /// [`UriError::EscapesRoot`] when `..` climbs above an absolute root.
    pub fn parse(input: &str) -> Result<Self, UriError> {
        let input = input.trim();
        let (scheme, rest) = match input.split_once(':') {
            Some((prefix, rest)) => match Scheme::from_name(prefix) {
                Some(scheme) => (scheme, rest),
                None => {
                    return Err(UriError::UnknownScheme {
                        uri: input.to_string(),
                        scheme: prefix.to_string(),
                    })
                }
            },
            None => (Scheme::Cpath, input),
        };

        let absolute = rest.starts_with('/');
        let mut segments = Vec::new();
        for segment in rest.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if !pop_segment(&mut segments, absolute) {
                        return Err(UriError::EscapesRoot {
                            uri: input.to_string(),
                        });
                    }
                }
                other => segments.push(other.to_string()),
            }
        }

        Ok(Self {
            scheme,
            absolute,
            segments,
        })
    }

    #[must_use]
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    #[must_use]
    pub fn is_relative(&self) -> bool {
        !self.absolute
    }

    /// `cpath:/`.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.absolute && self.segments.is_empty()
    }

    /// Relative with no segments (the unset value).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.absolute && self.segments.is_empty()
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Last segment, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The URI with its last segment removed. `None` for the root and
    /// the empty URI.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        let mut parent = self.clone();
        parent.segments.pop();
        Some(parent)
    }

    /// Appends one segment verbatim.
    #[must_use]
    pub fn join(&self, segment: &str) -> Self {
        let mut joined = self.clone();
        joined.segments.push(segment.to_string());
        joined
    }

    /// Resolves `self` against `base`.
    ///
    /// Absolute URIs are returned unchanged. Relative ones are appended
    /// to `base`, with `..` popping a segment.
    ///
    /// # Errors
    ///
    /// [`UriError::EscapesRoot`] when `..` climbs above an absolute base.
    pub fn resolve_against(&self, base: &Uri) -> Result<Self, UriError> {
        if self.absolute {
            return Ok(self.clone());
        }
        let mut resolved = base.clone();
        for segment in &self.segments {
            if segment == ".." {
                if !pop_segment(&mut resolved.segments, resolved.absolute) {
                    return Err(UriError::EscapesRoot {
                        uri: format!("{self} from {base}"),
                    });
                }
            } else {
                resolved.segments.push(segment.clone());
            }
        }
        Ok(resolved)
    }

    /// True when `prefix` names this URI or one of its ancestors.
    #[must_use]
    pub fn starts_with(&self, prefix: &Uri) -> bool {
        self.scheme == prefix.scheme
            && self.absolute == prefix.absolute
            && self.segments.starts_with(&prefix.segments)
    }

    /// The relative remainder after `prefix`.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &Uri) -> Option<Self> {
        if !self.starts_with(prefix) {
            return None;
        }
        Some(Self {
            scheme: self.scheme,
            absolute: false,
            segments: self.segments[prefix.segments.len()..].to_vec(),
        })
    }
}

/// Pops the last normal segment. On a relative path with nothing to pop
/// a `..` is kept; on an absolute path this returns `false`.
fn pop_segment(segments: &mut Vec<String>, absolute: bool) -> bool {
    match segments.last() {
        Some(last) if last != ".." => {
            segments.pop();
            true
        }
        _ if absolute => false,
        _ => {
            segments.push("..".to_string());
            true
        }
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scheme {
            Scheme::Http | Scheme::Https => {
                write!(f, "{}://{}", self.scheme, self.segments.join("/"))
            }
            Scheme::Cpath | Scheme::File => {
                write!(f, "{}:", self.scheme)?;
                if self.absolute {
                    f.write_str("/")?;
                }
                f.write_str(&self.segments.join("/"))
            }
        }
    }
}

impl FromStr for Uri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Uri {
    type Error = UriError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl Div<&str> for &Uri {
    type Output = Uri;

    fn div(self, segment: &str) -> Uri {
        self.join(segment)
    }
}

impl Serialize for Uri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Uri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Uri::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_error_codes;

    fn uri(s: &str) -> Uri {
        Uri::parse(s).expect("valid uri")
    }

    #[test]
    fn default_scheme_is_cpath() {
        let u = uri("/solver/bc");
        assert_eq!(u.scheme(), Scheme::Cpath);
        assert!(u.is_absolute());
        assert_eq!(u.segments(), ["solver", "bc"]);
        assert_eq!(u.to_string(), "cpath:/solver/bc");
    }

    #[test]
    fn root_and_empty() {
        assert!(uri("cpath:/").is_root());
        assert!(uri("cpath://").is_root());
        assert_eq!(Uri::root().to_string(), "cpath:/");
        assert!(uri("").is_empty());
        assert!(Uri::default().is_empty());
        assert!(!Uri::root().is_empty());
    }

    #[test]
    fn normalises_dots() {
        assert_eq!(uri("cpath:./x").to_string(), "cpath:x");
        assert_eq!(uri("/a/./b/../c").to_string(), "cpath:/a/c");
        assert_eq!(uri("../../x").segments(), ["..", "..", "x"]);
        assert_eq!(uri("a/../../x").segments(), ["..", "x"]);
    }

    #[test]
    fn rejects_escape_above_absolute_root() {
        let err = Uri::parse("/a/../..").expect_err("escapes root");
        assert!(matches!(err, UriError::EscapesRoot { .. }));
    }

    #[test]
    fn rejects_unknown_scheme() {
        let err = Uri::parse("ftp://host/x").expect_err("unknown scheme");
        assert!(matches!(err, UriError::UnknownScheme { ref scheme, .. } if scheme == "ftp"));
    }

    #[test]
    fn other_schemes_round_trip() {
        for s in ["file:/tmp/case.cf3", "file:relative/case", "http://host/data"] {
            assert_eq!(uri(s).to_string(), s);
        }
        assert_eq!(uri("file:/tmp/x").scheme(), Scheme::File);
    }

    #[test]
    fn parent_name_join() {
        let u = uri("/solver/bc/inlet");
        assert_eq!(u.name(), Some("inlet"));
        assert_eq!(u.parent().map(|p| p.to_string()).as_deref(), Some("cpath:/solver/bc"));
        assert_eq!(Uri::root().parent(), None);
        assert_eq!((&Uri::root() / "solver").to_string(), "cpath:/solver");
    }

    #[test]
    fn resolve_relative() {
        let base = uri("/solver/bc");
        assert_eq!(uri("inlet").resolve_against(&base).unwrap(), uri("/solver/bc/inlet"));
        assert_eq!(uri("../time").resolve_against(&base).unwrap(), uri("/solver/time"));
        assert_eq!(uri("/mesh").resolve_against(&base).unwrap(), uri("/mesh"));
        assert!(uri("../../../x").resolve_against(&base).is_err());
    }

    #[test]
    fn prefix_operations() {
        let u = uri("/solver/bc/inlet");
        let p = uri("/solver");
        assert!(u.starts_with(&p));
        assert!(u.starts_with(&Uri::root()));
        assert!(!p.starts_with(&u));
        assert_eq!(u.strip_prefix(&p).unwrap().segments(), ["bc", "inlet"]);
        assert!(uri("/mesh").strip_prefix(&p).is_none());
    }

    #[test]
    fn serde_as_string() {
        let u = uri("/solver/time");
        let json = serde_json::to_string(&u).unwrap();
        assert_eq!(json, "\"cpath:/solver/time\"");
        let back: Uri = serde_json::from_str(&json).unwrap();
        assert_eq!(back, u);
    }

    #[test]
    fn error_codes() {
        assert_error_codes(
            &[
                UriError::UnknownScheme {
                    uri: "x:y".into(),
                    scheme: "x".into(),
                },
                UriError::EscapesRoot { uri: "/..".into() },
            ],
            "URI_",
        );
    }
}
