//! Document-relative locations.
//!
//! A [`Location`] names the document an artifact was declared in plus the
//! JSON-pointer segments leading to it. Locations are the identity used for
//! `$ref` resolution and the seed for deterministic naming.

use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    document: Arc<str>,
    segments: Vec<String>,
}

impl Location {
    pub fn root(document: impl Into<Arc<str>>) -> Self {
        Self {
            document: document.into(),
            segments: Vec::new(),
        }
    }

    pub fn new<S: Into<String>>(
        document: impl Into<Arc<str>>,
        segments: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            document: document.into(),
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub(crate) fn document_arc(&self) -> &Arc<str> {
        &self.document
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn join(&self, segment: impl Into<String>) -> Location {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Location {
            document: self.document.clone(),
            segments,
        }
    }

    pub fn parent(&self) -> Option<Location> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Location {
            document: self.document.clone(),
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// True when this location is in `document` and its segments begin
    /// with `prefix`.
    pub fn has_prefix(&self, document: &str, prefix: &[&str]) -> bool {
        &*self.document == document
            && self.segments.len() >= prefix.len()
            && self.segments.iter().zip(prefix).all(|(a, b)| a == b)
    }

    /// JSON pointer of this location within its document (`""` for the root).
    pub fn pointer(&self) -> String {
        self.segments
            .iter()
            .map(|segment| format!("/{}", escape(segment)))
            .collect()
    }

    /// Parse a `$ref` string relative to `current` document.
    ///
    /// `#/a/b` addresses the current document; `other.json#/a/b` and
    /// `other.json` address another one, relative to the directory of the
    /// current document.
    pub fn parse_ref(current: &Arc<str>, reference: &str) -> Result<Location, String> {
        let (document, fragment) = match reference.split_once('#') {
            Some((document, fragment)) => (document, fragment),
            None => (reference, ""),
        };
        let document: Arc<str> = if document.is_empty() {
            current.clone()
        } else {
            let resolved = resolve_document(current, document);
            if *resolved == **current {
                current.clone()
            } else {
                Arc::from(resolved)
            }
        };

        if fragment.is_empty() {
            return Ok(Location::root(document));
        }
        let Some(pointer) = fragment.strip_prefix('/') else {
            return Err(format!("fragment {:?} is not a JSON pointer", fragment));
        };

        Ok(Location {
            document,
            segments: pointer.split('/').map(unescape).collect(),
        })
    }
}

/// Identifier of the document `reference` names, as seen from `current`.
///
/// Relative paths resolve against the directory of `current`. URLs are kept
/// as written.
pub fn resolve_document(current: &str, reference: &str) -> String {
    if reference.contains("://") {
        return reference.to_string();
    }
    if reference.starts_with('/') {
        return normalize_document(reference);
    }
    let Some(index) = current.rfind('/') else {
        return normalize_document(reference);
    };
    let joined = format!("{}/{}", &current[..index], reference);
    if current.contains("://") {
        joined
    } else {
        normalize_document(&joined)
    }
}

/// Canonical form of a document path: `.` and empty segments dropped, `..`
/// collapsed where it has a parent to cancel.
pub fn normalize_document(document: &str) -> String {
    let absolute = document.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for part in document.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(last) if *last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            part => parts.push(part),
        }
    }
    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}

fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.document, self.pointer())
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Location({})", self)
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str) -> Arc<str> {
        Arc::from(name)
    }

    #[test]
    fn test_local_reference() {
        let loc = Location::parse_ref(&doc("main.json"), "#/components/messages/Ping").unwrap();
        assert_eq!(loc.document(), "main.json");
        assert_eq!(loc.segments(), &["components", "messages", "Ping"]);
        assert_eq!(loc.to_string(), "main.json#/components/messages/Ping");
    }

    #[test]
    fn test_external_reference() {
        let loc = Location::parse_ref(&doc("main.json"), "common.json#/components/schemas/Id")
            .unwrap();
        assert_eq!(loc.document(), "common.json");
        assert_eq!(loc.last(), Some("Id"));

        let whole = Location::parse_ref(&doc("main.json"), "common.json").unwrap();
        assert_eq!(whole.document(), "common.json");
        assert!(whole.segments().is_empty());
    }

    #[test]
    fn test_external_reference_is_relative_to_referring_document() {
        let loc = Location::parse_ref(&doc("shared/a.json"), "b.json#/components/messages/M")
            .unwrap();
        assert_eq!(loc.document(), "shared/b.json");

        let up = Location::parse_ref(&doc("shared/a.json"), "../common.json").unwrap();
        assert_eq!(up.document(), "common.json");

        let same = Location::parse_ref(&doc("shared/a.json"), "./a.json#/channels/x").unwrap();
        assert_eq!(same.document(), "shared/a.json");
    }

    #[test]
    fn test_document_spellings_share_one_identity() {
        let plain = Location::parse_ref(&doc("main.json"), "common.json#/x").unwrap();
        let dotted = Location::parse_ref(&doc("main.json"), "./common.json#/x").unwrap();
        assert_eq!(plain, dotted);

        assert_eq!(normalize_document("./a/./b/../c.json"), "a/c.json");
        assert_eq!(normalize_document("../../c.json"), "../../c.json");
        assert_eq!(normalize_document("/srv/./api/../c.json"), "/srv/c.json");
        assert_eq!(
            resolve_document("main.json", "https://example.com/c.json"),
            "https://example.com/c.json"
        );
    }

    #[test]
    fn test_pointer_escaping_round_trip() {
        let loc = Location::new("main.json", ["channels", "user/signup", "a~b"]);
        assert_eq!(loc.pointer(), "/channels/user~1signup/a~0b");

        let parsed = Location::parse_ref(&doc("main.json"), &format!("#{}", loc.pointer()))
            .unwrap();
        assert_eq!(parsed, loc);
    }

    #[test]
    fn test_non_pointer_fragment_is_rejected() {
        let err = Location::parse_ref(&doc("main.json"), "#components").unwrap_err();
        assert!(err.contains("not a JSON pointer"));
    }

    #[test]
    fn test_prefix_and_parent() {
        let loc = Location::new("main.json", ["channels", "orders", "publish"]);
        assert!(loc.has_prefix("main.json", &["channels"]));
        assert!(!loc.has_prefix("other.json", &["channels"]));
        assert!(!loc.has_prefix("main.json", &["servers"]));
        assert_eq!(
            loc.parent().unwrap(),
            Location::new("main.json", ["channels", "orders"])
        );
        assert!(Location::root("main.json").parent().is_none());
    }
}
