//! Typed field paths
//!
//! A field is addressed by a sequence of segments instead of a dotted
//! string, so list rows are identified by a stable `RowId` rather than a
//! display index. The dotted rendering exists only for logs and
//! messages.

use std::fmt;
use uuid::Uuid;

/// Stable identity of a list row, independent of its display position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(Uuid);

impl RowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Short form for display (first 8 hex chars)
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for RowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short())
    }
}

/// One step of a field path
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    /// Named entry of a map (e.g. `address`, `street`)
    Key(String),
    /// Row of a list field, by identity
    Row(RowId),
}

/// Path addressing a (possibly nested or list-row) value within a
/// step's form values
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Single-key path
    pub fn key(name: &str) -> Self {
        Self {
            segments: vec![Segment::Key(name.to_string())],
        }
    }

    /// Append a key segment
    pub fn then(mut self, name: &str) -> Self {
        self.segments.push(Segment::Key(name.to_string()));
        self
    }

    /// Append a row segment
    pub fn row(mut self, id: RowId) -> Self {
        self.segments.push(Segment::Row(id));
        self
    }

    /// Append another path's segments
    pub fn join(mut self, other: &FieldPath) -> Self {
        self.segments.extend(other.segments.iter().cloned());
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Path without the last segment, or None for a single-segment path
    #[allow(dead_code)]
    pub fn parent(&self) -> Option<FieldPath> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Last segment's key name, if it is a key
    pub fn leaf_key(&self) -> Option<&str> {
        match self.segments.last() {
            Some(Segment::Key(k)) => Some(k),
            _ => None,
        }
    }

    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }

    /// The row identity this path passes through, if any
    pub fn row_id(&self) -> Option<RowId> {
        self.segments.iter().find_map(|s| match s {
            Segment::Row(id) => Some(*id),
            Segment::Key(_) => None,
        })
    }

    /// Remaining path after a prefix, or None if the prefix does not match
    pub fn strip_prefix(&self, prefix: &FieldPath) -> Option<FieldPath> {
        if !self.starts_with(prefix) {
            return None;
        }
        Some(Self {
            segments: self.segments[prefix.segments.len()..].to_vec(),
        })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            match segment {
                Segment::Key(k) => write!(f, "{k}")?,
                Segment::Row(id) => write!(f, "[{id}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_key_then_builds_nested_path() {
        let path = FieldPath::key("address").then("street");
        assert_eq!(path.segments().len(), 2);
        assert_eq!(path.to_string(), "address.street");
    }

    #[test]
    fn test_parent_and_leaf() {
        let path = FieldPath::key("contact").then("emergency").then("name");
        assert_eq!(path.leaf_key(), Some("name"));
        assert_eq!(path.parent().unwrap().to_string(), "contact.emergency");
        assert!(FieldPath::key("email").parent().is_none());
    }

    #[test]
    fn test_starts_with() {
        let list = FieldPath::key("skills");
        let id = RowId::new();
        let sub = FieldPath::key("skills").row(id).then("name");
        assert!(sub.starts_with(&list));
        assert!(!list.starts_with(&sub));
    }

    #[test]
    fn test_row_id_is_found_mid_path() {
        let id = RowId::new();
        let path = FieldPath::key("skills").row(id).then("name");
        assert_eq!(path.row_id(), Some(id));
        assert_eq!(FieldPath::key("skills").row_id(), None);
    }

    #[test]
    fn test_strip_prefix() {
        let id = RowId::new();
        let path = FieldPath::key("skills").row(id).then("name");
        let rest = path.strip_prefix(&FieldPath::key("skills").row(id)).unwrap();
        assert_eq!(rest.to_string(), "name");
        assert!(path.strip_prefix(&FieldPath::key("experience")).is_none());
    }

    #[test]
    fn test_display_includes_row_identity() {
        let id = RowId::new();
        let path = FieldPath::key("skills").row(id).then("name");
        assert_eq!(path.to_string(), format!("skills.[{}].name", id.short()));
    }

    #[test]
    fn test_row_ids_are_unique() {
        assert_ne!(RowId::new(), RowId::new());
    }
}
