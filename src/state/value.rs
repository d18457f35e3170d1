//! Form value tree
//!
//! All field values live in one authoritative tree owned by the step
//! form; widgets render from it and never hold their own copy.

use super::list::ListValue;
use super::path::{FieldPath, Segment};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::BTreeMap;

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value entered yet (distinct from an empty string)
    #[default]
    Empty,
    Text(String),
    Number(i64),
    #[allow(dead_code)]
    Bool(bool),
    /// Ordered list of plain strings (interests, tags)
    StringList(Vec<String>),
    /// Nested object
    Map(BTreeMap<String, Value>),
    /// Ordered rows with stable identity (skills, experience)
    List(ListValue),
}

impl Value {
    pub fn map() -> Self {
        Value::Map(BTreeMap::new())
    }

    /// True when a `required` rule should reject the value
    pub fn is_unset(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::Text(s) => s.is_empty(),
            Value::Number(_) | Value::Bool(_) => false,
            Value::StringList(items) => items.is_empty(),
            Value::Map(_) => false,
            Value::List(list) => list.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_string_list(&self) -> Option<&[String]> {
        match self {
            Value::StringList(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListValue> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut ListValue> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    #[allow(dead_code)]
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Follow a path below this value
    pub fn descend(&self, segments: &[Segment]) -> Option<&Value> {
        let mut current = self;
        for segment in segments {
            current = match (segment, current) {
                (Segment::Key(k), Value::Map(entries)) => entries.get(k)?,
                (Segment::Row(id), Value::List(list)) => list.row(*id)?,
                _ => return None,
            };
        }
        Some(current)
    }

    fn descend_mut(&mut self, segments: &[Segment]) -> Option<&mut Value> {
        let mut current = self;
        for segment in segments {
            current = match (segment, current) {
                (Segment::Key(k), Value::Map(entries)) => entries.get_mut(k)?,
                (Segment::Row(id), Value::List(list)) => list.row_mut(*id)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Empty => serializer.serialize_none(),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Number(n) => serializer.serialize_i64(*n),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::StringList(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            // Rows serialize as plain objects; identity is an in-memory
            // concern only
            Value::List(list) => {
                let mut seq = serializer.serialize_seq(Some(list.len()))?;
                for row in list.rows() {
                    seq.serialize_element(&row.values)?;
                }
                seq.end()
            }
        }
    }
}

/// One step's (or the final aggregate's) complete value mapping
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormValues {
    root: BTreeMap<String, Value>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level keys in order
    #[allow(dead_code)]
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.root.keys()
    }

    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        let (head, rest) = Self::split(path)?;
        self.root.get(head)?.descend(rest)
    }

    pub fn get_mut(&mut self, path: &FieldPath) -> Option<&mut Value> {
        let (head, rest) = Self::split(path)?;
        self.root.get_mut(head)?.descend_mut(rest)
    }

    /// Write a value at `path`, creating intermediate maps for missing
    /// key segments. Row segments must already exist (rows are created
    /// through the list manager). Returns false if the path cannot be
    /// reached.
    pub fn set(&mut self, path: &FieldPath, value: Value) -> bool {
        let segments = path.segments();
        let Some(Segment::Key(head)) = segments.first() else {
            return false;
        };
        if segments.len() == 1 {
            self.root.insert(head.clone(), value);
            return true;
        }
        let mut current = self
            .root
            .entry(head.clone())
            .or_insert_with(Value::map);
        for segment in &segments[1..segments.len() - 1] {
            current = match segment {
                Segment::Key(k) => {
                    let Value::Map(entries) = current else {
                        return false;
                    };
                    entries.entry(k.clone()).or_insert_with(Value::map)
                }
                Segment::Row(id) => {
                    let Value::List(list) = current else {
                        return false;
                    };
                    match list.row_mut(*id) {
                        Some(row) => row,
                        None => return false,
                    }
                }
            };
        }
        match (segments.last(), current) {
            (Some(Segment::Key(k)), Value::Map(entries)) => {
                entries.insert(k.clone(), value);
                true
            }
            (Some(Segment::Row(id)), Value::List(list)) => match list.row_mut(*id) {
                Some(row) => {
                    *row = value;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Merge another mapping's top-level keys into this one. Returns
    /// the first colliding key, if any, without writing it.
    pub fn merge(&mut self, other: FormValues) -> Result<(), String> {
        for (key, value) in other.root {
            if self.root.contains_key(&key) {
                return Err(key);
            }
            self.root.insert(key, value);
        }
        Ok(())
    }
}

impl Serialize for FormValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.root.len()))?;
        for (key, value) in &self.root {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl FormValues {
    fn split(path: &FieldPath) -> Option<(&str, &[Segment])> {
        match path.segments() {
            [Segment::Key(head), rest @ ..] => Some((head.as_str(), rest)),
            _ => None,
        }
    }
}
