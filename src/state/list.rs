//! List-valued fields
//!
//! A list field holds an ordered sequence of homogeneous sub-records.
//! Rows carry a `RowId` so validation state stays attached to the right
//! record when an earlier row is removed.

use super::field::FieldSpec;
use super::path::{FieldPath, RowId};
use super::value::Value;
use std::collections::BTreeMap;

/// One record of a list field
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub id: RowId,
    /// Always a `Value::Map` of the row schema's fields
    pub values: Value,
}

/// Ordered rows of a list field
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListValue {
    rows: Vec<ListRow>,
}

impl ListValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    pub fn ids(&self) -> Vec<RowId> {
        self.rows.iter().map(|r| r.id).collect()
    }

    pub fn row(&self, id: RowId) -> Option<&Value> {
        self.rows.iter().find(|r| r.id == id).map(|r| &r.values)
    }

    pub fn row_mut(&mut self, id: RowId) -> Option<&mut Value> {
        self.rows
            .iter_mut()
            .find(|r| r.id == id)
            .map(|r| &mut r.values)
    }

    /// Display position of a row (0-based)
    pub fn position(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }

    /// Append a record at the end with a fresh identity
    pub fn push_row(&mut self, values: Value) -> RowId {
        let id = RowId::new();
        self.rows.push(ListRow { id, values });
        id
    }

    /// Remove a record by identity; later rows shift down by one
    pub fn remove_row(&mut self, id: RowId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.rows.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Static description of a list field: where it lives, what a row
/// looks like, and how many empty rows a fresh step starts with
#[derive(Clone)]
pub struct ListSpec {
    pub path: FieldPath,
    pub label: String,
    /// Singular row label for headings ("Skill 1", "Experience 2")
    pub row_label: String,
    /// Sub-field specs with paths relative to the row
    pub fields: Vec<FieldSpec>,
    pub seed_rows: usize,
}

impl ListSpec {
    pub fn new(path: FieldPath, label: &str, row_label: &str, fields: Vec<FieldSpec>) -> Self {
        Self {
            path,
            label: label.to_string(),
            row_label: row_label.to_string(),
            fields,
            seed_rows: 1,
        }
    }

    /// A fresh row with every sub-field at its default
    pub fn default_row(&self) -> Value {
        let mut entries = BTreeMap::new();
        for field in &self.fields {
            // Row sub-fields are flat (single key segment)
            if let Some(key) = field.path.leaf_key() {
                entries.insert(key.to_string(), field.default_value());
            }
        }
        Value::Map(entries)
    }

    /// Sub-field spec for a relative path within a row
    pub fn field(&self, relative: &FieldPath) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| &f.path == relative)
    }
}
