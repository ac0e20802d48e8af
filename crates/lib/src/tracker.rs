//! # Edit Tracker
//!
//! Tracks the sparse set of report fields a reviewer has overridden by hand,
//! each paired with the pristine value captured the first time it was edited.

use crate::field::EditableField;
use crate::types::FieldValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One pending correction, in the shape the submission endpoint expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualEdit {
    #[serde(rename = "fieldName")]
    pub field_name: EditableField,
    pub old_value: FieldValue,
    pub new_value: FieldValue,
}

/// Session-scoped record of manual edits.
///
/// `edits` keeps insertion order, which is the order edits are reported in.
/// An original is captured once per field and survives every later edit of
/// that field until it is reverted.
#[derive(Debug, Clone, Default)]
pub struct EditTracker {
    edits: IndexMap<EditableField, FieldValue>,
    originals: HashMap<EditableField, FieldValue>,
}

impl EditTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `new_value` as the current value of `field`.
    ///
    /// `original` is only stored if no original has been captured for `field`
    /// yet.
    pub fn record_edit(&mut self, field: EditableField, original: FieldValue, new_value: FieldValue) {
        debug!(field = %field, new_value = %new_value, "Recording manual edit");
        self.edits.insert(field, new_value);
        self.originals.entry(field).or_insert(original);
    }

    /// Drops any edit of `field`. Reverting an unedited field is a no-op.
    pub fn revert(&mut self, field: EditableField) {
        if self.edits.shift_remove(&field).is_some() {
            debug!(field = %field, "Reverted manual edit");
        }
        self.originals.remove(&field);
    }

    /// The ordered list of pending edits, rebuilt on every call.
    pub fn edit_list(&self) -> Vec<ManualEdit> {
        self.edits
            .iter()
            .map(|(field, new_value)| ManualEdit {
                field_name: *field,
                old_value: self.originals.get(field).cloned().unwrap_or_default(),
                new_value: new_value.clone(),
            })
            .collect()
    }

    pub fn edited_value(&self, field: EditableField) -> Option<&FieldValue> {
        self.edits.get(&field)
    }

    pub fn original_value(&self, field: EditableField) -> Option<&FieldValue> {
        self.originals.get(&field)
    }

    pub fn is_modified(&self, field: EditableField) -> bool {
        self.edits.contains_key(&field)
    }

    /// The value to show for `field`: the edited value if there is one,
    /// otherwise the value from the report.
    pub fn display_value<'a>(
        &'a self,
        field: EditableField,
        report_value: &'a FieldValue,
    ) -> &'a FieldValue {
        self.edits.get(&field).unwrap_or(report_value)
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Discards every pending edit.
    pub fn reset(&mut self) {
        self.edits.clear();
        self.originals.clear();
    }
}
