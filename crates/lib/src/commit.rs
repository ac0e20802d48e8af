//! # Edit-Commit Policy
//!
//! While a field is being edited the reviewer's keystrokes live in an
//! [`InputBuffer`] and the tracker is untouched. Only when the edit ends does
//! the buffer reach the tracker:
//!
//! - **commit** (confirm key or loss of focus) parses the text against the
//!   original's type. A result equal to the original reverts the field, so the
//!   tracker never holds a no-op edit; anything else is recorded.
//! - **cancel** discards the text and reverts the field unconditionally.

use crate::field::EditableField;
use crate::tracker::EditTracker;
use crate::types::FieldValue;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("float prefix pattern is valid")
});

/// Parses the longest numeric prefix of `raw`, ignoring leading whitespace.
///
/// `"1500"` and `"1500 AED"` both give `1500.0`; `"AED 1500"` gives `None`.
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let m = FLOAT_PREFIX.find(raw.trim_start())?;
    m.as_str().parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Converts typed text into a value of the original's type.
///
/// Numeric originals get a float parse that falls back to the raw text;
/// everything else is kept as text.
pub fn parse_input(original: &FieldValue, raw: &str) -> FieldValue {
    if original.is_number() {
        if let Some(n) = parse_float_prefix(raw) {
            return FieldValue::Number(n);
        }
    }
    FieldValue::Text(raw.to_string())
}

/// Whether committing `raw` (parsed as `parsed`) would leave `original` unchanged.
///
/// Both the typed comparison and the comparison against the original's string
/// form are kept.
pub fn is_unchanged(original: &FieldValue, parsed: &FieldValue, raw: &str) -> bool {
    parsed == original || raw == original.to_string()
}

/// The tracker operation a finished edit resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// The value differed from the original and was recorded.
    Recorded(FieldValue),
    /// The value matched the original, or the edit was cancelled.
    Reverted,
}

/// Applies the commit rule for `raw` typed into `field`.
pub fn commit_input(
    tracker: &mut EditTracker,
    field: EditableField,
    original: &FieldValue,
    raw: &str,
) -> CommitOutcome {
    let parsed = parse_input(original, raw);
    if is_unchanged(original, &parsed, raw) {
        tracker.revert(field);
        CommitOutcome::Reverted
    } else {
        tracker.record_edit(field, original.clone(), parsed.clone());
        CommitOutcome::Recorded(parsed)
    }
}

/// How an edit was ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKey {
    /// The confirm key (Enter).
    Confirm,
    /// The input lost focus.
    Blur,
    /// The cancel key (Escape).
    Cancel,
}

/// The uncommitted text of a field in edit mode.
#[derive(Debug, Clone, PartialEq)]
pub struct InputBuffer {
    field: EditableField,
    original: FieldValue,
    text: String,
}

impl InputBuffer {
    /// Enters edit mode for `field`, seeding the buffer with what the reviewer
    /// currently sees (an empty string for a null value).
    pub fn begin(field: EditableField, original: FieldValue, displayed: &FieldValue) -> Self {
        let text = if displayed.is_null() {
            String::new()
        } else {
            displayed.to_string()
        };
        Self {
            field,
            original,
            text,
        }
    }

    pub fn field(&self) -> EditableField {
        self.field
    }

    pub fn original(&self) -> &FieldValue {
        &self.original
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the buffer's contents.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    /// Ends edit mode via `key`, applying the buffer to `tracker`.
    pub fn finish(self, key: EditKey, tracker: &mut EditTracker) -> CommitOutcome {
        match key {
            EditKey::Confirm | EditKey::Blur => self.commit(tracker),
            EditKey::Cancel => self.cancel(tracker),
        }
    }

    pub fn commit(self, tracker: &mut EditTracker) -> CommitOutcome {
        let outcome = commit_input(tracker, self.field, &self.original, &self.text);
        debug!(field = %self.field, outcome = ?outcome, "Committed field input");
        outcome
    }

    pub fn cancel(self, tracker: &mut EditTracker) -> CommitOutcome {
        debug!(field = %self.field, "Cancelled field input");
        tracker.revert(self.field);
        CommitOutcome::Reverted
    }
}
