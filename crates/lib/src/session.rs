//! # Review Session
//!
//! A `ReviewSession` is the controller for reviewing one company's generated
//! report. It owns the report snapshot, the edit tracker, and the single field
//! that may be in edit mode, and drives the generation and submission calls.
//!
//! Lifecycle:
//! 1. `generate` (or `load_report`) installs a snapshot and starts with no edits.
//!    Generating again replaces the snapshot and discards every pending edit.
//! 2. Fields are edited through `begin_edit` / `finish_edit` (or the one-shot
//!    `apply_input`) and reverted with `revert`.
//! 3. `submit` commits any field still in edit mode, then sends the snapshot
//!    plus the edit list. Success ends the session; on failure the snapshot
//!    and edits (including that committed field) stay so the reviewer can retry.

use crate::client::{Credentials, KybBackend};
use crate::commit::{CommitOutcome, EditKey, InputBuffer};
use crate::errors::KybError;
use crate::field::EditableField;
use crate::tracker::{EditTracker, ManualEdit};
use crate::types::{FieldValue, ReportSnapshot, SaveProfilePayload};
use serde_json::Value;
use tracing::{info, warn};

/// The statement a reviewer confirms when submitting.
pub const ATTESTATION_STATEMENT: &str = "I confirm that I have reviewed the extracted information, \
supporting documents, and risk indicators. I understand that submission constitutes an \
attestation for regulatory purposes.";

/// The reviewer's answer to [`ATTESTATION_STATEMENT`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attestation {
    Confirmed,
    Withheld,
}

impl From<bool> for Attestation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Attestation::Confirmed
        } else {
            Attestation::Withheld
        }
    }
}

#[derive(Debug)]
pub struct ReviewSession {
    company_id: String,
    snapshot: Option<ReportSnapshot>,
    tracker: EditTracker,
    active_input: Option<InputBuffer>,
}

impl ReviewSession {
    pub fn new(company_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            snapshot: None,
            tracker: EditTracker::new(),
            active_input: None,
        }
    }

    pub fn company_id(&self) -> &str {
        &self.company_id
    }

    pub fn snapshot(&self) -> Option<&ReportSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn tracker(&self) -> &EditTracker {
        &self.tracker
    }

    pub fn active_input(&self) -> Option<&InputBuffer> {
        self.active_input.as_ref()
    }

    /// Installs a new report snapshot, discarding all edit state.
    pub fn load_report(&mut self, snapshot: ReportSnapshot) {
        if !self.tracker.is_empty() {
            warn!(
                "Discarding {} pending edits for company {} on report reload",
                self.tracker.len(),
                self.company_id
            );
        }
        self.tracker.reset();
        self.active_input = None;
        self.snapshot = Some(snapshot);
    }

    /// Asks the backend for a fresh report and loads it.
    ///
    /// On failure the current snapshot and edits are kept.
    pub async fn generate(
        &mut self,
        backend: &dyn KybBackend,
        credentials: &Credentials,
    ) -> Result<&ReportSnapshot, KybError> {
        let snapshot = backend.generate_kyb(credentials, &self.company_id).await?;
        info!(
            "Loaded KYB report for company {} with {} editable fields",
            self.company_id,
            snapshot.company().editable_fields().len()
        );
        self.load_report(snapshot);
        self.snapshot.as_ref().ok_or(KybError::NoReport)
    }

    /// The pristine value of `field` in the loaded report.
    pub fn report_value(&self, field: EditableField) -> Result<&FieldValue, KybError> {
        let snapshot = self.snapshot.as_ref().ok_or(KybError::NoReport)?;
        snapshot
            .field(field)
            .map(|extracted| &extracted.value)
            .ok_or(KybError::FieldNotInReport(field))
    }

    /// What the reviewer sees for `field`: the edited value if any, else the
    /// report value.
    pub fn display_value(&self, field: EditableField) -> Result<&FieldValue, KybError> {
        let report_value = self.report_value(field)?;
        Ok(self.tracker.display_value(field, report_value))
    }

    /// Puts `field` into edit mode and returns its input buffer.
    ///
    /// Only one field is edited at a time: moving to a different field commits
    /// the one currently being edited, as losing focus would.
    pub fn begin_edit(&mut self, field: EditableField) -> Result<&mut InputBuffer, KybError> {
        let buffer = match self.active_input.take() {
            Some(buffer) if buffer.field() == field => buffer,
            previous => {
                if let Some(previous) = previous {
                    previous.finish(EditKey::Blur, &mut self.tracker);
                }
                let original = self.report_value(field)?.clone();
                let displayed = self.tracker.display_value(field, &original).clone();
                InputBuffer::begin(field, original, &displayed)
            }
        };
        Ok(self.active_input.insert(buffer))
    }

    /// Ends edit mode for the active field. Returns `None` if nothing was
    /// being edited.
    pub fn finish_edit(&mut self, key: EditKey) -> Option<CommitOutcome> {
        let buffer = self.active_input.take()?;
        Some(buffer.finish(key, &mut self.tracker))
    }

    /// Types `raw` into `field` and confirms it.
    pub fn apply_input(&mut self, field: EditableField, raw: &str) -> Result<CommitOutcome, KybError> {
        self.begin_edit(field)?.set_text(raw);
        self.finish_edit(EditKey::Confirm).ok_or(KybError::NoReport)
    }

    /// Enters and immediately cancels edit mode for `field`, which reverts it.
    pub fn cancel_edit(&mut self, field: EditableField) -> Result<CommitOutcome, KybError> {
        self.begin_edit(field)?;
        self.finish_edit(EditKey::Cancel).ok_or(KybError::NoReport)
    }

    /// Reverts `field` to its report value, abandoning any in-progress input
    /// for it.
    pub fn revert(&mut self, field: EditableField) {
        if self
            .active_input
            .as_ref()
            .is_some_and(|input| input.field() == field)
        {
            self.active_input = None;
        }
        self.tracker.revert(field);
    }

    pub fn manual_edits(&self) -> Vec<ManualEdit> {
        self.tracker.edit_list()
    }

    /// Builds the submission body from the snapshot and the current edits.
    pub fn payload(&self) -> Result<SaveProfilePayload, KybError> {
        let snapshot = self.snapshot.as_ref().ok_or(KybError::NoReport)?;
        Ok(SaveProfilePayload {
            kyb_data: snapshot.raw().clone(),
            manual_edits: self.tracker.edit_list(),
        })
    }

    /// Submits the reviewed report.
    ///
    /// Any field still in edit mode is committed to the tracker before the
    /// backend call, and stays committed if the call fails. On success the
    /// session is cleared; on failure the snapshot and edits are kept.
    pub async fn submit(
        &mut self,
        backend: &dyn KybBackend,
        credentials: &Credentials,
        attestation: Attestation,
    ) -> Result<Value, KybError> {
        if attestation != Attestation::Confirmed {
            return Err(KybError::AttestationRequired);
        }
        self.finish_edit(EditKey::Blur);

        let payload = self.payload()?;
        let response = backend
            .save_profile(credentials, &self.company_id, &payload)
            .await?;
        info!(
            "Submitted KYB review for company {} with {} manual edits",
            self.company_id,
            payload.manual_edits.len()
        );
        self.clear();
        Ok(response)
    }

    /// Discards the snapshot and all edit state.
    pub fn clear(&mut self) {
        self.snapshot = None;
        self.tracker.reset();
        self.active_input = None;
    }
}
