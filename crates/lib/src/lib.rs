//! # KYB Review
//!
//! Client-side core for reviewing generated "Know Your Business" reports.
//!
//! The external backend does all extraction and risk scoring. This crate loads
//! the resulting report, tracks the reviewer's manual corrections against the
//! pristine snapshot, and submits the snapshot together with the ordered list
//! of corrections.
//!
//! ```
//! use kyb_review::{EditTracker, EditableField, FieldValue};
//! use kyb_review::field::FinancialField;
//!
//! let revenue = EditableField::Financial(FinancialField::Revenue);
//! let mut tracker = EditTracker::new();
//! tracker.record_edit(revenue, FieldValue::Number(1000.0), FieldValue::Number(1500.0));
//! tracker.record_edit(revenue, FieldValue::Number(1500.0), FieldValue::Number(2000.0));
//!
//! let edits = tracker.edit_list();
//! assert_eq!(edits.len(), 1);
//! assert_eq!(edits[0].old_value, FieldValue::Number(1000.0));
//! assert_eq!(edits[0].new_value, FieldValue::Number(2000.0));
//! ```

pub mod client;
pub mod commit;
pub mod errors;
pub mod field;
pub mod present;
pub mod session;
pub mod tracker;
pub mod types;

pub use client::{ApiClient, Credentials, KybBackend};
pub use commit::{CommitOutcome, EditKey, InputBuffer};
pub use errors::KybError;
pub use field::{EditableField, Section};
pub use session::{Attestation, ReviewSession, ATTESTATION_STATEMENT};
pub use tracker::{EditTracker, ManualEdit};
pub use types::{ExtractedField, FieldValue, ReportSnapshot, SaveProfilePayload, UnifiedCompany};
