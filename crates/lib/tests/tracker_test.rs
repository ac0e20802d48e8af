//! # Edit Tracker Tests
//!
//! Exercises the tracker's bookkeeping directly, without the commit policy.

use kyb_review::field::{FinancialField, LicenseField, ProfileField};
use kyb_review::{EditTracker, EditableField, FieldValue, ManualEdit};

const LEGAL_NAME: EditableField = EditableField::Profile(ProfileField::LegalName);
const REVENUE: EditableField = EditableField::Financial(FinancialField::AnnualRevenue);
const EXPIRY: EditableField = EditableField::License(LicenseField::ExpiryDate);

fn text(s: &str) -> FieldValue {
    FieldValue::Text(s.to_string())
}

#[test]
fn test_first_original_survives_repeated_edits() {
    let mut tracker = EditTracker::new();
    tracker.record_edit(REVENUE, FieldValue::Number(1000.0), FieldValue::Number(2500.0));
    tracker.record_edit(REVENUE, FieldValue::Number(2500.0), FieldValue::Number(3000.0));
    tracker.record_edit(REVENUE, FieldValue::Number(3000.0), FieldValue::Number(3500.0));

    assert_eq!(tracker.original_value(REVENUE), Some(&FieldValue::Number(1000.0)));
    assert_eq!(tracker.edited_value(REVENUE), Some(&FieldValue::Number(3500.0)));
    assert_eq!(
        tracker.edit_list(),
        vec![ManualEdit {
            field_name: REVENUE,
            old_value: FieldValue::Number(1000.0),
            new_value: FieldValue::Number(3500.0),
        }]
    );
}

#[test]
fn test_revert_removes_field_from_edit_list() {
    let mut tracker = EditTracker::new();
    tracker.record_edit(LEGAL_NAME, text("Acme Corp"), text("Acme Corporation"));
    tracker.record_edit(REVENUE, FieldValue::Number(1000.0), FieldValue::Number(1500.0));

    tracker.revert(LEGAL_NAME);

    let edits = tracker.edit_list();
    assert_eq!(edits.len(), 1);
    assert!(edits.iter().all(|e| e.field_name != LEGAL_NAME));
    assert!(!tracker.is_modified(LEGAL_NAME));
    assert_eq!(tracker.original_value(LEGAL_NAME), None);
}

#[test]
fn test_revert_is_idempotent() {
    let mut once = EditTracker::new();
    once.record_edit(LEGAL_NAME, text("Acme Corp"), text("Acme"));
    once.record_edit(REVENUE, FieldValue::Number(1000.0), FieldValue::Number(1500.0));
    let mut twice = once.clone();

    once.revert(LEGAL_NAME);
    twice.revert(LEGAL_NAME);
    twice.revert(LEGAL_NAME);

    assert_eq!(once.edit_list(), twice.edit_list());
}

#[test]
fn test_revert_of_unedited_field_is_noop() {
    let mut tracker = EditTracker::new();
    tracker.record_edit(LEGAL_NAME, text("Acme Corp"), text("Acme"));

    tracker.revert(EXPIRY);

    assert_eq!(tracker.len(), 1);
}

#[test]
fn test_edit_list_length_counts_distinct_fields() {
    let mut tracker = EditTracker::new();
    tracker.record_edit(LEGAL_NAME, text("Acme Corp"), text("A"));
    tracker.record_edit(LEGAL_NAME, text("Acme Corp"), text("B"));
    tracker.record_edit(REVENUE, FieldValue::Number(1000.0), FieldValue::Number(1.0));
    tracker.record_edit(EXPIRY, FieldValue::Null, text("2027-01-01"));
    tracker.record_edit(REVENUE, FieldValue::Number(1000.0), FieldValue::Number(2.0));

    assert_eq!(tracker.edit_list().len(), 3);
    assert_eq!(tracker.len(), 3);
}

#[test]
fn test_edit_list_keeps_insertion_order() {
    let mut tracker = EditTracker::new();
    tracker.record_edit(REVENUE, FieldValue::Number(1000.0), FieldValue::Number(1.0));
    tracker.record_edit(LEGAL_NAME, text("Acme Corp"), text("A"));
    tracker.record_edit(EXPIRY, FieldValue::Null, text("2027-01-01"));
    // Re-editing keeps the field's position.
    tracker.record_edit(REVENUE, FieldValue::Number(1000.0), FieldValue::Number(2.0));

    let order: Vec<EditableField> = tracker.edit_list().iter().map(|e| e.field_name).collect();
    assert_eq!(order, vec![REVENUE, LEGAL_NAME, EXPIRY]);

    // Reverting and editing again moves the field to the end.
    tracker.revert(REVENUE);
    tracker.record_edit(REVENUE, FieldValue::Number(1000.0), FieldValue::Number(3.0));
    let order: Vec<EditableField> = tracker.edit_list().iter().map(|e| e.field_name).collect();
    assert_eq!(order, vec![LEGAL_NAME, EXPIRY, REVENUE]);
}

#[test]
fn test_revert_then_edit_captures_new_original() {
    let mut tracker = EditTracker::new();
    tracker.record_edit(LEGAL_NAME, text("Acme Corp"), text("A"));
    tracker.revert(LEGAL_NAME);
    tracker.record_edit(LEGAL_NAME, text("Acme Corp"), text("B"));

    assert_eq!(tracker.original_value(LEGAL_NAME), Some(&text("Acme Corp")));
}

#[test]
fn test_null_original_reports_null_old_value() {
    let mut tracker = EditTracker::new();
    tracker.record_edit(EXPIRY, FieldValue::Null, text("2027-01-01"));

    let edits = tracker.edit_list();
    assert_eq!(edits[0].old_value, FieldValue::Null);
}

#[test]
fn test_display_value_prefers_edit() {
    let mut tracker = EditTracker::new();
    let report_value = text("Acme Corp");
    assert_eq!(tracker.display_value(LEGAL_NAME, &report_value), &report_value);

    tracker.record_edit(LEGAL_NAME, report_value.clone(), text("Acme Holdings"));
    assert_eq!(
        tracker.display_value(LEGAL_NAME, &report_value),
        &text("Acme Holdings")
    );

    tracker.revert(LEGAL_NAME);
    assert_eq!(tracker.display_value(LEGAL_NAME, &report_value), &report_value);
}

#[test]
fn test_reset_clears_everything() {
    let mut tracker = EditTracker::new();
    tracker.record_edit(LEGAL_NAME, text("Acme Corp"), text("A"));
    tracker.record_edit(REVENUE, FieldValue::Number(1000.0), FieldValue::Number(1.0));

    tracker.reset();

    assert!(tracker.is_empty());
    assert!(tracker.edit_list().is_empty());
    assert_eq!(tracker.original_value(REVENUE), None);
}

#[test]
fn test_manual_edit_serializes_to_submission_shape() {
    let edit = ManualEdit {
        field_name: REVENUE,
        old_value: FieldValue::Number(1000.0),
        new_value: FieldValue::Number(1500.0),
    };
    let json = serde_json::to_value(&edit).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "fieldName": "financialIndicators.annualRevenue.value",
            "old_value": 1000.0,
            "new_value": 1500.0
        })
    );

    let null_edit = ManualEdit {
        field_name: EXPIRY,
        old_value: FieldValue::Null,
        new_value: text("2027-01-01"),
    };
    let json = serde_json::to_value(&null_edit).unwrap();
    assert_eq!(json["old_value"], serde_json::Value::Null);
    assert_eq!(json["fieldName"], "licenseDetails.expiryDate.value");
}
