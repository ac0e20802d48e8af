//! # Review Session Tests
//!
//! Drives full review sessions against `MockBackend`: generation, editing
//! through the commit policy, and submission.

use anyhow::Result;
use kyb_review::field::{FinancialField, LicenseField, ProfileField};
use kyb_review::{
    Attestation, CommitOutcome, EditKey, EditableField, FieldValue, KybError, ReviewSession,
};
use kyb_test_utils::{
    failed_generation_json, sample_report_json, sample_snapshot, test_credentials, MockBackend,
    COMPANY_ID,
};
use serde_json::json;

const LEGAL_NAME: EditableField = EditableField::Profile(ProfileField::LegalName);
const LEGAL_FORM: EditableField = EditableField::Profile(ProfileField::LegalForm);
const REVENUE: EditableField = EditableField::Financial(FinancialField::AnnualRevenue);
const EXPIRY: EditableField = EditableField::License(LicenseField::ExpiryDate);
const TOTAL_ASSETS: EditableField = EditableField::Financial(FinancialField::TotalAssets);

fn text(s: &str) -> FieldValue {
    FieldValue::Text(s.to_string())
}

fn loaded_session() -> ReviewSession {
    let mut session = ReviewSession::new(COMPANY_ID);
    session.load_report(sample_snapshot());
    session
}

#[tokio::test]
async fn test_generate_loads_report() -> Result<()> {
    let backend = MockBackend::new();
    let mut session = ReviewSession::new(COMPANY_ID);

    let snapshot = session.generate(&backend, &test_credentials()).await?;

    assert_eq!(snapshot.company_id(), COMPANY_ID);
    assert_eq!(backend.generate_calls(), vec![COMPANY_ID.to_string()]);
    assert_eq!(session.display_value(LEGAL_NAME)?, &text("Acme Corp"));
    Ok(())
}

#[tokio::test]
async fn test_regenerate_resets_edits() -> Result<()> {
    let backend = MockBackend::new();
    let credentials = test_credentials();
    let mut session = ReviewSession::new(COMPANY_ID);
    session.generate(&backend, &credentials).await?;
    session.apply_input(LEGAL_NAME, "Acme Holdings")?;
    session.begin_edit(LEGAL_FORM)?.set_text("FZE");

    session.generate(&backend, &credentials).await?;

    assert!(session.manual_edits().is_empty());
    assert!(session.active_input().is_none());
    Ok(())
}

#[tokio::test]
async fn test_failed_generation_keeps_current_session() -> Result<()> {
    let backend = MockBackend::new();
    let credentials = test_credentials();
    let mut session = ReviewSession::new(COMPANY_ID);
    session.generate(&backend, &credentials).await?;
    session.apply_input(LEGAL_NAME, "Acme Holdings")?;

    backend.set_report(failed_generation_json());
    let err = session.generate(&backend, &credentials).await.unwrap_err();

    assert!(
        matches!(err, KybError::GenerationFailed(ref msg) if msg == "No documents found for company")
    );
    assert_eq!(session.manual_edits().len(), 1);
    Ok(())
}

#[test]
fn test_numeric_edit_scenario() -> Result<()> {
    let mut session = loaded_session();

    let outcome = session.apply_input(REVENUE, "1500")?;

    assert_eq!(outcome, CommitOutcome::Recorded(FieldValue::Number(1500.0)));
    let edits = serde_json::to_value(session.manual_edits())?;
    assert_eq!(
        edits,
        json!([{
            "fieldName": "financialIndicators.annualRevenue.value",
            "old_value": 1000.0,
            "new_value": 1500.0
        }])
    );
    Ok(())
}

#[test]
fn test_equal_commit_leaves_no_entry() -> Result<()> {
    let mut session = loaded_session();

    session.apply_input(LEGAL_NAME, "Acme Corp")?;

    assert!(session.manual_edits().is_empty());
    Ok(())
}

#[test]
fn test_edit_twice_keeps_pristine_old_value() -> Result<()> {
    let mut session = loaded_session();

    session.apply_input(REVENUE, "2500")?;
    session.apply_input(REVENUE, "3000")?;

    let edits = session.manual_edits();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].old_value, FieldValue::Number(1000.0));
    assert_eq!(edits[0].new_value, FieldValue::Number(3000.0));
    Ok(())
}

#[test]
fn test_edit_then_revert_restores_display() -> Result<()> {
    let mut session = loaded_session();
    session.apply_input(LEGAL_NAME, "Acme Holdings")?;
    assert_eq!(session.display_value(LEGAL_NAME)?, &text("Acme Holdings"));

    session.revert(LEGAL_NAME);

    assert!(session.manual_edits().is_empty());
    assert_eq!(session.display_value(LEGAL_NAME)?, &text("Acme Corp"));
    Ok(())
}

#[test]
fn test_reediting_seeds_buffer_with_edited_value() -> Result<()> {
    let mut session = loaded_session();
    session.apply_input(REVENUE, "2500")?;

    let buffer = session.begin_edit(REVENUE)?;

    assert_eq!(buffer.text(), "2500");
    assert_eq!(buffer.original(), &FieldValue::Number(1000.0));
    Ok(())
}

#[test]
fn test_switching_fields_commits_previous_input() -> Result<()> {
    let mut session = loaded_session();
    session.begin_edit(LEGAL_NAME)?.set_text("Acme Holdings");

    session.begin_edit(LEGAL_FORM)?;

    assert_eq!(session.active_input().map(|i| i.field()), Some(LEGAL_FORM));
    assert_eq!(session.tracker().edited_value(LEGAL_NAME), Some(&text("Acme Holdings")));
    Ok(())
}

#[test]
fn test_cancel_reverts_existing_edit() -> Result<()> {
    let mut session = loaded_session();
    session.apply_input(LEGAL_NAME, "Acme Holdings")?;

    session.begin_edit(LEGAL_NAME)?.set_text("typo");
    let outcome = session.finish_edit(EditKey::Cancel);

    assert_eq!(outcome, Some(CommitOutcome::Reverted));
    assert!(session.manual_edits().is_empty());

    session.apply_input(LEGAL_FORM, "FZE")?;
    assert_eq!(session.cancel_edit(LEGAL_FORM)?, CommitOutcome::Reverted);
    assert!(session.manual_edits().is_empty());
    Ok(())
}

#[test]
fn test_null_field_can_be_filled_in() -> Result<()> {
    let mut session = loaded_session();

    session.apply_input(EXPIRY, "2027-01-14")?;

    let edits = session.manual_edits();
    assert_eq!(edits[0].old_value, FieldValue::Null);
    assert_eq!(edits[0].new_value, text("2027-01-14"));
    Ok(())
}

#[test]
fn test_editing_field_missing_from_report_fails() {
    let mut session = loaded_session();

    let err = session.apply_input(TOTAL_ASSETS, "100").unwrap_err();

    assert!(matches!(err, KybError::FieldNotInReport(f) if f == TOTAL_ASSETS));
    assert!(session.manual_edits().is_empty());
}

#[test]
fn test_operations_without_report_fail() {
    let mut session = ReviewSession::new(COMPANY_ID);

    assert!(matches!(session.begin_edit(LEGAL_NAME), Err(KybError::NoReport)));
    assert!(matches!(session.payload(), Err(KybError::NoReport)));
}

#[tokio::test]
async fn test_submit_sends_snapshot_and_edits_then_clears() -> Result<()> {
    let backend = MockBackend::new();
    let mut session = loaded_session();
    session.apply_input(REVENUE, "1500")?;
    session.apply_input(LEGAL_NAME, "Acme Holdings")?;

    session
        .submit(&backend, &test_credentials(), Attestation::Confirmed)
        .await?;

    let submissions = backend.submissions();
    assert_eq!(submissions.len(), 1);
    let (company_id, payload) = &submissions[0];
    assert_eq!(company_id, COMPANY_ID);
    assert_eq!(payload.kyb_data, sample_report_json());
    let fields: Vec<String> = payload
        .manual_edits
        .iter()
        .map(|e| e.field_name.path())
        .collect();
    assert_eq!(
        fields,
        vec![
            "financialIndicators.annualRevenue.value",
            "companyProfile.legalName.value"
        ]
    );

    assert!(session.snapshot().is_none());
    assert!(session.manual_edits().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_submit_commits_active_input() -> Result<()> {
    let backend = MockBackend::new();
    let mut session = loaded_session();
    session.begin_edit(LEGAL_FORM)?.set_text("FZE");

    session
        .submit(&backend, &test_credentials(), Attestation::Confirmed)
        .await?;

    let (_, payload) = &backend.submissions()[0];
    assert_eq!(payload.manual_edits.len(), 1);
    assert_eq!(payload.manual_edits[0].new_value, text("FZE"));
    Ok(())
}

#[tokio::test]
async fn test_failed_submit_keeps_committed_active_input() -> Result<()> {
    let backend = MockBackend::new();
    backend.fail_saves_with(500, "Failed to save profile");
    let mut session = loaded_session();
    session.begin_edit(LEGAL_FORM)?.set_text("FZE");

    let result = session
        .submit(&backend, &test_credentials(), Attestation::Confirmed)
        .await;

    assert!(result.is_err());
    assert!(session.active_input().is_none());
    assert!(session.tracker().is_modified(LEGAL_FORM));
    assert_eq!(session.display_value(LEGAL_FORM)?, &text("FZE"));
    Ok(())
}

#[tokio::test]
async fn test_submit_without_attestation_is_refused() -> Result<()> {
    let backend = MockBackend::new();
    let mut session = loaded_session();
    session.apply_input(LEGAL_NAME, "Acme Holdings")?;

    let err = session
        .submit(&backend, &test_credentials(), Attestation::Withheld)
        .await
        .unwrap_err();

    assert!(matches!(err, KybError::AttestationRequired));
    assert!(backend.submissions().is_empty());
    assert_eq!(session.manual_edits().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_failed_submit_keeps_edits() -> Result<()> {
    let backend = MockBackend::new();
    backend.fail_saves_with(500, "Failed to save profile");
    let mut session = loaded_session();
    session.apply_input(REVENUE, "1500")?;

    let err = session
        .submit(&backend, &test_credentials(), Attestation::Confirmed)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(session.snapshot().is_some());
    assert_eq!(session.manual_edits().len(), 1);
    Ok(())
}
