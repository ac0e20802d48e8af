//! Plain-text rendering of reports, pending changes, and listings.
//!
//! Every function returns a `String` so callers decide where it goes.

use kyb_review::field::FinancialField;
use kyb_review::present::{
    confidence_percent, format_currency, format_key, ConfidenceBand, RiskBand, Severity,
};
use kyb_review::types::{Company, CompanyDocument, DocumentInfo, UploadResponse};
use kyb_review::{EditableField, ExtractedField, FieldValue, ManualEdit, ReviewSession, Section};
use std::fmt::Write;

const PLACEHOLDER: &str = "N/A";

// ── Review session ──

/// Renders the loaded report as the reviewer sees it, edits applied.
pub fn review(session: &ReviewSession) -> String {
    let mut out = String::new();
    let Some(snapshot) = session.snapshot() else {
        return "No report loaded.\n".to_string();
    };
    let company = snapshot.company();

    let _ = writeln!(out, "=== KYB Report: {} ===", session.company_id());
    out.push('\n');

    for section in Section::ALL {
        let fields = company.section(section);
        if fields.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}", section.title());
        for (key, extracted) in fields {
            match EditableField::from_section_key(section, key) {
                Some(field) => {
                    let shown = session
                        .display_value(field)
                        .unwrap_or(&extracted.value);
                    let modified = session.tracker().is_modified(field);
                    write_field(&mut out, key, Some(field), shown, extracted, modified);
                }
                None => write_field(&mut out, key, None, &extracted.value, extracted, false),
            }
        }
        out.push('\n');
    }

    let risk = &company.risk_assessment;
    let _ = writeln!(out, "Risk Assessment");
    let _ = writeln!(
        out,
        "  {:<26} {:.0} ({})",
        "Financial Risk Score",
        risk.financial_risk_score,
        RiskBand::from_score(risk.financial_risk_score).label()
    );
    if !risk.risk_band.is_empty() {
        let _ = writeln!(
            out,
            "  {:<26} {}",
            "Risk Band",
            RiskBand::from_label(&risk.risk_band).label()
        );
    }
    if !risk.confidence_level.is_empty() {
        let _ = writeln!(out, "  {:<26} {}", "Confidence", risk.confidence_level);
    }
    for driver in &risk.risk_drivers {
        let _ = writeln!(out, "    - {driver}");
    }
    out.push('\n');

    let exceptions = &company.compliance_indicators.exceptions;
    if !exceptions.is_empty() {
        let _ = writeln!(out, "Compliance Exceptions ({})", exceptions.len());
        for exception in exceptions {
            let _ = writeln!(
                out,
                "  [{}] {}: {}",
                Severity::from_label(&exception.severity).label(),
                exception.exception_type,
                exception.message
            );
            if !exception.impacted_fields.is_empty() {
                let impacted: Vec<String> = exception
                    .impacted_fields
                    .iter()
                    .map(|f| format_key(f))
                    .collect();
                let _ = writeln!(out, "      Impacted: {}", impacted.join(", "));
            }
            if !exception.required_action.is_empty() {
                let _ = writeln!(out, "      Action:   {}", exception.required_action);
            }
        }
        out.push('\n');
    }

    if !company.missing_fields.is_empty() {
        let _ = writeln!(out, "Missing Fields");
        for missing in &company.missing_fields {
            let _ = writeln!(out, "  - {}", format_key(missing));
        }
        out.push('\n');
    }

    if !company.documents.is_empty() {
        out.push_str(&processed_documents(&company.documents));
        out.push('\n');
    }

    out.push_str(&pending_changes(&session.manual_edits()));
    out
}

fn write_field(
    out: &mut String,
    key: &str,
    field: Option<EditableField>,
    shown: &FieldValue,
    extracted: &ExtractedField,
    modified: bool,
) {
    let marker = if modified { "*" } else { " " };
    let value = match (field, shown.as_f64()) {
        (Some(EditableField::Financial(f)), Some(n)) if is_currency(f) => format_currency(n),
        _ => shown.display_or(PLACEHOLDER),
    };
    let confidence = if modified {
        "edited".to_string()
    } else {
        format!(
            "{}% {}",
            confidence_percent(extracted.confidence),
            confidence_label(extracted.confidence)
        )
    };
    let _ = writeln!(
        out,
        "{marker} {:<26} {:<28} [{}] {}",
        format_key(key),
        value,
        confidence,
        extracted.source_document
    );
}

fn is_currency(field: FinancialField) -> bool {
    matches!(
        field,
        FinancialField::Revenue
            | FinancialField::AnnualRevenue
            | FinancialField::NetProfit
            | FinancialField::TotalAssets
            | FinancialField::TotalLiabilities
    )
}

fn confidence_label(confidence: f64) -> &'static str {
    match ConfidenceBand::from_confidence(confidence) {
        ConfidenceBand::High => "high",
        ConfidenceBand::Medium => "medium",
        ConfidenceBand::Low => "low",
    }
}

fn processed_documents(documents: &[DocumentInfo]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Processed Documents ({})", documents.len());
    let _ = writeln!(
        out,
        "  {:<32} {:<20} {:>10}  {:<12} {:<12} {}",
        "File", "Type", "Confidence", "Issued", "Expires", "Processed"
    );
    for doc in documents {
        let _ = writeln!(
            out,
            "  {:<32} {:<20} {:>9}%  {:<12} {:<12} {}",
            doc.file_name,
            doc.class_type,
            confidence_percent(doc.confidence),
            doc.issue_date.as_deref().unwrap_or(PLACEHOLDER),
            doc.expiry_date.as_deref().unwrap_or(PLACEHOLDER),
            doc.processed_at_display()
        );
    }
    out
}

/// Lists the edits that would be submitted, oldest first.
pub fn pending_changes(edits: &[ManualEdit]) -> String {
    let mut out = String::new();
    if edits.is_empty() {
        let _ = writeln!(out, "No pending changes.");
        return out;
    }
    let _ = writeln!(out, "Pending Changes ({})", edits.len());
    for edit in edits {
        let _ = writeln!(
            out,
            "  {}: {} -> {}",
            edit.field_name,
            edit.old_value.display_or(PLACEHOLDER),
            edit.new_value.display_or(PLACEHOLDER)
        );
    }
    out
}

// ── Listings ──

pub fn editable_fields() -> String {
    let mut out = String::new();
    for section in Section::ALL {
        let _ = writeln!(out, "{}", section.title());
        for field in EditableField::all().filter(|f| f.section() == section) {
            let _ = writeln!(out, "  {field}");
        }
    }
    out
}

pub fn companies(companies: &[Company]) -> String {
    if companies.is_empty() {
        return "No companies found.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "{:<38} {:<32} {}", "Company ID", "Name", "Status");
    for company in companies {
        let _ = writeln!(
            out,
            "{:<38} {:<32} {}",
            company.company_id, company.name, company.status
        );
    }
    out
}

pub fn company_documents(documents: &[CompanyDocument]) -> String {
    if documents.is_empty() {
        return "No documents uploaded.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<38} {:<32} {:<12} {}",
        "Document ID", "Filename", "Status", "Uploaded"
    );
    for doc in documents {
        let _ = writeln!(
            out,
            "{:<38} {:<32} {:<12} {}",
            doc.id,
            doc.filename,
            doc.status,
            doc.upload_time.as_deref().unwrap_or(PLACEHOLDER)
        );
    }
    out
}

pub fn upload_summary(response: &UploadResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Uploaded {} document(s):", response.total);
    for doc in &response.uploaded {
        let _ = writeln!(out, "  {} ({}) {}", doc.filename, doc.document_id, doc.status);
    }
    out
}
