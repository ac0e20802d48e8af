//! # Report and API Types
//!
//! Typed views over the JSON exchanged with the KYB backend. Report structures
//! are lenient: every collection defaults to empty so that a partially populated
//! report (e.g. no financial documents uploaded) still deserializes.

use crate::errors::KybError;
use crate::field::{EditableField, Section};
use crate::tracker::ManualEdit;
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The value of a single extracted leaf: text, a number, or absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    #[default]
    Null,
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, FieldValue::Number(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Renders the value for display, substituting `placeholder` for `Null`.
    pub fn display_or(&self, placeholder: &str) -> String {
        match self {
            FieldValue::Null => placeholder.to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) if n.is_infinite() => {
                write!(f, "{}", if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

/// One leaf value pulled from a source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedField {
    #[serde(default)]
    pub value: FieldValue,
    #[serde(default)]
    pub source_document: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub extraction_method: String,
}

/// Metadata for a document processed during generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub file_name: String,
    #[serde(default)]
    pub class_type: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub processed_at: String,
}

impl DocumentInfo {
    /// The processing timestamp as `YYYY-MM-DD HH:MM:SS`, or the raw string if
    /// the backend sent something that is not an ISO-8601 timestamp.
    pub fn processed_at_display(&self) -> String {
        NaiveDateTime::parse_from_str(&self.processed_at, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|_| self.processed_at.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    #[serde(default)]
    pub financial_risk_score: f64,
    #[serde(default)]
    pub risk_band: String,
    #[serde(default)]
    pub risk_drivers: Vec<String>,
    #[serde(default)]
    pub confidence_level: String,
}

/// A discrepancy or missing requirement flagged by the backend analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceException {
    #[serde(rename = "type", default)]
    pub exception_type: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub impacted_fields: Vec<String>,
    #[serde(default, alias = "requiredReviewerAction")]
    pub required_action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ComplianceIndicators {
    #[serde(default)]
    pub exceptions: Vec<ComplianceException>,
}

/// The consolidated company record produced by the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedCompany {
    #[serde(default)]
    pub company_profile: IndexMap<String, ExtractedField>,
    #[serde(default)]
    pub license_details: IndexMap<String, ExtractedField>,
    #[serde(default)]
    pub addresses: Value,
    #[serde(default)]
    pub shareholders: Vec<Value>,
    #[serde(default)]
    pub ubos: Vec<Value>,
    #[serde(default)]
    pub documents: Vec<DocumentInfo>,
    #[serde(default)]
    pub signatories: Vec<Value>,
    #[serde(default)]
    pub financial_indicators: IndexMap<String, ExtractedField>,
    #[serde(default)]
    pub risk_assessment: RiskAssessment,
    #[serde(default)]
    pub compliance_indicators: ComplianceIndicators,
    #[serde(default)]
    pub missing_fields: Vec<String>,
}

impl UnifiedCompany {
    pub fn section(&self, section: Section) -> &IndexMap<String, ExtractedField> {
        match section {
            Section::CompanyProfile => &self.company_profile,
            Section::LicenseDetails => &self.license_details,
            Section::FinancialIndicators => &self.financial_indicators,
        }
    }

    /// Looks up the extracted leaf addressed by `field`, if the report has it.
    pub fn field(&self, field: EditableField) -> Option<&ExtractedField> {
        self.section(field.section()).get(field.key())
    }

    /// Every editable leaf present in the report, in section then report order.
    ///
    /// Keys the backend returned that have no `EditableField` variant are
    /// skipped; they remain visible through [`UnifiedCompany::section`].
    pub fn editable_fields(&self) -> Vec<(EditableField, &ExtractedField)> {
        Section::ALL
            .iter()
            .flat_map(|&section| {
                self.section(section).iter().filter_map(move |(key, extracted)| {
                    EditableField::from_section_key(section, key).map(|f| (f, extracted))
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KybResult {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub unified_company: Option<UnifiedCompany>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The response body of `POST /companies/{company_id}/generate-kyb`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KybResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub company_id: String,
    #[serde(default)]
    pub kyb_result: KybResult,
}

impl KybResponse {
    pub fn company(&self) -> Option<&UnifiedCompany> {
        self.kyb_result.unified_company.as_ref()
    }
}

/// An immutable generated report, held both as the exact JSON the backend sent
/// and as its typed view.
///
/// The raw form is what gets handed back to the submission endpoint. Object
/// keys keep the order the backend sent them in, so the resubmitted snapshot
/// carries the same content and key order as the one received.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSnapshot {
    raw: Value,
    company_id: String,
    company: UnifiedCompany,
}

impl ReportSnapshot {
    /// Parses a generation response, failing if the backend reported that the
    /// pipeline did not produce a unified company record.
    pub fn from_value(raw: Value) -> Result<Self, KybError> {
        let mut report: KybResponse = serde_json::from_value(raw.clone())?;
        let Some(company) = report.kyb_result.unified_company.take() else {
            let reason = report
                .kyb_result
                .error
                .or(report.kyb_result.message)
                .unwrap_or_else(|| "Failed to generate KYB data".to_string());
            return Err(KybError::GenerationFailed(reason));
        };
        Ok(Self {
            raw,
            company_id: report.company_id,
            company,
        })
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn company_id(&self) -> &str {
        &self.company_id
    }

    pub fn company(&self) -> &UnifiedCompany {
        &self.company
    }

    pub fn field(&self, field: EditableField) -> Option<&ExtractedField> {
        self.company.field(field)
    }
}

// --- Company / document endpoints ---

/// The response of `POST /auth/login`.
#[derive(Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token_type", &self.token_type)
            .finish_non_exhaustive()
    }
}

/// A company record as returned by the `/companies/` endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Company {
    pub name: String,
    pub status: String,
    pub id: i64,
    pub company_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DeleteCompanyResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UploadedDocument {
    pub document_id: String,
    pub filename: String,
    pub status: String,
}

/// The response of `POST /documents/upload`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UploadResponse {
    pub total: usize,
    pub uploaded: Vec<UploadedDocument>,
}

/// A stored document as returned by `GET /documents/by-company/{company_id}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CompanyDocument {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub uploader: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub upload_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HealthStatus {
    pub status: String,
}

/// The body of `POST /companies/{company_id}/save_profile`: the untouched
/// report snapshot plus the reviewer's edits, in the order they were made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveProfilePayload {
    pub kyb_data: Value,
    pub manual_edits: Vec<ManualEdit>,
}
