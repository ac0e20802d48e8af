use async_trait::async_trait;
use kyb_review::{Credentials, KybBackend, KybError, ReportSnapshot, SaveProfilePayload};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub const COMPANY_ID: &str = "7f3c2a10-5b1e-4c8e-9a61-2f0d4e8b9c11";

// --- Report Fixtures ---

/// A generation response shaped like the backend's, covering every section.
pub fn sample_report_json() -> Value {
    json!({
        "status": "success",
        "company_id": COMPANY_ID,
        "kyb_result": {
            "status": "success",
            "company_id": COMPANY_ID,
            "unified_company": {
                "companyProfile": {
                    "legalName": {
                        "value": "Acme Corp",
                        "sourceDocument": "trade_license.pdf",
                        "confidence": 0.9,
                        "extractionMethod": "regex_v1"
                    },
                    "legalForm": {
                        "value": "LLC",
                        "sourceDocument": "trade_license.pdf",
                        "confidence": 0.9,
                        "extractionMethod": "regex_v1"
                    }
                },
                "licenseDetails": {
                    "registrationNumber": {
                        "value": "CN-1234567",
                        "sourceDocument": "trade_license.pdf",
                        "confidence": 0.95,
                        "extractionMethod": "regex_v1"
                    },
                    "jurisdiction": {
                        "value": "DUBAI",
                        "sourceDocument": "trade_license.pdf",
                        "confidence": 0.95,
                        "extractionMethod": "regex_v1"
                    },
                    "expiryDate": {
                        "value": null,
                        "sourceDocument": "trade_license.pdf",
                        "confidence": 0.5,
                        "extractionMethod": "regex_v1"
                    }
                },
                "addresses": {},
                "shareholders": [
                    {
                        "name": { "value": "Jane Doe", "sourceDocument": "moa.pdf", "confidence": 0.9, "extractionMethod": "regex_v1" },
                        "ownershipPercentage": { "value": 60.0, "sourceDocument": "moa.pdf", "confidence": 0.9, "extractionMethod": "regex_v1" }
                    }
                ],
                "ubos": [],
                "documents": [
                    {
                        "fileName": "trade_license.pdf",
                        "classType": "Trade License",
                        "confidence": 0.95,
                        "issueDate": "2023-01-15",
                        "expiryDate": "2026-01-14",
                        "processedAt": "2025-03-01T10:15:30.123456"
                    },
                    {
                        "fileName": "financials.pdf",
                        "classType": "Balance Sheet",
                        "confidence": 0.55,
                        "issueDate": null,
                        "expiryDate": null,
                        "processedAt": "2025-03-01T10:15:31.000001"
                    }
                ],
                "signatories": [],
                "financialIndicators": {
                    "annualRevenue": {
                        "value": 1000,
                        "sourceDocument": "financials.pdf",
                        "confidence": 0.95,
                        "extractionMethod": "regex_v1"
                    },
                    "netProfit": {
                        "value": -250000.0,
                        "sourceDocument": "financials.pdf",
                        "confidence": 0.95,
                        "extractionMethod": "regex_v1"
                    },
                    "financialPeriod": {
                        "value": "2024",
                        "sourceDocument": "financials.pdf",
                        "confidence": 0.85,
                        "extractionMethod": "regex_v1"
                    },
                    "ebitdaMargin": {
                        "value": 0.12,
                        "sourceDocument": "financials.pdf",
                        "confidence": 0.6,
                        "extractionMethod": "regex_v1"
                    }
                },
                "riskAssessment": {
                    "financialRiskScore": 45,
                    "riskBand": "Medium",
                    "riskDrivers": ["Net loss reported", "Low classification confidence: Balance Sheet"],
                    "confidenceLevel": "Medium"
                },
                "complianceIndicators": {
                    "exceptions": [
                        {
                            "type": "Financial",
                            "message": "Net loss reported",
                            "severity": "Medium",
                            "impactedFields": ["netProfit"],
                            "requiredAction": "Provide management accounts"
                        }
                    ]
                },
                "missingFields": ["totalAssets", "totalLiabilities"]
            }
        }
    })
}

pub fn sample_snapshot() -> ReportSnapshot {
    ReportSnapshot::from_value(sample_report_json()).expect("sample report is valid")
}

/// The body the backend returns when no documents exist for the company.
pub fn failed_generation_json() -> Value {
    json!({
        "status": "success",
        "company_id": COMPANY_ID,
        "kyb_result": {
            "status": "failed",
            "message": "No documents found for company"
        }
    })
}

// --- Mock Backend ---

/// A `KybBackend` that serves a fixed report and records submissions.
#[derive(Clone, Debug)]
pub struct MockBackend {
    report: Arc<Mutex<Value>>,
    fail_save: Arc<Mutex<Option<(u16, String)>>>,
    generate_calls: Arc<Mutex<Vec<String>>>,
    submissions: Arc<Mutex<Vec<(String, SaveProfilePayload)>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::with_report(sample_report_json())
    }

    pub fn with_report(report: Value) -> Self {
        Self {
            report: Arc::new(Mutex::new(report)),
            fail_save: Arc::new(Mutex::new(None)),
            generate_calls: Arc::new(Mutex::new(Vec::new())),
            submissions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replaces the report served by the next `generate_kyb` call.
    pub fn set_report(&self, report: Value) {
        *self.report.lock().unwrap() = report;
    }

    /// Makes every following `save_profile` call fail with `status`.
    pub fn fail_saves_with(&self, status: u16, message: &str) {
        *self.fail_save.lock().unwrap() = Some((status, message.to_string()));
    }

    pub fn generate_calls(&self) -> Vec<String> {
        self.generate_calls.lock().unwrap().clone()
    }

    pub fn submissions(&self) -> Vec<(String, SaveProfilePayload)> {
        self.submissions.lock().unwrap().clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KybBackend for MockBackend {
    async fn generate_kyb(
        &self,
        _credentials: &Credentials,
        company_id: &str,
    ) -> Result<ReportSnapshot, KybError> {
        self.generate_calls
            .lock()
            .unwrap()
            .push(company_id.to_string());
        let report = self.report.lock().unwrap().clone();
        ReportSnapshot::from_value(report)
    }

    async fn save_profile(
        &self,
        _credentials: &Credentials,
        company_id: &str,
        payload: &SaveProfilePayload,
    ) -> Result<Value, KybError> {
        if let Some((status, message)) = self.fail_save.lock().unwrap().clone() {
            return Err(KybError::Api { status, message });
        }
        self.submissions
            .lock()
            .unwrap()
            .push((company_id.to_string(), payload.clone()));
        Ok(json!({ "status": "success", "company_id": company_id }))
    }
}

pub fn test_credentials() -> Credentials {
    Credentials::new("test-token")
}
