use kyb_review::present::{
    confidence_percent, format_currency, format_file_size, format_key, ConfidenceBand, RiskBand,
    Severity,
};

#[test]
fn test_format_key() {
    assert_eq!(format_key("legalName"), "Legal Name");
    assert_eq!(format_key("licenseIssuingAuthority"), "License Issuing Authority");
    assert_eq!(format_key("issue_date"), "Issue Date");
    assert_eq!(format_key("revenue"), "Revenue");
}

#[test]
fn test_confidence_bands() {
    assert_eq!(confidence_percent(0.954), 95);
    assert_eq!(ConfidenceBand::from_confidence(0.95), ConfidenceBand::High);
    assert_eq!(ConfidenceBand::from_confidence(0.9), ConfidenceBand::High);
    assert_eq!(ConfidenceBand::from_confidence(0.75), ConfidenceBand::Medium);
    assert_eq!(ConfidenceBand::from_confidence(0.55), ConfidenceBand::Low);
}

#[test]
fn test_risk_bands() {
    assert_eq!(RiskBand::from_label("Low"), RiskBand::Low);
    assert_eq!(RiskBand::from_label("MEDIUM"), RiskBand::Medium);
    assert_eq!(RiskBand::from_label("unknown"), RiskBand::High);

    assert_eq!(RiskBand::from_score(40.0), RiskBand::Low);
    assert_eq!(RiskBand::from_score(45.0), RiskBand::Medium);
    assert_eq!(RiskBand::from_score(70.5), RiskBand::High);
    assert_eq!(RiskBand::Medium.label(), "Medium Risk");
}

#[test]
fn test_severity_defaults_to_low() {
    assert_eq!(Severity::from_label("High"), Severity::High);
    assert_eq!(Severity::from_label("medium"), Severity::Medium);
    assert_eq!(Severity::from_label(""), Severity::Low);
}

#[test]
fn test_format_currency() {
    assert_eq!(format_currency(1234567.8), "$1,234,568");
    assert_eq!(format_currency(1000.0), "$1,000");
    assert_eq!(format_currency(999.0), "$999");
    assert_eq!(format_currency(-1500.0), "-$1,500");
    assert_eq!(format_currency(0.0), "$0");
}

#[test]
fn test_format_file_size() {
    assert_eq!(format_file_size(512), "512 B");
    assert_eq!(format_file_size(2048), "2.0 KB");
    assert_eq!(format_file_size(5 * 1_048_576), "5.0 MB");
}
