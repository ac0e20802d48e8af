//! Formatting helpers shared by every front-end that renders a report.

/// Turns a report key into a label: `legalName` → `Legal Name`,
/// `issue_date` → `Issue Date`.
pub fn format_key(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        match c {
            '_' => spaced.push(' '),
            c if c.is_ascii_uppercase() => {
                spaced.push(' ');
                spaced.push(c);
            }
            c => spaced.push(c),
        }
    }

    let mut label = String::with_capacity(spaced.len());
    let mut prev_is_word = false;
    for c in spaced.chars() {
        let is_word = c.is_alphanumeric();
        if is_word && !prev_is_word {
            label.extend(c.to_uppercase());
        } else {
            label.push(c);
        }
        prev_is_word = is_word;
    }
    label.trim().to_string()
}

/// How much to trust an extracted value or a document classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

/// A confidence in [0, 1] as a rounded percentage.
pub fn confidence_percent(confidence: f64) -> i64 {
    (confidence * 100.0).round() as i64
}

impl ConfidenceBand {
    pub fn from_confidence(confidence: f64) -> Self {
        match confidence_percent(confidence) {
            pct if pct >= 90 => ConfidenceBand::High,
            pct if pct >= 70 => ConfidenceBand::Medium,
            _ => ConfidenceBand::Low,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    /// Reads the backend's band label; anything not `low` or `medium` is high.
    pub fn from_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "low" => RiskBand::Low,
            "medium" => RiskBand::Medium,
            _ => RiskBand::High,
        }
    }

    /// Bands a 0–100 financial risk score for display.
    pub fn from_score(score: f64) -> Self {
        if score <= 40.0 {
            RiskBand::Low
        } else if score <= 70.0 {
            RiskBand::Medium
        } else {
            RiskBand::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskBand::Low => "Low Risk",
            RiskBand::Medium => "Medium Risk",
            RiskBand::High => "High Risk",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Anything not `high` or `medium` is treated as low.
    pub fn from_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "high" => Severity::High,
            "medium" => Severity::Medium,
            _ => Severity::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Formats an amount as whole US dollars: `1234567.8` → `$1,234,568`.
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1_048_576 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / 1_048_576.0)
    }
}
