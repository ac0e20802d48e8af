//! # Editable Field Identifiers
//!
//! A closed enumeration of the report leaves a reviewer may correct. The dotted
//! path form (`companyProfile.legalName.value`) exists only at the boundaries:
//! it is what the submission endpoint receives as `fieldName` and what the CLI
//! accepts on its command line.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The editable sections of a unified company record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    CompanyProfile,
    LicenseDetails,
    FinancialIndicators,
}

impl Section {
    pub const ALL: [Section; 3] = [
        Section::CompanyProfile,
        Section::LicenseDetails,
        Section::FinancialIndicators,
    ];

    /// The section's key in the report JSON.
    pub fn key(self) -> &'static str {
        match self {
            Section::CompanyProfile => "companyProfile",
            Section::LicenseDetails => "licenseDetails",
            Section::FinancialIndicators => "financialIndicators",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::CompanyProfile => "Company Profile",
            Section::LicenseDetails => "License Details",
            Section::FinancialIndicators => "Financial Indicators",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Section::ALL.into_iter().find(|s| s.key() == key)
    }
}

macro_rules! field_keys {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $key:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }

            pub fn from_key(key: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|f| f.key() == key)
            }
        }
    };
}

field_keys! {
    /// Fields of the `companyProfile` section.
    ProfileField {
        LegalName => "legalName",
        LegalForm => "legalForm",
        RegistrationNumber => "registrationNumber",
        Jurisdiction => "jurisdiction",
    }
}

field_keys! {
    /// Fields of the `licenseDetails` section.
    LicenseField {
        RegistrationNumber => "registrationNumber",
        Jurisdiction => "jurisdiction",
        LicenseIssuingAuthority => "licenseIssuingAuthority",
        IssueDate => "issueDate",
        ExpiryDate => "expiryDate",
    }
}

field_keys! {
    /// Fields of the `financialIndicators` section.
    FinancialField {
        Revenue => "revenue",
        AnnualRevenue => "annualRevenue",
        NetProfit => "netProfit",
        TotalAssets => "totalAssets",
        TotalLiabilities => "totalLiabilities",
        AuditStatus => "auditStatus",
        FinancialPeriod => "financialPeriod",
    }
}

/// One editable leaf of the report: a section paired with a field of that section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EditableField {
    Profile(ProfileField),
    License(LicenseField),
    Financial(FinancialField),
}

impl EditableField {
    /// Every editable field, in section order.
    pub fn all() -> impl Iterator<Item = EditableField> {
        ProfileField::ALL
            .iter()
            .copied()
            .map(EditableField::Profile)
            .chain(LicenseField::ALL.iter().copied().map(EditableField::License))
            .chain(FinancialField::ALL.iter().copied().map(EditableField::Financial))
    }

    pub fn section(self) -> Section {
        match self {
            EditableField::Profile(_) => Section::CompanyProfile,
            EditableField::License(_) => Section::LicenseDetails,
            EditableField::Financial(_) => Section::FinancialIndicators,
        }
    }

    /// The field's key within its section, e.g. `legalName`.
    pub fn key(self) -> &'static str {
        match self {
            EditableField::Profile(f) => f.key(),
            EditableField::License(f) => f.key(),
            EditableField::Financial(f) => f.key(),
        }
    }

    pub fn from_section_key(section: Section, key: &str) -> Option<Self> {
        match section {
            Section::CompanyProfile => ProfileField::from_key(key).map(EditableField::Profile),
            Section::LicenseDetails => LicenseField::from_key(key).map(EditableField::License),
            Section::FinancialIndicators => {
                FinancialField::from_key(key).map(EditableField::Financial)
            }
        }
    }

    /// The dotted path sent to the submission endpoint.
    pub fn path(self) -> String {
        format!("{}.{}.value", self.section().key(), self.key())
    }
}

impl fmt::Display for EditableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.value", self.section().key(), self.key())
    }
}

/// Error returned when a dotted path names no editable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldPath(pub String);

impl fmt::Display for UnknownFieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown editable field path '{}'", self.0)
    }
}

impl std::error::Error for UnknownFieldPath {}

impl FromStr for EditableField {
    type Err = UnknownFieldPath;

    /// Accepts `section.key.value` as well as the shorter `section.key`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownFieldPath(s.to_string());
        let trimmed = s.strip_suffix(".value").unwrap_or(s);
        let (section, key) = trimmed.split_once('.').ok_or_else(unknown)?;
        let section = Section::from_key(section).ok_or_else(unknown)?;
        EditableField::from_section_key(section, key).ok_or_else(unknown)
    }
}

impl Serialize for EditableField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EditableField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let path = String::deserialize(deserializer)?;
        path.parse().map_err(serde::de::Error::custom)
    }
}
