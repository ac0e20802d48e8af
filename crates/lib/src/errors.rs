use crate::field::{EditableField, UnknownFieldPath};
use thiserror::Error;

/// Errors raised while talking to the KYB backend or driving a review session.
///
/// The edit tracker and the commit policy never produce these: they are total
/// over their inputs. Everything here comes from transport, the backend, or a
/// session operation attempted in the wrong state.
#[derive(Error, Debug)]
pub enum KybError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Request to KYB backend failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },
    #[error("Failed to deserialize backend response: {0}")]
    Deserialization(#[from] serde_json::Error),
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("You are not logged in. Please run `kyb login` first.")]
    NotAuthenticated,
    #[error("KYB generation failed: {0}")]
    GenerationFailed(String),
    #[error("No KYB report has been loaded for this session")]
    NoReport,
    #[error("Submission requires the reviewer's attestation")]
    AttestationRequired,
    #[error("No documents were selected for upload")]
    NoFiles,
    #[error(transparent)]
    UnknownField(#[from] UnknownFieldPath),
    #[error("The loaded report has no value for '{0}'")]
    FieldNotInReport(EditableField),
}

impl KybError {
    /// The HTTP status code for backend-reported failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            KybError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
