//! Domain service for the matricule registry.

use thiserror::Error;

use crate::db::Matricule;

#[derive(Debug, Error)]
pub enum MatriculeError {
    #[error("All matricule parts are required")]
    MissingParts,

    /// The store refused the insert.
    #[error("Failed to add matricule: {0}")]
    CreateFailed(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for MatriculeError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// The three parts of a matricule as submitted by a client.
/// Any part may be absent; [`MatriculeParts::validate`] rejects that.
#[derive(Debug, Clone, Default)]
pub struct MatriculeParts {
    pub series: Option<String>,
    pub location: Option<String>,
    pub registration_number: Option<String>,
}

/// Parts that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMatricule<'a> {
    pub series: &'a str,
    pub location: &'a str,
    pub registration_number: &'a str,
}

impl MatriculeParts {
    pub fn validate(&self) -> Result<ValidMatricule<'_>, MatriculeError> {
        fn part(value: Option<&String>) -> Result<&str, MatriculeError> {
            match value {
                Some(v) if !v.is_empty() => Ok(v.as_str()),
                _ => Err(MatriculeError::MissingParts),
            }
        }

        Ok(ValidMatricule {
            series: part(self.series.as_ref())?,
            location: part(self.location.as_ref())?,
            registration_number: part(self.registration_number.as_ref())?,
        })
    }
}

#[async_trait::async_trait]
pub trait MatriculeService: Send + Sync {
    /// Validates and stores a new matricule.
    ///
    /// # Errors
    ///
    /// Returns [`MatriculeError::MissingParts`] before touching the store if
    /// any part is absent or empty.
    async fn add_matricule(&self, parts: &MatriculeParts) -> Result<Matricule, MatriculeError>;

    async fn list_matricules(&self) -> Result<Vec<Matricule>, MatriculeError>;
}
