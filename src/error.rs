//! Error type for the admin front end.

use crate::validation::ValidationErrors;
use clinic_client::{ConfigError, RequestFailed};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("field is not editable in this mode: {0}")]
    FieldNotEditable(String),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Request(#[from] RequestFailed),

    #[error("no form is open")]
    NoOpenForm,

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Client(#[from] ConfigError),

    #[error("invalid payload: {0}")]
    Payload(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AdminError>;
