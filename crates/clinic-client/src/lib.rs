//! Clinic API client: the only boundary between the admin front end and the backend.
//!
//! Callers depend on the [`ConsultorioApi`] and [`UsuarioApi`] traits, never on
//! a concrete transport. [`http::HttpClient`] talks to the REST backend;
//! [`inmemory::InMemoryClient`] is an in-process stub backend for tests.

pub mod config;
pub mod error;
pub mod http;
pub mod inmemory;

use async_trait::async_trait;
use clinic_types::{Consultorio, Usuario};
use std::fmt;

pub use config::ClientConfig;
pub use error::{ConfigError, FailureReason, RequestFailed};
pub use http::HttpClient;
pub use inmemory::{InMemoryClient, RecordedCall};

pub type Result<T> = std::result::Result<T, RequestFailed>;

/// REST resource collection targeted by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Consultorio,
    Usuario,
}

impl Resource {
    /// Collection path, relative to the base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Consultorio => "consultorios",
            Resource::Usuario => "usuarios",
        }
    }

    /// Singular display name.
    pub fn singular(&self) -> &'static str {
        match self {
            Resource::Consultorio => "consultório",
            Resource::Usuario => "usuário",
        }
    }

    /// Plural display name.
    pub fn plural(&self) -> &'static str {
        match self {
            Resource::Consultorio => "consultórios",
            Resource::Usuario => "usuários",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

/// CRUD operation performed by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Consultório endpoints (`/consultorios`).
#[async_trait]
pub trait ConsultorioApi: Send + Sync {
    /// `GET /consultorios`
    async fn list_all(&self) -> Result<Vec<Consultorio>>;

    /// `POST /consultorios`
    async fn create(&self, payload: &Consultorio) -> Result<Consultorio>;

    /// `PUT /consultorios/{id}`
    async fn update(&self, id: i64, payload: &Consultorio) -> Result<Consultorio>;

    /// `DELETE /consultorios/{id}`
    async fn delete(&self, id: i64) -> Result<()>;
}

/// Usuário endpoints (`/usuarios`).
#[async_trait]
pub trait UsuarioApi: Send + Sync {
    /// `GET /usuarios`
    async fn list_all(&self) -> Result<Vec<Usuario>>;

    /// `GET /usuarios?consultorioId={id}`; scoped on the server.
    async fn list_by_consultorio(&self, consultorio_id: i64) -> Result<Vec<Usuario>>;

    /// `POST /usuarios`
    async fn create(&self, payload: &Usuario) -> Result<Usuario>;

    /// `PUT /usuarios/{id}`
    async fn update(&self, id: i64, payload: &Usuario) -> Result<Usuario>;

    /// `DELETE /usuarios/{id}`
    async fn delete(&self, id: i64) -> Result<()>;
}
