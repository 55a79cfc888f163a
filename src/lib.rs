//! clinic-admin - administrative front end for consultórios and usuários
//!
//! Forms and lists drive CRUD against the clinic REST API through the
//! `clinic-client` traits:
//!
//! List mounts -> fetch collection -> open overlay form -> validate ->
//! create/update -> re-fetch -> close overlay
//!
//! ```rust,no_run
//! use clinic_admin::{ConsultorioList, TracingNotifier};
//! use clinic_client::InMemoryClient;
//! use std::sync::Arc;
//!
//! # async fn demo() -> clinic_admin::Result<()> {
//! let mut list = ConsultorioList::mount(
//!     Arc::new(InMemoryClient::new()),
//!     Arc::new(TracingNotifier),
//! )
//! .await;
//! let form = list.open_create();
//! form.set_field("nome", "Clínica Central")?;
//! let outcome = list.submit_overlay().await?;
//! # let _ = outcome;
//! # Ok(())
//! # }
//! ```

// Error handling
pub mod error;

// Runtime configuration
pub mod config;

// Input masks
pub mod format;

// Schemas and field validation
pub mod validation;

// Notifications
pub mod notify;

// Form and list controllers
pub mod forms;
pub mod lists;

pub use config::{AdminConfig, ScopeFiltering};
pub use error::{AdminError, Result};
pub use forms::{ConsultorioForm, FormMode, FormState, SubmitOutcome, UsuarioForm};
pub use lists::{ConsultorioList, ConsultorioRow, UsuarioList, UsuarioRow};
pub use notify::{Level, Notification, NotificationLog, Notifier, TracingNotifier};
pub use validation::{FieldError, ValidationErrors};
