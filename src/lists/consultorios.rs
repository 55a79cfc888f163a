use crate::error::{AdminError, Result};
use crate::forms::{ConsultorioForm, SubmitOutcome};
use crate::notify::{Notification, Notifier};
use clinic_client::ConsultorioApi;
use clinic_types::Consultorio;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// One table row: Nome, CNPJ, Cidade, Telefone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsultorioRow {
    pub id: Option<i64>,
    pub nome: String,
    pub cnpj: String,
    pub cidade: String,
    pub telefone: String,
}

impl From<&Consultorio> for ConsultorioRow {
    fn from(c: &Consultorio) -> Self {
        Self {
            id: c.id,
            nome: c.nome.clone(),
            cnpj: c.cnpj.clone(),
            cidade: c.endereco.cidade.clone(),
            telefone: c.contato.telefone.clone(),
        }
    }
}

/// Consultório listing with a create/edit overlay.
///
/// The snapshot is replaced by a fresh fetch after every successful
/// mutation; it is never patched locally.
pub struct ConsultorioList {
    api: Arc<dyn ConsultorioApi>,
    notifier: Arc<dyn Notifier>,
    rows: Vec<Consultorio>,
    overlay: Option<ConsultorioForm>,
}

impl ConsultorioList {
    pub fn new(api: Arc<dyn ConsultorioApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            rows: Vec::new(),
            overlay: None,
        }
    }

    /// Build and fetch the first snapshot.
    pub async fn mount(api: Arc<dyn ConsultorioApi>, notifier: Arc<dyn Notifier>) -> Self {
        let mut list = Self::new(api, notifier);
        list.refresh().await;
        list
    }

    /// Re-fetch. On failure the previous snapshot stays and the user is
    /// notified. Returns whether the fetch succeeded.
    pub async fn refresh(&mut self) -> bool {
        match self.api.list_all().await {
            Ok(rows) => {
                info!(count = rows.len(), "consultórios loaded");
                self.rows = rows;
                true
            }
            Err(e) => {
                warn!(error = %e, "consultórios not loaded");
                self.notifier
                    .notify(Notification::error("Falha ao carregar consultórios"));
                false
            }
        }
    }

    pub fn rows(&self) -> &[Consultorio] {
        &self.rows
    }

    pub fn table(&self) -> Vec<ConsultorioRow> {
        self.rows.iter().map(ConsultorioRow::from).collect()
    }

    pub fn find(&self, id: i64) -> Option<&Consultorio> {
        self.rows.iter().find(|c| c.id == Some(id))
    }

    pub fn open_create(&mut self) -> &mut ConsultorioForm {
        self.overlay.insert(ConsultorioForm::create())
    }

    /// Open the overlay pre-populated with the row `id`.
    pub fn open_edit(&mut self, id: i64) -> Result<&mut ConsultorioForm> {
        let consultorio = self.find(id).ok_or(AdminError::NotFound {
            entity: "consultório",
            id,
        })?;
        let form = ConsultorioForm::edit(consultorio)?;
        Ok(self.overlay.insert(form))
    }

    pub fn overlay(&self) -> Option<&ConsultorioForm> {
        self.overlay.as_ref()
    }

    pub fn overlay_mut(&mut self) -> Option<&mut ConsultorioForm> {
        self.overlay.as_mut()
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    /// Submit the open form. On success the overlay closes and the list is
    /// re-fetched; otherwise the overlay stays open with its values.
    pub async fn submit_overlay(&mut self) -> Result<SubmitOutcome<Consultorio>> {
        let form = self.overlay.as_mut().ok_or(AdminError::NoOpenForm)?;

        let outcome = form
            .submit(self.api.as_ref(), self.notifier.as_ref())
            .await?;

        if outcome.is_saved() {
            self.overlay = None;
            self.refresh().await;
        }
        Ok(outcome)
    }

    /// Delete immediately and re-fetch. Returns whether the delete succeeded.
    pub async fn delete(&mut self, id: i64) -> bool {
        match self.api.delete(id).await {
            Ok(()) => {
                info!(id, "consultório deleted");
                self.notifier
                    .notify(Notification::success("Consultório excluído com sucesso"));
                self.refresh().await;
                true
            }
            Err(e) => {
                warn!(id, error = %e, "consultório not deleted");
                self.notifier
                    .notify(Notification::error("Falha ao excluir consultório"));
                false
            }
        }
    }
}
