use crate::config::ScopeFiltering;
use crate::error::{AdminError, Result};
use crate::forms::{SubmitOutcome, UsuarioForm};
use crate::notify::{Notification, Notifier};
use clinic_client::UsuarioApi;
use clinic_types::{Consultorio, Usuario};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One table row: Nome, Email, Papel, CPF/CNPJ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsuarioRow {
    pub id: Option<i64>,
    pub nome: String,
    pub email: String,
    pub papel: String,
    pub cpf_cnpj: String,
}

impl From<&Usuario> for UsuarioRow {
    fn from(u: &Usuario) -> Self {
        Self {
            id: u.id,
            nome: u.pessoa.nome.clone(),
            email: u.email.clone(),
            papel: u.papel.as_str().to_string(),
            cpf_cnpj: u.pessoa.cpf_cnpj.clone(),
        }
    }
}

/// Usuários of one consultório, with a create/edit overlay.
pub struct UsuarioList {
    api: Arc<dyn UsuarioApi>,
    notifier: Arc<dyn Notifier>,
    scope: Consultorio,
    filtering: ScopeFiltering,
    rows: Vec<Usuario>,
    overlay: Option<UsuarioForm>,
}

impl UsuarioList {
    pub fn new(
        api: Arc<dyn UsuarioApi>,
        notifier: Arc<dyn Notifier>,
        scope: Consultorio,
        filtering: ScopeFiltering,
    ) -> Self {
        Self {
            api,
            notifier,
            scope,
            filtering,
            rows: Vec::new(),
            overlay: None,
        }
    }

    pub async fn mount(
        api: Arc<dyn UsuarioApi>,
        notifier: Arc<dyn Notifier>,
        scope: Consultorio,
        filtering: ScopeFiltering,
    ) -> Self {
        let mut list = Self::new(api, notifier, scope, filtering);
        list.refresh().await;
        list
    }

    pub fn scope(&self) -> &Consultorio {
        &self.scope
    }

    /// Switch to another consultório. Re-fetches only when its id changed.
    pub async fn set_scope(&mut self, scope: Consultorio) {
        let changed = scope.id != self.scope.id;
        self.scope = scope;
        if changed {
            self.overlay = None;
            self.refresh().await;
        }
    }

    async fn fetch(&self) -> clinic_client::Result<Vec<Usuario>> {
        let Some(scope_id) = self.scope.id else {
            // An unsaved consultório has no usuários.
            return Ok(Vec::new());
        };

        match self.filtering {
            ScopeFiltering::Server => self.api.list_by_consultorio(scope_id).await,
            ScopeFiltering::Client => {
                let all = self.api.list_all().await?;
                let total = all.len();
                let scoped: Vec<Usuario> =
                    all.into_iter().filter(|u| u.belongs_to(scope_id)).collect();
                debug!(total, kept = scoped.len(), scope_id, "filtered usuários locally");
                Ok(scoped)
            }
        }
    }

    /// Re-fetch the scoped collection. On failure the previous snapshot
    /// stays and the user is notified.
    pub async fn refresh(&mut self) -> bool {
        match self.fetch().await {
            Ok(rows) => {
                info!(count = rows.len(), consultorio = ?self.scope.id, "usuários loaded");
                self.rows = rows;
                true
            }
            Err(e) => {
                warn!(error = %e, "usuários not loaded");
                self.notifier
                    .notify(Notification::error("Falha ao carregar usuários"));
                false
            }
        }
    }

    pub fn rows(&self) -> &[Usuario] {
        &self.rows
    }

    pub fn table(&self) -> Vec<UsuarioRow> {
        self.rows.iter().map(UsuarioRow::from).collect()
    }

    pub fn find(&self, id: i64) -> Option<&Usuario> {
        self.rows.iter().find(|u| u.id == Some(id))
    }

    pub fn open_create(&mut self) -> &mut UsuarioForm {
        self.overlay.insert(UsuarioForm::create(&self.scope))
    }

    pub fn open_edit(&mut self, id: i64) -> Result<&mut UsuarioForm> {
        let usuario = self.find(id).ok_or(AdminError::NotFound {
            entity: "usuário",
            id,
        })?;
        let form = UsuarioForm::edit(&self.scope, usuario)?;
        Ok(self.overlay.insert(form))
    }

    pub fn overlay(&self) -> Option<&UsuarioForm> {
        self.overlay.as_ref()
    }

    pub fn overlay_mut(&mut self) -> Option<&mut UsuarioForm> {
        self.overlay.as_mut()
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    /// Submit the open form; closes the overlay and re-fetches on success.
    pub async fn submit_overlay(&mut self) -> Result<SubmitOutcome<Usuario>> {
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

    /// Delete immediately and re-fetch.
    pub async fn delete(&mut self, id: i64) -> bool {
        match self.api.delete(id).await {
            Ok(()) => {
                info!(id, "usuário deleted");
                self.notifier
                    .notify(Notification::success("Usuário excluído com sucesso"));
                self.refresh().await;
                true
            }
            Err(e) => {
                warn!(id, error = %e, "usuário not deleted");
                self.notifier
                    .notify(Notification::error("Falha ao excluir usuário"));
                false
            }
        }
    }
}
