use super::{FormMode, FormState, SubmitOutcome};
use crate::error::{AdminError, Result};
use crate::notify::{Notification, Notifier};
use crate::validation::schemas::usuario_schema;
use chrono::NaiveDate;
use clinic_client::UsuarioApi;
use clinic_types::{Consultorio, Papel, Usuario};
use serde_json::{json, Value};
use tracing::{info, warn};

/// Paths under this prefix are only shown when editing an existing usuário.
const ADDRESS_PREFIX: &str = "pessoa.endereco.";

/// Create/edit form for a usuário of one consultório.
#[derive(Debug, Clone)]
pub struct UsuarioForm {
    consultorio: Consultorio,
    state: FormState,
}

impl UsuarioForm {
    /// Empty form with the default role.
    pub fn create(consultorio: &Consultorio) -> Self {
        let values = json!({
            "email": "",
            "senha": "",
            "papel": Papel::default().as_str(),
            "pessoa": {
                "nome": "",
                "cpfCnpj": "",
                "dataNascimento": ""
            }
        });
        Self {
            consultorio: consultorio.clone(),
            state: FormState::new(usuario_schema(), FormMode::CreatingNew, values),
        }
    }

    /// Form pre-populated from `usuario`. The owning consultório is taken
    /// from the list the form was opened from, not from the record.
    pub fn edit(consultorio: &Consultorio, usuario: &Usuario) -> Result<Self> {
        let mut values = serde_json::to_value(usuario)?;
        if let Value::Object(map) = &mut values {
            map.remove("consultorio");
        }
        if let Some(date) = values.pointer_mut("/pessoa/dataNascimento") {
            if let Some(day) = date.as_str().and_then(calendar_day) {
                *date = Value::String(day.to_string());
            }
        }
        Ok(Self {
            consultorio: consultorio.clone(),
            state: FormState::new(usuario_schema(), FormMode::for_id(usuario.id), values),
        })
    }

    pub fn mode(&self) -> FormMode {
        self.state.mode()
    }

    pub fn consultorio(&self) -> &Consultorio {
        &self.consultorio
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    fn is_visible(&self, path: &str) -> bool {
        self.mode().is_editing() || !path.starts_with(ADDRESS_PREFIX)
    }

    /// Field paths offered to the user in the current mode.
    pub fn visible_fields(&self) -> Vec<String> {
        self.state
            .schema()
            .field_paths()
            .into_iter()
            .filter(|path| self.is_visible(path))
            .collect()
    }

    pub fn set_field(&mut self, path: &str, raw: &str) -> Result<String> {
        if self.state.schema().find(path).is_some() && !self.is_visible(path) {
            return Err(AdminError::FieldNotEditable(path.to_string()));
        }
        self.state.set(path, raw)
    }

    pub fn value(&self, path: &str) -> &str {
        self.state.value(path)
    }

    pub fn error_for(&self, path: &str) -> Option<&str> {
        self.state.error_for(path)
    }

    /// Validate, embed the owning consultório, then create or update.
    pub async fn submit(
        &mut self,
        api: &dyn UsuarioApi,
        notifier: &dyn Notifier,
    ) -> Result<SubmitOutcome<Usuario>> {
        let mut payload = match self.state.validate() {
            Ok(payload) => payload,
            Err(errors) => {
                warn!(fields = ?errors.paths(), "usuário form rejected");
                return Ok(SubmitOutcome::Invalid(errors));
            }
        };
        payload["consultorio"] = serde_json::to_value(&self.consultorio)?;
        let payload: Usuario = serde_json::from_value(payload)?;

        let result = match self.state.mode() {
            FormMode::EditingExisting { id } => api
                .update(id, &payload)
                .await
                .map(SubmitOutcome::Updated),
            FormMode::CreatingNew => api.create(&payload).await.map(SubmitOutcome::Created),
        };

        match result {
            Ok(outcome) => {
                let message = match outcome {
                    SubmitOutcome::Updated(_) => "Usuário atualizado com sucesso",
                    _ => "Usuário criado com sucesso",
                };
                info!(
                    id = ?outcome.saved().and_then(|u| u.id),
                    consultorio = ?self.consultorio.id,
                    "{}",
                    message
                );
                notifier.notify(Notification::success(message));
                Ok(outcome)
            }
            Err(e) => {
                warn!(error = %e, "usuário not saved");
                notifier.notify(Notification::error("Falha ao salvar usuário"));
                Ok(SubmitOutcome::Failed(e))
            }
        }
    }
}

/// `YYYY-MM-DD` prefix of a timestamp such as `1990-01-15T00:00:00`.
fn calendar_day(value: &str) -> Option<&str> {
    let day = value.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok().map(|_| day)
}
