use super::{FormMode, FormState, SubmitOutcome};
use crate::error::Result;
use crate::notify::{Notification, Notifier};
use crate::validation::schemas::consultorio_schema;
use clinic_client::ConsultorioApi;
use clinic_types::Consultorio;
use serde_json::json;
use tracing::{info, warn};

/// Create/edit form for a consultório.
#[derive(Debug, Clone)]
pub struct ConsultorioForm {
    state: FormState,
}

impl ConsultorioForm {
    /// Empty form; submitting creates a new consultório.
    pub fn create() -> Self {
        let values = json!({
            "nome": "",
            "cnpj": "",
            "endereco": {
                "rua": "",
                "numero": "",
                "complemento": "",
                "bairro": "",
                "cidade": "",
                "estado": "",
                "cep": ""
            },
            "contato": {
                "telefone": "",
                "email": "",
                "site": ""
            }
        });
        Self {
            state: FormState::new(consultorio_schema(), FormMode::CreatingNew, values),
        }
    }

    /// Form pre-populated from an existing record; submitting updates it.
    /// A record without an id is treated as new.
    pub fn edit(consultorio: &Consultorio) -> Result<Self> {
        let values = serde_json::to_value(consultorio)?;
        Ok(Self {
            state: FormState::new(
                consultorio_schema(),
                FormMode::for_id(consultorio.id),
                values,
            ),
        })
    }

    pub fn mode(&self) -> FormMode {
        self.state.mode()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn set_field(&mut self, path: &str, raw: &str) -> Result<String> {
        self.state.set(path, raw)
    }

    pub fn value(&self, path: &str) -> &str {
        self.state.value(path)
    }

    pub fn error_for(&self, path: &str) -> Option<&str> {
        self.state.error_for(path)
    }

    /// Validate, then create or update through `api`.
    ///
    /// Invalid input never reaches the network. Request failures are
    /// reported through `notifier` and leave the form as it was.
    pub async fn submit(
        &mut self,
        api: &dyn ConsultorioApi,
        notifier: &dyn Notifier,
    ) -> Result<SubmitOutcome<Consultorio>> {
        let payload = match self.state.validate() {
            Ok(payload) => payload,
            Err(errors) => {
                warn!(fields = ?errors.paths(), "consultório form rejected");
                return Ok(SubmitOutcome::Invalid(errors));
            }
        };
        let payload: Consultorio = serde_json::from_value(payload)?;

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
                    SubmitOutcome::Updated(_) => "Consultório atualizado com sucesso",
                    _ => "Consultório criado com sucesso",
                };
                info!(id = ?outcome.saved().and_then(|c| c.id), "{}", message);
                notifier.notify(Notification::success(message));
                Ok(outcome)
            }
            Err(e) => {
                warn!(error = %e, "consultório not saved");
                notifier.notify(Notification::error("Falha ao salvar consultório"));
                Ok(SubmitOutcome::Failed(e))
            }
        }
    }
}
