//! Form controllers.
//!
//! A form owns its raw input as a JSON object tree keyed like the wire
//! payload. Edits go through [`FormState::set`], which applies the field's
//! input mask. Submission validates the whole tree first and only then talks
//! to the API; the caller learns how it went from the returned
//! [`SubmitOutcome`].

pub mod consultorio;
pub mod usuario;

pub use consultorio::ConsultorioForm;
pub use usuario::UsuarioForm;

use crate::error::{AdminError, Result};
use crate::validation::{lookup, ObjectSchema, ValidationErrors};
use clinic_client::RequestFailed;
use serde_json::Value;

/// Whether submitting creates a record or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    CreatingNew,
    EditingExisting { id: i64 },
}

impl FormMode {
    /// Edit mode for entities that carry a server id; create mode otherwise.
    pub fn for_id(id: Option<i64>) -> Self {
        match id {
            Some(id) => FormMode::EditingExisting { id },
            None => FormMode::CreatingNew,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, FormMode::EditingExisting { .. })
    }
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<T> {
    /// Validation failed; nothing was sent.
    Invalid(ValidationErrors),
    Created(T),
    Updated(T),
    /// The request failed; the form keeps its values.
    Failed(RequestFailed),
}

impl<T> SubmitOutcome<T> {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Created(_) | SubmitOutcome::Updated(_))
    }

    /// The record returned by the server, if any.
    pub fn saved(&self) -> Option<&T> {
        match self {
            SubmitOutcome::Created(record) | SubmitOutcome::Updated(record) => Some(record),
            _ => None,
        }
    }
}

/// Values, mode and last validation errors of one form.
#[derive(Debug, Clone)]
pub struct FormState {
    schema: &'static ObjectSchema,
    mode: FormMode,
    values: Value,
    errors: ValidationErrors,
}

impl FormState {
    pub fn new(schema: &'static ObjectSchema, mode: FormMode, values: Value) -> Self {
        Self {
            schema,
            mode,
            values,
            errors: ValidationErrors::default(),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn schema(&self) -> &'static ObjectSchema {
        self.schema
    }

    /// Raw values as typed, including blank optional sections.
    pub fn values(&self) -> &Value {
        &self.values
    }

    /// Set a field from user input; the field's mask is applied first.
    /// Returns the stored (masked) value.
    pub fn set(&mut self, path: &str, raw: &str) -> Result<String> {
        let field = self
            .schema
            .find(path)
            .ok_or_else(|| AdminError::UnknownField(path.to_string()))?;

        let masked = field.apply_mask(raw);
        assign(&mut self.values, path, Value::String(masked.clone()));
        Ok(masked)
    }

    /// Current text of a field; empty when unset.
    pub fn value(&self, path: &str) -> &str {
        lookup(&self.values, path)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn error_for(&self, path: &str) -> Option<&str> {
        self.errors.get(path)
    }

    /// Validate the current input. On success returns the normalized
    /// payload tree (blank optional fields and sections dropped).
    pub fn validate(&mut self) -> std::result::Result<Value, ValidationErrors> {
        let mut payload = self.values.clone();
        self.schema.prune(&mut payload);

        match self.schema.validate(&payload) {
            Ok(()) => {
                self.errors = ValidationErrors::default();
                Ok(payload)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }
}

/// Write `value` at a dotted path, creating intermediate objects.
fn assign(target: &mut Value, path: &str, value: Value) {
    let mut current = target;
    for key in path.split('.') {
        if !current.is_object() {
            *current = Value::Null;
        }
        current = &mut current[key];
    }
    *current = value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldSchema;
    use serde_json::json;
    use std::sync::LazyLock;

    static SCHEMA: LazyLock<ObjectSchema> = LazyLock::new(|| {
        ObjectSchema::new()
            .field("nome", FieldSchema::string().required("Nome é obrigatório"))
            .optional_object(
                "contato",
                ObjectSchema::new().field(
                    "telefone",
                    FieldSchema::string()
                        .required("Telefone é obrigatório")
                        .mask(crate::format::format_phone),
                ),
            )
    });

    #[test]
    fn set_masks_and_creates_nested_objects() {
        let mut form = FormState::new(&SCHEMA, FormMode::CreatingNew, json!({ "nome": "" }));

        let stored = form.set("contato.telefone", "41999998888").unwrap();

        assert_eq!(stored, "(41) 99999-8888");
        assert_eq!(form.value("contato.telefone"), "(41) 99999-8888");
        assert_eq!(form.values()["contato"], json!({ "telefone": "(41) 99999-8888" }));
    }

    #[test]
    fn unknown_paths_are_rejected() {
        let mut form = FormState::new(&SCHEMA, FormMode::CreatingNew, json!({}));
        assert!(matches!(
            form.set("contato", "x"),
            Err(AdminError::UnknownField(path)) if path == "contato"
        ));
        assert!(matches!(form.set("idade", "3"), Err(AdminError::UnknownField(_))));
    }

    #[test]
    fn validate_keeps_errors_until_fixed() {
        let mut form = FormState::new(
            &SCHEMA,
            FormMode::EditingExisting { id: 3 },
            json!({ "nome": "", "contato": { "telefone": "" } }),
        );

        assert!(form.validate().is_err());
        assert_eq!(form.error_for("nome"), Some("Nome é obrigatório"));
        assert_eq!(form.error_for("contato.telefone"), None);

        form.set("nome", "Ana").unwrap();
        let payload = form.validate().unwrap();
        assert!(form.errors().is_empty());
        assert_eq!(payload, json!({ "nome": "Ana", "contato": null }));
        // Raw input is untouched.
        assert_eq!(form.values()["contato"], json!({ "telefone": "" }));
    }

    #[test]
    fn mode_from_id() {
        assert_eq!(FormMode::for_id(None), FormMode::CreatingNew);
        assert!(FormMode::for_id(Some(7)).is_editing());
    }
}
