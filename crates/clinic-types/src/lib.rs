//! Shared data model for the clinic admin front end
//!
//! Every type that crosses the REST boundary lives here.
//!
//! ## Rules
//!
//! 1. Field names mirror the JSON keys of the backend (camelCase on the wire)
//! 2. Server-assigned identifiers are `Option<i64>` and omitted when absent
//! 3. Records are read as sent: missing or `null` fields decode to their
//!    defaults, so one incomplete record never rejects a collection
//! 4. Optional sub-records (`Pessoa::endereco`, `Pessoa::contato`) are
//!    `Option<T>`; presence is meaningful to validation

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Read `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// CONSULTÓRIO
// ============================================================================

/// Postal address shared by consultórios and pessoas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Endereco {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub rua: String,
    #[serde(deserialize_with = "null_as_default")]
    pub numero: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complemento: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub bairro: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cidade: String,
    #[serde(deserialize_with = "null_as_default")]
    pub estado: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cep: String,
}

/// Contact channels shared by consultórios and pessoas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Contato {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub telefone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
}

/// A clinic: the top-level grouping every usuário belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Consultorio {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub nome: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cnpj: String,
    #[serde(deserialize_with = "null_as_default")]
    pub endereco: Endereco,
    #[serde(deserialize_with = "null_as_default")]
    pub contato: Contato,
}

// ============================================================================
// USUÁRIO
// ============================================================================

/// Role of a usuário inside its consultório.
///
/// `PACIENTE` is the canonical spelling. Older payloads spell it `CLIENTE`;
/// that spelling is accepted on input and never produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Papel {
    Admin,
    Profissional,
    #[default]
    #[serde(alias = "CLIENTE")]
    Paciente,
}

impl Papel {
    pub const ALL: [Papel; 3] = [Papel::Admin, Papel::Profissional, Papel::Paciente];

    /// Wire spelling of every role, in display order.
    pub const WIRE_NAMES: [&'static str; 3] = ["ADMIN", "PROFISSIONAL", "PACIENTE"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Papel::Admin => "ADMIN",
            Papel::Profissional => "PROFISSIONAL",
            Papel::Paciente => "PACIENTE",
        }
    }
}

impl fmt::Display for Papel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPapel(pub String);

impl fmt::Display for UnknownPapel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown papel '{}', expected one of {}",
            self.0,
            Papel::WIRE_NAMES.join(", ")
        )
    }
}

impl std::error::Error for UnknownPapel {}

impl FromStr for Papel {
    type Err = UnknownPapel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Papel::Admin),
            "PROFISSIONAL" => Ok(Papel::Profissional),
            "PACIENTE" | "CLIENTE" => Ok(Papel::Paciente),
            _ => Err(UnknownPapel(s.to_string())),
        }
    }
}

/// Personal data of a usuário.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pessoa {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub nome: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cpf_cnpj: String,
    /// ISO date (`YYYY-MM-DD`), kept as sent by the server.
    #[serde(deserialize_with = "null_as_default")]
    pub data_nascimento: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endereco: Option<Endereco>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contato: Option<Contato>,
}

/// A user account owned by a consultório.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Usuario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub senha: String,
    #[serde(deserialize_with = "null_as_default")]
    pub papel: Papel,
    #[serde(deserialize_with = "null_as_default")]
    pub consultorio: Consultorio,
    #[serde(deserialize_with = "null_as_default")]
    pub pessoa: Pessoa,
}

impl Usuario {
    /// True when this usuário is owned by the consultório with `consultorio_id`.
    pub fn belongs_to(&self, consultorio_id: i64) -> bool {
        self.consultorio.id == Some(consultorio_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn consultorio() -> Consultorio {
        Consultorio {
            id: Some(7),
            nome: "Clínica Centro".into(),
            cnpj: "12.345.678/0001-90".into(),
            endereco: Endereco {
                id: None,
                rua: "Rua A".into(),
                numero: "10".into(),
                complemento: None,
                bairro: "Centro".into(),
                cidade: "Curitiba".into(),
                estado: "PR".into(),
                cep: "80000-000".into(),
            },
            contato: Contato {
                id: None,
                telefone: "(41) 3333-4444".into(),
                email: "contato@centro.com".into(),
                site: None,
            },
        }
    }

    #[test]
    fn pessoa_uses_camel_case_keys() {
        let pessoa = Pessoa {
            nome: "Ana".into(),
            cpf_cnpj: "123.456.789-01".into(),
            data_nascimento: "1990-01-31".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&pessoa).unwrap();
        assert_eq!(value["cpfCnpj"], "123.456.789-01");
        assert_eq!(value["dataNascimento"], "1990-01-31");
        assert!(value.get("endereco").is_none());
        assert!(value.get("id").is_none());
    }

    #[test]
    fn legacy_cliente_spelling_reads_as_paciente() {
        let papel: Papel = serde_json::from_value(json!("CLIENTE")).unwrap();
        assert_eq!(papel, Papel::Paciente);
        assert_eq!(serde_json::to_value(papel).unwrap(), json!("PACIENTE"));
        assert_eq!("cliente".parse::<Papel>().unwrap(), Papel::Paciente);
    }

    #[test]
    fn unknown_papel_is_rejected() {
        assert!("GERENTE".parse::<Papel>().is_err());
        assert!(serde_json::from_value::<Papel>(json!("GERENTE")).is_err());
    }

    #[test]
    fn usuario_without_optional_sections_deserializes() {
        let value = json!({
            "id": 3,
            "email": "ana@example.com",
            "senha": "segredo",
            "papel": "PROFISSIONAL",
            "consultorio": serde_json::to_value(consultorio()).unwrap(),
            "pessoa": {
                "nome": "Ana",
                "cpfCnpj": "123.456.789-01",
                "dataNascimento": "1990-01-31"
            }
        });
        let usuario: Usuario = serde_json::from_value(value).unwrap();
        assert_eq!(usuario.papel, Papel::Profissional);
        assert!(usuario.pessoa.endereco.is_none());
        assert!(usuario.belongs_to(7));
        assert!(!usuario.belongs_to(8));
    }

    #[test]
    fn missing_or_null_fields_read_as_empty() {
        let value = json!([
            {
                "id": 1,
                "email": "ana@example.com",
                "papel": "ADMIN",
                "consultorio": { "id": 7, "nome": "Clínica Centro" },
                "pessoa": { "nome": "Ana" }
            },
            {
                "id": 2,
                "email": "bia@example.com",
                "senha": null,
                "papel": "PACIENTE",
                "consultorio": { "id": 7, "nome": "Clínica Centro", "cnpj": null },
                "pessoa": { "nome": "Bia", "cpfCnpj": null, "dataNascimento": null }
            }
        ]);
        let usuarios: Vec<Usuario> = serde_json::from_value(value).unwrap();
        assert_eq!(usuarios.len(), 2);
        assert_eq!(usuarios[0].senha, "");
        assert_eq!(usuarios[1].senha, "");
        assert_eq!(usuarios[1].pessoa.cpf_cnpj, "");
        assert_eq!(usuarios[1].consultorio.cnpj, "");
        assert_eq!(usuarios[0].consultorio.endereco, Endereco::default());
        assert!(usuarios.iter().all(|u| u.belongs_to(7)));
    }
}
