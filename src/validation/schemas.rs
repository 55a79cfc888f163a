//! Schemas for the consultório and usuário forms.

use super::{FieldSchema, ObjectSchema};
use crate::format::{format_phone, format_postal_code, format_role, format_tax_id};
use clinic_types::Papel;
use std::sync::LazyLock;

static CONSULTORIO: LazyLock<ObjectSchema> = LazyLock::new(|| {
    ObjectSchema::new()
        .field("nome", FieldSchema::string().required("Nome é obrigatório"))
        .field(
            "cnpj",
            FieldSchema::string()
                .required("CNPJ é obrigatório")
                .mask(format_tax_id),
        )
        .object("endereco", endereco())
        .object("contato", contato())
});

static USUARIO: LazyLock<ObjectSchema> = LazyLock::new(|| {
    ObjectSchema::new()
        .field("email", FieldSchema::string().email("Email inválido"))
        .field(
            "senha",
            FieldSchema::string().min_len(6, "Senha deve ter no mínimo 6 caracteres"),
        )
        .field(
            "papel",
            FieldSchema::string()
                .one_of(&Papel::WIRE_NAMES, "Papel inválido")
                .mask(format_role),
        )
        .object("pessoa", pessoa())
});

fn endereco() -> ObjectSchema {
    ObjectSchema::new()
        .field("rua", FieldSchema::string().required("Rua é obrigatória"))
        .field("numero", FieldSchema::string().required("Número é obrigatório"))
        .field("complemento", FieldSchema::string().optional())
        .field("bairro", FieldSchema::string().required("Bairro é obrigatório"))
        .field("cidade", FieldSchema::string().required("Cidade é obrigatória"))
        .field("estado", FieldSchema::string().required("Estado é obrigatório"))
        .field(
            "cep",
            FieldSchema::string()
                .required("CEP é obrigatório")
                .mask(format_postal_code),
        )
}

fn contato() -> ObjectSchema {
    ObjectSchema::new()
        .field(
            "telefone",
            FieldSchema::string()
                .required("Telefone é obrigatório")
                .mask(format_phone),
        )
        .field("email", FieldSchema::string().email("Email inválido"))
        .field("site", FieldSchema::string().optional())
}

fn pessoa() -> ObjectSchema {
    ObjectSchema::new()
        .field("nome", FieldSchema::string().required("Nome é obrigatório"))
        .field(
            "cpfCnpj",
            FieldSchema::string()
                .required("CPF/CNPJ é obrigatório")
                .mask(format_tax_id),
        )
        .field(
            "dataNascimento",
            FieldSchema::string()
                .required("Data de nascimento é obrigatória")
                .iso_date("Data de nascimento inválida"),
        )
        .field(
            "email",
            FieldSchema::string().optional().email("Email inválido"),
        )
        .optional_object("endereco", endereco())
        .optional_object("contato", contato())
}

/// Consultório: name, CNPJ, full address and contact.
pub fn consultorio_schema() -> &'static ObjectSchema {
    &CONSULTORIO
}

/// Usuário: credentials, role and the embedded pessoa. The pessoa's address
/// and contact are optional sections.
pub fn usuario_schema() -> &'static ObjectSchema {
    &USUARIO
}
