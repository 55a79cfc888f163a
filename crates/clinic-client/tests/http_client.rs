//! HttpClient against a mock REST backend served by axum on an ephemeral port.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use clinic_client::{
    ClientConfig, ConsultorioApi, FailureReason, HttpClient, Operation, Resource, UsuarioApi,
};
use clinic_types::{Consultorio, Contato, Endereco, Papel, Pessoa, Usuario};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockBackend {
    consultorios: Mutex<Vec<Consultorio>>,
    usuarios: Mutex<Vec<Usuario>>,
    requests: Mutex<Vec<String>>,
    usuario_queries: Mutex<Vec<HashMap<String, String>>>,
    fail_with: Mutex<Option<StatusCode>>,
}

type Shared = Arc<MockBackend>;

impl MockBackend {
    fn hit(&self, line: String) -> Result<(), StatusCode> {
        self.requests.lock().unwrap().push(line);
        match *self.fail_with.lock().unwrap() {
            Some(status) => Err(status),
            None => Ok(()),
        }
    }
}

async fn list_consultorios(State(b): State<Shared>) -> Result<Json<Vec<Consultorio>>, StatusCode> {
    b.hit("GET /consultorios".into())?;
    Ok(Json(b.consultorios.lock().unwrap().clone()))
}

async fn create_consultorio(
    State(b): State<Shared>,
    Json(mut payload): Json<Consultorio>,
) -> Result<Json<Consultorio>, StatusCode> {
    b.hit("POST /consultorios".into())?;
    let mut all = b.consultorios.lock().unwrap();
    payload.id = Some(all.len() as i64 + 1);
    all.push(payload.clone());
    Ok(Json(payload))
}

async fn update_consultorio(
    State(b): State<Shared>,
    Path(id): Path<i64>,
    Json(mut payload): Json<Consultorio>,
) -> Result<Json<Consultorio>, StatusCode> {
    b.hit(format!("PUT /consultorios/{}", id))?;
    payload.id = Some(id);
    Ok(Json(payload))
}

async fn delete_consultorio(
    State(b): State<Shared>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    b.hit(format!("DELETE /consultorios/{}", id))?;
    b.consultorios.lock().unwrap().retain(|c| c.id != Some(id));
    Ok(StatusCode::NO_CONTENT)
}

async fn list_usuarios(
    State(b): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Usuario>>, StatusCode> {
    b.hit("GET /usuarios".into())?;
    b.usuario_queries.lock().unwrap().push(query.clone());
    let all = b.usuarios.lock().unwrap().clone();
    let scoped = match query.get("consultorioId").and_then(|v| v.parse::<i64>().ok()) {
        Some(id) => all.into_iter().filter(|u| u.belongs_to(id)).collect(),
        None => all,
    };
    Ok(Json(scoped))
}

async fn not_json() -> &'static str {
    "ok"
}

async fn spawn_backend(backend: Shared) -> HttpClient {
    let app = Router::new()
        .route("/consultorios", get(list_consultorios).post(create_consultorio))
        .route(
            "/consultorios/:id",
            axum::routing::put(update_consultorio).delete(delete_consultorio),
        )
        .route("/usuarios", get(list_usuarios))
        .route("/broken/consultorios", get(not_json))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    HttpClient::new(&ClientConfig::new(format!("http://{}", addr))).unwrap()
}

fn consultorio(nome: &str) -> Consultorio {
    Consultorio {
        id: None,
        nome: nome.into(),
        cnpj: "12.345.678/0001-90".into(),
        endereco: Endereco {
            rua: "Rua XV".into(),
            numero: "100".into(),
            bairro: "Centro".into(),
            cidade: "Curitiba".into(),
            estado: "PR".into(),
            cep: "80020-310".into(),
            ..Default::default()
        },
        contato: Contato {
            telefone: "(41) 3333-4444".into(),
            email: "contato@clinica.com".into(),
            ..Default::default()
        },
    }
}

fn usuario(id: i64, consultorio_id: i64) -> Usuario {
    Usuario {
        id: Some(id),
        email: format!("u{}@clinica.com", id),
        senha: "segredo".into(),
        papel: Papel::Profissional,
        consultorio: Consultorio {
            id: Some(consultorio_id),
            ..consultorio("Dona")
        },
        pessoa: Pessoa {
            nome: format!("Pessoa {}", id),
            cpf_cnpj: "123.456.789-01".into(),
            data_nascimento: "1985-05-20".into(),
            ..Default::default()
        },
    }
}

#[tokio::test]
async fn create_posts_json_and_returns_server_copy() {
    let backend = Shared::default();
    let client = spawn_backend(backend.clone()).await;

    let created = ConsultorioApi::create(&client, &consultorio("Clínica Sul"))
        .await
        .unwrap();

    assert_eq!(created.id, Some(1));
    assert_eq!(created.nome, "Clínica Sul");
    assert_eq!(*backend.requests.lock().unwrap(), vec!["POST /consultorios"]);
}

#[tokio::test]
async fn update_targets_item_path() {
    let backend = Shared::default();
    let client = spawn_backend(backend.clone()).await;

    let updated = ConsultorioApi::update(&client, 9, &consultorio("Nova"))
        .await
        .unwrap();

    assert_eq!(updated.id, Some(9));
    assert_eq!(*backend.requests.lock().unwrap(), vec!["PUT /consultorios/9"]);
}

#[tokio::test]
async fn delete_returns_no_payload() {
    let backend = Shared::default();
    backend.consultorios.lock().unwrap().push(Consultorio {
        id: Some(4),
        ..consultorio("Antiga")
    });
    let client = spawn_backend(backend.clone()).await;

    ConsultorioApi::delete(&client, 4).await.unwrap();

    assert!(backend.consultorios.lock().unwrap().is_empty());
}

#[tokio::test]
async fn non_success_status_becomes_request_failed() {
    let backend = Shared::default();
    *backend.fail_with.lock().unwrap() = Some(StatusCode::INTERNAL_SERVER_ERROR);
    let client = spawn_backend(backend.clone()).await;

    let err = ConsultorioApi::list_all(&client).await.unwrap_err();

    assert_eq!(err.resource, Resource::Consultorio);
    assert_eq!(err.operation, Operation::List);
    assert_eq!(err.http_status(), Some(500));
    assert_eq!(err.localized(), "Falha ao buscar consultórios");
}

#[tokio::test]
async fn client_errors_are_not_distinguished_from_server_errors() {
    let backend = Shared::default();
    *backend.fail_with.lock().unwrap() = Some(StatusCode::UNPROCESSABLE_ENTITY);
    let client = spawn_backend(backend.clone()).await;

    let err = ConsultorioApi::delete(&client, 1).await.unwrap_err();

    assert_eq!(err.operation, Operation::Delete);
    assert_eq!(err.reason, FailureReason::Status(422));
}

#[tokio::test]
async fn scoped_listing_sends_consultorio_query() {
    let backend = Shared::default();
    backend
        .usuarios
        .lock()
        .unwrap()
        .extend([usuario(1, 10), usuario(2, 20), usuario(3, 10)]);
    let client = spawn_backend(backend.clone()).await;

    let scoped = client.list_by_consultorio(10).await.unwrap();
    let all = UsuarioApi::list_all(&client).await.unwrap();

    assert_eq!(
        scoped.iter().map(|u| u.id).collect::<Vec<_>>(),
        vec![Some(1), Some(3)]
    );
    assert_eq!(all.len(), 3);

    let queries = backend.usuario_queries.lock().unwrap();
    assert_eq!(queries[0].get("consultorioId").map(String::as_str), Some("10"));
    assert!(queries[1].is_empty());
}

#[tokio::test]
async fn undecodable_body_is_a_request_failure() {
    let backend = Shared::default();
    let client = spawn_backend(backend).await;
    let broken = HttpClient::new(&ClientConfig::new(format!("{}/broken", client.base_url())))
        .unwrap();

    let err = ConsultorioApi::list_all(&broken).await.unwrap_err();

    assert!(matches!(err.reason, FailureReason::Decode(_)));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpClient::new(&ClientConfig::new(format!("http://{}", addr))).unwrap();
    let err = UsuarioApi::create(&client, &usuario(1, 1)).await.unwrap_err();

    assert_eq!(err.resource, Resource::Usuario);
    assert_eq!(err.operation, Operation::Create);
    assert!(matches!(err.reason, FailureReason::Transport(_)));
}
