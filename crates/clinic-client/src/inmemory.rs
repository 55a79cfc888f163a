//! In-process stub backend.
//!
//! Behaves like the REST backend (server-assigned ids, 404 for unknown ids,
//! server-side scoping) and records every call so tests can assert on the
//! exact traffic a controller produced.

use crate::error::RequestFailed;
use crate::{ConsultorioApi, Operation, Resource, Result, UsuarioApi};
use async_trait::async_trait;
use clinic_types::{Consultorio, Usuario};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One call received by the stub backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub resource: Resource,
    pub operation: Operation,
    /// Target id for update/delete.
    pub id: Option<i64>,
    /// Consultório id for server-scoped listings.
    pub scope: Option<i64>,
}

#[derive(Default)]
struct Store {
    consultorios: BTreeMap<i64, Consultorio>,
    usuarios: BTreeMap<i64, Usuario>,
    last_id: i64,
    calls: Vec<RecordedCall>,
    fail_next: Option<u16>,
    fail_always: Option<u16>,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn reserve(&mut self, id: i64) {
        self.last_id = self.last_id.max(id);
    }

    /// Record the call and report whether it should fail, and with which status.
    fn record(&mut self, call: RecordedCall) -> std::result::Result<(), RequestFailed> {
        let (resource, operation) = (call.resource, call.operation);
        self.calls.push(call);

        if let Some(status) = self.fail_next.take().or(self.fail_always) {
            return Err(RequestFailed::status(resource, operation, status));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryClient {
    store: Mutex<Store>,
}

impl InMemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a consultório directly, without recording a call.
    /// Assigns an id when the record has none.
    pub fn seed_consultorio(&self, mut consultorio: Consultorio) -> Consultorio {
        let mut store = self.lock();
        let id = match consultorio.id {
            Some(id) => {
                store.reserve(id);
                id
            }
            None => store.next_id(),
        };
        consultorio.id = Some(id);
        store.consultorios.insert(id, consultorio.clone());
        consultorio
    }

    /// Insert a usuário directly, without recording a call.
    pub fn seed_usuario(&self, mut usuario: Usuario) -> Usuario {
        let mut store = self.lock();
        let id = match usuario.id {
            Some(id) => {
                store.reserve(id);
                id
            }
            None => store.next_id(),
        };
        usuario.id = Some(id);
        store.usuarios.insert(id, usuario.clone());
        usuario
    }

    pub fn consultorios(&self) -> Vec<Consultorio> {
        self.lock().consultorios.values().cloned().collect()
    }

    pub fn usuarios(&self) -> Vec<Usuario> {
        self.lock().usuarios.values().cloned().collect()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Number of recorded calls matching `resource` and `operation`.
    pub fn count(&self, resource: Resource, operation: Operation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.resource == resource && c.operation == operation)
            .count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Answer the next call with `status` instead of serving it.
    pub fn fail_next(&self, status: u16) {
        self.lock().fail_next = Some(status);
    }

    /// Answer every call with `status` until reset with `None`.
    pub fn fail_always(&self, status: Option<u16>) {
        self.lock().fail_always = status;
    }
}

fn call(resource: Resource, operation: Operation) -> RecordedCall {
    RecordedCall {
        resource,
        operation,
        id: None,
        scope: None,
    }
}

#[async_trait]
impl ConsultorioApi for InMemoryClient {
    async fn list_all(&self) -> Result<Vec<Consultorio>> {
        let mut store = self.lock();
        store.record(call(Resource::Consultorio, Operation::List))?;
        Ok(store.consultorios.values().cloned().collect())
    }

    async fn create(&self, payload: &Consultorio) -> Result<Consultorio> {
        let mut store = self.lock();
        store.record(call(Resource::Consultorio, Operation::Create))?;

        let mut created = payload.clone();
        let id = store.next_id();
        created.id = Some(id);
        store.consultorios.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, payload: &Consultorio) -> Result<Consultorio> {
        let mut store = self.lock();
        store.record(RecordedCall {
            id: Some(id),
            ..call(Resource::Consultorio, Operation::Update)
        })?;

        if !store.consultorios.contains_key(&id) {
            return Err(RequestFailed::status(
                Resource::Consultorio,
                Operation::Update,
                404,
            ));
        }
        let mut updated = payload.clone();
        updated.id = Some(id);
        store.consultorios.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut store = self.lock();
        store.record(RecordedCall {
            id: Some(id),
            ..call(Resource::Consultorio, Operation::Delete)
        })?;

        store
            .consultorios
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RequestFailed::status(Resource::Consultorio, Operation::Delete, 404))
    }
}

#[async_trait]
impl UsuarioApi for InMemoryClient {
    async fn list_all(&self) -> Result<Vec<Usuario>> {
        let mut store = self.lock();
        store.record(call(Resource::Usuario, Operation::List))?;
        Ok(store.usuarios.values().cloned().collect())
    }

    async fn list_by_consultorio(&self, consultorio_id: i64) -> Result<Vec<Usuario>> {
        let mut store = self.lock();
        store.record(RecordedCall {
            scope: Some(consultorio_id),
            ..call(Resource::Usuario, Operation::List)
        })?;
        Ok(store
            .usuarios
            .values()
            .filter(|u| u.belongs_to(consultorio_id))
            .cloned()
            .collect())
    }

    async fn create(&self, payload: &Usuario) -> Result<Usuario> {
        let mut store = self.lock();
        store.record(call(Resource::Usuario, Operation::Create))?;

        let mut created = payload.clone();
        let id = store.next_id();
        created.id = Some(id);
        store.usuarios.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, payload: &Usuario) -> Result<Usuario> {
        let mut store = self.lock();
        store.record(RecordedCall {
            id: Some(id),
            ..call(Resource::Usuario, Operation::Update)
        })?;

        if !store.usuarios.contains_key(&id) {
            return Err(RequestFailed::status(Resource::Usuario, Operation::Update, 404));
        }
        let mut updated = payload.clone();
        updated.id = Some(id);
        store.usuarios.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut store = self.lock();
        store.record(RecordedCall {
            id: Some(id),
            ..call(Resource::Usuario, Operation::Delete)
        })?;

        store
            .usuarios
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RequestFailed::status(Resource::Usuario, Operation::Delete, 404))
    }
}
