//! Programmable in-memory implementations of the domain ports, shared by the
//! orchestration and REST tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use onboarding::contract::model::{EstablishmentRecord, Identity, ValidatedSignup};
use onboarding::domain::ports::{
    EstablishmentStore, IdentityProvider, NotificationSink, ProviderError, SignupEvent,
};

/// Identity provider fake. Records created and deleted identities and can be
/// programmed to fail either operation.
#[derive(Default)]
pub struct FakeIdentityProvider {
    counter: AtomicUsize,
    pub created: Mutex<Vec<Identity>>,
    pub deleted: Mutex<Vec<String>>,
    pub create_error: Mutex<Option<ProviderError>>,
    pub delete_fails: AtomicBool,
}

impl FakeIdentityProvider {
    pub fn failing_create(error: ProviderError) -> Self {
        let provider = Self::default();
        *provider.create_error.lock().unwrap() = Some(error);
        provider
    }

    pub fn fail_deletes(&self) {
        self.delete_fails.store(true, Ordering::SeqCst);
    }

    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn create_identity(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<Identity, ProviderError> {
        if let Some(e) = self.create_error.lock().unwrap().clone() {
            return Err(e);
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let identity = Identity {
            id: format!("ident-{n}"),
            email: email.to_string(),
        };
        self.created.lock().unwrap().push(identity.clone());
        Ok(identity)
    }

    async fn delete_identity(&self, identity_id: &str) -> Result<(), ProviderError> {
        if self.delete_fails.load(Ordering::SeqCst) {
            return Err(ProviderError::unavailable("admin endpoint down"));
        }
        self.deleted.lock().unwrap().push(identity_id.to_string());
        Ok(())
    }
}

/// Store fake backed by a Vec. Enforces the unique email constraint the way
/// the real table does, and can be programmed to fail reads or writes.
#[derive(Default)]
pub struct FakeStore {
    counter: AtomicUsize,
    pub rows: Mutex<Vec<EstablishmentRecord>>,
    pub find_error: Mutex<Option<ProviderError>>,
    pub insert_error: Mutex<Option<ProviderError>>,
}

impl FakeStore {
    pub fn with_row(email: &str) -> Self {
        let store = Self::default();
        store.rows.lock().unwrap().push(EstablishmentRecord {
            id: "1".to_string(),
            name: "Existing".to_string(),
            company: "Existing LTDA".to_string(),
            phone: "11912345678".to_string(),
            email: email.to_string(),
            identity_id: "ident-existing".to_string(),
            created_at: Utc::now(),
        });
        store
    }

    pub fn failing_insert(error: ProviderError) -> Self {
        let store = Self::default();
        *store.insert_error.lock().unwrap() = Some(error);
        store
    }

    pub fn failing_find(error: ProviderError) -> Self {
        let store = Self::default();
        *store.find_error.lock().unwrap() = Some(error);
        store
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl EstablishmentStore for FakeStore {
    async fn find_by_email(&self, email: &str) -> Result<Vec<EstablishmentRecord>, ProviderError> {
        if let Some(e) = self.find_error.lock().unwrap().clone() {
            return Err(e);
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.email == email)
            .cloned()
            .collect())
    }

    async fn insert(
        &self,
        signup: &ValidatedSignup,
        identity_id: &str,
    ) -> Result<EstablishmentRecord, ProviderError> {
        if let Some(e) = self.insert_error.lock().unwrap().clone() {
            return Err(e);
        }
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|r| r.email == signup.email) {
            return Err(ProviderError::unique_violation(
                "duplicate key value violates unique constraint",
            ));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let record = EstablishmentRecord {
            id: format!("{}", n + 100),
            name: signup.name.clone(),
            company: signup.company.clone(),
            phone: signup.phone.clone(),
            email: signup.email.clone(),
            identity_id: identity_id.to_string(),
            created_at: Utc::now(),
        };
        rows.push(record.clone());
        Ok(record)
    }
}

/// Notification sink that forwards every event into a channel so tests can
/// await the spawned dispatch.
pub struct RecordingSink {
    name: &'static str,
    tx: tokio::sync::mpsc::UnboundedSender<SignupEvent>,
}

impl RecordingSink {
    pub fn new(
        name: &'static str,
    ) -> (
        Arc<Self>,
        tokio::sync::mpsc::UnboundedReceiver<SignupEvent>,
    ) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        (Arc::new(Self { name, tx }), rx)
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn send(&self, event: &SignupEvent) -> Result<(), ProviderError> {
        let _ = self.tx.send(event.clone());
        Ok(())
    }
}

/// Notification sink that always fails.
pub struct FailingSink;

#[async_trait]
impl NotificationSink for FailingSink {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn send(&self, _event: &SignupEvent) -> Result<(), ProviderError> {
        Err(ProviderError::unavailable("destination unreachable"))
    }
}

/// A submission that passes validation.
pub fn valid_request() -> onboarding::contract::model::SignupRequest {
    onboarding::contract::model::SignupRequest {
        name: "  Padaria Central  ".to_string(),
        company: "Padaria Central LTDA".to_string(),
        phone: "(11) 91234-5678".to_string(),
        email: "Maria@Example.com ".to_string(),
        password: "secret1".to_string(),
    }
}
