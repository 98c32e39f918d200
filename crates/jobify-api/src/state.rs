//! # Application State
//!
//! Shared state for the Axum application, passed to handlers via the `State`
//! extractor. Users and jobs live in in-memory stores; the signing keys are
//! built once from the configured secret and never change afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use jobify_auth::{hash_password, TokenIssuer, TokenVerifier, DEMO_USER_ID};
use jobify_core::{JobStatus, JobType, RecordId, Role};
use parking_lot::RwLock;
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::AppConfig;
use crate::error::AppError;

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// The lock is `parking_lot` and is never held across an `.await`.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<RecordId, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: RecordId, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Retrieve a record by id.
    pub fn get(&self, id: &RecordId) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// First record matching `pred`.
    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.data.read().values().find(|v| pred(v)).cloned()
    }

    /// All records matching `pred`.
    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.data.read().values().filter(|v| pred(v)).cloned().collect()
    }

    /// Atomically read-validate-update a record.
    ///
    /// Returns `None` if the record doesn't exist, or `Some(result)` with the
    /// closure's `Result`. The whole operation runs under one write lock.
    pub fn try_update<R, E>(
        &self,
        id: &RecordId,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        self.data.write().get_mut(id).map(f)
    }

    /// Atomically inspect the store and insert the record `f` builds.
    ///
    /// Used where the new record depends on what is already stored (unique
    /// emails, first-account role) so two concurrent inserts cannot both pass.
    pub fn try_insert_with<E>(
        &self,
        f: impl FnOnce(&HashMap<RecordId, T>) -> Result<(RecordId, T), E>,
    ) -> Result<T, E> {
        let mut guard = self.data.write();
        let (id, value) = f(&guard)?;
        guard.insert(id, value.clone());
        Ok(value)
    }

    /// Run `f` against the whole map under one write lock.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut HashMap<RecordId, T>) -> R) -> R {
        f(&mut self.data.write())
    }

    /// Remove a record by id.
    pub fn remove(&self, id: &RecordId) -> Option<T> {
        self.data.write().remove(id)
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Records ------------------------------------------------------------------

/// Stored account. Never serialized directly; see [`PublicUser`].
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: RecordId,
    pub name: String,
    /// Lowercased and trimmed.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub last_name: String,
    pub location: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// The account as returned to clients, without the password hash.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            last_name: self.last_name.clone(),
            location: self.location.clone(),
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Account as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub last_name: String,
    pub location: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A tracked job application.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub company: String,
    pub position: String,
    pub job_status: JobStatus,
    pub job_type: JobType,
    pub job_location: String,
    /// Owning account.
    pub created_by: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// -- Application State --------------------------------------------------------

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub users: Store<UserRecord>,
    pub jobs: Store<JobRecord>,
    pub issuer: Arc<TokenIssuer>,
    pub verifier: Arc<TokenVerifier>,
    pub config: Arc<AppConfig>,
}

/// Demo account credentials shown on the landing page.
pub const DEMO_USER_EMAIL: &str = "test@test.com";
pub const DEMO_USER_PASSWORD: &str = "secret123";

impl AppState {
    /// Build state from configuration. Stores start empty.
    pub fn new(config: AppConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        let issuer = TokenIssuer::new(secret, config.token_lifetime);
        let verifier = TokenVerifier::new(secret);
        Self {
            users: Store::new(),
            jobs: Store::new(),
            issuer: Arc::new(issuer),
            verifier: Arc::new(verifier),
            config: Arc::new(config),
        }
    }

    /// Insert the read-only demo account if it is not already present.
    pub fn seed_demo_user(&self) -> Result<(), AppError> {
        let id = RecordId::parse(DEMO_USER_ID).map_err(|e| AppError::Internal(e.to_string()))?;
        if self.users.get(&id).is_some() {
            return Ok(());
        }
        let now = Utc::now();
        let record = UserRecord {
            id: id.clone(),
            name: "Zippy".to_string(),
            email: DEMO_USER_EMAIL.to_string(),
            password_hash: hash_password(DEMO_USER_PASSWORD)?,
            last_name: "ShakeAndBake".to_string(),
            location: "Codeland".to_string(),
            role: Role::User,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(id, record);
        tracing::info!(email = DEMO_USER_EMAIL, "seeded demo account");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(owner: &RecordId, status: JobStatus) -> JobRecord {
        let now = Utc::now();
        JobRecord {
            id: RecordId::generate(),
            company: "Acme".into(),
            position: "Engineer".into(),
            job_status: status,
            job_type: JobType::FullTime,
            job_location: "my city".into(),
            created_by: owner.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn store_insert_get_remove() {
        let store: Store<JobRecord> = Store::new();
        let owner = RecordId::generate();
        let record = job(&owner, JobStatus::Pending);
        let id = record.id.clone();

        assert!(store.insert(id.clone(), record).is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().company, "Acme");
        assert!(store.remove(&id).is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn store_filter_and_find() {
        let store: Store<JobRecord> = Store::new();
        let alice = RecordId::generate();
        let bob = RecordId::generate();
        for record in [
            job(&alice, JobStatus::Pending),
            job(&alice, JobStatus::Interview),
            job(&bob, JobStatus::Declined),
        ] {
            store.insert(record.id.clone(), record);
        }

        assert_eq!(store.filter(|j| j.created_by == alice).len(), 2);
        assert!(store.find(|j| j.job_status == JobStatus::Declined).is_some());
        assert!(store
            .find(|j| j.created_by == bob && j.job_status == JobStatus::Pending)
            .is_none());
    }

    #[test]
    fn store_try_update_missing_returns_none() {
        let store: Store<JobRecord> = Store::new();
        let result: Option<Result<(), ()>> = store.try_update(&RecordId::generate(), |_| Ok(()));
        assert!(result.is_none());
    }

    #[test]
    fn store_try_insert_with_can_refuse() {
        let store: Store<JobRecord> = Store::new();
        let owner = RecordId::generate();
        let first = store.try_insert_with(|existing| {
            assert!(existing.is_empty());
            let record = job(&owner, JobStatus::Pending);
            Ok::<_, &str>((record.id.clone(), record))
        });
        assert!(first.is_ok());

        let second = store.try_insert_with(|existing| {
            if existing.values().any(|j| j.created_by == owner) {
                return Err("duplicate owner");
            }
            let record = job(&owner, JobStatus::Pending);
            Ok((record.id.clone(), record))
        });
        assert_eq!(second.unwrap_err(), "duplicate owner");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn seed_demo_user_is_idempotent() {
        let state = AppState::new(AppConfig::with_secret("test"));
        state.seed_demo_user().unwrap();
        state.seed_demo_user().unwrap();
        assert_eq!(state.users.len(), 1);

        let demo = state
            .users
            .get(&RecordId::parse(DEMO_USER_ID).unwrap())
            .unwrap();
        assert_eq!(demo.email, DEMO_USER_EMAIL);
        assert_eq!(demo.role, Role::User);
    }

    #[test]
    fn seeded_demo_account_can_log_in() {
        let state = AppState::new(AppConfig::with_secret("test"));
        state.seed_demo_user().unwrap();
        let demo = state.users.find(|u| u.email == DEMO_USER_EMAIL).unwrap();
        assert_eq!(demo.id.as_str(), DEMO_USER_ID);
        assert!(jobify_auth::verify_password(DEMO_USER_PASSWORD, &demo.password_hash).unwrap());
    }

    #[test]
    fn public_user_hides_password_hash() {
        let state = AppState::new(AppConfig::with_secret("test"));
        state.seed_demo_user().unwrap();
        let demo = state
            .users
            .get(&RecordId::parse(DEMO_USER_ID).unwrap())
            .unwrap();

        let json = serde_json::to_value(demo.to_public()).unwrap();
        assert_eq!(json["_id"], DEMO_USER_ID);
        assert_eq!(json["lastName"], "ShakeAndBake");
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
    }
}
