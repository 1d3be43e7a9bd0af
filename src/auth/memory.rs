// In-memory account registry and session token store
// Same contracts as the PostgreSQL stores; used for local runs and tests

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::auth::{
    error::AuthError,
    models::{Account, SessionTokenRecord, UserId},
    repository::{AccountRegistry, SessionTokenStore},
};

#[derive(Default)]
struct AccountTable {
    rows: Vec<Account>,
    last_id: UserId,
}

/// Account registry held in process memory
///
/// Email uniqueness is enforced under the write lock, matching the
/// database's unique constraint.
#[derive(Default)]
pub struct InMemoryAccountRegistry {
    table: RwLock<AccountTable>,
}

impl InMemoryAccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

#[async_trait]
impl AccountRegistry for InMemoryAccountRegistry {
    async fn find_by_email(&self, email: &str) -> Result<Vec<Account>, AuthError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .filter(|account| account.email == email)
            .cloned()
            .collect())
    }

    async fn insert(&self, email: &str, password_hash: &str) -> Result<Option<Account>, AuthError> {
        let mut table = self.table.write().await;
        if table.rows.iter().any(|account| account.email == email) {
            return Err(AuthError::AccountExists);
        }

        table.last_id += 1;
        let account = Account {
            id: table.last_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        table.rows.push(account.clone());

        Ok(Some(account))
    }
}

/// Session token store held in process memory
#[derive(Default)]
pub struct InMemorySessionTokenStore {
    records: RwLock<HashMap<UserId, String>>,
}

impl InMemorySessionTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live record for a user, if any
    pub async fn get(&self, user_id: UserId) -> Option<SessionTokenRecord> {
        self.records
            .read()
            .await
            .get(&user_id)
            .map(|token| SessionTokenRecord {
                user_id,
                refresh_token: token.clone(),
            })
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl SessionTokenStore for InMemorySessionTokenStore {
    async fn insert(&self, record: &SessionTokenRecord) -> Result<u64, AuthError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.user_id) {
            return Ok(0);
        }
        records.insert(record.user_id, record.refresh_token.clone());
        Ok(1)
    }

    async fn update(&self, record: &SessionTokenRecord) -> Result<u64, AuthError> {
        let mut records = self.records.write().await;
        match records.get_mut(&record.user_id) {
            Some(token) => {
                *token = record.refresh_token.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn matches(&self, user_id: UserId, refresh_token: &str) -> Result<bool, AuthError> {
        let records = self.records.read().await;
        Ok(records.get(&user_id).is_some_and(|token| token == refresh_token))
    }
}
