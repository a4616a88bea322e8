//! Authentication seam.
//!
//! The assistant only sees [`AuthProvider`]. [`LocalAuthProvider`] is an in-process
//! implementation: accounts and sessions live in memory and passwords are stored as Argon2
//! hashes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use aarogya_uuid::UserId;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rand::{rngs::OsRng, RngCore};
use serde::Serialize;

use crate::constants::SESSION_TOKEN_BYTES;
use crate::{CoreError, CoreResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Session {
    pub token: String,
    pub user: AuthUser,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(AuthUser),
    SignedOut(AuthUser),
}

pub type AuthListener = Arc<dyn Fn(&AuthEvent) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Account and session operations.
pub trait AuthProvider: Send + Sync {
    /// Create an account and sign it in.
    fn sign_up(&self, email: &str, password: &str, full_name: &str) -> CoreResult<Session>;
    fn sign_in(&self, email: &str, password: &str) -> CoreResult<Session>;
    fn sign_out(&self, token: &str) -> CoreResult<()>;
    /// Remove an account and end all of its sessions.
    fn delete_account(&self, id: &UserId) -> CoreResult<()>;
    /// Look up a live session by token.
    fn session(&self, token: &str) -> Option<Session>;
    fn on_auth_change(&self, listener: AuthListener) -> ListenerId;
    /// Returns false if `id` was not registered.
    fn remove_listener(&self, id: ListenerId) -> bool;
}

struct Account {
    user: AuthUser,
    password_hash: String,
}

/// In-memory [`AuthProvider`].
#[derive(Default)]
pub struct LocalAuthProvider {
    accounts: RwLock<HashMap<String, Account>>,
    sessions: RwLock<HashMap<String, Session>>,
    listeners: RwLock<Vec<(ListenerId, AuthListener)>>,
    next_listener: AtomicU64,
}

impl LocalAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn normalise_email(email: &str) -> CoreResult<String> {
        let email = email.trim().to_lowercase();
        let valid = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid {
            return Err(CoreError::InvalidInput(format!("'{email}' is not an email address")));
        }
        Ok(email)
    }

    fn hash_password(password: &str) -> CoreResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CoreError::PasswordHash(e.to_string()))
    }

    fn verify_password(password: &str, stored: &str) -> bool {
        PasswordHash::new(stored)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    fn open_session(&self, user: AuthUser) -> Session {
        let mut bytes = [0u8; SESSION_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        let session = Session {
            token: URL_SAFE_NO_PAD.encode(bytes),
            user,
            created_at: Utc::now(),
        };
        self.sessions
            .write()
            .insert(session.token.clone(), session.clone());
        self.notify(&AuthEvent::SignedIn(session.user.clone()));
        session
    }

    fn notify(&self, event: &AuthEvent) {
        // Lock is released before any listener runs; listeners may re-enter.
        let listeners: Vec<AuthListener> = self
            .listeners
            .read()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }
}

impl AuthProvider for LocalAuthProvider {
    fn sign_up(&self, email: &str, password: &str, full_name: &str) -> CoreResult<Session> {
        let email = Self::normalise_email(email)?;
        if password.len() < 6 {
            return Err(CoreError::InvalidInput(
                "password must be at least 6 characters".into(),
            ));
        }

        let password_hash = Self::hash_password(password)?;
        let user = {
            let mut accounts = self.accounts.write();
            if accounts.contains_key(&email) {
                return Err(CoreError::EmailTaken(email));
            }
            let user = AuthUser {
                id: UserId::new(),
                email: email.clone(),
                full_name: full_name.trim().to_string(),
            };
            accounts.insert(
                email,
                Account {
                    user: user.clone(),
                    password_hash,
                },
            );
            user
        };

        tracing::info!(user_id = %user.id, "account created");
        Ok(self.open_session(user))
    }

    fn sign_in(&self, email: &str, password: &str) -> CoreResult<Session> {
        let email = email.trim().to_lowercase();
        let user = {
            let accounts = self.accounts.read();
            match accounts.get(&email) {
                Some(account) if Self::verify_password(password, &account.password_hash) => {
                    account.user.clone()
                }
                _ => {
                    tracing::warn!("failed sign-in attempt");
                    return Err(CoreError::InvalidCredentials);
                }
            }
        };
        Ok(self.open_session(user))
    }

    fn sign_out(&self, token: &str) -> CoreResult<()> {
        let session = self
            .sessions
            .write()
            .remove(token)
            .ok_or(CoreError::InvalidSession)?;
        self.notify(&AuthEvent::SignedOut(session.user));
        Ok(())
    }

    fn delete_account(&self, id: &UserId) -> CoreResult<()> {
        let user = {
            let mut accounts = self.accounts.write();
            let email = accounts
                .iter()
                .find(|(_, account)| account.user.id == *id)
                .map(|(email, _)| email.clone())
                .ok_or_else(|| CoreError::ProfileNotFound(id.to_string()))?;
            accounts.remove(&email).map(|account| account.user)
        };

        let ended = {
            let mut sessions = self.sessions.write();
            let before = sessions.len();
            sessions.retain(|_, session| session.user.id != *id);
            before != sessions.len()
        };
        if let (true, Some(user)) = (ended, user) {
            self.notify(&AuthEvent::SignedOut(user));
        }
        tracing::info!(user_id = %id, "account deleted");
        Ok(())
    }

    fn session(&self, token: &str) -> Option<Session> {
        self.sessions.read().get(token).cloned()
    }

    fn on_auth_change(&self, listener: AuthListener) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}
