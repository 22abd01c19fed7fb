//! 进程内身份服务

use super::{IdentityProvider, Principal, hash_password, verify_password};
use crate::orders::{OrderError, OrderResult};
use crate::store::new_document_id;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Account {
    email: String,
    password_hash: String,
    is_admin: bool,
}

#[derive(Debug, Default)]
struct Inner {
    /// uid → account
    accounts: HashMap<String, Account>,
    /// 当前会话 uid
    session: Option<String>,
}

/// In-process identity provider with one session slot
#[derive(Debug, Default)]
pub struct MemoryIdentity {
    inner: Mutex<Inner>,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify credentials and make the account the current principal
    pub async fn sign_in(&self, email: &str, password: &str) -> OrderResult<Principal> {
        let principal = self.verify_credentials(email, password).await?;
        self.inner.lock().session = Some(principal.uid.clone());
        tracing::info!(uid = %principal.uid, "Signed in");
        Ok(principal)
    }

    pub fn sign_out(&self) {
        if let Some(uid) = self.inner.lock().session.take() {
            tracing::info!(uid = %uid, "Signed out");
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn current_principal(&self) -> Option<Principal> {
        let inner = self.inner.lock();
        let uid = inner.session.as_ref()?;
        inner.accounts.get(uid).map(|account| Principal {
            uid: uid.clone(),
            email: account.email.clone(),
            is_admin: account.is_admin,
        })
    }

    async fn create_account(&self, email: &str, password: &str) -> OrderResult<String> {
        let email = normalize_email(email);
        let password_hash = hash_password(password).map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            OrderError::Internal(format!("password hashing failed: {}", e))
        })?;

        let mut inner = self.inner.lock();
        if inner.accounts.values().any(|a| a.email == email) {
            return Err(OrderError::AccountExists(email));
        }

        let uid = new_document_id();
        inner.accounts.insert(
            uid.clone(),
            Account {
                email,
                password_hash,
                is_admin: false,
            },
        );
        tracing::info!(uid = %uid, "Account created");
        Ok(uid)
    }

    async fn set_admin_claim(&self, uid: &str, is_admin: bool) -> OrderResult<()> {
        let mut inner = self.inner.lock();
        let account = inner
            .accounts
            .get_mut(uid)
            .ok_or_else(|| OrderError::NotFound(format!("account {}", uid)))?;
        account.is_admin = is_admin;
        tracing::info!(uid = %uid, is_admin, "Admin claim updated");
        Ok(())
    }

    async fn verify_credentials(&self, email: &str, password: &str) -> OrderResult<Principal> {
        let email = normalize_email(email);
        let found = {
            let inner = self.inner.lock();
            inner
                .accounts
                .iter()
                .find(|(_, a)| a.email == email)
                .map(|(uid, a)| (uid.clone(), a.clone()))
        };

        let Some((uid, account)) = found else {
            tracing::warn!("Sign-in with unknown email");
            return Err(OrderError::InvalidCredentials);
        };

        match verify_password(password, &account.password_hash) {
            Ok(true) => Ok(Principal {
                uid,
                email: account.email,
                is_admin: account.is_admin,
            }),
            Ok(false) => {
                tracing::warn!(uid = %uid, "Sign-in with wrong password");
                Err(OrderError::InvalidCredentials)
            }
            Err(e) => {
                tracing::error!(uid = %uid, error = %e, "Stored password hash is invalid");
                Err(OrderError::Internal(format!("invalid password hash: {}", e)))
            }
        }
    }
}
