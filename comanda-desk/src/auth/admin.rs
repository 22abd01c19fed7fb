//! 管理员账号管理
//!
//! 所有特权操作先检查当前身份：未登录 → `Unauthenticated`，
//! 非管理员 → `PermissionDenied`。

use super::{IdentityProvider, Principal};
use crate::orders::{OrderError, OrderResult};
use crate::store::{Collection, CollectionPath, CollectionStore, Fields};
use crate::utils::validation::{MAX_EMAIL_LEN, MAX_PASSWORD_LEN, validate_required_text};
use serde_json::Value;
use shared::models::{AccountRecord, DEFAULT_ACCOUNT_ROLE};
use shared::order::DateValue;
use std::sync::Arc;

/// Privileged account operations
#[derive(Clone)]
pub struct AdminService {
    identity: Arc<dyn IdentityProvider>,
    accounts: Collection<AccountRecord>,
}

impl AdminService {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn CollectionStore>) -> Self {
        Self {
            identity,
            accounts: Collection::new(store, CollectionPath::accounts()),
        }
    }

    async fn require_admin(&self, action: &str) -> OrderResult<Principal> {
        let Some(principal) = self.identity.current_principal().await else {
            tracing::warn!(action, "Admin action without a signed-in principal");
            return Err(OrderError::Unauthenticated);
        };
        if !principal.is_admin {
            tracing::warn!(uid = %principal.uid, action, "Admin action denied");
            return Err(OrderError::PermissionDenied(format!(
                "{} requires an administrator",
                action
            )));
        }
        Ok(principal)
    }

    /// Create a login account and its `users/{uid}` record
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        is_admin: bool,
    ) -> OrderResult<AccountRecord> {
        let admin = self.require_admin("create_user").await?;
        validate_required_text(email, "email", MAX_EMAIL_LEN)?;
        validate_required_text(password, "password", MAX_PASSWORD_LEN)?;

        let uid = self.identity.create_account(email, password).await?;
        if is_admin {
            self.identity.set_admin_claim(&uid, true).await?;
        }

        let record = AccountRecord {
            id: Some(uid.clone()),
            email: email.trim().to_lowercase(),
            is_admin,
            projects: Vec::new(),
            role: None,
            created_at: Some(DateValue::now()),
        };
        self.accounts.set(&uid, &record).await?;

        tracing::info!(by = %admin.uid, uid = %uid, is_admin, "User created");
        Ok(record)
    }

    /// Set the admin claim and mirror it in the account record
    pub async fn grant_admin(&self, uid: &str) -> OrderResult<()> {
        let admin = self.require_admin("grant_admin").await?;
        self.existing(uid).await?;

        self.identity.set_admin_claim(uid, true).await?;
        let mut partial = Fields::new();
        partial.insert("isAdmin".to_string(), Value::Bool(true));
        self.accounts.update(uid, partial).await?;

        tracing::info!(by = %admin.uid, uid = %uid, "Admin granted");
        Ok(())
    }

    /// Replace the restaurants an account may operate
    pub async fn assign_projects(&self, uid: &str, restaurant_ids: &[String]) -> OrderResult<()> {
        let admin = self.require_admin("assign_projects").await?;
        self.existing(uid).await?;

        let mut partial = Fields::new();
        partial.insert("projects".to_string(), Value::from(restaurant_ids.to_vec()));
        self.accounts.update(uid, partial).await?;

        tracing::info!(
            by = %admin.uid,
            uid = %uid,
            projects = restaurant_ids.len(),
            "Projects assigned"
        );
        Ok(())
    }

    pub async fn account(&self, uid: &str) -> OrderResult<Option<AccountRecord>> {
        Ok(self.accounts.get(uid).await?)
    }

    pub async fn list_accounts(&self) -> OrderResult<Vec<AccountRecord>> {
        self.require_admin("list_accounts").await?;
        Ok(self.accounts.list().await?)
    }

    async fn existing(&self, uid: &str) -> OrderResult<AccountRecord> {
        self.accounts
            .get(uid)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("account {}", uid)))
    }
}

/// Create `users/{uid}` for a freshly signed-in principal if it is missing
///
/// Not privileged; never overwrites an existing record.
pub async fn ensure_account_record(
    store: Arc<dyn CollectionStore>,
    principal: &Principal,
) -> OrderResult<AccountRecord> {
    let accounts: Collection<AccountRecord> = Collection::new(store, CollectionPath::accounts());
    if let Some(existing) = accounts.get(&principal.uid).await? {
        return Ok(existing);
    }

    let record = AccountRecord {
        id: Some(principal.uid.clone()),
        email: principal.email.clone(),
        is_admin: principal.is_admin,
        projects: Vec::new(),
        role: Some(DEFAULT_ACCOUNT_ROLE.to_string()),
        created_at: Some(DateValue::now()),
    };
    accounts.set(&principal.uid, &record).await?;
    tracing::info!(uid = %principal.uid, "Account record created");
    Ok(record)
}
