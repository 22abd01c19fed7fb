//! 认证与管理员操作
//!
//! - [`IdentityProvider`] - 身份服务协作者 (账号、密码、管理员声明)
//! - [`MemoryIdentity`] - 进程内实现，密码使用 Argon2 哈希
//! - [`AdminService`] - 仅管理员可执行的账号管理操作

mod admin;
mod memory;

pub use admin::{AdminService, ensure_account_record};
pub use memory::MemoryIdentity;

use crate::orders::OrderResult;
use async_trait::async_trait;

/// 当前登录的身份
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub uid: String,
    pub email: String,
    /// 管理员声明
    pub is_admin: bool,
}

/// Identity service collaborator
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Signed-in principal, if any
    async fn current_principal(&self) -> Option<Principal>;

    /// Register a new account, returning its uid
    async fn create_account(&self, email: &str, password: &str) -> OrderResult<String>;

    /// Set or clear the admin claim
    async fn set_admin_claim(&self, uid: &str, is_admin: bool) -> OrderResult<()>;

    /// Check an email/password pair
    async fn verify_credentials(&self, email: &str, password: &str) -> OrderResult<Principal>;
}

/// Hash password using argon2
pub(crate) fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

/// Verify password using argon2
pub(crate) fn verify_password(
    password: &str,
    hash: &str,
) -> Result<bool, argon2::password_hash::Error> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHash, PasswordVerifier},
    };

    let parsed_hash = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
