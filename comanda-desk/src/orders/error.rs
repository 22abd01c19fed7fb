use crate::orders::money;
use crate::store::StoreError;
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::order::OrderStatus;
use thiserror::Error;

/// Order desk errors
///
/// Every operation reports one of these to the caller; nothing is retried.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidTransition {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("Insufficient cash: total {total}, received {received}, missing {deficit}")]
    InsufficientCash {
        total: Decimal,
        received: Decimal,
        deficit: Decimal,
    },

    #[error("Order has no products")]
    EmptyOrder,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(String),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account already exists: {0}")]
    AccountExists(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Store(#[source] StoreError),

    #[error("Decode error: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl OrderError {
    pub fn validation(msg: impl Into<String>) -> Self {
        OrderError::Validation(msg.into())
    }
}

impl From<StoreError> for OrderError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { path, id } => OrderError::NotFound(format!("{}/{}", path, id)),
            StoreError::Serialization(e) => OrderError::Decode(e),
            other => OrderError::Store(other),
        }
    }
}

/// 将存储错误转换为错误码
fn classify_store_error(e: &StoreError) -> ErrorCode {
    // redb 错误通过字符串匹配分类
    let err_str = e.to_string().to_lowercase();
    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return ErrorCode::StorageCorrupted;
    }
    ErrorCode::DatabaseError
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::InvalidTransition { order_id, from, to } => {
                let code = match from {
                    OrderStatus::Completada => ErrorCode::OrderAlreadyCompleted,
                    OrderStatus::Cancelada => ErrorCode::OrderAlreadyCancelled,
                    _ => ErrorCode::InvalidTransition,
                };
                AppError::with_message(
                    code,
                    format!("Order {} cannot move from {} to {}", order_id, from, to),
                )
                .with_detail("order_id", order_id)
                .with_detail("from", from.as_str())
                .with_detail("to", to.as_str())
            }
            OrderError::InsufficientCash {
                total,
                received,
                deficit,
            } => AppError::new(ErrorCode::PaymentInsufficientAmount)
                .with_detail("total", money::to_f64(total))
                .with_detail("received", money::to_f64(received))
                .with_detail("deficit", money::to_f64(deficit)),
            OrderError::EmptyOrder => AppError::new(ErrorCode::OrderEmpty),
            OrderError::NotFound(what) => AppError::not_found(what),
            OrderError::OrderNotFound(id) => {
                AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", id)
            }
            OrderError::RestaurantNotFound(id) => {
                AppError::new(ErrorCode::RestaurantNotFound).with_detail("restaurant", id)
            }
            OrderError::Unauthenticated => AppError::not_authenticated(),
            OrderError::InvalidCredentials => AppError::invalid_credentials(),
            OrderError::AccountExists(email) => {
                AppError::new(ErrorCode::AccountExists).with_detail("email", email)
            }
            OrderError::PermissionDenied(msg) => AppError::permission_denied(msg),
            OrderError::Validation(msg) => AppError::validation(msg),
            OrderError::Store(e) => {
                tracing::error!(error = %e, "Store error");
                AppError::with_message(classify_store_error(&e), e.to_string())
            }
            OrderError::Decode(e) => AppError::with_message(ErrorCode::DecodeError, e.to_string()),
            OrderError::Internal(msg) => AppError::internal(msg),
        }
    }
}

pub type OrderResult<T> = Result<T, OrderError>;
