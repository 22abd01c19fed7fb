//! Order document model
//!
//! - [`Order`] / [`OrderProduct`] / [`OrderAddition`]: the stored document shape
//! - [`OrderStatus`]: lifecycle status (`state` on the wire)
//! - [`PaymentMethod`]: normalized payment label
//! - [`DateValue`]: loose creation date, resolved with [`DateValue::to_instant`]

pub mod date;
pub mod payment;
pub mod serde_helpers;
pub mod status;
pub mod types;

pub use date::{DateValue, Timestamp};
pub use payment::PaymentMethod;
pub use status::OrderStatus;
pub use types::{Order, OrderAddition, OrderProduct, OrderType};
