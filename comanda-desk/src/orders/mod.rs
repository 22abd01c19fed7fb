//! Order lifecycle module
//!
//! - **manager**: `OrdersManager`, the entry point for every order operation
//! - **state_machine**: status transitions and view classification
//! - **checkout**: settlement into `orderssuccess`
//! - **money**: totals, cash checks, line-item validation
//! - **board**: kitchen / cashier views and delay flags
//! - **feed**: new-order alerts
//!
//! # Architecture
//!
//! ```text
//! OrderDraft → OrdersManager → CollectionStore (orders)
//!                   │                 │
//!                   │            Subscription ─► NewOrderDetector ─► alerts
//!                   ↓
//!               finalize ─► transfer orders/{id} → orderssuccess/{id}
//! ```

pub mod board;
pub mod checkout;
pub mod error;
pub mod feed;
pub mod intake;
pub mod manager;
pub mod money;
pub mod state_machine;

// Re-exports
pub use checkout::{Settlement, Tender};
pub use error::{OrderError, OrderResult};
pub use feed::{NewOrderAlert, NewOrderDetector};
pub use intake::OrderDraft;
pub use manager::OrdersManager;
pub use state_machine::{OrderView, classify, transition};

pub use shared::order::{Order, OrderStatus, PaymentMethod};
