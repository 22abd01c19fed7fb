//! Order status state machine
//!
//! Rules:
//! - terminal orders (`completada`, `cancelada`) accept no transition
//! - a non-terminal order may move to any non-terminal status or to
//!   `cancelada`
//! - `completada` is only reached through settlement (see `checkout`)
//! - moving to the current status is a no-op

use super::error::OrderError;
use shared::order::{Order, OrderStatus};

/// Which operator view an order belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderView {
    /// Kitchen board (pendiente, enProceso, enCamino)
    Active,
    /// Cashier queue or history (porCobrar, completada, cancelada)
    BillingOrHistory,
}

pub fn classify(order: &Order) -> OrderView {
    if order.status.is_active() {
        OrderView::Active
    } else {
        OrderView::BillingOrHistory
    }
}

pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    !from.is_terminal() && to != OrderStatus::Completada
}

/// Apply a status change, returning the updated order
///
/// The input is never mutated; on failure the caller keeps its state.
pub fn transition(order: &Order, to: OrderStatus) -> Result<Order, OrderError> {
    let from = order.status;
    if !can_transition(from, to) {
        return Err(OrderError::InvalidTransition {
            order_id: order.id_str().to_string(),
            from,
            to,
        });
    }

    let mut next = order.clone();
    next.status = to;
    Ok(next)
}
