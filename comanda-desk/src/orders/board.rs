//! Operator views over an order snapshot
//!
//! Kitchen board, history and cashier queue, plus waiting-time helpers.
//! All views sort oldest first; orders without a parseable date sort last.

use super::state_machine::{OrderView, classify};
use crate::utils::time::minutes_between;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use shared::order::{Order, OrderStatus};
use std::cmp::Ordering;

/// Default minutes after which a non-terminal order counts as delayed
pub const DEFAULT_DELAY_THRESHOLD_MINUTES: i64 = 10;

fn oldest_first(tz: Tz) -> impl Fn(&Order, &Order) -> Ordering {
    move |a, b| match (a.created_at(tz), b.created_at(tz)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn sorted_view(orders: &[Order], tz: Tz, keep: impl Fn(&Order) -> bool) -> Vec<Order> {
    let mut view: Vec<Order> = orders.iter().filter(|o| keep(o)).cloned().collect();
    view.sort_by(oldest_first(tz));
    view
}

/// Orders the kitchen is working on
pub fn kitchen_board(orders: &[Order], tz: Tz) -> Vec<Order> {
    sorted_view(orders, tz, |o| classify(o) == OrderView::Active)
}

/// Orders waiting at the cashier, cancelled or done
pub fn history(orders: &[Order], tz: Tz) -> Vec<Order> {
    sorted_view(orders, tz, |o| classify(o) == OrderView::BillingOrHistory)
}

/// Orders waiting for payment
pub fn billing_queue(orders: &[Order], tz: Tz) -> Vec<Order> {
    sorted_view(orders, tz, |o| o.status == OrderStatus::PorCobrar)
}

/// Whole minutes since the order was placed (`None` without a date)
pub fn minutes_waiting(order: &Order, now: DateTime<Utc>, tz: Tz) -> Option<i64> {
    order.created_at(tz).map(|created| minutes_between(created, now))
}

pub fn is_delayed(order: &Order, now: DateTime<Utc>, tz: Tz, threshold_minutes: i64) -> bool {
    !order.is_terminal()
        && minutes_waiting(order, now, tz).is_some_and(|m| m >= threshold_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal::Decimal;
    use shared::order::DateValue;

    fn order(id: &str, status: OrderStatus, date: Option<DateTime<Utc>>) -> Order {
        Order {
            id: Some(id.into()),
            name: id.into(),
            notes: None,
            payment_method: None,
            order_type: None,
            address: None,
            status,
            date: date.map(DateValue::from_instant),
            products: vec![],
            total: Decimal::ZERO,
        }
    }

    fn ids(orders: &[Order]) -> Vec<&str> {
        orders.iter().map(|o| o.id_str()).collect()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 14, 0, 0).unwrap()
    }

    #[test]
    fn test_views_partition_and_sort() {
        let orders = vec![
            order("c", OrderStatus::EnProceso, Some(now() - Duration::minutes(5))),
            order("a", OrderStatus::Pendiente, Some(now() - Duration::minutes(30))),
            order("x", OrderStatus::PorCobrar, Some(now() - Duration::minutes(1))),
            order("w", OrderStatus::PorCobrar, Some(now() - Duration::minutes(50))),
            order("z", OrderStatus::Cancelada, None),
            order("b", OrderStatus::EnCamino, None),
        ];

        assert_eq!(ids(&kitchen_board(&orders, Tz::UTC)), vec!["a", "c", "b"]);
        assert_eq!(ids(&history(&orders, Tz::UTC)), vec!["w", "x", "z"]);
        assert_eq!(ids(&billing_queue(&orders, Tz::UTC)), vec!["w", "x"]);
    }

    #[test]
    fn test_delay_threshold() {
        let fresh = order("a", OrderStatus::Pendiente, Some(now() - Duration::minutes(9)));
        let late = order("b", OrderStatus::EnProceso, Some(now() - Duration::minutes(10)));
        let done = order("c", OrderStatus::Cancelada, Some(now() - Duration::minutes(90)));
        let undated = order("d", OrderStatus::Pendiente, None);

        let t = DEFAULT_DELAY_THRESHOLD_MINUTES;
        assert_eq!(minutes_waiting(&fresh, now(), Tz::UTC), Some(9));
        assert!(!is_delayed(&fresh, now(), Tz::UTC, t));
        assert!(is_delayed(&late, now(), Tz::UTC, t));
        assert!(!is_delayed(&done, now(), Tz::UTC, t));
        assert!(!is_delayed(&undated, now(), Tz::UTC, t));
    }
}
