//! Sales analytics over settled orders
//!
//! [`compute`] is a pure function of the loaded orders, the period and the
//! clock. It aggregates whatever is in memory; there is no server-side
//! query. [`AnalyticsWatcher`] re-runs it on every `orderssuccess`
//! snapshot.
//!
//! Every calendar bucket (day, month, year, hour) is taken in the business
//! timezone.

mod watcher;

pub use watcher::AnalyticsWatcher;

use crate::orders::money::{round_money, to_f64};
use crate::utils::time;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::order::{Order, OrderStatus};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Entries kept in the top-product rankings
pub const TOP_PRODUCTS_LIMIT: usize = 5;

/// Label for orders without a payment method
pub const UNKNOWN_PAYMENT_METHOD: &str = "desconocido";
/// Label for orders without an order type
pub const UNSPECIFIED_ORDER_TYPE: &str = "no especificado";

/// Reporting window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Day,
    /// Rolling: the last 7 × 24 hours
    Week,
    Month,
    Year,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            other => Err(format!("unknown period: {}", other)),
        }
    }
}

/// Revenue of one local calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenuePoint {
    /// `YYYY-MM-DD`
    pub date: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductQuantity {
    pub name: String,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRevenue {
    pub name: String,
    pub revenue: Decimal,
}

/// One bucket of a categorical distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Share {
    pub name: String,
    pub value: usize,
}

/// Orders placed within one local hour of the day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourCount {
    /// `HH:00`
    pub time: String,
    pub orders: usize,
}

/// Dashboard figures for one period
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub period: Period,
    pub revenue: Decimal,
    pub orders: usize,
    /// Distinct customer names
    pub users: usize,
    pub ticket_avg: Decimal,
    pub delivered: usize,
    pub cancelled: usize,
    /// Delivered share of orders, in percent
    pub growth: Decimal,
    pub revenue_chart: Vec<RevenuePoint>,
    pub top_products: Vec<ProductQuantity>,
    pub top_products_by_revenue: Vec<ProductRevenue>,
    pub payment_methods: Vec<Share>,
    pub order_types: Vec<Share>,
    pub peak_hours: Vec<HourCount>,
}

/// Whether `date` falls inside `period` as seen at `now`
pub fn is_in_period(date: DateTime<Utc>, period: Period, now: DateTime<Utc>, tz: Tz) -> bool {
    match period {
        Period::Day => time::local_date(date, tz) == time::local_date(now, tz),
        Period::Week => date >= now - Duration::days(7),
        Period::Month => time::same_month(date, now, tz),
        Period::Year => time::same_year(date, now, tz),
    }
}

/// Aggregate `orders` for `period`
///
/// Orders without a parseable date are left out.
pub fn compute(orders: &[Order], period: Period, now: DateTime<Utc>, tz: Tz) -> AnalyticsReport {
    let in_period: Vec<(&Order, DateTime<Utc>)> = orders
        .iter()
        .filter_map(|order| order.created_at(tz).map(|at| (order, at)))
        .filter(|(_, at)| is_in_period(*at, period, now, tz))
        .collect();

    let count = in_period.len();
    // 存量文档未经校验，金额饱和累加
    let revenue = round_money(
        in_period
            .iter()
            .fold(Decimal::ZERO, |acc, (o, _)| acc.saturating_add(o.total)),
    );
    let users = in_period
        .iter()
        .map(|(o, _)| o.name.as_str())
        .collect::<HashSet<_>>()
        .len();
    let delivered = in_period
        .iter()
        .filter(|(o, _)| o.status == OrderStatus::Completada)
        .count();
    let cancelled = in_period
        .iter()
        .filter(|(o, _)| o.status == OrderStatus::Cancelada)
        .count();

    let (ticket_avg, growth) = if count == 0 {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        let n = Decimal::from(count);
        (
            round_money(revenue / n),
            round_money(Decimal::from(delivered) * Decimal::ONE_HUNDRED / n),
        )
    };

    let mut revenue_by_day: IndexMap<String, Decimal> = IndexMap::new();
    let mut orders_by_hour: IndexMap<String, usize> = IndexMap::new();
    let mut payment_methods: IndexMap<String, usize> = IndexMap::new();
    let mut order_types: IndexMap<String, usize> = IndexMap::new();
    let mut product_quantity: IndexMap<String, u64> = IndexMap::new();
    let mut product_revenue: IndexMap<String, Decimal> = IndexMap::new();

    for (order, at) in &in_period {
        let day = revenue_by_day
            .entry(time::date_key(*at, tz))
            .or_default();
        *day = day.saturating_add(order.total);
        *orders_by_hour.entry(time::hour_key(*at, tz)).or_default() += 1;

        let method = order
            .payment_method
            .as_ref()
            .filter(|m| !m.is_empty())
            .map_or(UNKNOWN_PAYMENT_METHOD, |m| m.as_str());
        *payment_methods.entry(method.to_string()).or_default() += 1;

        let order_type = order
            .order_type
            .map_or(UNSPECIFIED_ORDER_TYPE, |t| t.as_str());
        *order_types.entry(order_type.to_string()).or_default() += 1;

        for item in &order.products {
            // 数量为 0 时按 1 计
            let quantity = item.quantity.max(1);
            *product_quantity
                .entry(item.product_name.clone())
                .or_default() += u64::from(quantity);
            let line = item.price.saturating_mul(Decimal::from(quantity));
            let product_total = product_revenue
                .entry(item.product_name.clone())
                .or_default();
            *product_total = product_total.saturating_add(line);
        }
    }

    revenue_by_day.sort_keys();
    orders_by_hour.sort_keys();

    let mut top_products: Vec<ProductQuantity> = product_quantity
        .into_iter()
        .map(|(name, quantity)| ProductQuantity { name, quantity })
        .collect();
    top_products.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    top_products.truncate(TOP_PRODUCTS_LIMIT);

    let mut top_products_by_revenue: Vec<ProductRevenue> = product_revenue
        .into_iter()
        .map(|(name, revenue)| ProductRevenue {
            name,
            revenue: round_money(revenue),
        })
        .collect();
    top_products_by_revenue.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    top_products_by_revenue.truncate(TOP_PRODUCTS_LIMIT);

    tracing::debug!(
        period = %period,
        loaded = orders.len(),
        in_period = count,
        revenue = to_f64(revenue),
        "Analytics computed"
    );

    AnalyticsReport {
        period,
        revenue,
        orders: count,
        users,
        ticket_avg,
        delivered,
        cancelled,
        growth,
        revenue_chart: revenue_by_day
            .into_iter()
            .map(|(date, total)| RevenuePoint {
                date,
                total: round_money(total),
            })
            .collect(),
        top_products,
        top_products_by_revenue,
        payment_methods: into_shares(payment_methods),
        order_types: into_shares(order_types),
        peak_hours: orders_by_hour
            .into_iter()
            .map(|(time, orders)| HourCount { time, orders })
            .collect(),
    }
}

fn into_shares(counts: IndexMap<String, usize>) -> Vec<Share> {
    counts
        .into_iter()
        .map(|(name, value)| Share { name, value })
        .collect()
}

#[cfg(test)]
mod tests;
