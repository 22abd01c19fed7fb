use super::*;
use chrono::TimeZone;
use shared::order::{DateValue, OrderProduct, OrderType, PaymentMethod};

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn now() -> DateTime<Utc> {
    at(2024, 5, 17, 18)
}

fn item(name: &str, price: i64, quantity: u32) -> OrderProduct {
    OrderProduct {
        product_id: name.to_lowercase(),
        product_name: name.to_string(),
        variant_id: String::new(),
        variant_label: String::new(),
        price: Decimal::from(price),
        quantity,
        image: String::new(),
        additions: None,
        total: None,
    }
}

fn order(name: &str, date: DateTime<Utc>, status: OrderStatus, total: i64) -> Order {
    Order {
        id: None,
        name: name.to_string(),
        notes: None,
        payment_method: Some(PaymentMethod::cash()),
        order_type: Some(OrderType::Llevar),
        address: None,
        status,
        date: Some(DateValue::from_instant(date)),
        products: vec![],
        total: Decimal::from(total),
    }
}

// ========== is_in_period ==========

#[test]
fn test_day_includes_today_excludes_yesterday() {
    assert!(is_in_period(at(2024, 5, 17, 1), Period::Day, now(), Tz::UTC));
    assert!(!is_in_period(at(2024, 5, 16, 23), Period::Day, now(), Tz::UTC));
}

#[test]
fn test_day_uses_business_timezone() {
    // 2024-05-18 02:00 UTC is still the 17th in Mexico City
    let tz = chrono_tz::America::Mexico_City;
    assert!(is_in_period(at(2024, 5, 18, 2), Period::Day, now(), tz));
    assert!(!is_in_period(at(2024, 5, 18, 2), Period::Day, now(), Tz::UTC));
}

#[test]
fn test_week_is_rolling_seven_days() {
    assert!(is_in_period(at(2024, 5, 10, 18), Period::Week, now(), Tz::UTC));
    assert!(!is_in_period(at(2024, 5, 10, 17), Period::Week, now(), Tz::UTC));
}

#[test]
fn test_month_and_year() {
    assert!(is_in_period(at(2024, 5, 1, 0), Period::Month, now(), Tz::UTC));
    assert!(!is_in_period(at(2023, 5, 17, 0), Period::Month, now(), Tz::UTC));
    assert!(is_in_period(at(2024, 1, 1, 0), Period::Year, now(), Tz::UTC));
    assert!(!is_in_period(at(2023, 12, 31, 23), Period::Year, now(), Tz::UTC));
}

#[test]
fn test_period_parse() {
    assert_eq!("Week".parse::<Period>().unwrap(), Period::Week);
    assert!("quarter".parse::<Period>().is_err());
    assert_eq!(serde_json::to_string(&Period::Month).unwrap(), "\"month\"");
}

// ========== compute ==========

#[test]
fn test_empty_report() {
    let report = compute(&[], Period::Day, now(), Tz::UTC);
    assert_eq!(report.revenue, Decimal::ZERO);
    assert_eq!(report.orders, 0);
    assert_eq!(report.users, 0);
    assert_eq!(report.ticket_avg, Decimal::ZERO);
    assert_eq!(report.growth, Decimal::ZERO);
    assert!(report.revenue_chart.is_empty());
    assert!(report.top_products.is_empty());
    assert!(report.top_products_by_revenue.is_empty());
    assert!(report.payment_methods.is_empty());
    assert!(report.order_types.is_empty());
    assert!(report.peak_hours.is_empty());
}

#[test]
fn test_headline_metrics() {
    let orders = vec![
        order("Ana", at(2024, 5, 17, 9), OrderStatus::Completada, 100),
        order("Luis", at(2024, 5, 17, 10), OrderStatus::Completada, 50),
        order("Ana", at(2024, 5, 17, 11), OrderStatus::Cancelada, 0),
        // Outside the day
        order("Eva", at(2024, 5, 16, 11), OrderStatus::Completada, 999),
    ];

    let report = compute(&orders, Period::Day, now(), Tz::UTC);
    assert_eq!(report.orders, 3);
    assert_eq!(report.revenue, Decimal::from(150));
    assert_eq!(report.users, 2);
    assert_eq!(report.ticket_avg, Decimal::from(50));
    assert_eq!(report.delivered, 2);
    assert_eq!(report.cancelled, 1);
    assert_eq!(report.growth, Decimal::new(6667, 2));
}

#[test]
fn test_undated_orders_excluded() {
    let mut undated = order("Ana", now(), OrderStatus::Completada, 100);
    undated.date = None;
    let mut garbled = order("Ana", now(), OrderStatus::Completada, 100);
    garbled.date = Some(DateValue::Legacy("ayer".into()));

    let report = compute(&[undated, garbled], Period::Year, now(), Tz::UTC);
    assert_eq!(report.orders, 0);
}

#[test]
fn test_revenue_chart_sorted_by_date() {
    let orders = vec![
        order("a", at(2024, 5, 15, 9), OrderStatus::Completada, 10),
        order("b", at(2024, 5, 3, 9), OrderStatus::Completada, 20),
        order("c", at(2024, 5, 15, 20), OrderStatus::Completada, 5),
    ];

    let report = compute(&orders, Period::Month, now(), Tz::UTC);
    let chart: Vec<_> = report
        .revenue_chart
        .iter()
        .map(|p| (p.date.as_str(), p.total))
        .collect();
    assert_eq!(
        chart,
        vec![
            ("2024-05-03", Decimal::from(20)),
            ("2024-05-15", Decimal::from(15)),
        ]
    );
}

#[test]
fn test_peak_hours_ascending() {
    let orders = vec![
        order("a", at(2024, 5, 17, 14), OrderStatus::Completada, 1),
        order("b", at(2024, 5, 17, 9), OrderStatus::Completada, 1),
        order("c", at(2024, 5, 17, 14), OrderStatus::Completada, 1),
    ];

    let report = compute(&orders, Period::Day, now(), Tz::UTC);
    assert_eq!(
        report.peak_hours,
        vec![
            HourCount { time: "09:00".into(), orders: 1 },
            HourCount { time: "14:00".into(), orders: 2 },
        ]
    );
}

#[test]
fn test_top_products_limited_and_sorted() {
    let mut o = order("a", now(), OrderStatus::Completada, 0);
    o.products = vec![
        item("A", 10, 1),
        item("B", 1, 6),
        item("C", 5, 3),
        item("D", 2, 2),
        item("E", 100, 4),
        item("F", 3, 5),
        // Ties keep first appearance (D before G, C before F by revenue)
        item("G", 2, 2),
    ];

    let report = compute(&[o], Period::Day, now(), Tz::UTC);

    let by_qty: Vec<_> = report
        .top_products
        .iter()
        .map(|p| (p.name.as_str(), p.quantity))
        .collect();
    assert_eq!(
        by_qty,
        vec![("B", 6), ("F", 5), ("E", 4), ("C", 3), ("D", 2)]
    );

    let by_revenue: Vec<_> = report
        .top_products_by_revenue
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(by_revenue, vec!["E", "C", "F", "A", "B"]);
    assert!(
        report
            .top_products_by_revenue
            .windows(2)
            .all(|w| w[0].revenue >= w[1].revenue)
    );
}

#[test]
fn test_zero_quantity_counts_as_one() {
    let mut o = order("a", now(), OrderStatus::Completada, 0);
    o.products = vec![item("Taco", 20, 0), item("Taco", 20, 2)];

    let report = compute(&[o], Period::Day, now(), Tz::UTC);
    assert_eq!(report.top_products[0].quantity, 3);
    assert_eq!(report.top_products_by_revenue[0].revenue, Decimal::from(60));
}

#[test]
fn test_oversized_amounts_saturate() {
    let mut huge = order("a", now(), OrderStatus::Completada, 0);
    huge.total = Decimal::MAX;
    let mut line = item("Taco", 1, 2);
    line.price = Decimal::MAX;
    huge.products = vec![line];
    let small = order("b", now(), OrderStatus::Completada, 10);

    let report = compute(&[huge, small], Period::Day, now(), Tz::UTC);
    assert_eq!(report.orders, 2);
    assert_eq!(report.revenue, Decimal::MAX);
    assert_eq!(report.revenue_chart[0].total, Decimal::MAX);
    assert_eq!(report.top_products_by_revenue[0].revenue, Decimal::MAX);
}

#[test]
fn test_distributions() {
    let mut card = order("a", now(), OrderStatus::Completada, 1);
    card.payment_method = Some(PaymentMethod::new("Tarjeta"));
    let mut unknown = order("b", now(), OrderStatus::Completada, 1);
    unknown.payment_method = None;
    unknown.order_type = None;
    let mut dine_in = order("c", now(), OrderStatus::Completada, 1);
    dine_in.order_type = Some(OrderType::ComerAca);

    let report = compute(&[card, unknown, dine_in], Period::Day, now(), Tz::UTC);

    assert_eq!(
        report.payment_methods,
        vec![
            Share { name: "tarjeta".into(), value: 1 },
            Share { name: UNKNOWN_PAYMENT_METHOD.into(), value: 1 },
            Share { name: "efectivo".into(), value: 1 },
        ]
    );
    assert_eq!(
        report.order_types,
        vec![
            Share { name: "llevar".into(), value: 1 },
            Share { name: UNSPECIFIED_ORDER_TYPE.into(), value: 1 },
            Share { name: "comerAca".into(), value: 1 },
        ]
    );
}

#[test]
fn test_report_serializes_camel_case() {
    let report = compute(
        &[order("a", now(), OrderStatus::Completada, 10)],
        Period::Day,
        now(),
        Tz::UTC,
    );
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["ticketAvg"], 10.0);
    assert_eq!(value["period"], "day");
    assert!(value["topProductsByRevenue"].is_array());
}
