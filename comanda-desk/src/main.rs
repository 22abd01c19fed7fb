use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use comanda_desk::orders::{OrderDraft, Tender};
use comanda_desk::{
    DeskState, IdentityProvider, MemoryIdentity, Period, RestaurantId, print_banner,
    setup_environment,
};
use rust_decimal::Decimal;
use shared::order::{OrderProduct, OrderStatus, OrderType, PaymentMethod};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 工作目录, 日志)
    let config = setup_environment().context("failed to prepare environment")?;

    // 打印横幅
    print_banner();

    tracing::info!(environment = %config.environment, "Comanda desk starting");

    // 2. 身份服务 + 初始管理员
    let identity = Arc::new(MemoryIdentity::new());
    let root = identity.create_account("admin@comanda.local", "admin").await?;
    identity.set_admin_claim(&root, true).await?;
    identity.sign_in("admin@comanda.local", "admin").await?;

    // 3. 初始化状态
    let state = DeskState::initialize(&config, identity).context("failed to open store")?;

    // 4. 演示：一个订单从下单到结算
    let restaurant = state
        .restaurants
        .create("Comanda Demo", "Demo restaurant", "")
        .await?;
    let restaurant_id = restaurant
        .id
        .as_deref()
        .map(RestaurantId::from)
        .context("restaurant id missing")?;

    let analytics = state.watch_analytics(&restaurant_id, Period::Day).await?;
    let alerts = state.orders.watch_new_orders(&restaurant_id).await?;

    let draft = OrderDraft {
        name: "Mesa 1".into(),
        notes: None,
        payment_method: Some(PaymentMethod::cash()),
        order_type: Some(OrderType::ComerAca),
        address: None,
        products: vec![OrderProduct {
            product_id: "taco".into(),
            product_name: "Taco al pastor".into(),
            variant_id: String::new(),
            variant_label: String::new(),
            price: Decimal::new(2500, 2),
            quantity: 4,
            image: String::new(),
            additions: None,
            total: None,
        }],
    };

    let order = state.orders.place_order(&restaurant_id, draft, Utc::now()).await?;
    let order_id = order.id_str().to_string();
    state
        .orders
        .change_status(&restaurant_id, &order_id, OrderStatus::EnProceso)
        .await?;
    state.orders.send_to_cashier(&restaurant_id, &order_id).await?;

    let settlement = state
        .orders
        .finalize(&restaurant_id, &order_id, &Tender::cash(Decimal::from(200)))
        .await?;
    tracing::info!(
        total = %settlement.order.total,
        change = ?settlement.change,
        "Demo order settled"
    );

    let mut reports = analytics.subscribe();
    reports
        .wait_for(|r| r.orders > 0)
        .await
        .context("analytics watcher stopped")?;
    let report = analytics.report();
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to render report")?
    );

    alerts.shutdown().await;
    analytics.shutdown().await;
    Ok(())
}
