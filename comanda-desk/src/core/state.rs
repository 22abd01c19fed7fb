use std::sync::Arc;

use crate::analytics::{AnalyticsWatcher, Period};
use crate::auth::{AdminService, IdentityProvider};
use crate::catalog::{Catalog, RestaurantDirectory};
use crate::core::Config;
use crate::orders::{OrderResult, OrdersManager};
use crate::store::{CollectionStore, RestaurantId, StoreResult, open_store};

/// 桌面端状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，克隆成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | Arc<dyn CollectionStore> | 文档存储 |
/// | orders | OrdersManager | 订单生命周期 |
/// | restaurants | RestaurantDirectory | 餐厅目录 |
/// | admin | AdminService | 管理员操作 |
#[derive(Clone)]
pub struct DeskState {
    pub config: Config,
    pub store: Arc<dyn CollectionStore>,
    pub orders: OrdersManager,
    pub restaurants: RestaurantDirectory,
    pub admin: AdminService,
}

impl DeskState {
    /// 按配置打开存储并组装服务
    pub fn initialize(config: &Config, identity: Arc<dyn IdentityProvider>) -> StoreResult<Self> {
        let store = open_store(config)?;
        Ok(Self::with_store(config, store, identity))
    }

    pub fn with_store(
        config: &Config,
        store: Arc<dyn CollectionStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        tracing::info!(
            backend = ?config.store_backend,
            timezone = %config.timezone,
            "Desk state initialized"
        );
        Self {
            config: config.clone(),
            orders: OrdersManager::new(store.clone(), config),
            restaurants: RestaurantDirectory::new(store.clone()),
            admin: AdminService::new(identity, store.clone()),
            store,
        }
    }

    /// 某餐厅的目录集合
    pub fn catalog(&self, restaurant: &RestaurantId) -> Catalog {
        Catalog::new(self.store.clone(), restaurant.clone())
    }

    /// 启动某餐厅的实时统计
    pub async fn watch_analytics(
        &self,
        restaurant: &RestaurantId,
        period: Period,
    ) -> OrderResult<AnalyticsWatcher> {
        let subscription = self.orders.subscribe_settled(restaurant).await?;
        Ok(AnalyticsWatcher::spawn(
            subscription,
            period,
            self.config.timezone,
        ))
    }
}
