//! Comanda Desk - 餐厅后台订单核心
//!
//! # 架构概述
//!
//! 本 crate 是餐厅运营后台的核心，提供以下功能：
//!
//! - **文档存储** (`store`): 集合存储抽象，内存 / redb 两种后端，实时快照订阅
//! - **订单** (`orders`): 状态机、结账结算、厨房看板、新订单提醒
//! - **统计** (`analytics`): 已结算订单的周期统计
//! - **认证** (`auth`): 身份服务协作者 + 管理员操作 (Argon2)
//! - **目录** (`catalog`): 菜单、分类、折扣、配送等 CRUD 绑定
//!
//! # 模块结构
//!
//! ```text
//! comanda-desk/src/
//! ├── core/          # 配置、状态
//! ├── store/         # 集合存储 (memory / redb)
//! ├── orders/        # 订单生命周期
//! ├── analytics/     # 销售统计
//! ├── auth/          # 身份与管理员
//! ├── catalog/       # 目录绑定
//! └── utils/         # 日志、时间、校验
//! ```

pub mod analytics;
pub mod auth;
pub mod catalog;
pub mod core;
pub mod orders;
pub mod store;
pub mod utils;

// Re-export 公共类型
pub use analytics::{AnalyticsReport, AnalyticsWatcher, Period};
pub use auth::{AdminService, IdentityProvider, MemoryIdentity, Principal};
pub use catalog::{Catalog, RestaurantDirectory};
pub use core::{Config, DeskState, StoreBackend};
pub use orders::{OrderError, OrderResult, OrdersManager};
pub use store::{CollectionStore, MemoryStore, RedbStore, RestaurantId};

// Re-export unified error types from shared
pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境：加载 `.env`、创建工作目录、初始化日志
///
/// 返回加载后的配置。
pub fn setup_environment() -> std::io::Result<Config> {
    if let Err(e) = dotenv::dotenv() {
        // .env 可选
        eprintln!("No .env loaded: {}", e);
    }

    let (config, fallbacks) = Config::from_env_with_fallbacks();
    std::fs::create_dir_all(&config.work_dir)?;
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)?;
    }

    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    for fallback in &fallbacks {
        tracing::warn!("{}", fallback);
    }
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
   ______                                __
  / ____/___  ____ ___  ____ _____  ____/ /___ _
 / /   / __ \/ __ `__ \/ __ `/ __ \/ __  / __ `/
/ /___/ /_/ / / / / / / /_/ / / / / /_/ / /_/ /
\____/\____/_/ /_/ /_/\__,_/_/ /_/\__,_/\__,_/
    "#
    );
}
