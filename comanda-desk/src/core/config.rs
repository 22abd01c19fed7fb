use chrono_tz::Tz;
use std::path::PathBuf;
use std::str::FromStr;

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// 进程内存储 (测试、演示)
    #[default]
    Memory,
    /// redb 单文件持久化
    Redb,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(StoreBackend::Memory),
            "redb" => Ok(StoreBackend::Redb),
            other => Err(format!("unknown store backend: {}", other)),
        }
    }
}

/// 订单台配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 |
/// | STORE_BACKEND | memory | 存储后端: memory \| redb |
/// | STORE_FILE | comanda.redb | redb 文件 (相对 WORK_DIR) |
/// | TIMEZONE | UTC | 业务时区 (IANA) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 日志目录 (按天滚动) |
/// | EVENT_CHANNEL_CAPACITY | 64 | 新订单提醒广播容量 |
/// | DELAY_THRESHOLD_MINUTES | 10 | 订单延迟阈值 (分钟) |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// STORE_BACKEND=redb TIMEZONE=America/Mexico_City cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存放数据库和日志
    pub work_dir: String,
    pub store_backend: StoreBackend,
    /// redb 文件名或路径
    pub store_file: String,
    /// 业务时区：日期分桶、营业日判断都以此为准
    pub timezone: Tz,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub event_channel_capacity: usize,
    /// 非终态订单等待超过此分钟数即视为延迟
    pub delay_threshold_minutes: i64,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        let (config, fallbacks) = Self::from_env_with_fallbacks();
        for fallback in &fallbacks {
            tracing::warn!("{}", fallback);
        }
        config
    }

    /// 同 [`Config::from_env`]，但把回退说明交给调用方
    ///
    /// 日志初始化之前加载配置时使用，回退说明在日志就绪后再输出。
    pub fn from_env_with_fallbacks() -> (Self, Vec<String>) {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> (Self, Vec<String>) {
        let mut fallbacks = Vec::new();

        let store_backend = match var("STORE_BACKEND") {
            Some(v) => v.parse().unwrap_or_else(|e| {
                fallbacks.push(format!("{}, falling back to memory", e));
                StoreBackend::default()
            }),
            None => StoreBackend::default(),
        };
        let timezone = match var("TIMEZONE") {
            Some(v) => v.parse::<Tz>().unwrap_or_else(|e| {
                fallbacks.push(format!("Invalid TIMEZONE '{}': {}, using UTC", v, e));
                Tz::UTC
            }),
            None => Tz::UTC,
        };

        let config = Self {
            work_dir: var("WORK_DIR").unwrap_or_else(|| "./data".into()),
            store_backend,
            store_file: var("STORE_FILE").unwrap_or_else(|| "comanda.redb".into()),
            timezone,
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: var("LOG_DIR").filter(|d| !d.is_empty()),
            event_channel_capacity: var("EVENT_CHANNEL_CAPACITY")
                .and_then(|v| v.parse().ok())
                .filter(|&c: &usize| c > 0)
                .unwrap_or(64),
            delay_threshold_minutes: var("DELAY_THRESHOLD_MINUTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".into()),
        };
        (config, fallbacks)
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(
        work_dir: impl Into<String>,
        store_backend: StoreBackend,
        timezone: Tz,
    ) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.store_backend = store_backend;
        config.timezone = timezone;
        config
    }

    /// redb 文件完整路径
    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.store_file)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parse() {
        assert_eq!("memory".parse(), Ok(StoreBackend::Memory));
        assert_eq!("REDB".parse(), Ok(StoreBackend::Redb));
        assert!("sqlite".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::with_overrides(
            "/tmp/desk",
            StoreBackend::Redb,
            chrono_tz::America::Mexico_City,
        );
        assert_eq!(config.store_backend, StoreBackend::Redb);
        assert_eq!(config.timezone, chrono_tz::America::Mexico_City);
        assert!(config.store_path().starts_with("/tmp/desk"));
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn test_invalid_values_report_fallbacks() {
        let (config, fallbacks) = Config::from_vars(vars(&[
            ("TIMEZONE", "Mars/Olympus"),
            ("STORE_BACKEND", "sqlite"),
        ]));
        assert_eq!(config.timezone, Tz::UTC);
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(fallbacks.len(), 2);
        assert!(fallbacks.iter().any(|f| f.contains("Mars/Olympus")));
        assert!(fallbacks.iter().any(|f| f.contains("sqlite")));
    }

    #[test]
    fn test_valid_values_have_no_fallbacks() {
        let (config, fallbacks) = Config::from_vars(vars(&[
            ("TIMEZONE", "America/Mexico_City"),
            ("STORE_BACKEND", "redb"),
            ("DELAY_THRESHOLD_MINUTES", "30"),
        ]));
        assert!(fallbacks.is_empty());
        assert_eq!(config.timezone, chrono_tz::America::Mexico_City);
        assert_eq!(config.store_backend, StoreBackend::Redb);
        assert_eq!(config.delay_threshold_minutes, 30);
        assert_eq!(config.work_dir, "./data");
    }
}
