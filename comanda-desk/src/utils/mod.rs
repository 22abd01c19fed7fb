//! 工具模块 - 日志、时间、输入校验

pub mod logger;
pub mod time;
pub mod validation;
