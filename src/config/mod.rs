// ==========================================
// 课表排课系统 - 配置层
// ==========================================
// 职责: 排课参数定义与持久化覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod schedule_config;

// 重导出核心配置
pub use config_manager::{config_keys, ConfigManager};
pub use schedule_config::{ConfigError, ScheduleConfig};
