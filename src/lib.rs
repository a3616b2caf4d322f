// ==========================================
// 课表排课系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 按周为班级生成课表，贪心分配，不回溯
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 排课规则
pub mod engine;

// 配置层 - 排课参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AvailabilityKind, DayOfWeek};

// 领域实体
pub use domain::{Availability, ClassGroup, Lesson, NewAvailability, NewLesson, Subject, Teacher};

// 配置
pub use config::{ConfigError, ScheduleConfig};

// 引擎
pub use engine::{
    GenerationError, GenerationReport, ScheduleGenerator, ScheduleSession, ScheduleStore,
    UnplacedLesson, UnplacedReason,
};

// API
pub use api::{ApiError, ApiResult, LessonApi, SchoolApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "课表排课系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
