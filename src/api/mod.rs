// ==========================================
// 课表排课系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行入口与种子数据工具调用
// ==========================================

pub mod error;
pub mod lesson_api;
pub mod school_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use lesson_api::LessonApi;
pub use school_api::SchoolApi;
