// ==========================================
// 课表排课系统 - 引擎层错误类型
// ==========================================
// 说明: 无法排入的课时不是错误，记录在 GenerationReport.unplaced 中
// ==========================================

use crate::config::ConfigError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    /// 已有一轮排课正在执行
    #[error("排课正在进行中，拒绝并发执行")]
    AlreadyRunning,

    #[error("排课参数无效: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// 读取/清空/保存失败，本轮排课中止
    #[error("排课持久化失败: {0}")]
    Persistence(#[from] RepositoryError),
}
