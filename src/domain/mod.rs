// ==========================================
// 课表排课系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod availability;
pub mod lesson;
pub mod school;
pub mod teacher;
pub mod types;

// 重导出核心类型
pub use availability::{Availability, NewAvailability};
pub use lesson::{Lesson, NewLesson};
pub use school::{ClassGroup, Subject};
pub use teacher::Teacher;
pub use types::{AvailabilityKind, DayOfWeek};
