// ==========================================
// 课表排课系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod availability_repo;
pub mod class_group_repo;
pub mod error;
pub mod lesson_repo;
pub mod row_utils;
pub mod schedule_store;
pub mod subject_repo;
pub mod teacher_repo;

// 重导出核心仓储
pub use availability_repo::AvailabilityRepository;
pub use class_group_repo::ClassGroupRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use lesson_repo::LessonRepository;
pub use schedule_store::{SqliteScheduleSession, SqliteScheduleStore};
pub use subject_repo::SubjectRepository;
pub use teacher_repo::TeacherRepository;
