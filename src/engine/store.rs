// ==========================================
// 课表排课系统 - 引擎层持久化协作接口
// ==========================================
// 职责: 定义排课引擎所需的存储 trait，实现依赖倒置
// 说明: Engine 层定义 trait，Repository 层提供 SQLite 实现
// 红线: 一次排课只调用一次 with_transaction，清空 + 分配在同一作用域内完成
// ==========================================

use crate::domain::lesson::{Lesson, NewLesson};
use crate::domain::school::{ClassGroup, Subject};
use crate::domain::teacher::Teacher;
use crate::repository::error::RepositoryResult;

/// 事务作用域内的排课会话
///
/// 列表方法必须按 id 升序返回，引擎依赖该顺序保证结果确定性
pub trait ScheduleSession {
    /// 全部教师（含学科资格与时间约束）
    fn list_teachers(&self) -> RepositoryResult<Vec<Teacher>>;

    fn list_subjects(&self) -> RepositoryResult<Vec<Subject>>;

    fn list_groups(&self) -> RepositoryResult<Vec<ClassGroup>>;

    /// 清空上一轮课时，返回删除条数
    fn delete_all_lessons(&self) -> RepositoryResult<usize>;

    /// 保存课时并分配 lesson_id
    fn save_lesson(&self, lesson: &NewLesson) -> RepositoryResult<Lesson>;
}

/// 排课存储
///
/// 闭包返回 Ok 时提交，返回 Err 时回滚。
/// 不支持事务的实现在出错时会保留已保存的课时，由实现方自行说明。
pub trait ScheduleStore: Send + Sync {
    fn with_transaction<R, F>(&self, f: F) -> RepositoryResult<R>
    where
        F: FnOnce(&dyn ScheduleSession) -> RepositoryResult<R>;
}
