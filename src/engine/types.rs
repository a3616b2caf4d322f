// ==========================================
// 课表排课系统 - 引擎层数据结构
// ==========================================
// 职责: 排课快照、分配结果与排课报告
// ==========================================

use crate::domain::lesson::Lesson;
use crate::domain::school::{ClassGroup, Subject};
use crate::domain::teacher::Teacher;
use crate::engine::store::ScheduleSession;
use crate::repository::error::RepositoryResult;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ScheduleSnapshot - 一轮排课读取的主数据
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ScheduleSnapshot {
    pub teachers: Vec<Teacher>,
    pub subjects: Vec<Subject>,
    pub groups: Vec<ClassGroup>,
}

impl ScheduleSnapshot {
    /// 从会话读取主数据，并按 id 升序固定顺序
    pub fn load(session: &dyn ScheduleSession) -> RepositoryResult<Self> {
        let mut snapshot = Self {
            teachers: session.list_teachers()?,
            subjects: session.list_subjects()?,
            groups: session.list_groups()?,
        };
        snapshot.teachers.sort_by_key(|t| t.teacher_id);
        snapshot.subjects.sort_by_key(|s| s.subject_id);
        snapshot.groups.sort_by_key(|g| g.group_id);
        Ok(snapshot)
    }

    /// 所有 (班级, 学科) 的应排课时总数
    pub fn required_total(&self) -> u64 {
        let per_group: u64 = self.subjects.iter().map(|s| u64::from(s.weekly_lessons)).sum();
        per_group * self.groups.len() as u64
    }
}

// ==========================================
// 分配结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationOutcome {
    /// 已落库并更新占用
    Placed(Lesson),
    /// 按固定搜索顺序找不到可行时段
    Unplaceable,
}

/// 未排课原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnplacedReason {
    /// 没有任何教师具备该学科资格
    NoQualifiedTeacher,
    /// 有资格教师，但所有 (日, 时段, 教师) 组合都冲突
    NoFeasibleSlot,
}

impl fmt::Display for UnplacedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnplacedReason::NoQualifiedTeacher => write!(f, "NO_QUALIFIED_TEACHER"),
            UnplacedReason::NoFeasibleSlot => write!(f, "NO_FEASIBLE_SLOT"),
        }
    }
}

/// 某 (班级, 学科) 未能排入的课时
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnplacedLesson {
    pub group_id: i64,
    pub group_name: String,
    pub subject_id: i64,
    pub subject_name: String,
    pub count: u32,
    pub reason: UnplacedReason,
}

// ==========================================
// GenerationReport - 排课报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub placed: Vec<Lesson>,
    pub unplaced: Vec<UnplacedLesson>,
    pub required_total: u64,
}

impl GenerationReport {
    pub fn placed_count(&self) -> u64 {
        self.placed.len() as u64
    }

    pub fn unplaced_count(&self) -> u64 {
        self.unplaced.iter().map(|u| u64::from(u.count)).sum()
    }

    /// 全部课时已排入
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }
}
