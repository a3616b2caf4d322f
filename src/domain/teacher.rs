// ==========================================
// 课表排课系统 - 教师领域模型
// ==========================================
// 说明: 教师 -> 学科 为单向关系，学科不持有教师反向引用
// ==========================================

use crate::domain::availability::Availability;
use serde::{Deserialize, Serialize};

// ==========================================
// Teacher - 教师
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub teacher_id: i64,
    pub name: String,
    pub email: String,

    // ===== 可任教学科 (为空则永不参与排课) =====
    pub subject_ids: Vec<i64>,

    // ===== 时间约束记录 (教师独占) =====
    pub availabilities: Vec<Availability>,
}

impl Teacher {
    /// 是否有资格教授该学科
    pub fn is_qualified_for(&self, subject_id: i64) -> bool {
        self.subject_ids.contains(&subject_id)
    }

    /// 硬约束时间记录 (不含 Preference)
    pub fn hard_blocks(&self) -> impl Iterator<Item = &Availability> {
        self.availabilities.iter().filter(|a| a.is_hard_constraint())
    }
}
