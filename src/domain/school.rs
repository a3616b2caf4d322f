// ==========================================
// 课表排课系统 - 学科与班级领域模型
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Subject - 学科
// ==========================================
// 红线: weekly_lessons 为每个班级每周必须排满的课时数，不随班级变化
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub subject_id: i64,
    pub name: String,        // 学科名称 (唯一)
    pub weekly_lessons: u32, // 每周课时数 (> 0)
}

// ==========================================
// ClassGroup - 班级
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassGroup {
    pub group_id: i64,
    pub name: String, // 班级名称 (唯一)
}
