// ==========================================
// 课表排课系统 - 教师时间约束领域模型
// ==========================================
// 红线: start_time < end_time
// ==========================================

use crate::domain::types::{AvailabilityKind, DayOfWeek};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Availability - 教师时间约束记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub availability_id: i64,
    pub teacher_id: i64,          // 所属教师
    pub day: DayOfWeek,           // 星期
    pub start_time: NaiveTime,    // 开始时间
    pub end_time: NaiveTime,      // 结束时间 (不含)
    pub kind: AvailabilityKind,   // 约束类型
    pub note: Option<String>,     // 备注
}

impl Availability {
    pub fn is_hard_constraint(&self) -> bool {
        self.kind.is_hard_constraint()
    }

    /// 是否与 [start, end) 在同一天重叠
    pub fn overlaps(&self, day: DayOfWeek, start: NaiveTime, end: NaiveTime) -> bool {
        self.day == day && start < self.end_time && end > self.start_time
    }
}

// ==========================================
// NewAvailability - 待创建的时间约束
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAvailability {
    pub teacher_id: i64,
    pub day: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub kind: AvailabilityKind,
    pub note: Option<String>,
}

impl NewAvailability {
    pub fn into_availability(self, availability_id: i64) -> Availability {
        Availability {
            availability_id,
            teacher_id: self.teacher_id,
            day: self.day,
            start_time: self.start_time,
            end_time: self.end_time,
            kind: self.kind,
            note: self.note,
        }
    }
}
