// ==========================================
// 课表排课系统 - 课时领域模型
// ==========================================
// 红线: end_time = start_time + 课时时长
// 红线: 同一教师/同一班级同一天的 [start, end) 不得重叠
// ==========================================

use crate::domain::types::DayOfWeek;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Lesson - 已落库的课时
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub lesson_id: i64,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub group_id: i64,
    pub day: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Lesson {
    /// 同一天且时间区间相交
    pub fn overlaps(&self, other: &Lesson) -> bool {
        self.day == other.day
            && self.start_time < other.end_time
            && other.start_time < self.end_time
    }

    /// 是否共享教师或班级
    pub fn shares_resource_with(&self, other: &Lesson) -> bool {
        self.teacher_id == other.teacher_id || self.group_id == other.group_id
    }
}

// ==========================================
// NewLesson - 待落库的课时 (由持久化层分配 lesson_id)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLesson {
    pub subject_id: i64,
    pub teacher_id: i64,
    pub group_id: i64,
    pub day: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl NewLesson {
    pub fn into_lesson(self, lesson_id: i64) -> Lesson {
        Lesson {
            lesson_id,
            subject_id: self.subject_id,
            teacher_id: self.teacher_id,
            group_id: self.group_id,
            day: self.day,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(lesson_id: i64, teacher_id: i64, group_id: i64, day: DayOfWeek, start_h: u32) -> Lesson {
        Lesson {
            lesson_id,
            subject_id: 1,
            teacher_id,
            group_id,
            day,
            start_time: NaiveTime::from_hms_opt(start_h, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(start_h + 1, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_back_to_back_lessons_do_not_overlap() {
        let a = lesson(1, 1, 1, DayOfWeek::Monday, 8);
        let b = lesson(2, 1, 1, DayOfWeek::Monday, 9);
        assert!(!a.overlaps(&b));
        assert!(a.shares_resource_with(&b));
    }

    #[test]
    fn test_same_slot_different_day_does_not_overlap() {
        let a = lesson(1, 1, 1, DayOfWeek::Monday, 8);
        let b = lesson(2, 1, 1, DayOfWeek::Tuesday, 8);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&lesson(3, 2, 2, DayOfWeek::Monday, 8)));
    }
}
