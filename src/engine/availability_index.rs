// ==========================================
// 课表排课系统 - 教师不可用时段索引
// ==========================================
// 职责: 将硬约束时间记录展开为按课时步长对齐的占用起点
// 红线: 无状态、无副作用、不修改输入
// 说明: Preference 记录只读取不生效
// ==========================================

use crate::domain::teacher::Teacher;
use crate::domain::types::{minute_of_day, DayOfWeek};
use std::collections::{BTreeMap, BTreeSet};

/// teacher_id -> 星期 -> 占用起点(分钟)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityIndex {
    blocked: BTreeMap<i64, BTreeMap<DayOfWeek, BTreeSet<u32>>>,
}

impl AvailabilityIndex {
    /// 构建索引
    ///
    /// 对每条硬约束记录 [start, end)，从 start 起按 duration 步进，
    /// 在 t < end 的每个 t 处标记占用
    ///
    /// # 参数
    /// - teachers: 教师（含时间约束）
    /// - lesson_duration_minutes: 课时时长，必须 > 0
    pub fn build(teachers: &[Teacher], lesson_duration_minutes: u32) -> Self {
        let mut index = Self::default();
        if lesson_duration_minutes == 0 {
            return index;
        }

        for teacher in teachers {
            for record in teacher.hard_blocks() {
                let end = minute_of_day(record.end_time);
                let mut t = minute_of_day(record.start_time);
                while t < end {
                    index
                        .blocked
                        .entry(teacher.teacher_id)
                        .or_default()
                        .entry(record.day)
                        .or_default()
                        .insert(t);
                    t += lesson_duration_minutes;
                }
            }
        }

        index
    }

    /// 教师某天的占用起点
    pub fn blocked_starts(&self, teacher_id: i64, day: DayOfWeek) -> impl Iterator<Item = u32> + '_ {
        self.blocked
            .get(&teacher_id)
            .and_then(|days| days.get(&day))
            .into_iter()
            .flat_map(|starts| starts.iter().copied())
    }

    /// 遍历全部 (teacher_id, day, start)
    pub fn iter(&self) -> impl Iterator<Item = (i64, DayOfWeek, u32)> + '_ {
        self.blocked.iter().flat_map(|(&teacher_id, days)| {
            days.iter()
                .flat_map(move |(&day, starts)| starts.iter().map(move |&s| (teacher_id, day, s)))
        })
    }

    pub fn len(&self) -> usize {
        self.blocked
            .values()
            .flat_map(|days| days.values())
            .map(|starts| starts.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
