// ==========================================
// 课表排课系统 - 占用追踪
// ==========================================
// 职责: 记录教师/班级每天已占用的课时起点，回答时段是否空闲
// 红线: 占用判定: 存在 s 使 start < s + d 且 end > s 即为冲突
// 说明: 全部按当日分钟数计算，不会跨零点回绕
// ==========================================

use crate::domain::types::{minute_of_day, time_from_minutes, DayOfWeek};
use crate::engine::availability_index::AvailabilityIndex;
use chrono::NaiveTime;
use std::collections::{BTreeSet, HashMap};

/// 占用主体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occupant {
    Teacher(i64),
    Group(i64),
}

// ==========================================
// OccupancyTracker
// ==========================================
#[derive(Debug, Clone)]
pub struct OccupancyTracker {
    lesson_duration_minutes: u32,
    occupied: HashMap<Occupant, HashMap<DayOfWeek, BTreeSet<u32>>>,
}

impl OccupancyTracker {
    /// 创建空追踪器
    pub fn new(lesson_duration_minutes: u32) -> Self {
        Self {
            lesson_duration_minutes,
            occupied: HashMap::new(),
        }
    }

    /// 以教师不可用时段为初始占用；班级初始为空
    pub fn from_index(index: &AvailabilityIndex, lesson_duration_minutes: u32) -> Self {
        let mut tracker = Self::new(lesson_duration_minutes);
        for (teacher_id, day, start) in index.iter() {
            tracker.occupy_minutes(Occupant::Teacher(teacher_id), day, start);
        }
        tracker
    }

    /// 标记占用（重复标记无影响）
    pub fn occupy(&mut self, occupant: Occupant, day: DayOfWeek, slot_start: NaiveTime) {
        self.occupy_minutes(occupant, day, minute_of_day(slot_start));
    }

    fn occupy_minutes(&mut self, occupant: Occupant, day: DayOfWeek, slot_start: u32) {
        self.occupied
            .entry(occupant)
            .or_default()
            .entry(day)
            .or_default()
            .insert(slot_start);
    }

    /// [start, end) 是否空闲
    pub fn is_free(&self, occupant: Occupant, day: DayOfWeek, start: NaiveTime, end: NaiveTime) -> bool {
        let Some(starts) = self.occupied.get(&occupant).and_then(|days| days.get(&day)) else {
            return true;
        };

        let start = minute_of_day(start);
        let end = minute_of_day(end);

        // s + d > start  <=>  s >= start - d + 1
        let lo = start.saturating_sub(self.lesson_duration_minutes.saturating_sub(1));
        if lo >= end {
            return true;
        }
        starts.range(lo..end).next().is_none()
    }

    /// 某主体某天的全部占用起点（升序）
    pub fn occupied_slots(&self, occupant: Occupant, day: DayOfWeek) -> Vec<NaiveTime> {
        self.occupied
            .get(&occupant)
            .and_then(|days| days.get(&day))
            .map(|starts| {
                starts
                    .iter()
                    .filter_map(|&m| time_from_minutes(m))
                    .collect()
            })
            .unwrap_or_default()
    }
}
