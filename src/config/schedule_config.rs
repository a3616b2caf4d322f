// ==========================================
// 课表排课系统 - 排课参数
// ==========================================
// 职责: 教学日窗口、课时时长、教学日列表
// 说明: 作为显式参数传入排课引擎，不使用全局常量
// ==========================================

use crate::domain::types::{format_time, is_whole_minute, minute_of_day, time_from_minutes, DayOfWeek};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 默认每日开始时间 08:00
pub const DEFAULT_DAY_START: (u32, u32) = (8, 0);
/// 默认每日结束时间 18:00
pub const DEFAULT_DAY_END: (u32, u32) = (18, 0);
/// 默认课时时长（分钟）
pub const DEFAULT_LESSON_DURATION_MINUTES: u32 = 60;

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("课时时长必须大于0分钟")]
    ZeroLessonDuration,

    #[error("每日开始时间必须早于结束时间: start={start}, end={end}")]
    InvalidDayWindow { start: String, end: String },

    #[error("课时时长({duration}分钟)超过每日教学窗口")]
    DurationExceedsWindow { duration: u32 },

    #[error("教学日列表不能为空")]
    NoSchoolDays,

    #[error("教学日重复: {0}")]
    DuplicateSchoolDay(String),

    #[error("时间必须为整分钟: {0}")]
    SubMinuteTime(String),

    #[error("配置值无效 (key={key}): {message}")]
    InvalidValue { key: String, message: String },
}

// ==========================================
// ScheduleConfig - 排课参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    pub lesson_duration_minutes: u32,
    /// 有序教学日，排课按此顺序搜索
    pub school_days: Vec<DayOfWeek>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            day_start: NaiveTime::from_hms_opt(DEFAULT_DAY_START.0, DEFAULT_DAY_START.1, 0)
                .unwrap_or_default(),
            day_end: NaiveTime::from_hms_opt(DEFAULT_DAY_END.0, DEFAULT_DAY_END.1, 0)
                .unwrap_or_default(),
            lesson_duration_minutes: DEFAULT_LESSON_DURATION_MINUTES,
            school_days: DayOfWeek::SCHOOL_WEEK.to_vec(),
        }
    }
}

impl ScheduleConfig {
    /// 校验参数
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lesson_duration_minutes == 0 {
            return Err(ConfigError::ZeroLessonDuration);
        }
        for t in [self.day_start, self.day_end] {
            if !is_whole_minute(t) {
                return Err(ConfigError::SubMinuteTime(t.to_string()));
            }
        }
        if self.day_start >= self.day_end {
            return Err(ConfigError::InvalidDayWindow {
                start: format_time(self.day_start),
                end: format_time(self.day_end),
            });
        }
        let window = minute_of_day(self.day_end) - minute_of_day(self.day_start);
        if self.lesson_duration_minutes > window {
            return Err(ConfigError::DurationExceedsWindow {
                duration: self.lesson_duration_minutes,
            });
        }
        if self.school_days.is_empty() {
            return Err(ConfigError::NoSchoolDays);
        }
        for (i, day) in self.school_days.iter().enumerate() {
            if self.school_days[..i].contains(day) {
                return Err(ConfigError::DuplicateSchoolDay(day.to_string()));
            }
        }
        Ok(())
    }

    /// 每日可用的课时起点
    ///
    /// 从 day_start 起按课时时长步进，课时必须在 day_end 之前结束。
    /// 时长不能整除窗口时，末尾不足一节的时间不排课，最后一节不会越过 day_end。
    pub fn slot_starts(&self) -> Vec<NaiveTime> {
        let step = self.lesson_duration_minutes;
        if step == 0 {
            return Vec::new();
        }

        let end = minute_of_day(self.day_end);
        let mut slots = Vec::new();
        let mut current = minute_of_day(self.day_start);
        while current + step <= end {
            if let Some(t) = time_from_minutes(current) {
                slots.push(t);
            }
            current += step;
        }
        slots
    }

    /// 课时结束时间 (起点 + 时长)，跨零点返回 None
    pub fn lesson_end(&self, start: NaiveTime) -> Option<NaiveTime> {
        time_from_minutes(minute_of_day(start) + self.lesson_duration_minutes)
    }

    /// 每周可用课时总数（每个教师/班级）
    pub fn weekly_capacity(&self) -> usize {
        self.slot_starts().len() * self.school_days.len()
    }
}
