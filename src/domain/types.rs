// ==========================================
// 课表排课系统 - 领域类型定义
// ==========================================
// 职责: 星期、可用性类型、课时时间换算
// 存储格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 数据库与日志中统一使用的时间格式
pub const TIME_FORMAT: &str = "%H:%M";

// ==========================================
// 星期 (Day Of Week)
// ==========================================
// 顺序: Monday < Tuesday < ... < Sunday
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// 默认教学日 (周一至周五，不含周末)
    pub const SCHOOL_WEEK: [DayOfWeek; 5] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "MONDAY",
            DayOfWeek::Tuesday => "TUESDAY",
            DayOfWeek::Wednesday => "WEDNESDAY",
            DayOfWeek::Thursday => "THURSDAY",
            DayOfWeek::Friday => "FRIDAY",
            DayOfWeek::Saturday => "SATURDAY",
            DayOfWeek::Sunday => "SUNDAY",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MONDAY" | "MON" => Ok(DayOfWeek::Monday),
            "TUESDAY" | "TUE" => Ok(DayOfWeek::Tuesday),
            "WEDNESDAY" | "WED" => Ok(DayOfWeek::Wednesday),
            "THURSDAY" | "THU" => Ok(DayOfWeek::Thursday),
            "FRIDAY" | "FRI" => Ok(DayOfWeek::Friday),
            "SATURDAY" | "SAT" => Ok(DayOfWeek::Saturday),
            "SUNDAY" | "SUN" => Ok(DayOfWeek::Sunday),
            other => Err(format!("未知星期: {}", other)),
        }
    }
}

// ==========================================
// 教师时间约束类型 (Availability Kind)
// ==========================================
// 红线: 除 Preference 外均为硬约束，排课不得占用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityKind {
    Unavailable,         // 休息/完全不可用
    AdministrativeBlock, // 行政事务占用
    Preference,          // 偏好时段 (仅记录，不参与排课)
    Restriction,         // 其他原因不可用
}

impl AvailabilityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityKind::Unavailable => "UNAVAILABLE",
            AvailabilityKind::AdministrativeBlock => "ADMINISTRATIVE_BLOCK",
            AvailabilityKind::Preference => "PREFERENCE",
            AvailabilityKind::Restriction => "RESTRICTION",
        }
    }

    /// 是否为硬约束
    pub fn is_hard_constraint(&self) -> bool {
        !matches!(self, AvailabilityKind::Preference)
    }
}

impl fmt::Display for AvailabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AvailabilityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "UNAVAILABLE" => Ok(AvailabilityKind::Unavailable),
            "ADMINISTRATIVE_BLOCK" => Ok(AvailabilityKind::AdministrativeBlock),
            "PREFERENCE" => Ok(AvailabilityKind::Preference),
            "RESTRICTION" => Ok(AvailabilityKind::Restriction),
            other => Err(format!("未知时间约束类型: {}", other)),
        }
    }
}

// ==========================================
// 时间换算
// ==========================================
// 说明: 引擎内部统一使用“当日分钟数”比较，避免 NaiveTime 加法跨零点回绕

/// 当日分钟数 (00:00 => 0)
pub fn minute_of_day(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// 由当日分钟数还原时间，超过 23:59 返回 None
pub fn time_from_minutes(minutes: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

/// 秒与纳秒均为 0（存储格式只保留到分钟）
pub fn is_whole_minute(t: NaiveTime) -> bool {
    t.second() == 0 && t.nanosecond() == 0
}

pub fn format_time(t: NaiveTime) -> String {
    t.format(TIME_FORMAT).to_string()
}

/// 解析 "HH:MM" 或 "HH:MM:SS"
pub fn parse_time(s: &str) -> Result<NaiveTime, chrono::ParseError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, TIME_FORMAT).or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_of_week_round_trip_and_aliases() {
        for day in DayOfWeek::SCHOOL_WEEK {
            assert_eq!(day.to_string().parse::<DayOfWeek>().unwrap(), day);
        }
        assert_eq!("mon".parse::<DayOfWeek>().unwrap(), DayOfWeek::Monday);
        assert!("FUNDAY".parse::<DayOfWeek>().is_err());
    }

    #[test]
    fn test_day_of_week_order() {
        assert!(DayOfWeek::Monday < DayOfWeek::Friday);
        assert!(DayOfWeek::Friday < DayOfWeek::Sunday);
    }

    #[test]
    fn test_only_preference_is_soft() {
        assert!(AvailabilityKind::Unavailable.is_hard_constraint());
        assert!(AvailabilityKind::AdministrativeBlock.is_hard_constraint());
        assert!(AvailabilityKind::Restriction.is_hard_constraint());
        assert!(!AvailabilityKind::Preference.is_hard_constraint());
    }

    #[test]
    fn test_minutes_conversion() {
        let t = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        assert_eq!(minute_of_day(t), 570);
        assert_eq!(time_from_minutes(570), Some(t));
        assert_eq!(time_from_minutes(24 * 60), None);
    }

    #[test]
    fn test_parse_time_accepts_seconds() {
        let expected = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert_eq!(parse_time("08:00").unwrap(), expected);
        assert_eq!(parse_time("08:00:00").unwrap(), expected);
        assert!(parse_time("8h").is_err());
    }

    #[test]
    fn test_is_whole_minute() {
        assert!(is_whole_minute(NaiveTime::from_hms_opt(8, 15, 0).unwrap()));
        assert!(!is_whole_minute(NaiveTime::from_hms_opt(8, 15, 30).unwrap()));
        assert!(!is_whole_minute(NaiveTime::from_hms_milli_opt(8, 15, 0, 500).unwrap()));
    }
}
