// ==========================================
// 课表排课系统 - 行映射工具
// ==========================================
// 职责: TEXT 列与领域枚举/时间之间的转换
// 说明: 解析失败统一转为 FromSqlConversionFailure，由 RepositoryError 归类为字段错误
// ==========================================

use crate::domain::types::{parse_time, AvailabilityKind, DayOfWeek};
use chrono::NaiveTime;
use rusqlite::types::Type;
use rusqlite::Row;
use std::str::FromStr;

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

/// 读取星期列
pub fn get_day(row: &Row, idx: usize) -> rusqlite::Result<DayOfWeek> {
    let raw: String = row.get(idx)?;
    DayOfWeek::from_str(&raw).map_err(|e| conversion_error(idx, e))
}

/// 读取时间列 (HH:MM)
pub fn get_time(row: &Row, idx: usize) -> rusqlite::Result<NaiveTime> {
    let raw: String = row.get(idx)?;
    parse_time(&raw).map_err(|e| conversion_error(idx, format!("{}: {}", raw, e)))
}

/// 读取时间约束类型列
pub fn get_kind(row: &Row, idx: usize) -> rusqlite::Result<AvailabilityKind> {
    let raw: String = row.get(idx)?;
    AvailabilityKind::from_str(&raw).map_err(|e| conversion_error(idx, e))
}

/// 读取非负整数列
pub fn get_u32(row: &Row, idx: usize) -> rusqlite::Result<u32> {
    let raw: i64 = row.get(idx)?;
    u32::try_from(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e))
    })
}
