// ==========================================
// 课表排课系统 - 约束检查
// ==========================================
// 职责: 判定 (学科, 教师, 班级, 日, 时段) 是否可行
// 红线: 只检查三条: 教师资格 / 教师空闲 / 班级空闲，不做其他软约束
// 红线: 所有拒绝必须给出原因
// ==========================================

use crate::domain::teacher::Teacher;
use crate::domain::types::{format_time, DayOfWeek};
use crate::engine::occupancy::{Occupant, OccupancyTracker};
use chrono::NaiveTime;
use std::collections::HashMap;
use std::fmt;

// ==========================================
// QualificationIndex - 学科 -> 有资格教师
// ==========================================
// 说明: 教师 -> 学科 为单向关系，每轮排课派生一次反向索引
#[derive(Debug, Clone, Default)]
pub struct QualificationIndex {
    by_subject: HashMap<i64, Vec<i64>>,
}

impl QualificationIndex {
    /// 构建索引，每个学科下的 teacher_id 升序且去重
    pub fn build(teachers: &[Teacher]) -> Self {
        let mut by_subject: HashMap<i64, Vec<i64>> = HashMap::new();
        for teacher in teachers {
            for &subject_id in &teacher.subject_ids {
                by_subject.entry(subject_id).or_default().push(teacher.teacher_id);
            }
        }
        for ids in by_subject.values_mut() {
            ids.sort_unstable();
            ids.dedup();
        }
        Self { by_subject }
    }

    /// 有资格教授该学科的教师 (teacher_id 升序)
    pub fn qualified_teachers(&self, subject_id: i64) -> &[i64] {
        self.by_subject
            .get(&subject_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_qualified(&self, teacher_id: i64, subject_id: i64) -> bool {
        self.qualified_teachers(subject_id).binary_search(&teacher_id).is_ok()
    }
}

// ==========================================
// Placement - 候选排课位置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub subject_id: i64,
    pub teacher_id: i64,
    pub group_id: i64,
    pub day: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// 拒绝原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintViolation {
    NotQualified { teacher_id: i64, subject_id: i64 },
    TeacherBusy { teacher_id: i64, day: DayOfWeek, start: String },
    GroupBusy { group_id: i64, day: DayOfWeek, start: String },
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::NotQualified { teacher_id, subject_id } => {
                write!(f, "教师{}无学科{}资格", teacher_id, subject_id)
            }
            ConstraintViolation::TeacherBusy { teacher_id, day, start } => {
                write!(f, "教师{}在{} {}不空闲", teacher_id, day, start)
            }
            ConstraintViolation::GroupBusy { group_id, day, start } => {
                write!(f, "班级{}在{} {}不空闲", group_id, day, start)
            }
        }
    }
}

// ==========================================
// ConstraintChecker
// ==========================================
pub struct ConstraintChecker<'a> {
    qualifications: &'a QualificationIndex,
}

impl<'a> ConstraintChecker<'a> {
    pub fn new(qualifications: &'a QualificationIndex) -> Self {
        Self { qualifications }
    }

    /// 检查候选位置
    ///
    /// # 返回
    /// - `Ok(())`: 可行
    /// - `Err(ConstraintViolation)`: 第一条不满足的约束（按 资格 -> 教师 -> 班级 顺序）
    pub fn check(
        &self,
        placement: &Placement,
        occupancy: &OccupancyTracker,
    ) -> Result<(), ConstraintViolation> {
        if !self
            .qualifications
            .is_qualified(placement.teacher_id, placement.subject_id)
        {
            return Err(ConstraintViolation::NotQualified {
                teacher_id: placement.teacher_id,
                subject_id: placement.subject_id,
            });
        }

        if !occupancy.is_free(
            Occupant::Teacher(placement.teacher_id),
            placement.day,
            placement.start_time,
            placement.end_time,
        ) {
            return Err(ConstraintViolation::TeacherBusy {
                teacher_id: placement.teacher_id,
                day: placement.day,
                start: format_time(placement.start_time),
            });
        }

        if !occupancy.is_free(
            Occupant::Group(placement.group_id),
            placement.day,
            placement.start_time,
            placement.end_time,
        ) {
            return Err(ConstraintViolation::GroupBusy {
                group_id: placement.group_id,
                day: placement.day,
                start: format_time(placement.start_time),
            });
        }

        Ok(())
    }
}
