// ==========================================
// 课表排课系统 - 课时 API
// ==========================================
// 职责: 课时增删改查、按教师/班级/时间段查询、触发自动排课
// 说明: 手工课时只校验引用存在与时间区间，不做冲突检测
// ==========================================

use chrono::NaiveTime;
use std::sync::Arc;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::school_api::{require_interval, require_whole_minute};
use crate::domain::lesson::{Lesson, NewLesson};
use crate::domain::types::DayOfWeek;
use crate::engine::generator::ScheduleGenerator;
use crate::engine::types::GenerationReport;
use crate::repository::{
    ClassGroupRepository, LessonRepository, SqliteScheduleStore, SubjectRepository,
    TeacherRepository,
};

// ==========================================
// LessonApi - 课时 API
// ==========================================
pub struct LessonApi {
    lesson_repo: Arc<LessonRepository>,
    teacher_repo: Arc<TeacherRepository>,
    subject_repo: Arc<SubjectRepository>,
    group_repo: Arc<ClassGroupRepository>,
    generator: Arc<ScheduleGenerator<SqliteScheduleStore>>,
}

impl LessonApi {
    /// 创建新的LessonApi实例
    pub fn new(
        lesson_repo: Arc<LessonRepository>,
        teacher_repo: Arc<TeacherRepository>,
        subject_repo: Arc<SubjectRepository>,
        group_repo: Arc<ClassGroupRepository>,
        generator: Arc<ScheduleGenerator<SqliteScheduleStore>>,
    ) -> Self {
        Self {
            lesson_repo,
            teacher_repo,
            subject_repo,
            group_repo,
            generator,
        }
    }

    /// 手工新增课时
    ///
    /// # 返回
    /// - `Err(InvalidInput)`: start >= end
    /// - `Err(NotFound)`: 学科/教师/班级不存在
    pub fn create_lesson(&self, lesson: &NewLesson) -> ApiResult<Lesson> {
        require_interval(lesson.start_time, lesson.end_time)?;
        self.ensure_references(lesson.subject_id, lesson.teacher_id, lesson.group_id)?;

        let saved = self.lesson_repo.save(lesson)?;
        info!(lesson_id = saved.lesson_id, "课时已创建");
        Ok(saved)
    }

    pub fn get_lesson(&self, lesson_id: i64) -> ApiResult<Lesson> {
        self.lesson_repo
            .find_by_id(lesson_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Lesson(id={})不存在", lesson_id)))
    }

    pub fn list_lessons(&self) -> ApiResult<Vec<Lesson>> {
        Ok(self.lesson_repo.list_all()?)
    }

    pub fn update_lesson(&self, lesson: &Lesson) -> ApiResult<Lesson> {
        require_interval(lesson.start_time, lesson.end_time)?;
        self.ensure_references(lesson.subject_id, lesson.teacher_id, lesson.group_id)?;

        self.lesson_repo.update(lesson)?;
        Ok(lesson.clone())
    }

    pub fn delete_lesson(&self, lesson_id: i64) -> ApiResult<()> {
        self.lesson_repo.delete(lesson_id)?;
        info!(lesson_id, "课时已删除");
        Ok(())
    }

    /// 教师课表
    pub fn list_by_teacher(&self, teacher_id: i64) -> ApiResult<Vec<Lesson>> {
        if !self.teacher_repo.exists(teacher_id)? {
            return Err(ApiError::NotFound(format!("Teacher(id={})不存在", teacher_id)));
        }
        Ok(self.lesson_repo.find_by_teacher(teacher_id)?)
    }

    /// 班级课表
    pub fn list_by_group(&self, group_id: i64) -> ApiResult<Vec<Lesson>> {
        if self.group_repo.find_by_id(group_id)?.is_none() {
            return Err(ApiError::NotFound(format!("ClassGroup(id={})不存在", group_id)));
        }
        Ok(self.lesson_repo.find_by_group(group_id)?)
    }

    /// 查询某天与 [start, end] 相接或相交的课时
    ///
    /// 条件: lesson.start <= end 且 lesson.end >= start
    pub fn search_by_day_and_time(
        &self,
        day: DayOfWeek,
        start: NaiveTime,
        end: NaiveTime,
    ) -> ApiResult<Vec<Lesson>> {
        require_whole_minute("查询开始时间", start)?;
        require_whole_minute("查询结束时间", end)?;
        if start > end {
            return Err(ApiError::InvalidInput(
                "查询开始时间不能晚于结束时间".to_string(),
            ));
        }
        Ok(self.lesson_repo.find_touching(day, start, end)?)
    }

    /// 自动排课: 清空现有课时后重新生成
    pub fn generate_schedule(&self) -> ApiResult<GenerationReport> {
        Ok(self.generator.generate_schedule()?)
    }

    fn ensure_references(&self, subject_id: i64, teacher_id: i64, group_id: i64) -> ApiResult<()> {
        if self.subject_repo.find_by_id(subject_id)?.is_none() {
            return Err(ApiError::NotFound(format!("Subject(id={})不存在", subject_id)));
        }
        if !self.teacher_repo.exists(teacher_id)? {
            return Err(ApiError::NotFound(format!("Teacher(id={})不存在", teacher_id)));
        }
        if self.group_repo.find_by_id(group_id)?.is_none() {
            return Err(ApiError::NotFound(format!("ClassGroup(id={})不存在", group_id)));
        }
        Ok(())
    }
}
