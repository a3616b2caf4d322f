// ==========================================
// 课表排课系统 - 主数据 API
// ==========================================
// 职责: 教师/学科/班级/教师时间约束的增删改查，教师学科资格维护
// 红线: 参数校验在 API 层完成，Repository 只负责存取
// ==========================================

use std::sync::Arc;
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::availability::{Availability, NewAvailability};
use crate::domain::school::{ClassGroup, Subject};
use crate::domain::teacher::Teacher;
use crate::domain::types::{format_time, is_whole_minute};
use crate::repository::{
    AvailabilityRepository, ClassGroupRepository, SubjectRepository, TeacherRepository,
};

// ==========================================
// SchoolApi - 主数据 API
// ==========================================
pub struct SchoolApi {
    teacher_repo: Arc<TeacherRepository>,
    subject_repo: Arc<SubjectRepository>,
    group_repo: Arc<ClassGroupRepository>,
    availability_repo: Arc<AvailabilityRepository>,
}

impl SchoolApi {
    /// 创建新的SchoolApi实例
    pub fn new(
        teacher_repo: Arc<TeacherRepository>,
        subject_repo: Arc<SubjectRepository>,
        group_repo: Arc<ClassGroupRepository>,
        availability_repo: Arc<AvailabilityRepository>,
    ) -> Self {
        Self {
            teacher_repo,
            subject_repo,
            group_repo,
            availability_repo,
        }
    }

    // ==========================================
    // 教师
    // ==========================================

    /// 创建教师
    ///
    /// # 参数
    /// - name: 姓名（非空）
    /// - email: 邮箱（含 @，唯一）
    pub fn create_teacher(&self, name: &str, email: &str) -> ApiResult<Teacher> {
        let name = require_text("教师姓名", name)?;
        let email = require_email(email)?;

        let teacher = self.teacher_repo.create(name, email)?;
        info!(teacher_id = teacher.teacher_id, name = %teacher.name, "教师已创建");
        Ok(teacher)
    }

    pub fn get_teacher(&self, teacher_id: i64) -> ApiResult<Teacher> {
        self.teacher_repo
            .find_by_id(teacher_id)?
            .ok_or_else(|| not_found("Teacher", teacher_id))
    }

    pub fn list_teachers(&self) -> ApiResult<Vec<Teacher>> {
        Ok(self.teacher_repo.list_all()?)
    }

    /// 查询可教授某学科的教师
    pub fn list_teachers_by_subject(&self, subject_id: i64) -> ApiResult<Vec<Teacher>> {
        self.get_subject(subject_id)?;
        Ok(self.teacher_repo.find_by_subject(subject_id)?)
    }

    pub fn update_teacher(&self, teacher_id: i64, name: &str, email: &str) -> ApiResult<Teacher> {
        let name = require_text("教师姓名", name)?;
        let email = require_email(email)?;

        self.teacher_repo.update(teacher_id, name, email)?;
        self.get_teacher(teacher_id)
    }

    /// 删除教师（级联删除其资格、时间约束与课时）
    pub fn delete_teacher(&self, teacher_id: i64) -> ApiResult<()> {
        self.teacher_repo.delete(teacher_id)?;
        info!(teacher_id, "教师已删除");
        Ok(())
    }

    /// 授予教师学科资格（重复授予无影响）
    pub fn assign_subject(&self, teacher_id: i64, subject_id: i64) -> ApiResult<Teacher> {
        if !self.teacher_repo.exists(teacher_id)? {
            return Err(not_found("Teacher", teacher_id));
        }
        self.get_subject(subject_id)?;

        self.teacher_repo.assign_subject(teacher_id, subject_id)?;
        debug!(teacher_id, subject_id, "学科资格已授予");
        self.get_teacher(teacher_id)
    }

    /// 撤销教师学科资格
    pub fn remove_subject(&self, teacher_id: i64, subject_id: i64) -> ApiResult<Teacher> {
        if !self.teacher_repo.remove_subject(teacher_id, subject_id)? {
            return Err(ApiError::NotFound(format!(
                "教师{}没有学科{}的资格",
                teacher_id, subject_id
            )));
        }
        debug!(teacher_id, subject_id, "学科资格已撤销");
        self.get_teacher(teacher_id)
    }

    // ==========================================
    // 学科
    // ==========================================

    /// 创建学科
    ///
    /// # 参数
    /// - name: 学科名称（非空，唯一）
    /// - weekly_lessons: 每个班级每周课时数（> 0）
    pub fn create_subject(&self, name: &str, weekly_lessons: u32) -> ApiResult<Subject> {
        let name = require_text("学科名称", name)?;
        require_weekly_lessons(weekly_lessons)?;

        let subject = self.subject_repo.create(name, weekly_lessons)?;
        info!(subject_id = subject.subject_id, name = %subject.name, weekly_lessons, "学科已创建");
        Ok(subject)
    }

    pub fn get_subject(&self, subject_id: i64) -> ApiResult<Subject> {
        self.subject_repo
            .find_by_id(subject_id)?
            .ok_or_else(|| not_found("Subject", subject_id))
    }

    pub fn list_subjects(&self) -> ApiResult<Vec<Subject>> {
        Ok(self.subject_repo.list_all()?)
    }

    pub fn update_subject(&self, subject_id: i64, name: &str, weekly_lessons: u32) -> ApiResult<Subject> {
        let name = require_text("学科名称", name)?;
        require_weekly_lessons(weekly_lessons)?;

        let subject = Subject {
            subject_id,
            name: name.to_string(),
            weekly_lessons,
        };
        self.subject_repo.update(&subject)?;
        Ok(subject)
    }

    pub fn delete_subject(&self, subject_id: i64) -> ApiResult<()> {
        self.subject_repo.delete(subject_id)?;
        info!(subject_id, "学科已删除");
        Ok(())
    }

    // ==========================================
    // 班级
    // ==========================================

    pub fn create_group(&self, name: &str) -> ApiResult<ClassGroup> {
        let name = require_text("班级名称", name)?;
        let group = self.group_repo.create(name)?;
        info!(group_id = group.group_id, name = %group.name, "班级已创建");
        Ok(group)
    }

    pub fn get_group(&self, group_id: i64) -> ApiResult<ClassGroup> {
        self.group_repo
            .find_by_id(group_id)?
            .ok_or_else(|| not_found("ClassGroup", group_id))
    }

    pub fn list_groups(&self) -> ApiResult<Vec<ClassGroup>> {
        Ok(self.group_repo.list_all()?)
    }

    pub fn update_group(&self, group_id: i64, name: &str) -> ApiResult<ClassGroup> {
        let name = require_text("班级名称", name)?;
        let group = ClassGroup {
            group_id,
            name: name.to_string(),
        };
        self.group_repo.update(&group)?;
        Ok(group)
    }

    pub fn delete_group(&self, group_id: i64) -> ApiResult<()> {
        self.group_repo.delete(group_id)?;
        info!(group_id, "班级已删除");
        Ok(())
    }

    // ==========================================
    // 教师时间约束
    // ==========================================

    /// 新增教师时间约束
    ///
    /// # 返回
    /// - `Err(InvalidInput)`: start >= end
    /// - `Err(NotFound)`: 教师不存在
    pub fn create_availability(&self, record: &NewAvailability) -> ApiResult<Availability> {
        require_interval(record.start_time, record.end_time)?;
        if !self.teacher_repo.exists(record.teacher_id)? {
            return Err(not_found("Teacher", record.teacher_id));
        }

        let created = self.availability_repo.create(record)?;
        info!(
            availability_id = created.availability_id,
            teacher_id = created.teacher_id,
            day = %created.day,
            kind = %created.kind,
            "教师时间约束已创建"
        );
        Ok(created)
    }

    pub fn get_availability(&self, availability_id: i64) -> ApiResult<Availability> {
        self.availability_repo
            .find_by_id(availability_id)?
            .ok_or_else(|| not_found("Availability", availability_id))
    }

    pub fn list_availabilities(&self) -> ApiResult<Vec<Availability>> {
        Ok(self.availability_repo.list_all()?)
    }

    pub fn list_availabilities_by_teacher(&self, teacher_id: i64) -> ApiResult<Vec<Availability>> {
        if !self.teacher_repo.exists(teacher_id)? {
            return Err(not_found("Teacher", teacher_id));
        }
        Ok(self.availability_repo.find_by_teacher(teacher_id)?)
    }

    pub fn update_availability(&self, record: &Availability) -> ApiResult<Availability> {
        require_interval(record.start_time, record.end_time)?;
        if !self.teacher_repo.exists(record.teacher_id)? {
            return Err(not_found("Teacher", record.teacher_id));
        }

        self.availability_repo.update(record)?;
        Ok(record.clone())
    }

    pub fn delete_availability(&self, availability_id: i64) -> ApiResult<()> {
        self.availability_repo.delete(availability_id)?;
        info!(availability_id, "教师时间约束已删除");
        Ok(())
    }
}

// ==========================================
// 参数校验
// ==========================================

fn not_found(entity: &str, id: i64) -> ApiError {
    ApiError::NotFound(format!("{}(id={})不存在", entity, id))
}

fn require_text<'a>(field: &str, value: &'a str) -> ApiResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput(format!("{}不能为空", field)));
    }
    Ok(trimmed)
}

fn require_email(email: &str) -> ApiResult<&str> {
    let email = require_text("邮箱", email)?;
    if !email.contains('@') {
        return Err(ApiError::InvalidInput(format!("邮箱格式无效: {}", email)));
    }
    Ok(email)
}

fn require_weekly_lessons(weekly_lessons: u32) -> ApiResult<()> {
    if weekly_lessons == 0 {
        return Err(ApiError::InvalidInput("每周课时数必须大于0".to_string()));
    }
    Ok(())
}

/// 时间只保存到分钟，带秒的值会在落库后改变区间
pub(crate) fn require_whole_minute(field: &str, t: chrono::NaiveTime) -> ApiResult<()> {
    if !is_whole_minute(t) {
        return Err(ApiError::InvalidInput(format!(
            "{}必须为整分钟 (HH:MM): {}",
            field, t
        )));
    }
    Ok(())
}

pub(crate) fn require_interval(start: chrono::NaiveTime, end: chrono::NaiveTime) -> ApiResult<()> {
    require_whole_minute("开始时间", start)?;
    require_whole_minute("结束时间", end)?;
    if start >= end {
        return Err(ApiError::InvalidInput(format!(
            "开始时间必须早于结束时间: start={}, end={}",
            format_time(start),
            format_time(end)
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_require_text_trims_and_rejects_blank() {
        assert_eq!(require_text("名称", "  1A ").unwrap(), "1A");
        assert!(matches!(require_text("名称", "   "), Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn test_require_email() {
        assert!(require_email("ana@school.test").is_ok());
        assert!(matches!(require_email("ana.school.test"), Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn test_require_interval() {
        let eight = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert!(require_interval(eight, nine).is_ok());
        assert!(require_interval(nine, eight).is_err());
        assert!(require_interval(eight, eight).is_err());
    }

    #[test]
    fn test_require_interval_rejects_seconds() {
        let start = NaiveTime::from_hms_opt(8, 0, 30).unwrap();
        let end = NaiveTime::from_hms_opt(8, 0, 45).unwrap();
        assert!(matches!(require_interval(start, end), Err(ApiError::InvalidInput(_))));

        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert!(matches!(require_interval(start, nine), Err(ApiError::InvalidInput(_))));
    }
}
