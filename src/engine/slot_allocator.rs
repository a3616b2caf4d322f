// ==========================================
// 课表排课系统 - 时段分配器
// ==========================================
// 职责: 按固定顺序为单节课寻找第一个可行 (日, 时段, 教师)
// 红线: 搜索顺序 教学日 -> 时段起点 -> teacher_id 升序，结果确定
// 红线: 不回溯，找不到即返回 Unplaceable（不是错误）
// 红线: 先落库，再更新占用；落库失败原样返回错误
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::lesson::NewLesson;
use crate::engine::constraint::{ConstraintChecker, Placement, QualificationIndex};
use crate::engine::occupancy::{Occupant, OccupancyTracker};
use crate::engine::store::ScheduleSession;
use crate::engine::types::AllocationOutcome;
use crate::repository::error::RepositoryResult;
use chrono::NaiveTime;
use tracing::{debug, instrument, trace};

// ==========================================
// SlotAllocator
// ==========================================
pub struct SlotAllocator<'a> {
    config: &'a ScheduleConfig,
    qualifications: &'a QualificationIndex,
    checker: ConstraintChecker<'a>,
    // (起点, 终点) 每轮只计算一次
    slots: Vec<(NaiveTime, NaiveTime)>,
}

impl<'a> SlotAllocator<'a> {
    pub fn new(config: &'a ScheduleConfig, qualifications: &'a QualificationIndex) -> Self {
        let slots = config
            .slot_starts()
            .into_iter()
            .filter_map(|start| config.lesson_end(start).map(|end| (start, end)))
            .collect();

        Self {
            config,
            qualifications,
            checker: ConstraintChecker::new(qualifications),
            slots,
        }
    }

    /// 寻找第一个可行位置（纯查询，不修改占用）
    pub fn find_placement(
        &self,
        subject_id: i64,
        group_id: i64,
        occupancy: &OccupancyTracker,
    ) -> Option<Placement> {
        let teachers = self.qualifications.qualified_teachers(subject_id);
        if teachers.is_empty() {
            return None;
        }

        for &day in &self.config.school_days {
            for &(start_time, end_time) in &self.slots {
                for &teacher_id in teachers {
                    let placement = Placement {
                        subject_id,
                        teacher_id,
                        group_id,
                        day,
                        start_time,
                        end_time,
                    };
                    match self.checker.check(&placement, occupancy) {
                        Ok(()) => return Some(placement),
                        Err(violation) => trace!(%violation, "候选位置被拒绝"),
                    }
                }
            }
        }

        None
    }

    /// 分配一节课
    ///
    /// # 参数
    /// - session: 事务内会话，用于保存课时
    /// - occupancy: 占用追踪，成功后标记教师与班级
    /// - subject_id / group_id: 待排的 (学科, 班级)
    ///
    /// # 返回
    /// - `Ok(Placed(lesson))`: 已保存并占用
    /// - `Ok(Unplaceable)`: 无可行位置，占用不变
    /// - `Err`: 保存失败
    #[instrument(skip(self, session, occupancy))]
    pub fn allocate(
        &self,
        session: &dyn ScheduleSession,
        occupancy: &mut OccupancyTracker,
        subject_id: i64,
        group_id: i64,
    ) -> RepositoryResult<AllocationOutcome> {
        let Some(placement) = self.find_placement(subject_id, group_id, occupancy) else {
            debug!("无可行时段");
            return Ok(AllocationOutcome::Unplaceable);
        };

        let lesson = session.save_lesson(&NewLesson {
            subject_id: placement.subject_id,
            teacher_id: placement.teacher_id,
            group_id: placement.group_id,
            day: placement.day,
            start_time: placement.start_time,
            end_time: placement.end_time,
        })?;

        occupancy.occupy(Occupant::Teacher(lesson.teacher_id), lesson.day, lesson.start_time);
        occupancy.occupy(Occupant::Group(lesson.group_id), lesson.day, lesson.start_time);

        debug!(
            lesson_id = lesson.lesson_id,
            teacher_id = lesson.teacher_id,
            day = %lesson.day,
            start = %lesson.start_time.format("%H:%M"),
            "课时已排入"
        );

        Ok(AllocationOutcome::Placed(lesson))
    }
}
