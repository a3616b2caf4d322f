// ==========================================
// 课表排课系统 - 排课生成器
// ==========================================
// 职责: 编排一轮完整排课
// 流程: 加载主数据 -> 清空上一轮课时 -> 班级 × 学科 × 应排课时 逐节分配 -> 汇总报告
// 红线: 同一时刻只允许一轮排课，并发调用直接拒绝
// 红线: 清空与分配在同一个存储事务内完成
// 红线: 每个 (班级, 学科) 满足 已排 + 未排 == 每周课时
// ==========================================

use crate::config::ScheduleConfig;
use crate::engine::availability_index::AvailabilityIndex;
use crate::engine::constraint::QualificationIndex;
use crate::engine::error::GenerationError;
use crate::engine::occupancy::OccupancyTracker;
use crate::engine::slot_allocator::SlotAllocator;
use crate::engine::store::{ScheduleSession, ScheduleStore};
use crate::engine::types::{
    AllocationOutcome, GenerationReport, ScheduleSnapshot, UnplacedLesson, UnplacedReason,
};
use crate::repository::error::RepositoryResult;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, TryLockError};
use tracing::{debug, info, warn};
use uuid::Uuid;

// ==========================================
// ScheduleGenerator
// ==========================================
pub struct ScheduleGenerator<S: ScheduleStore> {
    store: Arc<S>,
    config: ScheduleConfig,
    run_lock: Mutex<()>,
}

impl<S: ScheduleStore> ScheduleGenerator<S> {
    /// 创建生成器
    ///
    /// # 返回
    /// - `Err(InvalidConfig)`: 参数校验失败
    pub fn new(store: Arc<S>, config: ScheduleConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            run_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// 执行一轮排课
    ///
    /// # 返回
    /// - `Ok(GenerationReport)`: 已排课时 + 未排诊断
    /// - `Err(AlreadyRunning)`: 另一轮排课尚未结束
    /// - `Err(Persistence)`: 读取/清空/保存失败，本轮中止
    pub fn generate_schedule(&self) -> Result<GenerationReport, GenerationError> {
        let _guard = match self.run_lock.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => {
                warn!("排课正在进行中，拒绝本次请求");
                return Err(GenerationError::AlreadyRunning);
            }
            // 上一轮 panic 不影响本轮: 锁内没有需要恢复的状态
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };

        let run_id = Uuid::new_v4().to_string();
        info!(
            run_id = %run_id,
            day_start = %self.config.day_start.format("%H:%M"),
            day_end = %self.config.day_end.format("%H:%M"),
            lesson_duration_minutes = self.config.lesson_duration_minutes,
            school_days = self.config.school_days.len(),
            weekly_slots = self.config.weekly_capacity(),
            "开始排课"
        );

        let config = &self.config;
        let result = self
            .store
            .with_transaction(|session| run_generation(session, config, &run_id));

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                warn!(run_id = %run_id, error = %e, "排课中止");
                return Err(GenerationError::Persistence(e));
            }
        };

        info!(
            run_id = %report.run_id,
            required_total = report.required_total,
            placed = report.placed_count(),
            unplaced = report.unplaced_count(),
            "排课完成"
        );

        Ok(report)
    }
}

/// 事务内执行的排课主体
fn run_generation(
    session: &dyn ScheduleSession,
    config: &ScheduleConfig,
    run_id: &str,
) -> RepositoryResult<GenerationReport> {
    // ==========================================
    // 步骤1: 加载主数据
    // ==========================================
    let snapshot = ScheduleSnapshot::load(session)?;
    info!(
        teachers = snapshot.teachers.len(),
        subjects = snapshot.subjects.len(),
        groups = snapshot.groups.len(),
        "主数据已加载"
    );

    // ==========================================
    // 步骤2: 清空上一轮课时
    // ==========================================
    let cleared = session.delete_all_lessons()?;
    info!(cleared, "已清空上一轮课时");

    // ==========================================
    // 步骤3: 构建索引与占用
    // ==========================================
    let duration = config.lesson_duration_minutes;
    let availability = AvailabilityIndex::build(&snapshot.teachers, duration);
    let mut occupancy = OccupancyTracker::from_index(&availability, duration);
    let qualifications = QualificationIndex::build(&snapshot.teachers);
    let allocator = SlotAllocator::new(config, &qualifications);
    debug!(blocked_slots = availability.len(), "教师不可用时段已载入");

    let mut unstaffed = HashSet::new();
    for subject in &snapshot.subjects {
        if qualifications.qualified_teachers(subject.subject_id).is_empty() {
            warn!(
                subject_id = subject.subject_id,
                subject = %subject.name,
                "学科没有有资格的教师，所有班级跳过"
            );
            unstaffed.insert(subject.subject_id);
        }
    }

    // ==========================================
    // 步骤4: 班级 × 学科 逐节分配
    // ==========================================
    let mut placed = Vec::new();
    let mut unplaced = Vec::new();

    for group in &snapshot.groups {
        for subject in &snapshot.subjects {
            let required = subject.weekly_lessons;

            if unstaffed.contains(&subject.subject_id) {
                unplaced.push(UnplacedLesson {
                    group_id: group.group_id,
                    group_name: group.name.clone(),
                    subject_id: subject.subject_id,
                    subject_name: subject.name.clone(),
                    count: required,
                    reason: UnplacedReason::NoQualifiedTeacher,
                });
                continue;
            }

            let mut placed_so_far = 0;
            while placed_so_far < required {
                match allocator.allocate(session, &mut occupancy, subject.subject_id, group.group_id)? {
                    AllocationOutcome::Placed(lesson) => {
                        placed.push(lesson);
                        placed_so_far += 1;
                    }
                    AllocationOutcome::Unplaceable => {
                        // 占用未变化，同一 (班级, 学科) 后续尝试结果相同
                        let remaining = required - placed_so_far;
                        warn!(
                            group = %group.name,
                            subject = %subject.name,
                            remaining,
                            "无可行时段，剩余课时未排"
                        );
                        unplaced.push(UnplacedLesson {
                            group_id: group.group_id,
                            group_name: group.name.clone(),
                            subject_id: subject.subject_id,
                            subject_name: subject.name.clone(),
                            count: remaining,
                            reason: UnplacedReason::NoFeasibleSlot,
                        });
                        break;
                    }
                }
            }
        }
    }

    Ok(GenerationReport {
        run_id: run_id.to_string(),
        placed,
        unplaced,
        required_total: snapshot.required_total(),
    })
}
