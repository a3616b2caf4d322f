// ==========================================
// 课表排课系统 - 引擎层
// ==========================================
// 职责: 贪心排课规则，不拼 SQL
// 红线: Engine 只通过 ScheduleStore/ScheduleSession 访问存储
// 红线: 所有拒绝必须输出原因，无法排入的课时记录在报告中
// ==========================================

pub mod availability_index;
pub mod constraint;
pub mod error;
pub mod generator;
pub mod occupancy;
pub mod slot_allocator;
pub mod store;
pub mod types;

// 重导出核心引擎
pub use availability_index::AvailabilityIndex;
pub use constraint::{ConstraintChecker, ConstraintViolation, Placement, QualificationIndex};
pub use error::GenerationError;
pub use generator::ScheduleGenerator;
pub use occupancy::{Occupant, OccupancyTracker};
pub use slot_allocator::SlotAllocator;
pub use store::{ScheduleSession, ScheduleStore};
pub use types::{
    AllocationOutcome, GenerationReport, ScheduleSnapshot, UnplacedLesson, UnplacedReason,
};
