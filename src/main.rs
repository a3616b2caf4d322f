// ==========================================
// 课表排课系统 - 命令行入口
// ==========================================
// 流程: 初始化日志 -> 打开数据库 -> 读取排课参数 -> 生成课表 -> 输出 JSON 报告
// ==========================================

use lesson_scheduler::app::{get_default_db_path, AppState};
use lesson_scheduler::logging;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", lesson_scheduler::APP_NAME);
    tracing::info!("系统版本: {}", lesson_scheduler::VERSION);
    tracing::info!("==================================================");

    // 命令行第一个参数可覆盖数据库路径
    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let app_state = AppState::new(db_path)?;
    let report = app_state.lesson_api.generate_schedule()?;

    if !report.is_complete() {
        tracing::warn!(
            unplaced = report.unplaced_count(),
            "部分课时未能排入，详见报告 unplaced 字段"
        );
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
