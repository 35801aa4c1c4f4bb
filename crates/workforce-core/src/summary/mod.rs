//! Daily headcount summaries

mod job;
mod scheduler;

pub use job::{DailySummaryJob, SummaryRecord, SummaryRunReport};
pub use scheduler::{DailySchedule, spawn_daily_summary_task};
