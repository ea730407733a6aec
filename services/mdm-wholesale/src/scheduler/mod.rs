//! 公共数据采集调度

mod holiday;
mod job;
mod runner;

pub use holiday::{ConfiguredHolidaySource, HolidayCollectionJob, HolidaySource, PublicHoliday};
pub use job::{JobOutcome, JobReport, JobRun, JobTrigger, ScheduledJob};
pub use runner::{JobRunner, RunnerHandle};
