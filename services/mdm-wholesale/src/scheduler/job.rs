//! 定时任务定义

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_more::Display;
use errors::AppResult;
use serde::Serialize;

/// 可被 [`JobRunner`](super::JobRunner) 调度的任务
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    /// 任务名称，用于日志、指标和冲突提示
    fn name(&self) -> &str;

    /// 执行一次
    async fn run(&self) -> AppResult<JobReport>;
}

/// 单次执行的汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReport {
    pub collected: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// 触发方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum JobTrigger {
    #[display("scheduled")]
    Scheduled,
    #[display("manual")]
    Manual,
}

/// 执行结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobOutcome {
    Completed(JobReport),
    Failed { reason: String },
}

impl JobOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Completed(_) => "completed",
            Self::Failed { .. } => "failed",
        }
    }
}

/// 一次执行记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRun {
    pub trigger: JobTrigger,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: JobOutcome,
}
