//! 定时任务执行器
//!
//! 按 cron 表达式调度一个任务，也可以手动触发。同一时刻最多只有一次执行：
//! 手动触发遇到执行中的任务返回冲突错误，定时触发则跳过本次。

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use config::SchedulerConfig;
use cron::Schedule;
use errors::{AppError, AppResult};
use metrics::counter;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info, warn};

use super::{JobOutcome, JobRun, JobTrigger, ScheduledJob};

pub struct JobRunner {
    job: Arc<dyn ScheduledJob>,
    schedule: Schedule,
    running: AtomicBool,
    last_run: RwLock<Option<JobRun>>,
    runs: TaskTracker,
}

impl JobRunner {
    pub fn new(job: Arc<dyn ScheduledJob>, schedule: Schedule) -> Self {
        Self {
            job,
            schedule,
            running: AtomicBool::new(false),
            last_run: RwLock::new(None),
            runs: TaskTracker::new(),
        }
    }

    /// 按配置中的 cron 表达式创建
    pub fn from_config(job: Arc<dyn ScheduledJob>, config: &SchedulerConfig) -> AppResult<Self> {
        let schedule = Schedule::from_str(&config.cron).map_err(|e| {
            AppError::validation(format!("invalid cron expression '{}': {}", config.cron, e))
        })?;
        Ok(Self::new(job, schedule))
    }

    pub fn job_name(&self) -> &str {
        self.job.name()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// 最近一次执行记录
    pub async fn last_run(&self) -> Option<JobRun> {
        self.last_run.read().await.clone()
    }

    /// 启动调度循环
    pub fn start(self: Arc<Self>) -> RunnerHandle {
        let shutdown = CancellationToken::new();
        let runner = self.clone();
        let token = shutdown.clone();
        let task = tokio::spawn(async move { runner.run_loop(token).await });

        RunnerHandle {
            runner: self,
            shutdown,
            task,
        }
    }

    /// 手动触发，后台执行
    ///
    /// 调度已停止时返回 `AppError::Unavailable`
    pub fn trigger(self: &Arc<Self>) -> AppResult<()> {
        if self.runs.is_closed() {
            return Err(AppError::unavailable(format!(
                "job runner '{}' is stopped",
                self.job_name()
            )));
        }
        let guard = self.begin().ok_or_else(|| self.already_running())?;
        info!(job = self.job_name(), "Job triggered manually");
        self.runs.spawn(guard.execute(JobTrigger::Manual));
        Ok(())
    }

    /// 手动执行并等待完成
    pub async fn run_now(self: &Arc<Self>) -> AppResult<JobRun> {
        let guard = self.begin().ok_or_else(|| self.already_running())?;
        Ok(guard.execute(JobTrigger::Manual).await)
    }

    async fn run_loop(self: Arc<Self>, shutdown: CancellationToken) {
        info!(job = self.job_name(), "Job runner started");

        loop {
            let Some(next) = self.schedule.upcoming(Utc).next() else {
                warn!(job = self.job_name(), "Schedule has no upcoming fire time");
                break;
            };
            let delay = (next - Utc::now()).to_std().unwrap_or_default();

            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    match self.begin() {
                        Some(guard) => {
                            self.runs.spawn(guard.execute(JobTrigger::Scheduled));
                        }
                        None => {
                            warn!(
                                job = self.job_name(),
                                "Previous run still in progress, skipping scheduled run"
                            );
                            counter!(
                                "collection_runs_total",
                                "job" => self.job_name().to_string(),
                                "trigger" => "scheduled",
                                "outcome" => "skipped"
                            )
                            .increment(1);
                        }
                    }
                }
                _ = shutdown.cancelled() => {
                    info!(job = self.job_name(), "Job runner received shutdown signal");
                    break;
                }
            }
        }

        info!(job = self.job_name(), "Job runner stopped");
    }

    fn begin(self: &Arc<Self>) -> Option<RunGuard> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunGuard {
                runner: self.clone(),
            })
    }

    fn already_running(&self) -> AppError {
        AppError::conflict(format!("job '{}' is already running", self.job_name()))
    }
}

/// 持有期间任务处于执行中，释放时清除标志
struct RunGuard {
    runner: Arc<JobRunner>,
}

impl RunGuard {
    async fn execute(self, trigger: JobTrigger) -> JobRun {
        let runner = &self.runner;
        let job = runner.job_name();
        let started_at = Utc::now();
        info!(job, %trigger, "Job run started");

        let outcome = match runner.job.run().await {
            Ok(report) => {
                info!(
                    job,
                    collected = report.collected,
                    succeeded = report.succeeded,
                    failed = report.failed,
                    "Job run completed"
                );
                JobOutcome::Completed(report)
            }
            Err(e) => {
                error!(job, error = %e, "Job run failed");
                JobOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        counter!(
            "collection_runs_total",
            "job" => job.to_string(),
            "trigger" => trigger.to_string(),
            "outcome" => outcome.label()
        )
        .increment(1);

        let run = JobRun {
            trigger,
            started_at,
            finished_at: Utc::now(),
            outcome,
        };
        *runner.last_run.write().await = Some(run.clone());
        run
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.runner.running.store(false, Ordering::Release);
    }
}

/// 调度循环句柄
pub struct RunnerHandle {
    runner: Arc<JobRunner>,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl RunnerHandle {
    pub fn runner(&self) -> &Arc<JobRunner> {
        &self.runner
    }

    /// 停止调度并等待执行中的任务结束
    pub async fn stop(self) {
        self.shutdown.cancel();
        if let Err(e) = self.task.await {
            error!(error = %e, "Job runner task panicked");
        }
        self.runner.runs.close();
        self.runner.runs.wait().await;
    }
}
