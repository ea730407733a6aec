//! 定时任务执行器测试

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use batch_core::BatchContext;
use chrono::{Datelike, NaiveDate, Utc};
use common::TenantId;
use config::{BatchConfig, SchedulerConfig};
use cron::Schedule;
use errors::{AppError, AppResult};
use mdm_wholesale::application::MasterDataService;
use mdm_wholesale::infrastructure::persistence::InMemoryStore;
use mdm_wholesale::scheduler::*;
use mockall::mock;
use tokio::sync::Notify;

mock! {
    pub Source {}

    #[async_trait]
    impl HolidaySource for Source {
        async fn fetch(&self, year: i32) -> AppResult<Vec<PublicHoliday>>;
    }
}

fn holiday(year: i32, month: u32, day: u32, name: &str) -> PublicHoliday {
    PublicHoliday {
        date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
        name: name.to_string(),
    }
}

fn collection_job(
    store: &InMemoryStore,
    source: Arc<dyn HolidaySource>,
) -> Arc<HolidayCollectionJob> {
    let service = Arc::new(MasterDataService::new(store.ports(), &BatchConfig::default()));
    Arc::new(HolidayCollectionJob::new(
        source,
        service,
        BatchContext::new(TenantId::new()),
    ))
}

fn daily() -> Schedule {
    Schedule::from_str("0 0 3 * * *").unwrap()
}

/// 手动放行的任务
struct GatedJob {
    started: Notify,
    release: Notify,
    runs: AtomicUsize,
}

impl GatedJob {
    fn new() -> Self {
        Self {
            started: Notify::new(),
            release: Notify::new(),
            runs: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ScheduledJob for GatedJob {
    fn name(&self) -> &str {
        "gated"
    }

    async fn run(&self) -> AppResult<JobReport> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        self.release.notified().await;
        Ok(JobReport::default())
    }
}

async fn wait_until_idle(runner: &JobRunner) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while runner.is_running() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("job did not finish");
}

#[tokio::test]
async fn test_collection_registers_current_year_holidays() {
    let year = Utc::now().year();
    let store = InMemoryStore::new();
    let source = ConfiguredHolidaySource::new(vec![
        holiday(year, 1, 1, "신정"),
        holiday(year, 3, 1, "삼일절"),
        holiday(year - 1, 12, 25, "기독탄신일"),
    ]);
    let runner = Arc::new(JobRunner::new(
        collection_job(&store, Arc::new(source)),
        daily(),
    ));

    let run = runner.run_now().await.unwrap();

    assert_eq!(run.trigger, JobTrigger::Manual);
    assert!(run.finished_at >= run.started_at);
    assert_eq!(
        run.outcome,
        JobOutcome::Completed(JobReport {
            collected: 2,
            succeeded: 2,
            failed: 0,
        })
    );
    assert_eq!(store.delivery_holidays.len().await, 2);
    assert_eq!(runner.last_run().await, Some(run));
    assert!(!runner.is_running());
}

#[tokio::test]
async fn test_collection_rerun_reports_existing_dates_as_failures() {
    let year = Utc::now().year();
    let store = InMemoryStore::new();
    let source = ConfiguredHolidaySource::new(vec![holiday(year, 5, 5, "어린이날")]);
    let runner = Arc::new(JobRunner::new(
        collection_job(&store, Arc::new(source)),
        daily(),
    ));

    runner.run_now().await.unwrap();
    let run = runner.run_now().await.unwrap();

    assert_eq!(
        run.outcome,
        JobOutcome::Completed(JobReport {
            collected: 1,
            succeeded: 0,
            failed: 1,
        })
    );
    assert_eq!(store.delivery_holidays.len().await, 1);
}

#[tokio::test]
async fn test_source_failure_is_recorded_as_failed_run() {
    let mut source = MockSource::new();
    source
        .expect_fetch()
        .times(1)
        .returning(|_| Err(AppError::unavailable("holiday api timeout")));
    let store = InMemoryStore::new();
    let runner = Arc::new(JobRunner::new(
        collection_job(&store, Arc::new(source)),
        daily(),
    ));

    let run = runner.run_now().await.unwrap();

    assert!(!run.outcome.is_completed());
    assert_eq!(
        run.outcome,
        JobOutcome::Failed {
            reason: "Service unavailable: holiday api timeout".to_string()
        }
    );
    assert!(store.delivery_holidays.is_empty().await);
    assert!(!runner.is_running());
}

#[tokio::test]
async fn test_trigger_while_running_is_rejected() {
    let job = Arc::new(GatedJob::new());
    let runner = Arc::new(JobRunner::new(job.clone(), daily()));

    runner.trigger().unwrap();
    job.started.notified().await;
    assert!(runner.is_running());

    let err = runner.trigger().unwrap_err();
    assert_eq!(err, AppError::conflict("job 'gated' is already running"));
    let err = runner.run_now().await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    job.release.notify_one();
    wait_until_idle(&runner).await;

    assert_eq!(job.runs.load(Ordering::SeqCst), 1);
    let last = runner.last_run().await.unwrap();
    assert_eq!(last.trigger, JobTrigger::Manual);
    assert!(last.outcome.is_completed());

    // 结束后可以再次触发
    runner.trigger().unwrap();
    job.started.notified().await;
    job.release.notify_one();
    wait_until_idle(&runner).await;
    assert_eq!(job.runs.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_invalid_cron_expression_is_rejected() {
    let config = SchedulerConfig {
        enabled: true,
        cron: "every day at three".to_string(),
    };

    let result = JobRunner::from_config(Arc::new(GatedJob::new()), &config);

    match result {
        Err(AppError::Validation(msg)) => {
            assert!(msg.starts_with("invalid cron expression 'every day at three'"));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("invalid cron expression accepted"),
    }
}

#[tokio::test]
async fn test_scheduled_run_fires_and_stops() {
    let year = Utc::now().year();
    let store = InMemoryStore::new();
    let source = ConfiguredHolidaySource::new(vec![holiday(year, 10, 3, "개천절")]);
    let config = SchedulerConfig {
        enabled: true,
        cron: "* * * * * *".to_string(),
    };
    let runner = Arc::new(
        JobRunner::from_config(collection_job(&store, Arc::new(source)), &config).unwrap(),
    );

    let handle = runner.clone().start();
    let run = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Some(run) = runner.last_run().await {
                return run;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("scheduled run did not fire");
    handle.stop().await;

    assert_eq!(run.trigger, JobTrigger::Scheduled);
    assert!(run.outcome.is_completed());
    assert_eq!(store.delivery_holidays.len().await, 1);
    assert!(!runner.is_running());
}

#[tokio::test]
async fn test_stop_waits_for_in_flight_run() {
    let job = Arc::new(GatedJob::new());
    let runner = Arc::new(JobRunner::new(job.clone(), daily()));
    let handle = runner.clone().start();

    runner.trigger().unwrap();
    job.started.notified().await;

    let stopping = tokio::spawn(handle.stop());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!stopping.is_finished());

    job.release.notify_one();
    tokio::time::timeout(Duration::from_secs(5), stopping)
        .await
        .expect("runner did not stop")
        .unwrap();
    assert!(!runner.is_running());
    assert!(runner.last_run().await.is_some());
}

#[tokio::test]
async fn test_scheduled_tick_skipped_while_run_in_progress() {
    let job = Arc::new(GatedJob::new());
    let config = SchedulerConfig {
        enabled: true,
        cron: "* * * * * *".to_string(),
    };
    let runner = Arc::new(JobRunner::from_config(job.clone(), &config).unwrap());
    let handle = runner.clone().start();

    tokio::time::timeout(Duration::from_secs(5), job.started.notified())
        .await
        .expect("scheduled run did not fire");
    // 执行中经过至少两个触发点
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert!(runner.is_running());
    assert_eq!(job.runs.load(Ordering::SeqCst), 1);

    // 先停止调度再放行，避免放行后的触发点开始新的执行
    let stopping = tokio::spawn(handle.stop());
    tokio::time::sleep(Duration::from_millis(50)).await;
    job.release.notify_one();
    tokio::time::timeout(Duration::from_secs(5), stopping)
        .await
        .expect("runner did not stop")
        .unwrap();

    assert_eq!(job.runs.load(Ordering::SeqCst), 1);
    let last = runner.last_run().await.unwrap();
    assert_eq!(last.trigger, JobTrigger::Scheduled);
    assert!(last.outcome.is_completed());
}

#[tokio::test]
async fn test_trigger_after_stop_is_rejected() {
    let job = Arc::new(GatedJob::new());
    let runner = Arc::new(JobRunner::new(job.clone(), daily()));
    runner.clone().start().stop().await;

    let err = runner.trigger().unwrap_err();

    assert_eq!(err, AppError::unavailable("job runner 'gated' is stopped"));
    assert!(!runner.is_running());
    assert_eq!(job.runs.load(Ordering::SeqCst), 0);
    assert!(runner.last_run().await.is_none());
}
