//! 公共休息日采集任务
//!
//! 从公共数据源拉取当年的公共休息日，作为配送休息日批量登记。
//! 已登记的日期会作为单条冲突记录在失败结果中，不影响其他日期。

use std::sync::Arc;

use async_trait::async_trait;
use batch_core::{BatchContext, BatchItem};
use chrono::{Datelike, NaiveDate, Utc};
use errors::AppResult;
use serde::Deserialize;
use tracing::{info, warn};

use crate::application::MasterDataService;
use crate::domain::{DeliveryHolidayFields, WarehouseId};

use super::{JobReport, ScheduledJob};

/// 公共休息日
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublicHoliday {
    pub date: NaiveDate,
    pub name: String,
}

/// 公共休息日数据源
#[async_trait]
pub trait HolidaySource: Send + Sync {
    async fn fetch(&self, year: i32) -> AppResult<Vec<PublicHoliday>>;
}

/// 由配置文件提供的数据源
pub struct ConfiguredHolidaySource {
    holidays: Vec<PublicHoliday>,
}

impl ConfiguredHolidaySource {
    pub fn new(holidays: Vec<PublicHoliday>) -> Self {
        Self { holidays }
    }
}

#[async_trait]
impl HolidaySource for ConfiguredHolidaySource {
    async fn fetch(&self, year: i32) -> AppResult<Vec<PublicHoliday>> {
        Ok(self
            .holidays
            .iter()
            .filter(|h| h.date.year() == year)
            .cloned()
            .collect())
    }
}

pub struct HolidayCollectionJob {
    source: Arc<dyn HolidaySource>,
    service: Arc<MasterDataService>,
    ctx: BatchContext,
    warehouse_id: Option<WarehouseId>,
}

impl HolidayCollectionJob {
    pub fn new(
        source: Arc<dyn HolidaySource>,
        service: Arc<MasterDataService>,
        ctx: BatchContext,
    ) -> Self {
        Self {
            source,
            service,
            ctx,
            warehouse_id: None,
        }
    }

    /// 只登记到指定仓库，默认对总部下所有仓库生效
    pub fn for_warehouse(mut self, warehouse_id: WarehouseId) -> Self {
        self.warehouse_id = Some(warehouse_id);
        self
    }
}

#[async_trait]
impl ScheduledJob for HolidayCollectionJob {
    fn name(&self) -> &str {
        "holiday-collection"
    }

    async fn run(&self) -> AppResult<JobReport> {
        let year = Utc::now().year();
        let holidays = self.source.fetch(year).await?;
        info!(year, collected = holidays.len(), "Public holidays fetched");

        let items: Vec<_> = holidays
            .into_iter()
            .map(|holiday| {
                BatchItem::create(DeliveryHolidayFields {
                    warehouse_id: self.warehouse_id,
                    holiday_date: Some(holiday.date),
                    name: Some(holiday.name),
                })
            })
            .collect();
        let collected = items.len();

        let result = self
            .service
            .delivery_holidays()
            .apply_upsert_batch(&self.ctx, items)
            .await?;
        if result.fail_count > 0 {
            warn!(
                failed = result.fail_count,
                "Some public holidays were not registered"
            );
        }

        Ok(JobReport {
            collected,
            succeeded: result.success_count,
            failed: result.fail_count,
        })
    }
}
