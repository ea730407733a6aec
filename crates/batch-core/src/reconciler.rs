//! 批处理协调器

use std::sync::Arc;

use domain_core::TenantScoped;
use errors::{AppError, AppResult};
use metrics::counter;
use ports::Repository;
use tracing::{debug, error, info, warn};

use crate::{
    BatchContext, BatchItem, BatchPolicy, BatchResult, ItemError, ItemOutcome, MSG_CREATED,
    MSG_DELETED, MSG_UPDATED, UpsertCommand,
};

/// 单次批处理默认允许的最大条目数
pub const DEFAULT_MAX_ITEMS: usize = 500;

const OP_UPSERT: &str = "upsert";
const OP_DELETE: &str = "delete";

/// 批处理协调器
///
/// 在调用方任务上按输入顺序逐条处理。
/// 不做并发，不加锁，也不跨条目开启事务
pub struct BatchReconciler<P: BatchPolicy> {
    policy: P,
    repository: Arc<dyn Repository<P::Record, P::Id>>,
    max_items: usize,
}

impl<P: BatchPolicy> BatchReconciler<P> {
    pub fn new(policy: P, repository: Arc<dyn Repository<P::Record, P::Id>>) -> Self {
        Self {
            policy,
            repository,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }

    /// 设置单批最大条目数
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// 批量新建/修改
    ///
    /// 没有 ID 的条目新建，带 ID 的条目修改；单条失败记录为失败结果，
    /// 只有致命错误会中止整个批次且不返回部分结果
    pub async fn apply_upsert_batch(
        &self,
        ctx: &BatchContext,
        items: Vec<BatchItem<P::Id, P::Fields>>,
    ) -> AppResult<BatchResult<P::Response, P::Id>> {
        self.check_batch_size(items.len(), OP_UPSERT)?;
        info!(
            entity = P::ENTITY,
            tenant_id = %ctx.tenant_id,
            items = items.len(),
            "Applying upsert batch"
        );

        let mut result = BatchResult::new();
        for (index, item) in items.into_iter().enumerate() {
            let command = UpsertCommand::from(item);
            let identifier = command.id().cloned();
            let display_name = self.policy.display_name(command.fields());

            let outcome = match self.upsert_one(ctx, command).await {
                Ok((record, message)) => {
                    debug!(entity = P::ENTITY, index, outcome = message, "Batch item applied");
                    ItemOutcome::success(index, self.policy.to_response(&record), message)
                }
                Err(ItemError::Fatal(err)) => return Err(self.abort(OP_UPSERT, index, err)),
                Err(err) => {
                    warn!(
                        entity = P::ENTITY,
                        index,
                        identifier = ?identifier.as_ref().map(ToString::to_string),
                        reason = %err,
                        "Batch item failed"
                    );
                    ItemOutcome::failure(index, identifier, display_name, err.to_string())
                }
            };

            record_item(P::ENTITY, OP_UPSERT, outcome.is_success());
            result.push(outcome);
        }

        info!(
            entity = P::ENTITY,
            total = result.total_count,
            succeeded = result.success_count,
            failed = result.fail_count,
            "Upsert batch applied"
        );
        Ok(result)
    }

    /// 批量删除
    ///
    /// 不存在的 ID 和仍被依赖记录引用的记录记为失败，记录保持不变
    pub async fn apply_delete_batch(
        &self,
        ctx: &BatchContext,
        ids: Vec<P::Id>,
    ) -> AppResult<BatchResult<P::Response, P::Id>> {
        self.check_batch_size(ids.len(), OP_DELETE)?;
        info!(
            entity = P::ENTITY,
            tenant_id = %ctx.tenant_id,
            items = ids.len(),
            "Applying delete batch"
        );

        let mut result = BatchResult::new();
        for (index, id) in ids.into_iter().enumerate() {
            let outcome = match self.delete_one(ctx, &id).await {
                Ok(record) => {
                    debug!(entity = P::ENTITY, index, %id, "Batch item deleted");
                    ItemOutcome::success(index, self.policy.to_response(&record), MSG_DELETED)
                }
                Err((ItemError::Fatal(err), _)) => return Err(self.abort(OP_DELETE, index, err)),
                Err((err, display_name)) => {
                    warn!(
                        entity = P::ENTITY,
                        index,
                        %id,
                        reason = %err,
                        "Batch delete item failed"
                    );
                    ItemOutcome::failure(index, Some(id), display_name, err.to_string())
                }
            };

            record_item(P::ENTITY, OP_DELETE, outcome.is_success());
            result.push(outcome);
        }

        info!(
            entity = P::ENTITY,
            total = result.total_count,
            succeeded = result.success_count,
            failed = result.fail_count,
            "Delete batch applied"
        );
        Ok(result)
    }

    async fn upsert_one(
        &self,
        ctx: &BatchContext,
        command: UpsertCommand<P::Id, P::Fields>,
    ) -> Result<(P::Record, &'static str), ItemError> {
        match command {
            UpsertCommand::Create(fields) => {
                let draft = self.policy.validate(fields)?;
                self.policy.check_references(ctx, None, &draft).await?;

                let record = self.policy.create(ctx, draft);
                let saved = self.repository.save(record).await?;
                Ok((saved, MSG_CREATED))
            }
            UpsertCommand::Update { id, fields } => {
                let draft = self.policy.validate(fields)?;
                self.policy.check_references(ctx, Some(&id), &draft).await?;

                let mut record = self.find_owned(ctx, &id).await?;
                self.policy.apply(ctx, &mut record, draft);
                let saved = self.repository.save(record).await?;
                Ok((saved, MSG_UPDATED))
            }
        }
    }

    async fn delete_one(
        &self,
        ctx: &BatchContext,
        id: &P::Id,
    ) -> Result<P::Record, (ItemError, Option<String>)> {
        let record = self.find_owned(ctx, id).await.map_err(|e| (e, None))?;
        let display_name = self.policy.record_name(&record);

        let dependents = self
            .policy
            .find_dependents(&record)
            .await
            .map_err(|e| (ItemError::from(e), display_name.clone()))?;
        if !dependents.is_empty() {
            return Err((ItemError::Referenced(dependents), display_name));
        }

        match self.repository.delete(id).await {
            Ok(true) => Ok(record),
            // 查找与删除之间被其他请求删除
            Ok(false) => Err((ItemError::NotFound, display_name)),
            Err(e) => Err((ItemError::from(e), display_name)),
        }
    }

    /// 查找当前租户下的记录，其他租户的记录视为不存在
    async fn find_owned(&self, ctx: &BatchContext, id: &P::Id) -> Result<P::Record, ItemError> {
        self.repository
            .find_by_id(id)
            .await?
            .filter(|record| record.belongs_to(&ctx.tenant_id))
            .ok_or(ItemError::NotFound)
    }

    fn check_batch_size(&self, len: usize, op: &str) -> AppResult<()> {
        if len > self.max_items {
            return Err(AppError::validation(format!(
                "{} {} batch of {} items exceeds the limit of {}",
                P::ENTITY,
                op,
                len,
                self.max_items
            )));
        }
        Ok(())
    }

    fn abort(&self, op: &'static str, index: usize, err: AppError) -> AppError {
        error!(
            entity = P::ENTITY,
            op,
            index,
            error = %err,
            "Batch aborted by fatal error"
        );
        counter!("batch_aborted_total", "entity" => P::ENTITY, "op" => op).increment(1);
        err
    }
}

fn record_item(entity: &'static str, op: &'static str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!("batch_items_total", "entity" => entity, "op" => op, "outcome" => outcome)
        .increment(1);
}
