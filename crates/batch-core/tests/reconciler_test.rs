//! 批处理协调器测试

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use batch_core::rules::{self, DEFAULT_USE_YN};
use batch_core::{
    BatchContext, BatchItem, BatchPolicy, BatchReconciler, ItemError, ValidationError,
};
use common::{AuditInfo, TenantId};
use domain_core::{Entity, TenantScoped};
use errors::{AppError, AppResult};
use mockall::mock;
use mockall::predicate::eq;
use ports::{DependentRef, Repository};
use serde::Serialize;

// ========== 测试实体 ==========

#[derive(Debug, Clone, PartialEq)]
struct Widget {
    id: u64,
    tenant_id: TenantId,
    name: String,
    use_yn: i16,
    audit_info: AuditInfo,
}

impl Entity for Widget {
    type Id = u64;

    fn id(&self) -> &u64 {
        &self.id
    }
}

impl TenantScoped for Widget {
    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }
}

#[derive(Debug, Clone, Default)]
struct WidgetFields {
    name: Option<String>,
    use_yn: Option<i16>,
}

impl WidgetFields {
    fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            use_yn: None,
        }
    }
}

struct WidgetDraft {
    name: String,
    use_yn: Option<i16>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct WidgetResponse {
    id: u64,
    name: String,
    use_yn: i16,
}

#[derive(Default)]
struct WidgetPolicy {
    next_id: AtomicU64,
    dependents: HashMap<u64, Vec<DependentRef>>,
}

impl WidgetPolicy {
    fn with_dependents(id: u64, dependents: Vec<DependentRef>) -> Self {
        Self {
            dependents: HashMap::from([(id, dependents)]),
            ..Default::default()
        }
    }
}

#[async_trait]
impl BatchPolicy for WidgetPolicy {
    type Id = u64;
    type Fields = WidgetFields;
    type Draft = WidgetDraft;
    type Record = Widget;
    type Response = WidgetResponse;

    const ENTITY: &'static str = "widget";

    fn display_name(&self, fields: &WidgetFields) -> Option<String> {
        fields.name.clone()
    }

    fn record_name(&self, record: &Widget) -> Option<String> {
        Some(record.name.clone())
    }

    fn validate(&self, fields: WidgetFields) -> Result<WidgetDraft, ValidationError> {
        Ok(WidgetDraft {
            name: rules::required_text(fields.name, "name")?,
            use_yn: rules::use_yn(fields.use_yn)?,
        })
    }

    fn create(&self, ctx: &BatchContext, draft: WidgetDraft) -> Widget {
        Widget {
            id: 1000 + self.next_id.fetch_add(1, Ordering::SeqCst),
            tenant_id: ctx.tenant_id,
            name: draft.name,
            use_yn: draft.use_yn.unwrap_or(DEFAULT_USE_YN),
            audit_info: AuditInfo::new(ctx.user_id),
        }
    }

    fn apply(&self, ctx: &BatchContext, record: &mut Widget, draft: WidgetDraft) {
        let mut changed = rules::replace(&mut record.name, draft.name);
        if let Some(use_yn) = draft.use_yn {
            changed |= rules::replace(&mut record.use_yn, use_yn);
        }
        if changed {
            record.audit_info.update(ctx.user_id);
        }
    }

    async fn find_dependents(&self, record: &Widget) -> AppResult<Vec<DependentRef>> {
        Ok(self.dependents.get(&record.id).cloned().unwrap_or_default())
    }

    fn to_response(&self, record: &Widget) -> WidgetResponse {
        WidgetResponse {
            id: record.id,
            name: record.name.clone(),
            use_yn: record.use_yn,
        }
    }
}

// ========== 内存仓储 ==========

#[derive(Default)]
struct MemoryWidgets {
    rows: Mutex<HashMap<u64, Widget>>,
    saves: AtomicUsize,
}

impl MemoryWidgets {
    fn seed(&self, widget: Widget) {
        self.rows.lock().unwrap().insert(widget.id, widget);
    }

    fn get(&self, id: u64) -> Option<Widget> {
        self.rows.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl Repository<Widget, u64> for MemoryWidgets {
    async fn find_by_id(&self, id: &u64) -> AppResult<Option<Widget>> {
        Ok(self.get(*id))
    }

    async fn save(&self, entity: Widget) -> AppResult<Widget> {
        let mut rows = self.rows.lock().unwrap();
        let duplicate = rows
            .values()
            .any(|w| w.id != entity.id && w.tenant_id == entity.tenant_id && w.name == entity.name);
        if duplicate {
            return Err(AppError::conflict(format!(
                "duplicate widget name '{}'",
                entity.name
            )));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        rows.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: &u64) -> AppResult<bool> {
        Ok(self.rows.lock().unwrap().remove(id).is_some())
    }
}

mock! {
    pub WidgetRepo {}

    #[async_trait]
    impl Repository<Widget, u64> for WidgetRepo {
        async fn find_by_id(&self, id: &u64) -> AppResult<Option<Widget>>;
        async fn save(&self, entity: Widget) -> AppResult<Widget>;
        async fn delete(&self, id: &u64) -> AppResult<bool>;
    }
}

// ========== 辅助函数 ==========

fn widget(id: u64, tenant_id: TenantId, name: &str) -> Widget {
    Widget {
        id,
        tenant_id,
        name: name.to_string(),
        use_yn: 1,
        audit_info: AuditInfo::default(),
    }
}

fn memory_reconciler(policy: WidgetPolicy) -> (BatchReconciler<WidgetPolicy>, Arc<MemoryWidgets>) {
    let repo = Arc::new(MemoryWidgets::default());
    (BatchReconciler::new(policy, repo.clone()), repo)
}

// ========== 新建/修改 ==========

#[tokio::test]
async fn test_empty_batch_returns_zero_counts() {
    // 未设置任何期望：任何仓储调用都会失败
    let reconciler = BatchReconciler::new(WidgetPolicy::default(), Arc::new(MockWidgetRepo::new()));
    let ctx = BatchContext::new(TenantId::new());

    let result = reconciler.apply_upsert_batch(&ctx, Vec::new()).await.unwrap();
    assert_eq!(result.total_count, 0);
    assert_eq!(result.success_count, 0);
    assert_eq!(result.fail_count, 0);

    let result = reconciler.apply_delete_batch(&ctx, Vec::new()).await.unwrap();
    assert_eq!(result.total_count, 0);
}

#[tokio::test]
async fn test_create_and_missing_update() {
    let mut repo = MockWidgetRepo::new();
    repo.expect_find_by_id()
        .with(eq(5))
        .times(1)
        .returning(|_| Ok(None));
    repo.expect_save().times(1).returning(Ok);

    let reconciler = BatchReconciler::new(WidgetPolicy::default(), Arc::new(repo));
    let ctx = BatchContext::new(TenantId::new());

    let items = vec![
        BatchItem::create(WidgetFields::named("Acme")),
        BatchItem::update(5, WidgetFields::named("Bad")),
    ];
    let result = reconciler.apply_upsert_batch(&ctx, items).await.unwrap();

    assert_eq!(result.total_count, 2);
    assert_eq!(result.success_count, 1);
    assert_eq!(result.fail_count, 1);
    assert_eq!(result.successes[0].record.name, "Acme");
    assert_eq!(result.successes[0].message, "created");
    assert_eq!(result.failures[0].identifier, Some(5));
    assert_eq!(result.failures[0].display_name.as_deref(), Some("Bad"));
    assert_eq!(result.failures[0].reason, "not found");
}

#[tokio::test]
async fn test_create_applies_use_yn_default() {
    let (reconciler, repo) = memory_reconciler(WidgetPolicy::default());
    let ctx = BatchContext::new(TenantId::new());

    let result = reconciler
        .apply_upsert_batch(&ctx, vec![BatchItem::create(WidgetFields::named("Acme"))])
        .await
        .unwrap();

    let created = &result.successes[0].record;
    assert_eq!(created.use_yn, 1);
    assert_eq!(repo.get(created.id).unwrap().name, "Acme");
}

#[tokio::test]
async fn test_validation_failure_does_not_stop_batch() {
    let (reconciler, repo) = memory_reconciler(WidgetPolicy::default());
    let ctx = BatchContext::new(TenantId::new());

    let items = vec![
        BatchItem::create(WidgetFields::named("   ")),
        BatchItem::create(WidgetFields {
            name: Some("Globex".to_string()),
            use_yn: Some(9),
        }),
        BatchItem::create(WidgetFields::named("Initech")),
    ];
    let result = reconciler.apply_upsert_batch(&ctx, items).await.unwrap();

    assert_eq!(result.success_count, 1);
    assert_eq!(result.failures[0].reason, "missing required field: name");
    assert_eq!(result.failures[1].reason, "invalid value: use_yn");
    assert_eq!(result.failures[1].display_name.as_deref(), Some("Globex"));
    assert_eq!(result.successes[0].index, 2);
    assert_eq!(repo.saves.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_persistence_conflict_is_recorded_per_item() {
    let (reconciler, _repo) = memory_reconciler(WidgetPolicy::default());
    let ctx = BatchContext::new(TenantId::new());

    let items = vec![
        BatchItem::create(WidgetFields::named("Acme")),
        BatchItem::create(WidgetFields::named("Acme")),
        BatchItem::create(WidgetFields::named("Globex")),
    ];
    let result = reconciler.apply_upsert_batch(&ctx, items).await.unwrap();

    assert_eq!(result.success_count, 2);
    assert_eq!(result.fail_count, 1);
    assert_eq!(result.failures[0].index, 1);
    assert_eq!(result.failures[0].identifier, None);
    assert!(result.failures[0].reason.contains("duplicate widget name 'Acme'"));
}

#[tokio::test]
async fn test_outcomes_preserve_input_order() {
    let tenant = TenantId::new();
    let (reconciler, repo) = memory_reconciler(WidgetPolicy::default());
    repo.seed(widget(1, tenant, "One"));
    repo.seed(widget(3, tenant, "Three"));
    let ctx = BatchContext::new(tenant);

    let items = vec![
        BatchItem::update(1, WidgetFields::named("One v2")),
        BatchItem::update(2, WidgetFields::named("Two")),
        BatchItem::create(WidgetFields::named("New")),
        BatchItem::update(4, WidgetFields::named("Four")),
        BatchItem::update(3, WidgetFields::named("Three v2")),
        BatchItem::create(WidgetFields::default()),
    ];
    let result = reconciler.apply_upsert_batch(&ctx, items).await.unwrap();

    assert_eq!(result.total_count, 6);
    assert_eq!(result.success_count + result.fail_count, result.total_count);

    let success_indexes: Vec<_> = result.successes.iter().map(|s| s.index).collect();
    let failure_indexes: Vec<_> = result.failures.iter().map(|f| f.index).collect();
    assert_eq!(success_indexes, vec![0, 2, 4]);
    assert_eq!(failure_indexes, vec![1, 3, 5]);
    assert_eq!(
        result.failures.iter().map(|f| f.identifier).collect::<Vec<_>>(),
        vec![Some(2), Some(4), None]
    );
    assert_eq!(result.successes[0].message, "updated");
    assert_eq!(result.successes[1].message, "created");
}

#[tokio::test]
async fn test_repeated_update_is_idempotent() {
    let tenant = TenantId::new();
    let (reconciler, repo) = memory_reconciler(WidgetPolicy::default());
    repo.seed(widget(7, tenant, "Acme"));
    let ctx = BatchContext::new(tenant);

    let update = || {
        vec![BatchItem::update(
            7,
            WidgetFields {
                name: Some("Acme Corp".to_string()),
                use_yn: Some(0),
            },
        )]
    };

    let first = reconciler.apply_upsert_batch(&ctx, update()).await.unwrap();
    let after_first = repo.get(7).unwrap();
    let second = reconciler.apply_upsert_batch(&ctx, update()).await.unwrap();
    let after_second = repo.get(7).unwrap();

    assert_eq!(first.success_count, 1);
    assert_eq!(second.success_count, 1);
    assert_eq!(first.successes[0].record, second.successes[0].record);
    assert_eq!(after_first, after_second);
    assert_eq!(after_second.use_yn, 0);
}

#[tokio::test]
async fn test_update_of_other_tenant_record_is_not_found() {
    let (reconciler, repo) = memory_reconciler(WidgetPolicy::default());
    repo.seed(widget(9, TenantId::new(), "Foreign"));
    let ctx = BatchContext::new(TenantId::new());

    let result = reconciler
        .apply_upsert_batch(&ctx, vec![BatchItem::update(9, WidgetFields::named("Mine"))])
        .await
        .unwrap();

    assert_eq!(result.failures[0].reason, "not found");
    assert_eq!(repo.get(9).unwrap().name, "Foreign");
}

#[tokio::test]
async fn test_unavailable_repository_aborts_batch() {
    let mut repo = MockWidgetRepo::new();
    let mut calls = 0;
    repo.expect_save().times(2).returning(move |w| {
        calls += 1;
        if calls == 1 {
            Ok(w)
        } else {
            Err(AppError::unavailable("connection refused"))
        }
    });

    let reconciler = BatchReconciler::new(WidgetPolicy::default(), Arc::new(repo));
    let ctx = BatchContext::new(TenantId::new());
    let items = vec![
        BatchItem::create(WidgetFields::named("Acme")),
        BatchItem::create(WidgetFields::named("Globex")),
        BatchItem::create(WidgetFields::named("Initech")),
    ];

    let err = reconciler.apply_upsert_batch(&ctx, items).await.unwrap_err();
    assert_eq!(err, AppError::unavailable("connection refused"));
}

#[tokio::test]
async fn test_oversized_batch_is_rejected_up_front() {
    let reconciler = BatchReconciler::new(WidgetPolicy::default(), Arc::new(MockWidgetRepo::new()))
        .with_max_items(2);
    let ctx = BatchContext::new(TenantId::new());
    let items = (0..3)
        .map(|i| BatchItem::create(WidgetFields::named(&format!("W{i}"))))
        .collect();

    let err = reconciler.apply_upsert_batch(&ctx, items).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

// ========== 删除 ==========

#[tokio::test]
async fn test_delete_batch_mixed_outcomes() {
    let tenant = TenantId::new();
    let policy = WidgetPolicy::with_dependents(
        2,
        vec![
            DependentRef::new("delivery", "D-1"),
            DependentRef::new("delivery", "D-2"),
        ],
    );
    let (reconciler, repo) = memory_reconciler(policy);
    repo.seed(widget(1, tenant, "Free"));
    repo.seed(widget(2, tenant, "Busy"));
    let ctx = BatchContext::new(tenant);

    let result = reconciler
        .apply_delete_batch(&ctx, vec![1, 2, 3])
        .await
        .unwrap();

    assert_eq!(result.total_count, 3);
    assert_eq!(result.success_count, 1);
    assert_eq!(result.successes[0].record.id, 1);
    assert_eq!(result.successes[0].message, "deleted");

    assert_eq!(result.failures[0].identifier, Some(2));
    assert_eq!(result.failures[0].display_name.as_deref(), Some("Busy"));
    assert_eq!(
        result.failures[0].reason,
        "referenced by delivery:D-1, delivery:D-2"
    );
    assert_eq!(result.failures[1].identifier, Some(3));
    assert_eq!(result.failures[1].reason, "not found");

    assert!(repo.get(1).is_none());
    assert!(repo.get(2).is_some());
}

#[tokio::test]
async fn test_delete_race_reports_not_found() {
    let tenant = TenantId::new();
    let mut repo = MockWidgetRepo::new();
    repo.expect_find_by_id()
        .returning(move |id| Ok(Some(widget(*id, tenant, "Gone"))));
    repo.expect_delete().times(1).returning(|_| Ok(false));

    let reconciler = BatchReconciler::new(WidgetPolicy::default(), Arc::new(repo));
    let result = reconciler
        .apply_delete_batch(&BatchContext::new(tenant), vec![4])
        .await
        .unwrap();

    assert_eq!(result.failures[0].reason, "not found");
    assert_eq!(result.failures[0].display_name.as_deref(), Some("Gone"));
}

#[tokio::test]
async fn test_delete_unavailable_aborts() {
    let mut repo = MockWidgetRepo::new();
    repo.expect_find_by_id()
        .returning(|_| Err(AppError::unavailable("timeout")));

    let reconciler = BatchReconciler::new(WidgetPolicy::default(), Arc::new(repo));
    let err = reconciler
        .apply_delete_batch(&BatchContext::new(TenantId::new()), vec![1, 2])
        .await
        .unwrap_err();

    assert!(err.is_fatal());
}

#[test]
fn test_item_error_from_validation() {
    let err: ItemError = ValidationError::missing("name").into();
    assert!(!err.is_fatal());
}

#[tokio::test]
async fn test_exists_defaults_to_find_by_id() {
    let tenant = TenantId::new();
    let mut repo = MockWidgetRepo::new();
    repo.expect_find_by_id()
        .with(eq(3))
        .returning(move |id| Ok(Some(widget(*id, tenant, "Acme"))));
    repo.expect_find_by_id().with(eq(4)).returning(|_| Ok(None));
    let repo: Arc<dyn Repository<Widget, u64>> = Arc::new(repo);

    // 默认实现的 future 可以跨任务传递
    let shared = repo.clone();
    let found = tokio::spawn(async move { shared.exists(&3).await })
        .await
        .unwrap();

    assert!(found.unwrap());
    assert!(!repo.exists(&4).await.unwrap());
}
