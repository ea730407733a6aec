//! 品牌、商品分类

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use batch_core::{BatchContext, BatchPolicy, ItemError, ValidationError};
use errors::AppResult;
use ports::{DependentLookup, DependentRef, Repository};

use crate::domain::{
    Brand, BrandDraft, BrandFields, BrandId, BrandResponse, ItemCategory, ItemCategoryDraft,
    ItemCategoryFields, ItemCategoryId, ItemCategoryResponse,
};

use super::ensure_reference;

// ========== 品牌 ==========

pub struct BrandPolicy {
    dependents: Arc<dyn DependentLookup<BrandId>>,
}

impl BrandPolicy {
    pub fn new(dependents: Arc<dyn DependentLookup<BrandId>>) -> Self {
        Self { dependents }
    }
}

#[async_trait]
impl BatchPolicy for BrandPolicy {
    type Id = BrandId;
    type Fields = BrandFields;
    type Draft = BrandDraft;
    type Record = Brand;
    type Response = BrandResponse;

    const ENTITY: &'static str = "brand";

    fn display_name(&self, fields: &BrandFields) -> Option<String> {
        fields.name.clone()
    }

    fn record_name(&self, record: &Brand) -> Option<String> {
        Some(record.name.clone())
    }

    fn validate(&self, fields: BrandFields) -> Result<BrandDraft, ValidationError> {
        fields.validate()
    }

    fn create(&self, ctx: &BatchContext, draft: BrandDraft) -> Brand {
        Brand::create(ctx.tenant_id, ctx.user_id, draft)
    }

    fn apply(&self, ctx: &BatchContext, record: &mut Brand, draft: BrandDraft) {
        record.apply(draft, ctx.user_id);
    }

    async fn find_dependents(&self, record: &Brand) -> AppResult<Vec<DependentRef>> {
        self.dependents.find_dependents(&record.id).await
    }

    fn to_response(&self, record: &Brand) -> BrandResponse {
        record.into()
    }
}

// ========== 商品分类 ==========

pub struct ItemCategoryPolicy {
    categories: Arc<dyn Repository<ItemCategory, ItemCategoryId>>,
    dependents: Arc<dyn DependentLookup<ItemCategoryId>>,
}

impl ItemCategoryPolicy {
    pub fn new(
        categories: Arc<dyn Repository<ItemCategory, ItemCategoryId>>,
        dependents: Arc<dyn DependentLookup<ItemCategoryId>>,
    ) -> Self {
        Self {
            categories,
            dependents,
        }
    }

    /// 把 `id` 挂到 `parent_id` 下是否会形成环
    ///
    /// 沿父链走到根；遇到 `id` 或已访问过的节点都视为环
    async fn creates_cycle(
        &self,
        id: &ItemCategoryId,
        parent_id: &ItemCategoryId,
    ) -> AppResult<bool> {
        let mut visited = HashSet::new();
        let mut current = Some(*parent_id);
        while let Some(ancestor) = current {
            if ancestor == *id || !visited.insert(ancestor) {
                return Ok(true);
            }
            current = self
                .categories
                .find_by_id(&ancestor)
                .await?
                .and_then(|category| category.parent_id);
        }
        Ok(false)
    }
}

#[async_trait]
impl BatchPolicy for ItemCategoryPolicy {
    type Id = ItemCategoryId;
    type Fields = ItemCategoryFields;
    type Draft = ItemCategoryDraft;
    type Record = ItemCategory;
    type Response = ItemCategoryResponse;

    const ENTITY: &'static str = "item_category";

    fn display_name(&self, fields: &ItemCategoryFields) -> Option<String> {
        fields.name.clone()
    }

    fn record_name(&self, record: &ItemCategory) -> Option<String> {
        Some(record.name.clone())
    }

    fn validate(&self, fields: ItemCategoryFields) -> Result<ItemCategoryDraft, ValidationError> {
        fields.validate()
    }

    async fn check_references(
        &self,
        ctx: &BatchContext,
        id: Option<&ItemCategoryId>,
        draft: &ItemCategoryDraft,
    ) -> Result<(), ItemError> {
        let Some(parent_id) = &draft.parent_id else {
            return Ok(());
        };
        ensure_reference(self.categories.as_ref(), ctx, parent_id, "parent_id").await?;
        if let Some(id) = id {
            // 父分类未变时无需重新检查
            let stored_parent = self
                .categories
                .find_by_id(id)
                .await?
                .and_then(|category| category.parent_id);
            if stored_parent.as_ref() != Some(parent_id)
                && self.creates_cycle(id, parent_id).await?
            {
                return Err(ValidationError::invalid_reference("parent_id").into());
            }
        }
        Ok(())
    }

    fn create(&self, ctx: &BatchContext, draft: ItemCategoryDraft) -> ItemCategory {
        ItemCategory::create(ctx.tenant_id, ctx.user_id, draft)
    }

    fn apply(&self, ctx: &BatchContext, record: &mut ItemCategory, draft: ItemCategoryDraft) {
        record.apply(draft, ctx.user_id);
    }

    async fn find_dependents(&self, record: &ItemCategory) -> AppResult<Vec<DependentRef>> {
        self.dependents.find_dependents(&record.id).await
    }

    fn to_response(&self, record: &ItemCategory) -> ItemCategoryResponse {
        record.into()
    }
}
