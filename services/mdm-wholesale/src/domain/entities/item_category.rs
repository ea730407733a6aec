//! 商品分类实体

use batch_core::ValidationError;
use batch_core::rules::{self, DEFAULT_USE_YN};
use common::{AuditInfo, TenantId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::{ItemCategoryId, touch};

/// 商品分类
///
/// 通过 `parent_id` 组成层级；有子分类或商品的分类不能删除
#[derive(Debug, Clone, PartialEq)]
pub struct ItemCategory {
    pub id: ItemCategoryId,
    pub tenant_id: TenantId,
    pub name: String,
    /// 上级分类，根分类为 `None`
    pub parent_id: Option<ItemCategoryId>,
    pub sort_order: i32,
    pub use_yn: i16,
    pub audit_info: AuditInfo,
}

impl_record!(ItemCategory, ItemCategoryId);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCategoryFields {
    pub name: Option<String>,
    pub parent_id: Option<ItemCategoryId>,
    pub sort_order: Option<i32>,
    pub use_yn: Option<i16>,
}

#[derive(Debug, Clone)]
pub struct ItemCategoryDraft {
    pub name: String,
    pub parent_id: Option<ItemCategoryId>,
    pub sort_order: i32,
    pub use_yn: Option<i16>,
}

impl ItemCategoryFields {
    pub fn validate(self) -> Result<ItemCategoryDraft, ValidationError> {
        Ok(ItemCategoryDraft {
            name: rules::required_text(self.name, "name")?,
            parent_id: self.parent_id,
            sort_order: self.sort_order.unwrap_or_default(),
            use_yn: rules::use_yn(self.use_yn)?,
        })
    }
}

impl ItemCategory {
    pub fn create(tenant_id: TenantId, user_id: Option<UserId>, draft: ItemCategoryDraft) -> Self {
        Self {
            id: ItemCategoryId::new(),
            tenant_id,
            name: draft.name,
            parent_id: draft.parent_id,
            sort_order: draft.sort_order,
            use_yn: draft.use_yn.unwrap_or(DEFAULT_USE_YN),
            audit_info: AuditInfo::new(user_id),
        }
    }

    pub fn apply(&mut self, draft: ItemCategoryDraft, user_id: Option<UserId>) -> bool {
        let mut changed = rules::replace(&mut self.name, draft.name);
        changed |= rules::replace(&mut self.parent_id, draft.parent_id);
        changed |= rules::replace(&mut self.sort_order, draft.sort_order);
        if let Some(use_yn) = draft.use_yn {
            changed |= rules::replace(&mut self.use_yn, use_yn);
        }
        touch(self, changed, user_id)
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCategoryResponse {
    pub id: ItemCategoryId,
    pub name: String,
    pub parent_id: Option<ItemCategoryId>,
    pub sort_order: i32,
    pub use_yn: i16,
}

impl From<&ItemCategory> for ItemCategoryResponse {
    fn from(category: &ItemCategory) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            parent_id: category.parent_id,
            sort_order: category.sort_order,
            use_yn: category.use_yn,
        }
    }
}
