//! 批量请求条目

use common::{TenantId, UserId};
use serde::{Deserialize, Serialize};

/// 批量请求中的单个条目
///
/// 请求层按 `id` 是否存在区分新建与修改，业务字段平铺在同一层
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem<ID, F> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ID>,
    #[serde(flatten)]
    pub fields: F,
}

impl<ID, F> BatchItem<ID, F> {
    pub fn create(fields: F) -> Self {
        Self { id: None, fields }
    }

    pub fn update(id: ID, fields: F) -> Self {
        Self {
            id: Some(id),
            fields,
        }
    }
}

/// 新建或修改命令
///
/// 在边界处把可空 ID 转换为显式的变体，业务逻辑不再判断空值
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertCommand<ID, F> {
    Create(F),
    Update { id: ID, fields: F },
}

impl<ID, F> UpsertCommand<ID, F> {
    pub fn id(&self) -> Option<&ID> {
        match self {
            Self::Create(_) => None,
            Self::Update { id, .. } => Some(id),
        }
    }

    pub fn fields(&self) -> &F {
        match self {
            Self::Create(fields) => fields,
            Self::Update { fields, .. } => fields,
        }
    }
}

impl<ID, F> From<BatchItem<ID, F>> for UpsertCommand<ID, F> {
    fn from(item: BatchItem<ID, F>) -> Self {
        match item.id {
            Some(id) => Self::Update {
                id,
                fields: item.fields,
            },
            None => Self::Create(item.fields),
        }
    }
}

/// 批处理上下文：操作所属租户与操作人
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchContext {
    pub tenant_id: TenantId,
    pub user_id: Option<UserId>,
}

impl BatchContext {
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }
}
