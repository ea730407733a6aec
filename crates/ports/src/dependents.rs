//! 依赖记录查询

use std::fmt;

use async_trait::async_trait;
use errors::AppResult;
use serde::{Deserialize, Serialize};

/// 阻止删除的依赖记录引用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentRef {
    /// 依赖记录类型，如 `delivery`
    pub kind: String,
    /// 依赖记录 ID
    pub id: String,
    /// 可读名称
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl DependentRef {
    pub fn new(kind: impl Into<String>, id: impl ToString) -> Self {
        Self {
            kind: kind.into(),
            id: id.to_string(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl fmt::Display for DependentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}:{}", self.kind, label),
            None => write!(f, "{}:{}", self.kind, self.id),
        }
    }
}

/// 依赖记录查询接口
#[async_trait]
pub trait DependentLookup<ID>: Send + Sync {
    /// 查找引用该记录且不允许其被删除的依赖记录
    async fn find_dependents(&self, id: &ID) -> AppResult<Vec<DependentRef>>;
}
