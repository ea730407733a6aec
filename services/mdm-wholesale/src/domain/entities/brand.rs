//! 品牌实体

use batch_core::ValidationError;
use batch_core::rules::{self, DEFAULT_USE_YN};
use common::{AuditInfo, TenantId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::{BrandId, touch};

/// 品牌
///
/// 品牌名称在同一总部内唯一
#[derive(Debug, Clone, PartialEq)]
pub struct Brand {
    pub id: BrandId,
    pub tenant_id: TenantId,
    /// 品牌名称
    pub name: String,
    /// 品牌编码
    pub code: Option<String>,
    /// 备注
    pub memo: Option<String>,
    /// 使用标志（1 使用，0 停用）
    pub use_yn: i16,
    pub audit_info: AuditInfo,
}

impl_record!(Brand, BrandId);

/// 品牌请求字段
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandFields {
    pub name: Option<String>,
    pub code: Option<String>,
    pub memo: Option<String>,
    pub use_yn: Option<i16>,
}

/// 校验通过的品牌字段
#[derive(Debug, Clone)]
pub struct BrandDraft {
    pub name: String,
    pub code: Option<String>,
    pub memo: Option<String>,
    pub use_yn: Option<i16>,
}

impl BrandFields {
    pub fn validate(self) -> Result<BrandDraft, ValidationError> {
        let name = rules::required_text(self.name, "name")?;
        rules::max_chars(&name, 100, "name")?;
        let code = rules::optional_text(self.code);
        if let Some(code) = &code {
            rules::max_chars(code, 20, "code")?;
        }

        Ok(BrandDraft {
            name,
            code,
            memo: rules::optional_text(self.memo),
            use_yn: rules::use_yn(self.use_yn)?,
        })
    }
}

impl Brand {
    pub fn create(tenant_id: TenantId, user_id: Option<UserId>, draft: BrandDraft) -> Self {
        Self {
            id: BrandId::new(),
            tenant_id,
            name: draft.name,
            code: draft.code,
            memo: draft.memo,
            use_yn: draft.use_yn.unwrap_or(DEFAULT_USE_YN),
            audit_info: AuditInfo::new(user_id),
        }
    }

    /// 应用修改，返回是否有字段变化
    pub fn apply(&mut self, draft: BrandDraft, user_id: Option<UserId>) -> bool {
        let mut changed = rules::replace(&mut self.name, draft.name);
        changed |= rules::replace(&mut self.code, draft.code);
        changed |= rules::replace(&mut self.memo, draft.memo);
        if let Some(use_yn) = draft.use_yn {
            changed |= rules::replace(&mut self.use_yn, use_yn);
        }
        touch(self, changed, user_id)
    }
}

/// 品牌返回形态
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandResponse {
    pub id: BrandId,
    pub name: String,
    pub code: Option<String>,
    pub memo: Option<String>,
    pub use_yn: i16,
}

impl From<&Brand> for BrandResponse {
    fn from(brand: &Brand) -> Self {
        Self {
            id: brand.id,
            name: brand.name.clone(),
            code: brand.code.clone(),
            memo: brand.memo.clone(),
            use_yn: brand.use_yn,
        }
    }
}
