//! 物流中心实体

use batch_core::ValidationError;
use batch_core::rules::{self, DEFAULT_USE_YN};
use common::{AuditInfo, TenantId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::{DistributionCenterId, touch};

/// 物流中心
///
/// 编码在同一总部内唯一；仓库可以挂在物流中心下
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionCenter {
    pub id: DistributionCenterId,
    pub tenant_id: TenantId,
    pub code: String,
    pub name: String,
    pub address: Option<String>,
    pub use_yn: i16,
    pub audit_info: AuditInfo,
}

impl_record!(DistributionCenter, DistributionCenterId);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionCenterFields {
    pub code: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub use_yn: Option<i16>,
}

#[derive(Debug, Clone)]
pub struct DistributionCenterDraft {
    pub code: String,
    pub name: String,
    pub address: Option<String>,
    pub use_yn: Option<i16>,
}

impl DistributionCenterFields {
    pub fn validate(self) -> Result<DistributionCenterDraft, ValidationError> {
        let code = rules::required_text(self.code, "code")?;
        rules::max_chars(&code, 20, "code")?;

        Ok(DistributionCenterDraft {
            code,
            name: rules::required_text(self.name, "name")?,
            address: rules::optional_text(self.address),
            use_yn: rules::use_yn(self.use_yn)?,
        })
    }
}

impl DistributionCenter {
    pub fn create(
        tenant_id: TenantId,
        user_id: Option<UserId>,
        draft: DistributionCenterDraft,
    ) -> Self {
        Self {
            id: DistributionCenterId::new(),
            tenant_id,
            code: draft.code,
            name: draft.name,
            address: draft.address,
            use_yn: draft.use_yn.unwrap_or(DEFAULT_USE_YN),
            audit_info: AuditInfo::new(user_id),
        }
    }

    pub fn apply(&mut self, draft: DistributionCenterDraft, user_id: Option<UserId>) -> bool {
        let mut changed = rules::replace(&mut self.code, draft.code);
        changed |= rules::replace(&mut self.name, draft.name);
        changed |= rules::replace(&mut self.address, draft.address);
        if let Some(use_yn) = draft.use_yn {
            changed |= rules::replace(&mut self.use_yn, use_yn);
        }
        touch(self, changed, user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionCenterResponse {
    pub id: DistributionCenterId,
    pub code: String,
    pub name: String,
    pub address: Option<String>,
    pub use_yn: i16,
}

impl From<&DistributionCenter> for DistributionCenterResponse {
    fn from(center: &DistributionCenter) -> Self {
        Self {
            id: center.id,
            code: center.code.clone(),
            name: center.name.clone(),
            address: center.address.clone(),
            use_yn: center.use_yn,
        }
    }
}
