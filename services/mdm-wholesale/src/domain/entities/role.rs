//! 客户用户角色

use batch_core::ValidationError;
use batch_core::rules::{self, DEFAULT_USE_YN};
use common::{AuditInfo, TenantId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::{RoleId, touch};

#[derive(Debug, Clone, PartialEq)]
pub struct Role {
    pub id: RoleId,
    pub tenant_id: TenantId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub use_yn: i16,
    pub audit_info: AuditInfo,
}

impl_record!(Role, RoleId);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleFields {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub use_yn: Option<i16>,
}

#[derive(Debug, Clone)]
pub struct RoleDraft {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub use_yn: Option<i16>,
}

impl RoleFields {
    pub fn validate(self) -> Result<RoleDraft, ValidationError> {
        Ok(RoleDraft {
            code: rules::required_text(self.code, "code")?,
            name: rules::required_text(self.name, "name")?,
            description: rules::optional_text(self.description),
            use_yn: rules::use_yn(self.use_yn)?,
        })
    }
}

impl Role {
    pub fn create(tenant_id: TenantId, user_id: Option<UserId>, draft: RoleDraft) -> Self {
        Self {
            id: RoleId::new(),
            tenant_id,
            code: draft.code,
            name: draft.name,
            description: draft.description,
            use_yn: draft.use_yn.unwrap_or(DEFAULT_USE_YN),
            audit_info: AuditInfo::new(user_id),
        }
    }

    pub fn apply(&mut self, draft: RoleDraft, user_id: Option<UserId>) -> bool {
        let mut changed = rules::replace(&mut self.code, draft.code);
        changed |= rules::replace(&mut self.name, draft.name);
        changed |= rules::replace(&mut self.description, draft.description);
        if let Some(use_yn) = draft.use_yn {
            changed |= rules::replace(&mut self.use_yn, use_yn);
        }
        touch(self, changed, user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub id: RoleId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub use_yn: i16,
}

impl From<&Role> for RoleResponse {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            code: role.code.clone(),
            name: role.name.clone(),
            description: role.description.clone(),
            use_yn: role.use_yn,
        }
    }
}
