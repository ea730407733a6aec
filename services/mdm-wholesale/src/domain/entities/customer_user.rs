//! 客户用户（客户方登录账号）

use batch_core::ValidationError;
use batch_core::rules::{self, DEFAULT_USE_YN};
use common::{AuditInfo, CustomerId, TenantId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::{CustomerUserId, RoleId, touch};

/// 客户用户
///
/// 登录 ID 全局唯一
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerUser {
    pub id: CustomerUserId,
    pub tenant_id: TenantId,
    pub customer_id: CustomerId,
    pub login_id: String,
    pub name: String,
    pub role_id: Option<RoleId>,
    pub phone: Option<String>,
    pub use_yn: i16,
    pub audit_info: AuditInfo,
}

impl_record!(CustomerUser, CustomerUserId);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUserFields {
    pub customer_id: Option<CustomerId>,
    pub login_id: Option<String>,
    pub name: Option<String>,
    pub role_id: Option<RoleId>,
    pub phone: Option<String>,
    pub use_yn: Option<i16>,
}

#[derive(Debug, Clone)]
pub struct CustomerUserDraft {
    pub customer_id: CustomerId,
    pub login_id: String,
    pub name: String,
    pub role_id: Option<RoleId>,
    pub phone: Option<String>,
    pub use_yn: Option<i16>,
}

impl CustomerUserFields {
    pub fn validate(self) -> Result<CustomerUserDraft, ValidationError> {
        let customer_id = rules::required(self.customer_id, "customer_id")?;
        let login_id = rules::required_text(self.login_id, "login_id")?;
        rules::max_chars(&login_id, 50, "login_id")?;

        Ok(CustomerUserDraft {
            customer_id,
            login_id,
            name: rules::required_text(self.name, "name")?,
            role_id: self.role_id,
            phone: rules::optional_text(self.phone),
            use_yn: rules::use_yn(self.use_yn)?,
        })
    }
}

impl CustomerUser {
    pub fn create(tenant_id: TenantId, user_id: Option<UserId>, draft: CustomerUserDraft) -> Self {
        Self {
            id: CustomerUserId::new(),
            tenant_id,
            customer_id: draft.customer_id,
            login_id: draft.login_id,
            name: draft.name,
            role_id: draft.role_id,
            phone: draft.phone,
            use_yn: draft.use_yn.unwrap_or(DEFAULT_USE_YN),
            audit_info: AuditInfo::new(user_id),
        }
    }

    pub fn apply(&mut self, draft: CustomerUserDraft, user_id: Option<UserId>) -> bool {
        let mut changed = rules::replace(&mut self.customer_id, draft.customer_id);
        changed |= rules::replace(&mut self.login_id, draft.login_id);
        changed |= rules::replace(&mut self.name, draft.name);
        changed |= rules::replace(&mut self.role_id, draft.role_id);
        changed |= rules::replace(&mut self.phone, draft.phone);
        if let Some(use_yn) = draft.use_yn {
            changed |= rules::replace(&mut self.use_yn, use_yn);
        }
        touch(self, changed, user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUserResponse {
    pub id: CustomerUserId,
    pub customer_id: CustomerId,
    pub login_id: String,
    pub name: String,
    pub role_id: Option<RoleId>,
    pub phone: Option<String>,
    pub use_yn: i16,
}

impl From<&CustomerUser> for CustomerUserResponse {
    fn from(user: &CustomerUser) -> Self {
        Self {
            id: user.id,
            customer_id: user.customer_id,
            login_id: user.login_id.clone(),
            name: user.name.clone(),
            role_id: user.role_id,
            phone: user.phone.clone(),
            use_yn: user.use_yn,
        }
    }
}
