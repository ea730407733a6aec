//! 客户虚拟账户（入金专用账号）

use batch_core::ValidationError;
use batch_core::rules::{self, DEFAULT_USE_YN};
use common::{AuditInfo, CustomerId, TenantId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::{VirtualAccountId, touch};

/// 虚拟账户
///
/// 银行代码 + 账号全局唯一
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualAccount {
    pub id: VirtualAccountId,
    pub tenant_id: TenantId,
    pub customer_id: CustomerId,
    pub bank_code: String,
    pub account_number: String,
    pub holder_name: Option<String>,
    pub use_yn: i16,
    pub audit_info: AuditInfo,
}

impl_record!(VirtualAccount, VirtualAccountId);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualAccountFields {
    pub customer_id: Option<CustomerId>,
    pub bank_code: Option<String>,
    pub account_number: Option<String>,
    pub holder_name: Option<String>,
    pub use_yn: Option<i16>,
}

#[derive(Debug, Clone)]
pub struct VirtualAccountDraft {
    pub customer_id: CustomerId,
    pub bank_code: String,
    pub account_number: String,
    pub holder_name: Option<String>,
    pub use_yn: Option<i16>,
}

impl VirtualAccountFields {
    pub fn validate(self) -> Result<VirtualAccountDraft, ValidationError> {
        let customer_id = rules::required(self.customer_id, "customer_id")?;
        let bank_code = rules::required_text(self.bank_code, "bank_code")?;
        rules::max_chars(&bank_code, 10, "bank_code")?;
        let account_number = rules::required_text(self.account_number, "account_number")?;
        if !account_number.chars().all(|c| c.is_ascii_digit() || c == '-') {
            return Err(ValidationError::invalid_value("account_number"));
        }

        Ok(VirtualAccountDraft {
            customer_id,
            bank_code,
            account_number,
            holder_name: rules::optional_text(self.holder_name),
            use_yn: rules::use_yn(self.use_yn)?,
        })
    }
}

impl VirtualAccount {
    pub fn create(
        tenant_id: TenantId,
        user_id: Option<UserId>,
        draft: VirtualAccountDraft,
    ) -> Self {
        Self {
            id: VirtualAccountId::new(),
            tenant_id,
            customer_id: draft.customer_id,
            bank_code: draft.bank_code,
            account_number: draft.account_number,
            holder_name: draft.holder_name,
            use_yn: draft.use_yn.unwrap_or(DEFAULT_USE_YN),
            audit_info: AuditInfo::new(user_id),
        }
    }

    pub fn apply(&mut self, draft: VirtualAccountDraft, user_id: Option<UserId>) -> bool {
        let mut changed = rules::replace(&mut self.customer_id, draft.customer_id);
        changed |= rules::replace(&mut self.bank_code, draft.bank_code);
        changed |= rules::replace(&mut self.account_number, draft.account_number);
        changed |= rules::replace(&mut self.holder_name, draft.holder_name);
        if let Some(use_yn) = draft.use_yn {
            changed |= rules::replace(&mut self.use_yn, use_yn);
        }
        touch(self, changed, user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualAccountResponse {
    pub id: VirtualAccountId,
    pub customer_id: CustomerId,
    pub bank_code: String,
    pub account_number: String,
    pub holder_name: Option<String>,
    pub use_yn: i16,
}

impl From<&VirtualAccount> for VirtualAccountResponse {
    fn from(account: &VirtualAccount) -> Self {
        Self {
            id: account.id,
            customer_id: account.customer_id,
            bank_code: account.bank_code.clone(),
            account_number: account.account_number.clone(),
            holder_name: account.holder_name.clone(),
            use_yn: account.use_yn,
        }
    }
}
