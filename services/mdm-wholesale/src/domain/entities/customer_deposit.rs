//! 客户入金

use batch_core::ValidationError;
use batch_core::rules;
use chrono::NaiveDate;
use common::{AuditInfo, CustomerId, TenantId, UserId};
use domain_core::{Currency, Money};
use serde::{Deserialize, Serialize};

use crate::domain::{CustomerDepositId, touch};

/// 客户入金记录
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDeposit {
    pub id: CustomerDepositId,
    pub tenant_id: TenantId,
    pub customer_id: CustomerId,
    /// 入金金额，必须为正
    pub amount: Money,
    pub deposited_on: NaiveDate,
    /// 汇款人
    pub depositor: Option<String>,
    pub memo: Option<String>,
    pub audit_info: AuditInfo,
}

impl_record!(CustomerDeposit, CustomerDepositId);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDepositFields {
    pub customer_id: Option<CustomerId>,
    pub amount: Option<i64>,
    /// 币种，缺省为 KRW
    pub currency: Option<String>,
    pub deposited_on: Option<NaiveDate>,
    pub depositor: Option<String>,
    pub memo: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CustomerDepositDraft {
    pub customer_id: CustomerId,
    pub amount: Money,
    pub deposited_on: NaiveDate,
    pub depositor: Option<String>,
    pub memo: Option<String>,
}

impl CustomerDepositFields {
    pub fn validate(self) -> Result<CustomerDepositDraft, ValidationError> {
        let customer_id = rules::required(self.customer_id, "customer_id")?;
        let amount = rules::required(self.amount, "amount")?;
        let currency = rules::optional_text(self.currency)
            .map(|code| Currency::new(&code))
            .unwrap_or_default();
        let amount = Money::new(amount, currency);
        if !amount.is_positive() {
            return Err(ValidationError::invalid_value("amount"));
        }

        Ok(CustomerDepositDraft {
            customer_id,
            amount,
            deposited_on: rules::required(self.deposited_on, "deposited_on")?,
            depositor: rules::optional_text(self.depositor),
            memo: rules::optional_text(self.memo),
        })
    }
}

impl CustomerDeposit {
    pub fn create(
        tenant_id: TenantId,
        user_id: Option<UserId>,
        draft: CustomerDepositDraft,
    ) -> Self {
        Self {
            id: CustomerDepositId::new(),
            tenant_id,
            customer_id: draft.customer_id,
            amount: draft.amount,
            deposited_on: draft.deposited_on,
            depositor: draft.depositor,
            memo: draft.memo,
            audit_info: AuditInfo::new(user_id),
        }
    }

    pub fn apply(&mut self, draft: CustomerDepositDraft, user_id: Option<UserId>) -> bool {
        let mut changed = rules::replace(&mut self.customer_id, draft.customer_id);
        changed |= rules::replace(&mut self.amount, draft.amount);
        changed |= rules::replace(&mut self.deposited_on, draft.deposited_on);
        changed |= rules::replace(&mut self.depositor, draft.depositor);
        changed |= rules::replace(&mut self.memo, draft.memo);
        touch(self, changed, user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDepositResponse {
    pub id: CustomerDepositId,
    pub customer_id: CustomerId,
    pub amount: Money,
    pub deposited_on: NaiveDate,
    pub depositor: Option<String>,
    pub memo: Option<String>,
}

impl From<&CustomerDeposit> for CustomerDepositResponse {
    fn from(deposit: &CustomerDeposit) -> Self {
        Self {
            id: deposit.id,
            customer_id: deposit.customer_id,
            amount: deposit.amount.clone(),
            deposited_on: deposit.deposited_on,
            depositor: deposit.depositor.clone(),
            memo: deposit.memo.clone(),
        }
    }
}
