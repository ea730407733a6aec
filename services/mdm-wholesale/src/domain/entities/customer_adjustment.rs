//! 客户余额调整

use batch_core::ValidationError;
use batch_core::rules;
use chrono::NaiveDate;
use common::{AuditInfo, CustomerId, TenantId, UserId};
use domain_core::{Currency, Money};
use serde::{Deserialize, Serialize};

use crate::domain::{CustomerAdjustmentId, touch};

/// 客户余额调整
///
/// 正数增加余额，负数减少余额，不允许为零
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerAdjustment {
    pub id: CustomerAdjustmentId,
    pub tenant_id: TenantId,
    pub customer_id: CustomerId,
    pub amount: Money,
    pub reason: String,
    pub adjusted_on: NaiveDate,
    pub audit_info: AuditInfo,
}

impl_record!(CustomerAdjustment, CustomerAdjustmentId);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAdjustmentFields {
    pub customer_id: Option<CustomerId>,
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub reason: Option<String>,
    pub adjusted_on: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct CustomerAdjustmentDraft {
    pub customer_id: CustomerId,
    pub amount: Money,
    pub reason: String,
    pub adjusted_on: NaiveDate,
}

impl CustomerAdjustmentFields {
    pub fn validate(self) -> Result<CustomerAdjustmentDraft, ValidationError> {
        let customer_id = rules::required(self.customer_id, "customer_id")?;
        let amount = rules::required(self.amount, "amount")?;
        let currency = rules::optional_text(self.currency)
            .map(|code| Currency::new(&code))
            .unwrap_or_default();
        let amount = Money::new(amount, currency);
        if amount.is_zero() {
            return Err(ValidationError::invalid_value("amount"));
        }

        Ok(CustomerAdjustmentDraft {
            customer_id,
            amount,
            reason: rules::required_text(self.reason, "reason")?,
            adjusted_on: rules::required(self.adjusted_on, "adjusted_on")?,
        })
    }
}

impl CustomerAdjustment {
    pub fn create(
        tenant_id: TenantId,
        user_id: Option<UserId>,
        draft: CustomerAdjustmentDraft,
    ) -> Self {
        Self {
            id: CustomerAdjustmentId::new(),
            tenant_id,
            customer_id: draft.customer_id,
            amount: draft.amount,
            reason: draft.reason,
            adjusted_on: draft.adjusted_on,
            audit_info: AuditInfo::new(user_id),
        }
    }

    pub fn apply(&mut self, draft: CustomerAdjustmentDraft, user_id: Option<UserId>) -> bool {
        let mut changed = rules::replace(&mut self.customer_id, draft.customer_id);
        changed |= rules::replace(&mut self.amount, draft.amount);
        changed |= rules::replace(&mut self.reason, draft.reason);
        changed |= rules::replace(&mut self.adjusted_on, draft.adjusted_on);
        touch(self, changed, user_id)
    }

    /// 是否为减少余额的调整
    pub fn is_deduction(&self) -> bool {
        self.amount.is_negative()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAdjustmentResponse {
    pub id: CustomerAdjustmentId,
    pub customer_id: CustomerId,
    pub amount: Money,
    pub reason: String,
    pub adjusted_on: NaiveDate,
}

impl From<&CustomerAdjustment> for CustomerAdjustmentResponse {
    fn from(adjustment: &CustomerAdjustment) -> Self {
        Self {
            id: adjustment.id,
            customer_id: adjustment.customer_id,
            amount: adjustment.amount.clone(),
            reason: adjustment.reason.clone(),
            adjusted_on: adjustment.adjusted_on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_amount_is_a_deduction() {
        let fields = CustomerAdjustmentFields {
            customer_id: Some(CustomerId::new()),
            amount: Some(-3_000),
            reason: Some("반품 차감".to_string()),
            adjusted_on: NaiveDate::from_ymd_opt(2024, 5, 2),
            ..Default::default()
        };
        let adjustment =
            CustomerAdjustment::create(TenantId::new(), None, fields.validate().unwrap());
        assert!(adjustment.is_deduction());
    }

    #[test]
    fn test_zero_amount_rejected() {
        let fields = CustomerAdjustmentFields {
            customer_id: Some(CustomerId::new()),
            amount: Some(0),
            reason: Some("정정".to_string()),
            adjusted_on: NaiveDate::from_ymd_opt(2024, 5, 2),
            ..Default::default()
        };
        assert_eq!(
            fields.validate().unwrap_err(),
            ValidationError::invalid_value("amount")
        );
    }
}
