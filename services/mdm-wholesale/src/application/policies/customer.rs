//! 角色、客户用户、入金、余额调整、虚拟账户

use std::sync::Arc;

use async_trait::async_trait;
use batch_core::{BatchContext, BatchPolicy, ItemError, ValidationError};
use errors::AppResult;
use ports::{DependentLookup, DependentRef, Repository};

use crate::domain::{
    CustomerAdjustment, CustomerAdjustmentDraft, CustomerAdjustmentFields, CustomerAdjustmentId,
    CustomerAdjustmentResponse, CustomerDeposit, CustomerDepositDraft, CustomerDepositFields,
    CustomerDepositId, CustomerDepositResponse, CustomerUser, CustomerUserDraft,
    CustomerUserFields, CustomerUserId, CustomerUserResponse, Role, RoleDraft, RoleFields, RoleId,
    RoleResponse, VirtualAccount, VirtualAccountDraft, VirtualAccountFields, VirtualAccountId,
    VirtualAccountResponse,
};

use super::ensure_reference;

// ========== 角色 ==========

pub struct RolePolicy {
    dependents: Arc<dyn DependentLookup<RoleId>>,
}

impl RolePolicy {
    pub fn new(dependents: Arc<dyn DependentLookup<RoleId>>) -> Self {
        Self { dependents }
    }
}

#[async_trait]
impl BatchPolicy for RolePolicy {
    type Id = RoleId;
    type Fields = RoleFields;
    type Draft = RoleDraft;
    type Record = Role;
    type Response = RoleResponse;

    const ENTITY: &'static str = "role";

    fn display_name(&self, fields: &RoleFields) -> Option<String> {
        fields.name.clone().or_else(|| fields.code.clone())
    }

    fn record_name(&self, record: &Role) -> Option<String> {
        Some(record.name.clone())
    }

    fn validate(&self, fields: RoleFields) -> Result<RoleDraft, ValidationError> {
        fields.validate()
    }

    fn create(&self, ctx: &BatchContext, draft: RoleDraft) -> Role {
        Role::create(ctx.tenant_id, ctx.user_id, draft)
    }

    fn apply(&self, ctx: &BatchContext, record: &mut Role, draft: RoleDraft) {
        record.apply(draft, ctx.user_id);
    }

    async fn find_dependents(&self, record: &Role) -> AppResult<Vec<DependentRef>> {
        self.dependents.find_dependents(&record.id).await
    }

    fn to_response(&self, record: &Role) -> RoleResponse {
        record.into()
    }
}

// ========== 客户用户 ==========

pub struct CustomerUserPolicy {
    roles: Arc<dyn Repository<Role, RoleId>>,
}

impl CustomerUserPolicy {
    pub fn new(roles: Arc<dyn Repository<Role, RoleId>>) -> Self {
        Self { roles }
    }
}

#[async_trait]
impl BatchPolicy for CustomerUserPolicy {
    type Id = CustomerUserId;
    type Fields = CustomerUserFields;
    type Draft = CustomerUserDraft;
    type Record = CustomerUser;
    type Response = CustomerUserResponse;

    const ENTITY: &'static str = "customer_user";

    fn display_name(&self, fields: &CustomerUserFields) -> Option<String> {
        fields.login_id.clone().or_else(|| fields.name.clone())
    }

    fn record_name(&self, record: &CustomerUser) -> Option<String> {
        Some(record.login_id.clone())
    }

    fn validate(&self, fields: CustomerUserFields) -> Result<CustomerUserDraft, ValidationError> {
        fields.validate()
    }

    async fn check_references(
        &self,
        ctx: &BatchContext,
        _id: Option<&CustomerUserId>,
        draft: &CustomerUserDraft,
    ) -> Result<(), ItemError> {
        match &draft.role_id {
            Some(role_id) => ensure_reference(self.roles.as_ref(), ctx, role_id, "role_id").await,
            None => Ok(()),
        }
    }

    fn create(&self, ctx: &BatchContext, draft: CustomerUserDraft) -> CustomerUser {
        CustomerUser::create(ctx.tenant_id, ctx.user_id, draft)
    }

    fn apply(&self, ctx: &BatchContext, record: &mut CustomerUser, draft: CustomerUserDraft) {
        record.apply(draft, ctx.user_id);
    }

    fn to_response(&self, record: &CustomerUser) -> CustomerUserResponse {
        record.into()
    }
}

// ========== 入金 ==========

#[derive(Default)]
pub struct CustomerDepositPolicy;

#[async_trait]
impl BatchPolicy for CustomerDepositPolicy {
    type Id = CustomerDepositId;
    type Fields = CustomerDepositFields;
    type Draft = CustomerDepositDraft;
    type Record = CustomerDeposit;
    type Response = CustomerDepositResponse;

    const ENTITY: &'static str = "customer_deposit";

    fn display_name(&self, fields: &CustomerDepositFields) -> Option<String> {
        fields.depositor.clone()
    }

    fn record_name(&self, record: &CustomerDeposit) -> Option<String> {
        record.depositor.clone()
    }

    fn validate(
        &self,
        fields: CustomerDepositFields,
    ) -> Result<CustomerDepositDraft, ValidationError> {
        fields.validate()
    }

    fn create(&self, ctx: &BatchContext, draft: CustomerDepositDraft) -> CustomerDeposit {
        CustomerDeposit::create(ctx.tenant_id, ctx.user_id, draft)
    }

    fn apply(&self, ctx: &BatchContext, record: &mut CustomerDeposit, draft: CustomerDepositDraft) {
        record.apply(draft, ctx.user_id);
    }

    fn to_response(&self, record: &CustomerDeposit) -> CustomerDepositResponse {
        record.into()
    }
}

// ========== 余额调整 ==========

#[derive(Default)]
pub struct CustomerAdjustmentPolicy;

#[async_trait]
impl BatchPolicy for CustomerAdjustmentPolicy {
    type Id = CustomerAdjustmentId;
    type Fields = CustomerAdjustmentFields;
    type Draft = CustomerAdjustmentDraft;
    type Record = CustomerAdjustment;
    type Response = CustomerAdjustmentResponse;

    const ENTITY: &'static str = "customer_adjustment";

    fn display_name(&self, fields: &CustomerAdjustmentFields) -> Option<String> {
        fields.reason.clone()
    }

    fn record_name(&self, record: &CustomerAdjustment) -> Option<String> {
        Some(record.reason.clone())
    }

    fn validate(
        &self,
        fields: CustomerAdjustmentFields,
    ) -> Result<CustomerAdjustmentDraft, ValidationError> {
        fields.validate()
    }

    fn create(&self, ctx: &BatchContext, draft: CustomerAdjustmentDraft) -> CustomerAdjustment {
        CustomerAdjustment::create(ctx.tenant_id, ctx.user_id, draft)
    }

    fn apply(
        &self,
        ctx: &BatchContext,
        record: &mut CustomerAdjustment,
        draft: CustomerAdjustmentDraft,
    ) {
        record.apply(draft, ctx.user_id);
    }

    fn to_response(&self, record: &CustomerAdjustment) -> CustomerAdjustmentResponse {
        record.into()
    }
}

// ========== 虚拟账户 ==========

#[derive(Default)]
pub struct VirtualAccountPolicy;

#[async_trait]
impl BatchPolicy for VirtualAccountPolicy {
    type Id = VirtualAccountId;
    type Fields = VirtualAccountFields;
    type Draft = VirtualAccountDraft;
    type Record = VirtualAccount;
    type Response = VirtualAccountResponse;

    const ENTITY: &'static str = "virtual_account";

    fn display_name(&self, fields: &VirtualAccountFields) -> Option<String> {
        fields.account_number.clone()
    }

    fn record_name(&self, record: &VirtualAccount) -> Option<String> {
        Some(format!("{} {}", record.bank_code, record.account_number))
    }

    fn validate(
        &self,
        fields: VirtualAccountFields,
    ) -> Result<VirtualAccountDraft, ValidationError> {
        fields.validate()
    }

    fn create(&self, ctx: &BatchContext, draft: VirtualAccountDraft) -> VirtualAccount {
        VirtualAccount::create(ctx.tenant_id, ctx.user_id, draft)
    }

    fn apply(&self, ctx: &BatchContext, record: &mut VirtualAccount, draft: VirtualAccountDraft) {
        record.apply(draft, ctx.user_id);
    }

    fn to_response(&self, record: &VirtualAccount) -> VirtualAccountResponse {
        record.into()
    }
}
