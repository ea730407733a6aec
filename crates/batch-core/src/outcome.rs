//! 条目结果与批处理汇总

use serde::Serialize;

pub const MSG_CREATED: &str = "created";
pub const MSG_UPDATED: &str = "updated";
pub const MSG_DELETED: &str = "deleted";

/// 成功条目
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessOutcome<R> {
    /// 在输入中的位置
    pub index: usize,
    pub record: R,
    pub message: String,
}

/// 失败条目
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureOutcome<ID> {
    /// 在输入中的位置
    pub index: usize,
    pub identifier: Option<ID>,
    pub display_name: Option<String>,
    pub reason: String,
}

/// 单个条目的最终结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ItemOutcome<R, ID> {
    Success(SuccessOutcome<R>),
    Failure(FailureOutcome<ID>),
}

impl<R, ID> ItemOutcome<R, ID> {
    pub fn success(index: usize, record: R, message: impl Into<String>) -> Self {
        Self::Success(SuccessOutcome {
            index,
            record,
            message: message.into(),
        })
    }

    pub fn failure(
        index: usize,
        identifier: Option<ID>,
        display_name: Option<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Failure(FailureOutcome {
            index,
            identifier,
            display_name,
            reason: reason.into(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// 批处理汇总结果
///
/// 不变式：`total_count == success_count + fail_count`，
/// 计数与两个列表长度一致，列表内保持输入顺序
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult<R, ID> {
    pub total_count: usize,
    pub success_count: usize,
    pub fail_count: usize,
    pub successes: Vec<SuccessOutcome<R>>,
    pub failures: Vec<FailureOutcome<ID>>,
}

impl<R, ID> BatchResult<R, ID> {
    pub fn new() -> Self {
        Self {
            total_count: 0,
            success_count: 0,
            fail_count: 0,
            successes: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// 追加一个条目结果，按调用顺序保持输入顺序
    pub fn push(&mut self, outcome: ItemOutcome<R, ID>) {
        self.total_count += 1;
        match outcome {
            ItemOutcome::Success(success) => {
                self.success_count += 1;
                self.successes.push(success);
            }
            ItemOutcome::Failure(failure) => {
                self.fail_count += 1;
                self.failures.push(failure);
            }
        }
    }

    /// 全部成功（空批次也视为成功）
    pub fn all_succeeded(&self) -> bool {
        self.fail_count == 0
    }
}

impl<R, ID> Default for BatchResult<R, ID> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, ID> FromIterator<ItemOutcome<R, ID>> for BatchResult<R, ID> {
    fn from_iter<I: IntoIterator<Item = ItemOutcome<R, ID>>>(iter: I) -> Self {
        let mut result = Self::new();
        for outcome in iter {
            result.push(outcome);
        }
        result
    }
}
