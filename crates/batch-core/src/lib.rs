//! wdms-batch-core - 批量新增/修改/删除协调器
//!
//! 逐条处理批量请求，单条失败不影响其他条目，最终汇总为 [`BatchResult`]。
//! 只有致命错误（请求结构非法、存储不可用）才会中止整个批次。

mod error;
mod item;
mod outcome;
mod policy;
mod reconciler;
pub mod rules;

pub use error::*;
pub use item::*;
pub use outcome::*;
pub use policy::*;
pub use reconciler::*;
