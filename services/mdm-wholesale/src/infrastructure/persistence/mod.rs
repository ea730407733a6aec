//! 持久化适配器

mod dependents;
mod memory;
mod store;

pub use dependents::{CompositeDependents, ExternalDependents, ScanDependents};
pub use memory::InMemoryRepository;
pub use store::InMemoryStore;
