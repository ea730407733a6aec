//! Application layer

pub mod policies;
pub mod service;

pub use policies::*;
pub use service::{MasterDataPorts, MasterDataService};
