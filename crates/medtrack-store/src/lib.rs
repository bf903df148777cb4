//! Data gateways backing the medtrack views
//!
//! [`JsonFileGateway`] keeps both datasets in one JSON document on disk;
//! [`MemoryGateway`] keeps them in process.

pub mod error;
pub mod file;
pub mod memory;

use medtrack_core::{PersonnelRecord, TransactionRecord};
use serde::{Deserialize, Serialize};

pub use error::{StoreError, StoreResult};
pub use file::JsonFileGateway;
pub use memory::MemoryGateway;

/// Everything a gateway serves, as stored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
    #[serde(default)]
    pub personnel: Vec<PersonnelRecord>,
}
