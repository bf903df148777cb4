//! Remote data gateway the views read from and submit to

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{MutationResponse, PersonnelPayload, PersonnelRecord, TransactionsPayload};

/// Failure reported by a gateway call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Gateway unavailable: {message}")]
    Unavailable { message: String },

    #[error("Mutation rejected with status {status}")]
    Rejected { status: String },

    #[error("Malformed response: {message}")]
    Malformed { message: String },
}

/// Gateway reference type
pub type GatewayRef = Arc<dyn DataGateway>;

/// Queries and the single mutation the views issue against the remote API
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// Read-only transaction history query
    async fn fetch_transactions(&self) -> Result<TransactionsPayload, GatewayError>;

    /// Read-only personnel register query
    async fn fetch_personnel(&self) -> Result<PersonnelPayload, GatewayError>;

    /// Replace the whole personnel register with `personnel`.
    ///
    /// Callers always pass the complete end state, never a delta.
    async fn submit_personnel(
        &self,
        personnel: Vec<PersonnelRecord>,
    ) -> Result<MutationResponse, GatewayError>;
}
