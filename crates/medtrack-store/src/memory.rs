//! In-process gateway

use async_trait::async_trait;
use medtrack_core::{
    DataGateway, GatewayError, MutationResponse, PersonnelPayload, PersonnelRecord,
    TransactionsPayload,
};
use std::sync::{PoisonError, RwLock};

use crate::StoreDocument;

/// Gateway over a document held in memory
#[derive(Debug, Default)]
pub struct MemoryGateway {
    document: RwLock<StoreDocument>,
    /// Status every submit answers with; the success status when unset
    submit_status: Option<String>,
}

impl MemoryGateway {
    pub fn new(document: StoreDocument) -> Self {
        Self {
            document: RwLock::new(document),
            submit_status: None,
        }
    }

    /// Answer every submit with `status` instead of success
    pub fn with_submit_status(mut self, status: impl Into<String>) -> Self {
        self.submit_status = Some(status.into());
        self
    }

    pub fn snapshot(&self) -> StoreDocument {
        self.document
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl DataGateway for MemoryGateway {
    async fn fetch_transactions(&self) -> Result<TransactionsPayload, GatewayError> {
        Ok(TransactionsPayload {
            transactions: self.snapshot().transactions,
        })
    }

    async fn fetch_personnel(&self) -> Result<PersonnelPayload, GatewayError> {
        Ok(PersonnelPayload {
            personnel: self.snapshot().personnel,
        })
    }

    async fn submit_personnel(
        &self,
        personnel: Vec<PersonnelRecord>,
    ) -> Result<MutationResponse, GatewayError> {
        let response = match &self.submit_status {
            Some(status) => MutationResponse {
                status: status.clone(),
            },
            None => MutationResponse::success(),
        };
        if response.is_success() {
            log::debug!(
                target: "medtrack::store",
                "Replacing register with {} personnel",
                personnel.len()
            );
            self.document
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .personnel = personnel;
        }
        Ok(response)
    }
}
