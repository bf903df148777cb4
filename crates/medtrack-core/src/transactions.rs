//! Transaction dashboard controller
//!
//! Read-only: fetches the transaction history once and derives a time-sorted
//! projection from it on demand.

use medtrack_config::{Config, SortOrder};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{CoreError, CoreResult};
use crate::gateway::GatewayRef;
use crate::models::TransactionRecord;
use crate::projection::{sort_transactions, LoadState, LoadStatus};
use crate::view::{TransactionCard, TransactionViewModel};

#[derive(Debug, Default)]
struct TransactionState {
    data: LoadState<TransactionRecord>,
    sort_order: SortOrder,
    detached: bool,
}

/// Controller behind the transaction history view
pub struct TransactionView {
    gateway: GatewayRef,
    state: RwLock<TransactionState>,
}

impl TransactionView {
    pub fn new(gateway: GatewayRef, sort_order: SortOrder) -> Self {
        Self {
            gateway,
            state: RwLock::new(TransactionState {
                sort_order,
                ..Default::default()
            }),
        }
    }

    pub fn from_config(gateway: GatewayRef, config: &Config) -> Self {
        Self::new(gateway, config.views.transaction_sort)
    }

    fn read(&self) -> RwLockReadGuard<'_, TransactionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TransactionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch the transaction history and replace the stored dataset
    pub async fn load(&self) -> CoreResult<Vec<TransactionRecord>> {
        if self.read().detached {
            return Err(CoreError::Detached);
        }

        let result = self.gateway.fetch_transactions().await;

        let mut state = self.write();
        if state.detached {
            log::debug!(
                target: "medtrack::transactions",
                "Discarding fetch result for detached view"
            );
            return Err(CoreError::Detached);
        }
        match result {
            Ok(payload) => {
                log::info!(
                    target: "medtrack::transactions",
                    "Loaded {} transactions",
                    payload.transactions.len()
                );
                state.data = LoadState::Ready(payload.transactions.clone());
                Ok(payload.transactions)
            }
            Err(err) => {
                log::warn!(
                    target: "medtrack::transactions",
                    "Failed to fetch transactions: {}",
                    err
                );
                state.data = LoadState::Failed(err.to_string());
                Err(CoreError::LoadFailed {
                    message: err.to_string(),
                })
            }
        }
    }

    pub fn status(&self) -> LoadStatus {
        self.read().data.status()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.read().sort_order
    }

    pub fn set_sort_order(&self, order: SortOrder) {
        self.write().sort_order = order;
    }

    /// The dataset sorted by time under the current order
    pub fn projection(&self) -> CoreResult<Vec<TransactionRecord>> {
        let state = self.read();
        let records = state.data.records()?;
        Ok(sort_transactions(records, state.sort_order))
    }

    pub fn view_model(&self) -> CoreResult<TransactionViewModel> {
        let cards = self
            .projection()?
            .iter()
            .map(TransactionCard::from_record)
            .collect();
        Ok(TransactionViewModel {
            sort_order: self.sort_order(),
            cards,
        })
    }

    /// Stop applying gateway results; the view has gone away
    pub fn detach(&self) {
        self.write().detached = true;
    }
}
