//! Scripted gateway and recording notifier for controller tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::gateway::{DataGateway, GatewayError};
use crate::models::{
    MutationResponse, PersonnelPayload, PersonnelRecord, TransactionRecord, TransactionsPayload,
};
use crate::notify::{Notification, NotificationStyle, Notifier};

#[derive(Default)]
pub struct ScriptedGateway {
    pub transactions: Mutex<Vec<TransactionRecord>>,
    pub personnel: Mutex<Vec<PersonnelRecord>>,
    /// Status returned by submit; "SUCCESS" when unset
    pub submit_status: Mutex<Option<String>>,
    pub fail_fetch: AtomicBool,
    pub fail_submit: AtomicBool,
    pub submissions: Mutex<Vec<Vec<PersonnelRecord>>>,
    pub personnel_fetches: AtomicUsize,
    /// When set, every call waits for a permit before answering
    pub gate: Option<Arc<Notify>>,
}

impl ScriptedGateway {
    pub fn with_personnel(personnel: Vec<PersonnelRecord>) -> Self {
        Self {
            personnel: Mutex::new(personnel),
            ..Default::default()
        }
    }

    pub fn with_transactions(transactions: Vec<TransactionRecord>) -> Self {
        Self {
            transactions: Mutex::new(transactions),
            ..Default::default()
        }
    }

    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn submissions(&self) -> Vec<Vec<PersonnelRecord>> {
        self.submissions.lock().unwrap().clone()
    }

    async fn wait(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl DataGateway for ScriptedGateway {
    async fn fetch_transactions(&self) -> Result<TransactionsPayload, GatewayError> {
        self.wait().await;
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable {
                message: "offline".to_string(),
            });
        }
        Ok(TransactionsPayload {
            transactions: self.transactions.lock().unwrap().clone(),
        })
    }

    async fn fetch_personnel(&self) -> Result<PersonnelPayload, GatewayError> {
        self.wait().await;
        self.personnel_fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable {
                message: "offline".to_string(),
            });
        }
        Ok(PersonnelPayload {
            personnel: self.personnel.lock().unwrap().clone(),
        })
    }

    async fn submit_personnel(
        &self,
        personnel: Vec<PersonnelRecord>,
    ) -> Result<MutationResponse, GatewayError> {
        self.wait().await;
        self.submissions.lock().unwrap().push(personnel.clone());
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable {
                message: "connection reset".to_string(),
            });
        }
        let status = self
            .submit_status
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| "SUCCESS".to_string());
        let response = MutationResponse { status };
        if response.is_success() {
            *self.personnel.lock().unwrap() = personnel;
        }
        Ok(response)
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Message and style of every notification, in order
    pub fn sent(&self) -> Vec<(String, NotificationStyle)> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .map(|n| (n.message.clone(), n.style))
            .collect()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}
