//! JSON document gateway

use async_trait::async_trait;
use medtrack_core::{
    DataGateway, GatewayError, MutationResponse, PersonnelPayload, PersonnelRecord,
    TransactionsPayload,
};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use crate::error::StoreResult;
use crate::StoreDocument;

/// Gateway over a single JSON file holding `{ "transactions", "personnel" }`.
///
/// A missing file reads as an empty document. Submits rewrite the whole file.
#[derive(Debug)]
pub struct JsonFileGateway {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> StoreResult<StoreDocument> {
        match fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(StoreDocument::default()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!(
                    target: "medtrack::store",
                    "Store file {} not found, starting empty",
                    self.path.display()
                );
                Ok(StoreDocument::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write_document(&self, document: &StoreDocument) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, content).await?;
        Ok(())
    }

    async fn replace_personnel(&self, personnel: Vec<PersonnelRecord>) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        document.personnel = personnel;
        self.write_document(&document).await
    }
}

#[async_trait]
impl DataGateway for JsonFileGateway {
    async fn fetch_transactions(&self) -> Result<TransactionsPayload, GatewayError> {
        let document = self.read_document().await?;
        Ok(TransactionsPayload {
            transactions: document.transactions,
        })
    }

    async fn fetch_personnel(&self) -> Result<PersonnelPayload, GatewayError> {
        let document = self.read_document().await?;
        Ok(PersonnelPayload {
            personnel: document.personnel,
        })
    }

    async fn submit_personnel(
        &self,
        personnel: Vec<PersonnelRecord>,
    ) -> Result<MutationResponse, GatewayError> {
        let count = personnel.len();
        self.replace_personnel(personnel).await?;
        log::info!(
            target: "medtrack::store",
            "Wrote register of {} personnel to {}",
            count,
            self.path.display()
        );
        Ok(MutationResponse::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medtrack_core::Action;

    const DOCUMENT: &str = r#"{
        "transactions": [
            {
                "id": "t1",
                "action": "Dispense",
                "time": "2024-03-15T15:04:05Z",
                "recipient": "Carol",
                "commodities": [
                    { "id": "c1", "name": "Gauze", "oldValue": 10, "newValue": 7 }
                ]
            }
        ],
        "personnel": [
            { "name": "Alice", "affiliation": "H1" }
        ]
    }"#;

    #[tokio::test]
    async fn test_reads_both_datasets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, DOCUMENT).unwrap();
        let gateway = JsonFileGateway::new(&path);

        let transactions = gateway.fetch_transactions().await.unwrap().transactions;
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].action, Action::Dispense);
        assert_eq!(transactions[0].commodities[0].delta(), -3);

        let personnel = gateway.fetch_personnel().await.unwrap().personnel;
        assert_eq!(personnel, vec![PersonnelRecord::new("Alice", "H1")]);
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = JsonFileGateway::new(dir.path().join("absent.json"));

        assert!(gateway.fetch_transactions().await.unwrap().transactions.is_empty());
        assert!(gateway.fetch_personnel().await.unwrap().personnel.is_empty());
    }

    #[tokio::test]
    async fn test_submit_rewrites_register_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, DOCUMENT).unwrap();
        let gateway = JsonFileGateway::new(&path);

        let next = vec![PersonnelRecord::new("Bob", "H2"), PersonnelRecord::new("Carol", "H3")];
        let response = gateway.submit_personnel(next.clone()).await.unwrap();

        assert!(response.is_success());
        assert_eq!(gateway.fetch_personnel().await.unwrap().personnel, next);
        assert_eq!(gateway.fetch_transactions().await.unwrap().transactions.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = JsonFileGateway::new(dir.path().join("nested").join("store.json"));

        gateway
            .submit_personnel(vec![PersonnelRecord::new("Alice", "H1")])
            .await
            .unwrap();
        assert!(gateway.path().exists());
    }

    #[tokio::test]
    async fn test_invalid_json_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();
        let gateway = JsonFileGateway::new(&path);

        let err = gateway.fetch_personnel().await.unwrap_err();
        assert!(matches!(err, GatewayError::Malformed { .. }));
    }
}
