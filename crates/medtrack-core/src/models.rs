//! Core data models shared by the views and the data gateway

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::time::parse_timestamp;

/// Status string the remote API returns for an accepted mutation
pub const MUTATION_SUCCESS: &str = "SUCCESS";

/// Kind of stock movement a transaction records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Stock was replenished
    Update,
    /// Stock was handed out to a recipient
    Dispense,
}

impl Action {
    /// Card heading
    pub fn heading(&self) -> &'static str {
        match self {
            Action::Update => "Replenishment",
            Action::Dispense => "Dispense",
        }
    }

    pub fn commodity_column(&self) -> &'static str {
        match self {
            Action::Update => "Stocked Commodity",
            Action::Dispense => "Dispensed Commodity",
        }
    }

    pub fn counterpart_column(&self) -> &'static str {
        match self {
            Action::Update => "Updated By",
            Action::Dispense => "Dispensed To",
        }
    }

    pub fn amount_column(&self) -> &'static str {
        match self {
            Action::Update => "Amount Restocked",
            Action::Dispense => "Amount Dispensed",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Update => write!(f, "Update"),
            Action::Dispense => write!(f, "Dispense"),
        }
    }
}

/// One commodity line inside a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommodityLineItem {
    pub id: String,
    pub name: String,
    /// Stock level before the transaction
    pub old_value: i64,
    /// Stock level after the transaction
    pub new_value: i64,
}

impl CommodityLineItem {
    /// Stock change caused by the transaction, widened so any pair of stock
    /// levels fits
    pub fn delta(&self) -> i128 {
        i128::from(self.new_value) - i128::from(self.old_value)
    }
}

/// A replenishment or dispense event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Unique transaction identifier
    pub id: String,
    pub action: Action,
    /// Timestamp as stored remotely (RFC 3339 or naive ISO 8601)
    pub time: String,
    /// Who received the commodities (Dispense only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    /// Who restocked (Update only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub commodities: Vec<CommodityLineItem>,
}

impl TransactionRecord {
    /// Parsed timestamp, `None` when the stored value is not a recognised format
    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.time)
    }

    /// The person shown next to each commodity line
    pub fn counterpart(&self) -> Option<&str> {
        match self.action {
            Action::Update => self.updated_by.as_deref(),
            Action::Dispense => self.recipient.as_deref(),
        }
    }
}

/// A registered recipient. The name doubles as the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonnelRecord {
    pub name: String,
    /// Hospital the person belongs to
    pub affiliation: String,
}

impl PersonnelRecord {
    pub fn new(name: impl Into<String>, affiliation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            affiliation: affiliation.into(),
        }
    }
}

/// Result of the fetch-transactions query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionsPayload {
    pub transactions: Vec<TransactionRecord>,
}

/// Result of the fetch-personnel query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonnelPayload {
    pub personnel: Vec<PersonnelRecord>,
}

/// Result of the submit-personnel mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub status: String,
}

impl MutationResponse {
    pub fn success() -> Self {
        Self {
            status: MUTATION_SUCCESS.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == MUTATION_SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_deserializes_remote_shape() {
        let json = r#"{
            "id": "t-1",
            "action": "Dispense",
            "time": "2024-03-15T15:04:05.000Z",
            "recipient": "Carol",
            "commodities": [
                {"id": "c-1", "name": "Amoxicillin", "oldValue": 40, "newValue": 35}
            ]
        }"#;
        let record: TransactionRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.action, Action::Dispense);
        assert_eq!(record.counterpart(), Some("Carol"));
        assert!(record.updated_by.is_none());
        assert_eq!(record.commodities[0].delta(), -5);
        assert!(record.timestamp().is_some());
    }

    #[test]
    fn test_delta_spans_full_stock_range() {
        let json = r#"{
            "id": "c-9",
            "name": "Gauze",
            "oldValue": -9223372036854775808,
            "newValue": 1
        }"#;
        let line: CommodityLineItem = serde_json::from_str(json).unwrap();

        assert_eq!(line.delta(), 9_223_372_036_854_775_809);
    }

    #[test]
    fn test_update_counterpart_is_updated_by() {
        let json =
            r#"{"id": "t-2", "action": "Update", "time": "2024-03-15", "updatedBy": "admin"}"#;
        let record: TransactionRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.counterpart(), Some("admin"));
        assert!(record.commodities.is_empty());
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(Action::Update.heading(), "Replenishment");
        assert_eq!(Action::Dispense.heading(), "Dispense");
        assert_eq!(Action::Update.counterpart_column(), "Updated By");
        assert_eq!(Action::Dispense.amount_column(), "Amount Dispensed");
    }

    #[test]
    fn test_mutation_response_status() {
        assert!(MutationResponse::success().is_success());
        let rejected = MutationResponse {
            status: "ERROR".to_string(),
        };
        assert!(!rejected.is_success());
    }
}
