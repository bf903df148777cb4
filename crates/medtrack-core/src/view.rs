//! View models handed to the presentation layer
//!
//! These carry display strings and UI-mode flags only; layout belongs to
//! whoever renders them.

use medtrack_config::{SortMode, SortOrder};
use serde::{Deserialize, Serialize};

use crate::models::{Action, PersonnelRecord, TransactionRecord};
use crate::time::time_label;

/// Colour of a delta tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaTone {
    Positive,
    Negative,
}

impl From<Action> for DeltaTone {
    fn from(action: Action) -> Self {
        match action {
            Action::Update => DeltaTone::Positive,
            Action::Dispense => DeltaTone::Negative,
        }
    }
}

/// Label for a stock change.
///
/// Replenishments always read as a gain (`+5`). Dispenses show the raw delta
/// whatever its sign.
pub fn delta_label(action: Action, delta: i128) -> String {
    match action {
        Action::Update => format!("+{}", delta.unsigned_abs()),
        Action::Dispense => delta.to_string(),
    }
}

/// One commodity line of a transaction card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommodityRow {
    pub name: String,
    /// Recipient or restocking user
    pub counterpart: String,
    pub delta_label: String,
    pub tone: DeltaTone,
}

/// A transaction rendered as a card with its own small table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionCard {
    pub id: String,
    pub heading: String,
    pub time_label: String,
    pub commodity_column: String,
    pub counterpart_column: String,
    pub amount_column: String,
    pub rows: Vec<CommodityRow>,
}

impl TransactionCard {
    pub fn from_record(record: &TransactionRecord) -> Self {
        let counterpart = record.counterpart().unwrap_or_default().to_string();
        let rows = record
            .commodities
            .iter()
            .map(|c| CommodityRow {
                name: c.name.clone(),
                counterpart: counterpart.clone(),
                delta_label: delta_label(record.action, c.delta()),
                tone: record.action.into(),
            })
            .collect();

        Self {
            id: record.id.clone(),
            heading: record.action.heading().to_string(),
            time_label: time_label(&record.time),
            commodity_column: record.action.commodity_column().to_string(),
            counterpart_column: record.action.counterpart_column().to_string(),
            amount_column: record.action.amount_column().to_string(),
            rows,
        }
    }
}

/// Transaction dashboard as the renderer sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionViewModel {
    pub sort_order: SortOrder,
    pub cards: Vec<TransactionCard>,
}

/// Contents of the two free-text inputs of the add dialog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub name: String,
    pub affiliation: String,
}

/// UI-mode flags of the personnel register
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonnelFlags {
    /// Delete buttons are shown next to each row
    pub removal_layout: bool,
    pub add_dialog_open: bool,
    /// Name and hospital inputs are read-only
    pub inputs_locked: bool,
    /// The final "Add Personnel" button accepts clicks
    pub add_enabled: bool,
    /// Text of the delete confirmation dialog, when it is open
    pub delete_prompt: Option<String>,
    /// A submission is in flight
    pub submitting: bool,
}

/// Personnel register as the renderer sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonnelViewModel {
    pub search_term: String,
    pub sort_mode: SortMode,
    pub rows: Vec<PersonnelRecord>,
    pub draft: Draft,
    pub flags: PersonnelFlags,
}

/// Confirmation dialog text for deleting `name`
pub fn delete_prompt(name: &str) -> String {
    format!(
        "Are you sure you want to delete {} from the register? This cannot be undone.",
        name
    )
}
