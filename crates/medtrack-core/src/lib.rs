//! View controllers for the medical commodity dashboard
//!
//! Two controllers share one data gateway and one notification sink:
//! [`TransactionView`] is a read-only, time-sorted history, and
//! [`PersonnelView`] is the searchable register with its add and delete
//! workflows.

pub mod error;
pub mod gateway;
pub mod models;
pub mod notify;
pub mod personnel;
pub mod projection;
pub mod time;
pub mod transactions;
pub mod view;

#[cfg(test)]
mod testing;

pub use error::{CoreError, CoreResult, ErrorSeverity};
pub use gateway::{DataGateway, GatewayError, GatewayRef};
pub use models::{
    Action, CommodityLineItem, MutationResponse, PersonnelPayload, PersonnelRecord,
    TransactionRecord, TransactionsPayload,
};
pub use notify::{Notification, NotificationStyle, Notifier, NotifierRef};
pub use personnel::{EditState, MutationOutcome, PersonnelOptions, PersonnelView, Submission};
pub use projection::{LoadState, LoadStatus};
pub use transactions::TransactionView;
pub use view::{PersonnelViewModel, TransactionCard, TransactionViewModel};

pub use medtrack_config::{GatewayFailurePolicy, SortMode, SortOrder};
