//! Core data model definitions shared across carddesk crates.
#![allow(missing_docs)]

pub mod dispatch;
pub mod error;
pub mod ids;
pub mod item;
pub mod messenger;
pub mod prelude;
pub mod report;

// Intentionally curated re-exports for downstream consumers.
pub use dispatch::{
    CreateDispatchRequest, Dispatch, DispatchFilter, DispatchSummary,
};
pub use error::{ModelError, Result as ModelResult};
pub use ids::{DispatchId, MessengerId};
pub use item::ScannedItem;
pub use messenger::{CreateMessengerRequest, Messenger};
pub use report::{DailyReport, MessengerReport, ReportDate, ReportDispatch};
