//! Desk/CLI focused snapshot of the types surface.
//! Prefer importing from this module instead of individual tree nodes when
//! working in carddesk-core or the command line front end.

pub use super::dispatch::{
    CreateDispatchRequest, Dispatch, DispatchFilter, DispatchSummary,
};
pub use super::error::ModelError;
pub use super::ids::{DispatchId, MessengerId};
pub use super::item::ScannedItem;
pub use super::messenger::{CreateMessengerRequest, Messenger};
pub use super::report::{
    DailyReport, MessengerReport, ReportDate, ReportDispatch,
};
