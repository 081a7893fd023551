use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    ids::{DispatchId, MessengerId},
    item::ScannedItem,
    report::ReportDate,
};

/// Payload of `POST /dispatches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDispatchRequest {
    pub messenger_id: MessengerId,
    pub items: Vec<ScannedItem>,
}

/// Dispatch as recorded by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispatch {
    pub id: DispatchId,
    pub messenger_id: MessengerId,
    pub messenger_name: String,
    pub items: Vec<ScannedItem>,
    pub total_cards: u32,
    pub created_at: DateTime<Utc>,
    /// Calendar day the backend filed the dispatch under.
    #[serde(default)]
    pub date: Option<String>,
}

/// Row of the "today's dispatches" listing.
///
/// The backend may send the full dispatch; everything beyond these fields is
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSummary {
    pub id: DispatchId,
    pub messenger_name: String,
    pub created_at: DateTime<Utc>,
    pub total_cards: u32,
}

impl From<Dispatch> for DispatchSummary {
    fn from(dispatch: Dispatch) -> Self {
        Self {
            id: dispatch.id,
            messenger_name: dispatch.messenger_name,
            created_at: dispatch.created_at,
            total_cards: dispatch.total_cards,
        }
    }
}

/// Optional filters of `GET /dispatches`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchFilter {
    pub date: Option<ReportDate>,
    pub messenger_id: Option<MessengerId>,
}

impl DispatchFilter {
    pub fn on(date: ReportDate) -> Self {
        Self {
            date: Some(date),
            messenger_id: None,
        }
    }

    pub fn for_messenger(mut self, id: MessengerId) -> Self {
        self.messenger_id = Some(id);
        self
    }

    /// Query pairs in the order the backend documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(date) = &self.date {
            pairs.push(("date", date.to_string()));
        }
        if let Some(id) = &self.messenger_id {
            pairs.push(("messenger_id", id.to_string()));
        }
        pairs
    }
}
