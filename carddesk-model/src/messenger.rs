use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::MessengerId;

/// Courier registered with the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Messenger {
    pub id: MessengerId,
    pub name: String,
    pub contact_number: String,
    pub created_at: DateTime<Utc>,
}

/// Payload of `POST /messengers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMessengerRequest {
    pub name: String,
    pub contact_number: String,
}
