use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// Backend identifier of a courier.
///
/// The backend hands out opaque strings (UUIDs in practice); the desk never
/// interprets them, it only requires them to be non-blank.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MessengerId(String);

impl MessengerId {
    pub fn new(raw: impl Into<String>) -> Result<Self, ModelError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyId("messenger"));
        }
        Ok(MessengerId(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for MessengerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for MessengerId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessengerId::new(s)
    }
}

impl std::fmt::Display for MessengerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Backend identifier of a recorded dispatch.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DispatchId(String);

impl DispatchId {
    pub fn new(raw: impl Into<String>) -> Result<Self, ModelError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ModelError::EmptyId("dispatch"));
        }
        Ok(DispatchId(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DispatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messenger_id_rejects_blank() {
        assert_eq!(
            MessengerId::new("   "),
            Err(ModelError::EmptyId("messenger"))
        );
    }

    #[test]
    fn messenger_id_is_trimmed() {
        let id: MessengerId = " m1 ".parse().unwrap();
        assert_eq!(id.as_str(), "m1");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = MessengerId::new("abc").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}
