use serde::{Deserialize, Serialize};

/// One card registered in a dispatch batch.
///
/// `card_number` is the uniqueness key within a batch. Older backends stored
/// the operator label as `client_number`; that spelling is accepted when
/// reading but never written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScannedItem {
    pub card_number: String,
    #[serde(alias = "client_number")]
    pub client_name: String,
}

impl ScannedItem {
    pub fn new(
        card_number: impl Into<String>,
        client_name: impl Into<String>,
    ) -> Self {
        Self {
            card_number: card_number.into(),
            client_name: client_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_legacy_client_number_field() {
        let json = r#"{"card_number": "4000-1234", "client_number": "C-77"}"#;
        let item: ScannedItem = serde_json::from_str(json).unwrap();
        assert_eq!(item, ScannedItem::new("4000-1234", "C-77"));
    }

    #[test]
    fn writes_canonical_client_name_field() {
        let value =
            serde_json::to_value(ScannedItem::new("4000-1234", "Ana")).unwrap();
        assert_eq!(value["client_name"], "Ana");
        assert!(value.get("client_number").is_none());
    }
}
