use carddesk_model::ScannedItem;

/// Separator some card labels use to embed the client next to the card.
pub const CLIENT_SEPARATOR: char = '|';

/// A raw decoded code, classified by whether it already names its client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannedCode {
    /// `CARD|CLIENT`: ready to be added as is.
    Labeled(ScannedItem),
    /// Bare card number; the operator must supply the client label.
    NeedsLabel(String),
}

impl ScannedCode {
    /// Classify a decoded string. Returns `None` for codes that carry no
    /// card number at all.
    ///
    /// Dashes are never treated as separators since card numbers such as
    /// `1234-5678` use them.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        match raw.split_once(CLIENT_SEPARATOR) {
            Some((card, client)) => {
                let card = card.trim();
                let client = client.trim();
                if card.is_empty() {
                    None
                } else if client.is_empty() {
                    Some(ScannedCode::NeedsLabel(card.to_string()))
                } else {
                    Some(ScannedCode::Labeled(ScannedItem::new(card, client)))
                }
            }
            None => Some(ScannedCode::NeedsLabel(raw.to_string())),
        }
    }

    pub fn card_number(&self) -> &str {
        match self {
            ScannedCode::Labeled(item) => &item.card_number,
            ScannedCode::NeedsLabel(card) => card,
        }
    }
}
