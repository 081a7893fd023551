//! The in-progress dispatch batch.

use std::sync::Arc;

use carddesk_model::ScannedItem;
use tracing::{debug, info};

use crate::error::BatchError;
use crate::scan::ConfirmationCue;
use crate::scan::feedback::play_best_effort;

/// Ordered, deduplicated list of cards scanned for one dispatch.
///
/// Cards keep the order in which they were accepted. `card_number` is unique
/// within a batch; a rejected duplicate leaves the batch unchanged.
#[derive(Default, Clone)]
pub struct ScanBatch {
    items: Vec<ScannedItem>,
    cue: Option<Arc<dyn ConfirmationCue>>,
}

impl std::fmt::Debug for ScanBatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanBatch")
            .field("items", &self.items)
            .field("cue", &self.cue.is_some())
            .finish()
    }
}

impl ScanBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Batch that plays `cue` for every accepted card.
    pub fn with_cue(cue: Arc<dyn ConfirmationCue>) -> Self {
        Self {
            items: Vec::new(),
            cue: Some(cue),
        }
    }

    pub fn set_cue(&mut self, cue: Option<Arc<dyn ConfirmationCue>>) {
        self.cue = cue;
    }

    /// Add a card with its client label.
    ///
    /// Both values are trimmed before validation and storage. Duplicate
    /// detection is an exact match on the trimmed card number.
    pub fn submit_code(
        &mut self,
        code: &str,
        client_label: &str,
    ) -> Result<(), BatchError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(BatchError::EmptyCode);
        }
        let client_label = client_label.trim();
        if client_label.is_empty() {
            return Err(BatchError::EmptyClientLabel);
        }
        if self.contains(code) {
            debug!(card = code, "duplicate card rejected");
            return Err(BatchError::DuplicateCard {
                card_number: code.to_string(),
            });
        }

        self.items.push(ScannedItem::new(code, client_label));
        info!(
            card = code,
            client = client_label,
            len = self.items.len(),
            "card added"
        );

        if let Some(cue) = &self.cue {
            play_best_effort(cue.as_ref());
        }
        Ok(())
    }

    /// Add an already-labelled item, with the same checks as
    /// [`ScanBatch::submit_code`].
    pub fn push_item(&mut self, item: &ScannedItem) -> Result<(), BatchError> {
        self.submit_code(&item.card_number, &item.client_name)
    }

    /// Remove and return the card at `index`. Later cards move up one
    /// position.
    pub fn remove_at(&mut self, index: usize) -> Result<ScannedItem, BatchError> {
        if index >= self.items.len() {
            return Err(BatchError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        let removed = self.items.remove(index);
        debug!(card = %removed.card_number, index, "card removed");
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, card_number: &str) -> bool {
        let card_number = card_number.trim();
        self.items.iter().any(|item| item.card_number == card_number)
    }

    /// Snapshot of the current cards in insertion order.
    pub fn items(&self) -> Arc<[ScannedItem]> {
        Arc::from(self.items.as_slice())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScannedItem> {
        self.items.iter()
    }

    pub(crate) fn to_vec(&self) -> Vec<ScannedItem> {
        self.items.clone()
    }
}

impl<'a> IntoIterator for &'a ScanBatch {
    type Item = &'a ScannedItem;
    type IntoIter = std::slice::Iter<'a, ScannedItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
