//! Packaging a batch and a courier into one dispatch request.

use std::sync::Arc;

use carddesk_model::{CreateDispatchRequest, DispatchId, MessengerId};
use tracing::{info, warn};

use crate::batch::ScanBatch;
use crate::error::DispatchError;
use crate::infra::BackendApi;

/// What the backend recorded for a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfirmation {
    pub dispatch_id: DispatchId,
    pub messenger_name: String,
    /// Number of cards that were sent.
    pub item_count: usize,
}

/// Sends dispatches to the backend.
///
/// The submitter never mutates the batch: on success the caller clears it,
/// on failure it is left as it was so the operator can retry.
#[derive(Clone)]
pub struct DispatchSubmitter {
    api: Arc<dyn BackendApi>,
}

impl std::fmt::Debug for DispatchSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchSubmitter").finish_non_exhaustive()
    }
}

impl DispatchSubmitter {
    pub fn new(api: Arc<dyn BackendApi>) -> Self {
        Self { api }
    }

    /// Check the local preconditions and build the request body.
    ///
    /// A missing courier is reported before an empty batch.
    pub fn prepare(
        messenger_id: Option<&MessengerId>,
        batch: &ScanBatch,
    ) -> Result<CreateDispatchRequest, DispatchError> {
        let messenger_id =
            messenger_id.cloned().ok_or(DispatchError::MissingCourier)?;
        if batch.is_empty() {
            return Err(DispatchError::EmptyBatch);
        }
        Ok(CreateDispatchRequest {
            messenger_id,
            items: batch.to_vec(),
        })
    }

    /// Validate and submit `batch` for `messenger_id`.
    pub async fn submit(
        &self,
        messenger_id: Option<&MessengerId>,
        batch: &ScanBatch,
    ) -> Result<DispatchConfirmation, DispatchError> {
        let request = Self::prepare(messenger_id, batch)?;
        self.send(request).await
    }

    /// Submit an already prepared request. Exactly one backend call, no
    /// retry.
    pub async fn send(
        &self,
        request: CreateDispatchRequest,
    ) -> Result<DispatchConfirmation, DispatchError> {
        let item_count = request.items.len();
        let messenger_id = request.messenger_id.clone();

        match self.api.create_dispatch(request).await {
            Ok(dispatch) => {
                info!(
                    dispatch_id = %dispatch.id,
                    messenger = %dispatch.messenger_name,
                    item_count,
                    "dispatch recorded"
                );
                Ok(DispatchConfirmation {
                    dispatch_id: dispatch.id,
                    messenger_name: dispatch.messenger_name,
                    item_count,
                })
            }
            Err(err) => {
                warn!(
                    messenger_id = %messenger_id,
                    error = %err,
                    "dispatch submission failed"
                );
                Err(DispatchError::Submission(err))
            }
        }
    }
}
