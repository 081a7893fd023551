//! Courier ("messenger") management.

use std::sync::Arc;

use carddesk_model::{CreateMessengerRequest, Messenger, MessengerId};
use tracing::info;

use crate::error::DirectoryError;
use crate::infra::BackendApi;

#[derive(Clone)]
pub struct MessengerDirectory {
    api: Arc<dyn BackendApi>,
}

impl std::fmt::Debug for MessengerDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessengerDirectory").finish_non_exhaustive()
    }
}

impl MessengerDirectory {
    pub fn new(api: Arc<dyn BackendApi>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Messenger>, DirectoryError> {
        Ok(self.api.list_messengers().await?)
    }

    pub async fn get(
        &self,
        id: &MessengerId,
    ) -> Result<Messenger, DirectoryError> {
        Ok(self.api.get_messenger(id).await?)
    }

    /// Register a courier. Name and contact number are both required.
    pub async fn add(
        &self,
        name: &str,
        contact_number: &str,
    ) -> Result<Messenger, DirectoryError> {
        let name = name.trim();
        let contact_number = contact_number.trim();
        if name.is_empty() || contact_number.is_empty() {
            return Err(DirectoryError::Validation(
                "messenger name and contact number are required".into(),
            ));
        }

        let messenger = self
            .api
            .create_messenger(CreateMessengerRequest {
                name: name.to_string(),
                contact_number: contact_number.to_string(),
            })
            .await?;
        info!(id = %messenger.id, name = %messenger.name, "messenger added");
        Ok(messenger)
    }

    pub async fn remove(&self, id: &MessengerId) -> Result<(), DirectoryError> {
        self.api.delete_messenger(id).await?;
        info!(id = %id, "messenger removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockBackendApi;
    use chrono::Utc;

    #[tokio::test]
    async fn add_requires_name_and_contact() {
        let mut api = MockBackendApi::new();
        api.expect_create_messenger().times(0);
        let directory = MessengerDirectory::new(Arc::new(api));

        assert!(matches!(
            directory.add("  ", "555-0101").await,
            Err(DirectoryError::Validation(_))
        ));
        assert!(matches!(
            directory.add("Ana", "").await,
            Err(DirectoryError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn add_sends_trimmed_fields() {
        let mut api = MockBackendApi::new();
        api.expect_create_messenger()
            .withf(|req| req.name == "Ana" && req.contact_number == "555-0101")
            .times(1)
            .returning(|req| {
                Ok(Messenger {
                    id: MessengerId::new("m1").unwrap(),
                    name: req.name,
                    contact_number: req.contact_number,
                    created_at: Utc::now(),
                })
            });
        let directory = MessengerDirectory::new(Arc::new(api));

        let messenger = directory.add(" Ana ", " 555-0101 ").await.unwrap();
        assert_eq!(messenger.id.as_str(), "m1");
    }
}
