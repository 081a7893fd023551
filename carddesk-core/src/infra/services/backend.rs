use std::sync::Arc;

use async_trait::async_trait;
use carddesk_model::{
    CreateDispatchRequest, CreateMessengerRequest, DailyReport, Dispatch,
    DispatchFilter, DispatchSummary, Messenger, MessengerId, ReportDate,
};

use crate::api::routes::{backend, utils};
use crate::error::ApiResult;
use crate::infra::api_client::ApiClient;

/// Every backend operation the desk relies on.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn list_messengers(&self) -> ApiResult<Vec<Messenger>>;

    async fn get_messenger(&self, id: &MessengerId) -> ApiResult<Messenger>;

    async fn create_messenger(
        &self,
        req: CreateMessengerRequest,
    ) -> ApiResult<Messenger>;

    async fn delete_messenger(&self, id: &MessengerId) -> ApiResult<()>;

    /// Dispatches created today, newest first.
    async fn today_dispatches(&self) -> ApiResult<Vec<DispatchSummary>>;

    async fn list_dispatches(
        &self,
        filter: DispatchFilter,
    ) -> ApiResult<Vec<Dispatch>>;

    async fn create_dispatch(
        &self,
        req: CreateDispatchRequest,
    ) -> ApiResult<Dispatch>;

    async fn daily_report(&self, date: ReportDate) -> ApiResult<DailyReport>;

    /// Spreadsheet export of the daily report, as raw `.xlsx` bytes.
    async fn export_excel(&self, date: ReportDate) -> ApiResult<Vec<u8>>;
}

/// [`BackendApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Arc<ApiClient>,
}

impl HttpBackend {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

fn date_query(route: &str, date: ReportDate) -> String {
    utils::with_query(route, &[("date", date.to_string())])
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn list_messengers(&self) -> ApiResult<Vec<Messenger>> {
        self.client.get(backend::messengers::COLLECTION).await
    }

    async fn get_messenger(&self, id: &MessengerId) -> ApiResult<Messenger> {
        let path =
            utils::replace_param(backend::messengers::ITEM, "{id}", id);
        self.client.get(&path).await
    }

    async fn create_messenger(
        &self,
        req: CreateMessengerRequest,
    ) -> ApiResult<Messenger> {
        self.client.post(backend::messengers::COLLECTION, &req).await
    }

    async fn delete_messenger(&self, id: &MessengerId) -> ApiResult<()> {
        let path =
            utils::replace_param(backend::messengers::ITEM, "{id}", id);
        self.client.delete(&path).await
    }

    async fn today_dispatches(&self) -> ApiResult<Vec<DispatchSummary>> {
        self.client.get(backend::dispatches::TODAY).await
    }

    async fn list_dispatches(
        &self,
        filter: DispatchFilter,
    ) -> ApiResult<Vec<Dispatch>> {
        let path = utils::with_query(
            backend::dispatches::COLLECTION,
            &filter.query_pairs(),
        );
        self.client.get(&path).await
    }

    async fn create_dispatch(
        &self,
        req: CreateDispatchRequest,
    ) -> ApiResult<Dispatch> {
        self.client.post(backend::dispatches::COLLECTION, &req).await
    }

    async fn daily_report(&self, date: ReportDate) -> ApiResult<DailyReport> {
        self.client
            .get(&date_query(backend::reports::DAILY, date))
            .await
    }

    async fn export_excel(&self, date: ReportDate) -> ApiResult<Vec<u8>> {
        self.client
            .get_bytes(&date_query(backend::reports::EXPORT_EXCEL, date))
            .await
    }
}
