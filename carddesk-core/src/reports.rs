//! Today's dispatches, daily reports and spreadsheet export.

use std::path::Path;
use std::sync::Arc;

use carddesk_model::{
    DailyReport, Dispatch, DispatchFilter, DispatchSummary, ReportDate,
};
use tracing::info;

use crate::error::ReportError;
use crate::infra::BackendApi;

#[derive(Clone)]
pub struct ReportService {
    api: Arc<dyn BackendApi>,
}

impl std::fmt::Debug for ReportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportService").finish_non_exhaustive()
    }
}

impl ReportService {
    pub fn new(api: Arc<dyn BackendApi>) -> Self {
        Self { api }
    }

    pub async fn today(&self) -> Result<Vec<DispatchSummary>, ReportError> {
        Ok(self.api.today_dispatches().await?)
    }

    pub async fn dispatches(
        &self,
        filter: DispatchFilter,
    ) -> Result<Vec<Dispatch>, ReportError> {
        Ok(self.api.list_dispatches(filter).await?)
    }

    /// Report for `date`, or for today when `None`.
    pub async fn daily(
        &self,
        date: Option<ReportDate>,
    ) -> Result<DailyReport, ReportError> {
        Ok(self.api.daily_report(date.unwrap_or_default()).await?)
    }

    /// Download the spreadsheet for `date` and write it to `out`.
    /// Returns the number of bytes written.
    pub async fn export_excel(
        &self,
        date: Option<ReportDate>,
        out: &Path,
    ) -> Result<usize, ReportError> {
        let date = date.unwrap_or_default();
        let bytes = self.api.export_excel(date).await?;
        tokio::fs::write(out, &bytes)
            .await
            .map_err(|source| ReportError::Io {
                path: out.to_path_buf(),
                source,
            })?;
        info!(
            %date,
            path = %out.display(),
            bytes = bytes.len(),
            "report exported"
        );
        Ok(bytes.len())
    }
}

/// Default file name for the export of `date`.
pub fn export_file_name(date: ReportDate) -> String {
    format!("dispatch_report_{date}.xlsx")
}
