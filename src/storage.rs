use crate::csv_store::CsvStore;
use crate::errors::AppError;
use crate::models::VisitorRecord;
use crate::sheets_store::{ServiceCredential, SheetsStore};
use async_trait::async_trait;
use std::{env, path::PathBuf, sync::Arc};
use tokio::fs;

/// Append-only visitor log. One implementation per backend; the service
/// layer only sees this trait.
#[async_trait]
pub trait VisitorStore: Send + Sync {
    /// Idempotent setup. Must never duplicate the header row or truncate
    /// existing data. A failure here is fatal at startup.
    async fn ensure_initialized(&self) -> Result<(), AppError>;

    /// Appends one row and returns its 1-based data-row index (header
    /// excluded). Concurrent calls are serialized by the implementation.
    async fn append(&self, record: &VisitorRecord) -> Result<u64, AppError>;

    /// Number of data rows. Best effort: every failure is absorbed and
    /// reported as 0.
    async fn count(&self) -> u64;
}

/// Builds the store selected by `STORE_BACKEND` (`file`, the default, or
/// `sheets`). Sheets configuration errors surface here, before the server
/// starts accepting traffic.
pub async fn resolve_store() -> Result<Arc<dyn VisitorStore>, AppError> {
    let backend = env::var("STORE_BACKEND").unwrap_or_else(|_| "file".to_string());
    match backend.as_str() {
        "file" => Ok(Arc::new(CsvStore::new(resolve_log_path()))),
        "sheets" => {
            let credential = load_credential().await?;
            let spreadsheet_id = env::var("SPREADSHEET_ID")
                .map_err(|_| AppError::internal("SPREADSHEET_ID is required for the sheets backend"))?;
            Ok(Arc::new(SheetsStore::new(credential, spreadsheet_id)?))
        }
        other => Err(AppError::internal(format!(
            "unknown STORE_BACKEND {other:?}, expected \"file\" or \"sheets\""
        ))),
    }
}

pub fn resolve_log_path() -> PathBuf {
    match env::var("VISITOR_LOG_PATH") {
        Ok(path) => PathBuf::from(path),
        Err(_) => PathBuf::from("data/visitors.csv"),
    }
}

async fn load_credential() -> Result<ServiceCredential, AppError> {
    let raw = match env::var("GOOGLE_SERVICE_ACCOUNT") {
        Ok(inline) => inline,
        Err(_) => {
            let path = env::var("GOOGLE_SERVICE_ACCOUNT_PATH").map_err(|_| {
                AppError::internal(
                    "sheets backend needs GOOGLE_SERVICE_ACCOUNT or GOOGLE_SERVICE_ACCOUNT_PATH",
                )
            })?;
            fs::read_to_string(&path)
                .await
                .map_err(|err| AppError::internal(format!("failed to read {path}: {err}")))?
        }
    };

    serde_json::from_str(&raw)
        .map_err(|err| AppError::internal(format!("invalid service account credential: {err}")))
}
