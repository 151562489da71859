use crate::errors::AppError;
use crate::models::{COLUMNS, VisitorRecord};
use crate::storage::VisitorStore;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::{fs, sync::Mutex};
use tracing::{error, info};

/// File-backed visitor log: a CSV with a header row and one row per visit.
///
/// Every `append` re-reads and re-writes the whole file under a single
/// write lock. Correctness over performance; write volume is small.
pub struct CsvStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    async fn read_rows(&self) -> Result<Vec<Vec<String>>, AppError> {
        let bytes = fs::read(&self.path).await?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes.as_slice());

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }

    async fn write_rows(&self, rows: &[Vec<String>]) -> Result<(), AppError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in rows {
            writer.write_record(row)?;
        }
        let bytes = writer.into_inner().map_err(AppError::internal)?;
        fs::write(&self.path, bytes).await?;
        Ok(())
    }

    fn header_row() -> Vec<String> {
        COLUMNS.iter().map(|s| s.to_string()).collect()
    }
}

#[async_trait]
impl VisitorStore for CsvStore {
    async fn ensure_initialized(&self) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        if fs::try_exists(&self.path).await? {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        self.write_rows(&[Self::header_row()]).await?;
        info!("created visitor log at {}", self.path.display());
        Ok(())
    }

    async fn append(&self, record: &VisitorRecord) -> Result<u64, AppError> {
        let _guard = self.lock.lock().await;
        let mut rows = self.read_rows().await?;
        if rows.is_empty() {
            rows.push(Self::header_row());
        }
        rows.push(record.to_row().to_vec());
        self.write_rows(&rows).await?;
        Ok((rows.len() - 1) as u64)
    }

    async fn count(&self) -> u64 {
        let _guard = self.lock.lock().await;
        // A missing log is an empty log, not a read failure.
        if !matches!(fs::try_exists(&self.path).await, Ok(true)) {
            return 0;
        }
        match self.read_rows().await {
            Ok(rows) => rows.len().saturating_sub(1) as u64,
            Err(err) => {
                error!("failed to read visitor log: {}", err.message);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn sample_record(page_url: &str) -> VisitorRecord {
        VisitorRecord {
            timestamp: "2026-08-29 12:00:00".to_string(),
            ip_address: "203.0.113.5".to_string(),
            country: "Norway".to_string(),
            city: "Oslo".to_string(),
            region: "Oslo County".to_string(),
            browser: "Chrome 120.0".to_string(),
            os: "Windows 10".to_string(),
            device: "Desktop".to_string(),
            referrer: "Direct".to_string(),
            page_url: page_url.to_string(),
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> CsvStore {
        CsvStore::new(dir.path().join("visitors.csv"))
    }

    #[tokio::test]
    async fn count_is_zero_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store_in(&dir).count().await, 0);
    }

    #[tokio::test]
    async fn initialization_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.ensure_initialized().await.unwrap();
        store.ensure_initialized().await.unwrap();
        assert_eq!(store.count().await, 0);

        store.append(&sample_record("/home")).await.unwrap();
        store.ensure_initialized().await.unwrap();
        assert_eq!(store.count().await, 1);

        let contents = std::fs::read_to_string(dir.path().join("visitors.csv")).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.starts_with("Timestamp,IP Address,"));
    }

    #[tokio::test]
    async fn append_returns_monotonic_row_indexes() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.ensure_initialized().await.unwrap();

        for expected in 1..=5u64 {
            let index = store.append(&sample_record("/home")).await.unwrap();
            assert_eq!(index, expected);
            assert_eq!(store.count().await, expected);
        }
    }

    #[tokio::test]
    async fn concurrent_appends_lose_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(store_in(&dir));
        store.ensure_initialized().await.unwrap();

        let mut tasks = Vec::new();
        for i in 0..10 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store.append(&sample_record(&format!("/page-{i}"))).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.count().await, 10);
        let contents = std::fs::read_to_string(dir.path().join("visitors.csv")).unwrap();
        for i in 0..10 {
            let marker = format!("/page-{i}");
            assert_eq!(contents.matches(&marker).count(), 1, "missing {marker}");
        }
    }
}
