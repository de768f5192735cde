use super::{Row, RowStore, SheetRange};
use crate::error::{ApiError, Result};
use async_trait::async_trait;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::RwLock;

/// Row store over local CSV files, one file per sheet (`<dir>/<sheet>.csv`).
/// Each file holds exactly the rows of its range, without headers.
///
/// Reads share the lock; appends and deletes hold it exclusively. Deletes
/// rewrite into a temp file that replaces the original in one rename.
pub struct CsvRowStore {
    dir: PathBuf,
    lock: RwLock<()>,
}

impl CsvRowStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            lock: RwLock::new(()),
        }
    }

    fn path_for(&self, range: &SheetRange) -> PathBuf {
        self.dir.join(format!("{}.csv", range.sheet_name()))
    }
}

fn read_rows(path: &Path) -> Result<Vec<Row>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn write_rows(path: &Path, rows: &[Row]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(tmp.as_file());
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| ApiError::Upstream(e.to_string()))?;
    Ok(())
}

fn append_to(path: &Path, row: &Row) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file: File = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(file);
    writer.write_record(row)?;
    writer.flush()?;
    Ok(())
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("csv task failed: {}", e)))?
}

#[async_trait]
impl RowStore for CsvRowStore {
    async fn list_rows(&self, range: &SheetRange) -> Result<Vec<Row>> {
        let _guard = self.lock.read().await;
        let path = self.path_for(range);
        blocking(move || read_rows(&path)).await
    }

    async fn append_row(&self, range: &SheetRange, row: Row) -> Result<()> {
        let _guard = self.lock.write().await;
        let path = self.path_for(range);
        blocking(move || append_to(&path, &row)).await
    }

    async fn delete_row(&self, range: &SheetRange, row_index: usize) -> Result<()> {
        let _guard = self.lock.write().await;
        let path = self.path_for(range);
        let name = range.name.clone();
        blocking(move || {
            let mut rows = read_rows(&path)?;
            if row_index >= rows.len() {
                return Err(ApiError::Upstream(format!(
                    "row {} out of bounds for {} ({} rows)",
                    row_index,
                    name,
                    rows.len()
                )));
            }
            rows.remove(row_index);
            write_rows(&path, &rows)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[tokio::test]
    async fn rows_survive_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let range = SheetRange::new("poop!A3:F", 0, 2);

        let store = CsvRowStore::new(dir.path());
        assert!(store.list_rows(&range).await.unwrap().is_empty());

        store
            .append_row(&range, row(&["01/06/2024", "Food", "1,200", "Dror", "a, b", "k1"]))
            .await
            .unwrap();
        store
            .append_row(&range, row(&["02/06/2024", "Fuel", "50", "Rina"]))
            .await
            .unwrap();
        assert!(dir.path().join("poop.csv").exists());

        let reopened = CsvRowStore::new(dir.path());
        let rows = reopened.list_rows(&range).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][2], "1,200");
        assert_eq!(rows[0][4], "a, b");
        assert_eq!(rows[1].len(), 4);

        reopened.delete_row(&range, 0).await.unwrap();
        let rows = reopened.list_rows(&range).await.unwrap();
        assert_eq!(rows, vec![row(&["02/06/2024", "Fuel", "50", "Rina"])]);
        assert!(reopened.delete_row(&range, 3).await.is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn reads_during_deletes_see_whole_files() {
        let dir = tempfile::tempdir().unwrap();
        let range = SheetRange::new("poop!A3:F", 0, 2);
        let rows: Vec<Row> = (0..2000)
            .map(|i| row(&["01/06/2024", "Food", &i.to_string(), "Dror"]))
            .collect();
        write_rows(&dir.path().join("poop.csv"), &rows).unwrap();

        let store = std::sync::Arc::new(CsvRowStore::new(dir.path()));
        for deleted in 0..100usize {
            let readers: Vec<_> = (0..4)
                .map(|_| {
                    let store = store.clone();
                    let range = range.clone();
                    tokio::spawn(async move { store.list_rows(&range).await.unwrap().len() })
                })
                .collect();
            store.delete_row(&range, 0).await.unwrap();

            for reader in readers {
                let seen = reader.await.unwrap();
                // Either before or after this delete, never a partial file
                assert!(
                    seen == 2000 - deleted || seen == 2000 - deleted - 1,
                    "read {} rows after {} deletes",
                    seen,
                    deleted
                );
            }
        }
        assert_eq!(store.list_rows(&range).await.unwrap().len(), 1900);
        let left = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(left, 1);
    }
}
