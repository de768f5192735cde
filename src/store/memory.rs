use super::{Row, RowStore, SheetRange};
use crate::error::{ApiError, Result};
use async_trait::async_trait;
use dashmap::DashMap;

/// In-process row store keyed by range name
#[derive(Debug, Default)]
pub struct MemoryRowStore {
    ranges: DashMap<String, Vec<Row>>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents of a range
    pub fn seed(&self, range: &SheetRange, rows: Vec<Row>) {
        self.ranges.insert(range.name.clone(), rows);
    }

    pub fn row_count(&self, range: &SheetRange) -> usize {
        self.ranges.get(&range.name).map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl RowStore for MemoryRowStore {
    async fn list_rows(&self, range: &SheetRange) -> Result<Vec<Row>> {
        Ok(self
            .ranges
            .get(&range.name)
            .map(|rows| rows.clone())
            .unwrap_or_default())
    }

    async fn append_row(&self, range: &SheetRange, row: Row) -> Result<()> {
        self.ranges.entry(range.name.clone()).or_default().push(row);
        Ok(())
    }

    async fn delete_row(&self, range: &SheetRange, row_index: usize) -> Result<()> {
        let mut rows = self
            .ranges
            .get_mut(&range.name)
            .ok_or_else(|| ApiError::Upstream(format!("range {} does not exist", range.name)))?;
        if row_index >= rows.len() {
            return Err(ApiError::Upstream(format!(
                "row {} out of bounds for {} ({} rows)",
                row_index,
                range.name,
                rows.len()
            )));
        }
        rows.remove(row_index);
        Ok(())
    }
}
