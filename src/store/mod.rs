//! Row store gateway.
//!
//! The store is an ordered, append-friendly list of string rows per range,
//! with no transactions and no read-after-write guarantee. Row indexes are
//! positional and shift on every delete, so callers must re-list right
//! before deleting and never keep an index across calls.

pub mod csv_store;
pub mod memory;
pub mod sheets;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use csv_store::CsvRowStore;
pub use memory::MemoryRowStore;
pub use sheets::SheetsRowStore;

pub type Row = Vec<String>;

/// A bounded range of one sheet, e.g. `poop!A3:F`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SheetRange {
    /// A1 notation, including the sheet name
    pub name: String,
    /// Numeric sheet id, needed for row deletes
    pub sheet_id: i64,
    /// Zero-based sheet row of the first row in the range
    pub first_row: usize,
}

impl SheetRange {
    pub fn new(name: impl Into<String>, sheet_id: i64, first_row: usize) -> Self {
        Self {
            name: name.into(),
            sheet_id,
            first_row,
        }
    }

    /// Sheet name part of the A1 range (`poop` for `poop!A3:F`)
    pub fn sheet_name(&self) -> &str {
        self.name.split('!').next().unwrap_or(&self.name)
    }
}

#[async_trait]
pub trait RowStore: Send + Sync {
    /// All rows of the range, in sheet order
    async fn list_rows(&self, range: &SheetRange) -> Result<Vec<Row>>;

    /// Appends one row after the last populated row of the range
    async fn append_row(&self, range: &SheetRange, row: Row) -> Result<()>;

    /// Deletes the row at `row_index`, counted from the start of the range
    async fn delete_row(&self, range: &SheetRange, row_index: usize) -> Result<()>;
}
