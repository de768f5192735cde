use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A decoded row of the expenses sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Batch-local sequence number, only meaningful within one fetch
    pub id: u32,
    /// Stable key column; `None` for rows written before keys existed
    pub key: Option<String>,
    /// `None` when the sheet value is not a `DD/MM/YYYY` date
    pub date: Option<NaiveDate>,
    pub category: String,
    /// `None` when the sheet value is not a number
    pub amount: Option<BigDecimal>,
    pub who: String,
    #[serde(default)]
    pub description: String,
}

impl Expense {
    /// Whether this row matches a caller-supplied delete key.
    /// Keyless rows fall back to their description.
    pub fn matches_key(&self, key: &str) -> bool {
        match &self.key {
            Some(k) => k == key,
            None => !self.description.is_empty() && self.description == key,
        }
    }
}

/// POST /expense body, as sent by the form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewExpenseRequest {
    /// ISO `YYYY-MM-DD`
    pub date: Option<String>,
    pub who: Option<String>,
    pub category: Option<String>,
    pub amount: Option<BigDecimal>,
    pub what: Option<String>,
}

/// A validated expense ready to be encoded into a row
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub key: String,
    pub date: NaiveDate,
    pub category: String,
    pub amount: BigDecimal,
    pub who: String,
    pub description: String,
}
