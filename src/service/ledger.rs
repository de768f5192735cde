use crate::codec::{self, decode_budget_rows, decode_expense_rows, encode_expense_row, parse_iso_date};
use crate::config::RangesConfig;
use crate::error::{ApiError, Result};
use crate::models::{BudgetView, Expense, NewExpense, NewExpenseRequest};
use crate::service::aggregator;
use crate::store::RowStore;
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

/// Reads and writes the expense and budget sheets through a row store
pub struct LedgerService {
    store: Arc<dyn RowStore>,
    ranges: RangesConfig,
    people: Vec<String>,
}

impl LedgerService {
    pub fn new(store: Arc<dyn RowStore>, ranges: RangesConfig, people: Vec<String>) -> Self {
        Self { store, ranges, people }
    }

    /// Decoded expenses in store order, optionally only those on or after `since`
    pub async fn list_expenses(&self, since: Option<NaiveDate>) -> Result<Vec<Expense>> {
        let rows = self.store.list_rows(&self.ranges.expenses).await?;
        let expenses = decode_expense_rows(&rows);
        let total = expenses.len();

        let expenses = match since {
            Some(since) => aggregator::filter_since(expenses, since),
            None => expenses,
        };
        tracing::info!("Listed {} of {} expense rows", expenses.len(), total);
        Ok(expenses)
    }

    pub async fn budget(&self) -> Result<BudgetView> {
        let rows = self.store.list_rows(&self.ranges.budget).await?;
        let view = aggregator::aggregate(decode_budget_rows(&rows));
        tracing::info!(
            "Budget: {} lines, income {}, expense {}",
            view.budget_lines.len(),
            view.total_income,
            view.total_expense
        );
        Ok(view)
    }

    /// Checks required fields and the person, and assigns a fresh key
    pub fn validate(&self, req: NewExpenseRequest) -> Result<NewExpense> {
        fn required(value: Option<String>, field: &str) -> Result<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ApiError::Validation(format!("missing required field: {}", field)))
        }

        let raw_date = required(req.date, "date")?;
        let date = parse_iso_date(&raw_date)
            .ok_or_else(|| ApiError::Validation(format!("date {:?} is not YYYY-MM-DD", raw_date)))?;
        let category = required(req.category, "category")?;
        let who = required(req.who, "who")?;
        let amount = req
            .amount
            .ok_or_else(|| ApiError::Validation("missing required field: amount".to_string()))?;
        // The sheet column is read back as a whole number
        let whole = amount.with_scale(0);
        if whole != amount {
            return Err(ApiError::Validation(format!(
                "amount {} must be a whole number",
                amount
            )));
        }

        if !self.people.iter().any(|p| p == &who) {
            return Err(ApiError::Validation(format!(
                "unknown person {:?}, expected one of {:?}",
                who, self.people
            )));
        }

        Ok(NewExpense {
            key: Uuid::new_v4().to_string(),
            date,
            category,
            amount: whole,
            who,
            description: req.what.map(|w| w.trim().to_string()).unwrap_or_default(),
        })
    }

    /// Validates, appends and returns the record as it will read back
    pub async fn add_expense(&self, req: NewExpenseRequest) -> Result<Expense> {
        let expense = self.validate(req)?;
        let row = encode_expense_row(&expense);

        self.store.append_row(&self.ranges.expenses, row.clone()).await?;
        tracing::info!(
            "Added expense {} ({} {} by {})",
            expense.key,
            expense.category,
            expense.amount,
            expense.who
        );

        Ok(codec::decode_expense_row(0, &row))
    }

    /// Deletes the first row matching `key`.
    ///
    /// The row position is looked up from a fresh listing right before the
    /// delete. A concurrent writer can still shift rows in between; the store
    /// offers nothing stronger.
    pub async fn delete_expense(&self, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ApiError::Validation("missing id".to_string()));
        }

        let rows = self.store.list_rows(&self.ranges.expenses).await?;
        let position = decode_expense_rows(&rows)
            .iter()
            .position(|e| e.matches_key(key))
            .ok_or_else(|| ApiError::NotFound(format!("no expense with id {}", key)))?;

        self.store.delete_row(&self.ranges.expenses, position).await?;
        tracing::info!("Deleted expense {} at position {}", key, position);
        Ok(())
    }
}
