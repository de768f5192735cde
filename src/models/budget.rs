use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// An expense-class row of the budget sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub category: String,
    /// Always non-negative
    pub limit: BigDecimal,
    /// `None` when the sheet value is not a number; kept for display, left out of totals
    pub spent: Option<BigDecimal>,
}

/// An income-class row of the budget sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeLine {
    pub category: String,
    /// Always non-negative
    pub limit: BigDecimal,
}

/// A decoded budget row. Every row is exactly one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum BudgetRow {
    Income(IncomeLine),
    Expense(BudgetLine),
}

/// Budget derived from one fetch of the budget sheet
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BudgetView {
    pub budget_lines: Vec<BudgetLine>,
    pub income: Vec<IncomeLine>,
    pub total_income: BigDecimal,
    pub total_expense: BigDecimal,
}

/// Display tier of a budget line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    OnTrack,
    Watch,
    Warning,
    Over,
}
