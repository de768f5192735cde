use super::parse::{cell, parse_locale_int};
use crate::models::{BudgetLine, BudgetRow, IncomeLine};
use bigdecimal::{BigDecimal, Zero};

/// Value of the third budget column that marks an income row
pub const INCOME_TOKEN: &str = "INCOME";

/// Decodes one budget row: `[category, limit, spent | INCOME]`.
///
/// Rows with at most one populated column are section headers or spacers
/// and decode to `None`.
pub fn decode_budget_row(row: &[String]) -> Option<BudgetRow> {
    let populated = row.iter().filter(|c| !c.trim().is_empty()).count();
    if populated <= 1 {
        return None;
    }

    let category = cell(row, 0).to_string();
    let raw_limit = cell(row, 1);
    let limit = match parse_locale_int(raw_limit) {
        Some(v) => v.abs(),
        None => {
            tracing::warn!("Budget row {:?} has invalid limit {:?}, using 0", category, raw_limit);
            BigDecimal::zero()
        }
    };

    let raw_spent = cell(row, 2);
    if raw_spent.eq_ignore_ascii_case(INCOME_TOKEN) {
        return Some(BudgetRow::Income(IncomeLine { category, limit }));
    }

    let spent = parse_locale_int(raw_spent);
    if spent.is_none() {
        tracing::debug!("Budget row {:?} has invalid spent {:?}", category, raw_spent);
    }
    Some(BudgetRow::Expense(BudgetLine {
        category,
        limit,
        spent,
    }))
}

/// Decodes the budget sheet in store order, dropping header rows
pub fn decode_budget_rows(rows: &[Vec<String>]) -> Vec<BudgetRow> {
    rows.iter().filter_map(|r| decode_budget_row(r)).collect()
}
