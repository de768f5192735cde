use super::parse::{cell, format_sheet_date, parse_locale_int, parse_sheet_date};
use crate::models::{Expense, NewExpense};

/// Expense sheet columns
pub const COL_DATE: usize = 0;
pub const COL_CATEGORY: usize = 1;
pub const COL_AMOUNT: usize = 2;
pub const COL_WHO: usize = 3;
pub const COL_DESCRIPTION: usize = 4;
pub const COL_KEY: usize = 5;

/// Decodes one expense row.
///
/// Never fails: a bad date or amount decodes to `None` and the row survives.
pub fn decode_expense_row(id: u32, row: &[String]) -> Expense {
    let raw_date = cell(row, COL_DATE);
    let date = parse_sheet_date(raw_date);
    if date.is_none() {
        tracing::debug!("Expense row {} has invalid date {:?}", id, raw_date);
    }

    let raw_amount = cell(row, COL_AMOUNT);
    let amount = parse_locale_int(raw_amount);
    if amount.is_none() {
        tracing::debug!("Expense row {} has invalid amount {:?}", id, raw_amount);
    }

    let key = Some(cell(row, COL_KEY))
        .filter(|k| !k.is_empty())
        .map(str::to_string);

    Expense {
        id,
        key,
        date,
        category: cell(row, COL_CATEGORY).to_string(),
        amount,
        who: cell(row, COL_WHO).to_string(),
        description: cell(row, COL_DESCRIPTION).to_string(),
    }
}

/// Decodes a batch in store order, numbering rows from 0
pub fn decode_expense_rows(rows: &[Vec<String>]) -> Vec<Expense> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| decode_expense_row(idx as u32, row))
        .collect()
}

/// Encodes an expense in decode column order
pub fn encode_expense_row(expense: &NewExpense) -> Vec<String> {
    vec![
        format_sheet_date(expense.date),
        expense.category.clone(),
        expense.amount.to_string(),
        expense.who.clone(),
        expense.description.clone(),
        expense.key.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn decodes_full_row() {
        let e = decode_expense_row(
            3,
            &row(&["05/06/2024", "Groceries", "1,250", "Rina", "market", "k-1", "extra"]),
        );
        assert_eq!(e.id, 3);
        assert_eq!(e.date, NaiveDate::from_ymd_opt(2024, 6, 5));
        assert_eq!(e.category, "Groceries");
        assert_eq!(e.amount, Some(BigDecimal::from(1250)));
        assert_eq!(e.who, "Rina");
        assert_eq!(e.description, "market");
        assert_eq!(e.key.as_deref(), Some("k-1"));
    }

    #[test]
    fn description_and_key_are_optional() {
        let e = decode_expense_row(0, &row(&["05/06/2024", "Fuel", "200", "Dror"]));
        assert_eq!(e.description, "");
        assert_eq!(e.key, None);
    }

    #[test]
    fn bad_values_become_sentinels() {
        let e = decode_expense_row(0, &row(&["someday", "Fuel", "lots", "Dror"]));
        assert_eq!(e.date, None);
        assert_eq!(e.amount, None);
        assert_eq!(e.category, "Fuel");
    }

    #[test]
    fn batch_ids_follow_store_order() {
        let rows = vec![
            row(&["10/06/2024", "A", "1", "Dror"]),
            row(&["01/06/2024", "B", "2", "Rina"]),
            row(&["garbage"]),
        ];
        let decoded = decode_expense_rows(&rows);
        let ids: Vec<u32> = decoded.iter().map(|e| e.id).collect();
        let cats: Vec<&str> = decoded.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(cats, vec!["A", "B", ""]);
    }

    #[test]
    fn decode_encode_decode_keeps_fields() {
        let original = row(&["7/6/2024", "Eating out", "85", "Dror", "pizza", "abc"]);
        let first = decode_expense_row(0, &original);

        let new = NewExpense {
            key: first.key.clone().unwrap(),
            date: first.date.unwrap(),
            category: first.category.clone(),
            amount: first.amount.clone().unwrap(),
            who: first.who.clone(),
            description: first.description.clone(),
        };
        let encoded = encode_expense_row(&new);
        assert_eq!(encoded[COL_DATE], "07/06/2024");

        let second = decode_expense_row(0, &encoded);
        assert_eq!(second, first);
    }
}
