//! Conversion between spreadsheet rows (`Vec<Vec<String>>`) and typed records.
//!
//! Everything here is pure. Malformed cells decode to documented sentinels
//! (`None` dates and amounts) instead of failing the batch, and decoding
//! never reorders rows.

pub mod budget;
pub mod expense;
pub mod parse;

pub use budget::{decode_budget_row, decode_budget_rows, INCOME_TOKEN};
pub use expense::{decode_expense_row, decode_expense_rows, encode_expense_row};
pub use parse::{format_sheet_date, parse_iso_date, parse_locale_int, parse_sheet_date};
