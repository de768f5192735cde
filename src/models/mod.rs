pub mod budget;
pub mod expense;

pub use budget::{BudgetLine, BudgetRow, BudgetView, IncomeLine, Severity};
pub use expense::{Expense, NewExpense, NewExpenseRequest};
