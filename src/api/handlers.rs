use crate::codec::parse_sheet_date;
use crate::error::{ApiError, Result};
use crate::models::{BudgetLine, BudgetView, Expense, IncomeLine, NewExpenseRequest, Severity};
use crate::service::{aggregator, LedgerService};
use axum::{
    extract::{rejection::JsonRejection, Json, Query, State},
    response::IntoResponse,
};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type LedgerState = Arc<LedgerService>;

/// GET /expenses query
#[derive(Debug, Default, Deserialize)]
pub struct ExpensesQuery {
    /// `DD/MM/YYYY`, inclusive
    pub since: Option<String>,
}

/// DELETE /expense query
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    pub id: Option<String>,
}

/// Budget line with its derived display values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLineView {
    pub category: String,
    pub limit: BigDecimal,
    pub spent: Option<BigDecimal>,
    /// `None` when the percentage is not finite (zero limit, bad spent)
    pub remaining_percent: Option<f64>,
    pub severity: Severity,
}

impl From<BudgetLine> for BudgetLineView {
    fn from(line: BudgetLine) -> Self {
        let percent = line.remaining_percent();
        Self {
            severity: Severity::classify(percent),
            remaining_percent: Some(percent).filter(|p| p.is_finite()),
            category: line.category,
            limit: line.limit,
            spent: line.spent,
        }
    }
}

/// GET /budget response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetResponse {
    pub income: Vec<IncomeLine>,
    pub expenses: Vec<BudgetLineView>,
    pub total_income: BigDecimal,
    pub total_expense: BigDecimal,
    pub overall_percent: Option<f64>,
}

impl From<BudgetView> for BudgetResponse {
    fn from(view: BudgetView) -> Self {
        let overall = aggregator::overall_percent(&view);
        Self {
            income: view.income,
            expenses: view.budget_lines.into_iter().map(BudgetLineView::from).collect(),
            total_income: view.total_income,
            total_expense: view.total_expense,
            overall_percent: Some(overall).filter(|p| p.is_finite()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Health check
pub async fn health_check() -> &'static str {
    "OK"
}

/// GET /expenses
pub async fn list_expenses(
    State(service): State<LedgerState>,
    Query(query): Query<ExpensesQuery>,
) -> Result<Json<Vec<Expense>>> {
    let since = match query.since.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            parse_sheet_date(raw)
                .ok_or_else(|| ApiError::Validation(format!("since {:?} is not DD/MM/YYYY", raw)))?,
        ),
        None => None,
    };
    let expenses = service.list_expenses(since).await?;
    Ok(Json(expenses))
}

/// GET /budget
pub async fn get_budget(State(service): State<LedgerState>) -> Result<Json<BudgetResponse>> {
    let view = service.budget().await?;
    Ok(Json(BudgetResponse::from(view)))
}

/// POST /expense
pub async fn add_expense(
    State(service): State<LedgerState>,
    body: std::result::Result<Json<NewExpenseRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = body.map_err(|e| ApiError::Validation(e.body_text()))?;
    let stored = service.add_expense(req).await?;
    Ok(Json(stored))
}

/// DELETE /expense?id=
pub async fn delete_expense(
    State(service): State<LedgerState>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<SuccessResponse>> {
    let id = query
        .id
        .ok_or_else(|| ApiError::Validation("missing id".to_string()))?;
    service.delete_expense(&id).await?;
    Ok(Json(SuccessResponse { success: true }))
}
