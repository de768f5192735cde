//! Typed client for the BUFI HTTP API, as used by the presentation layer.
//!
//! Reads go through a shared [`FetchGuard`]: a read issued while another is
//! still outstanding returns `Ok(None)` and no request is sent. Writes are
//! never guarded.

pub mod guard;

pub use guard::{FetchGuard, FetchTicket};

use crate::api::{BudgetResponse, SuccessResponse};
use crate::codec::format_sheet_date;
use crate::models::{Expense, NewExpenseRequest};
use crate::service::aggregator;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use indexmap::IndexMap;
use reqwest::{Client, Response};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct BufiClient {
    http: Client,
    base_url: String,
    guard: FetchGuard,
}

impl BufiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            guard: FetchGuard::new(),
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.guard.is_fetching()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn check(res: Response) -> ClientResult<Response> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let text = res.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|b| b.message)
            .unwrap_or(text);
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }

    /// Budget view, or `None` if another fetch is in flight
    pub async fn get_budget(&self) -> ClientResult<Option<BudgetResponse>> {
        let Some(_ticket) = self.guard.try_begin() else {
            tracing::debug!("Already fetching, budget request dropped");
            return Ok(None);
        };
        let res = Self::check(self.http.get(self.url("budget")).send().await?).await?;
        Ok(Some(res.json().await?))
    }

    /// Expenses newest first, or `None` if another fetch is in flight
    pub async fn get_expenses(&self, since: Option<NaiveDate>) -> ClientResult<Option<Vec<Expense>>> {
        let Some(_ticket) = self.guard.try_begin() else {
            tracing::debug!("Already fetching, expenses request dropped");
            return Ok(None);
        };
        Ok(Some(self.fetch_expenses(since).await?))
    }

    /// Unguarded expenses request, newest first
    async fn fetch_expenses(&self, since: Option<NaiveDate>) -> ClientResult<Vec<Expense>> {
        let mut req = self.http.get(self.url("expenses"));
        if let Some(since) = since {
            req = req.query(&[("since", format_sheet_date(since))]);
        }
        let res = Self::check(req.send().await?).await?;
        let mut expenses: Vec<Expense> = res.json().await?;
        aggregator::sort_newest_first(&mut expenses);
        Ok(expenses)
    }

    /// The ten newest expenses of one category, shown under an expanded
    /// budget line. Issued even while a page fetch is running.
    pub async fn recent_for_category(&self, category: &str) -> ClientResult<Vec<Expense>> {
        let all = self.fetch_expenses(None).await?;
        Ok(aggregator::recent_for_category(&all, category, 10))
    }

    /// Spend per category in first-seen order, or `None` if another fetch is in flight
    pub async fn spend_by_category(
        &self,
        since: Option<NaiveDate>,
    ) -> ClientResult<Option<IndexMap<String, BigDecimal>>> {
        Ok(self
            .get_expenses(since)
            .await?
            .map(|all| aggregator::category_totals(&all)))
    }

    pub async fn add_expense(&self, req: &NewExpenseRequest) -> ClientResult<Expense> {
        let res = Self::check(self.http.post(self.url("expense")).json(req).send().await?).await?;
        Ok(res.json().await?)
    }

    pub async fn delete_expense(&self, key: &str) -> ClientResult<()> {
        let res = self
            .http
            .delete(self.url("expense"))
            .query(&[("id", key)])
            .send()
            .await?;
        let body: SuccessResponse = Self::check(res).await?.json().await?;
        if !body.success {
            return Err(ClientError::Status {
                status: 200,
                message: "delete was not acknowledged".to_string(),
            });
        }
        Ok(())
    }
}
