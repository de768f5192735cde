use super::{Row, RowStore, SheetRange};
use crate::config::SheetsConfig;
use crate::error::{ApiError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Google Sheets v4 row store.
///
/// One attempt per call: no retries, no timeouts beyond reqwest's defaults.
pub struct SheetsRowStore {
    client: Client,
    api_base: String,
    spreadsheet_id: String,
    access_token: Option<String>,
}

/// `values.get` response
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// `values.append` request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AppendBody<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: Vec<&'a Row>,
}

impl SheetsRowStore {
    pub fn new(config: &SheetsConfig) -> Self {
        Self {
            client: Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            access_token: config.access_token.clone().filter(|t| !t.is_empty()),
        }
    }

    /// `{api_base}/{segments...}` with each segment escaped
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| ApiError::Internal(format!("bad sheets api_base {:?}: {}", self.api_base, e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Internal(format!("sheets api_base {:?} cannot be a base", self.api_base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn values_url(&self, range_segment: &str) -> Result<Url> {
        self.url(&[self.spreadsheet_id.as_str(), "values", range_segment])
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Sends the request and turns non-2xx answers into upstream errors
    async fn send(&self, req: RequestBuilder) -> Result<reqwest::Response> {
        let res = self.authorized(req).send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!("sheets api returned {}: {}", status, body)));
        }
        Ok(res)
    }
}

/// Sheets returns formatted strings, but numbers and booleans can slip through
fn cell_to_string(v: Value) -> String {
    match v {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Batch update request that removes one sheet row
fn delete_dimension_request(sheet_id: i64, absolute_row: usize) -> Value {
    json!({
        "requests": [{
            "deleteDimension": {
                "range": {
                    "sheetId": sheet_id,
                    "dimension": "ROWS",
                    "startIndex": absolute_row,
                    "endIndex": absolute_row + 1,
                }
            }
        }]
    })
}

#[async_trait]
impl RowStore for SheetsRowStore {
    async fn list_rows(&self, range: &SheetRange) -> Result<Vec<Row>> {
        let url = self.values_url(&range.name)?;
        let res = self.send(self.client.get(url)).await?;

        let body = res.text().await?;
        let parsed: ValueRange = serde_json::from_str(&body)?;
        let rows: Vec<Row> = parsed
            .values
            .into_iter()
            .map(|r| r.into_iter().map(cell_to_string).collect())
            .collect();
        tracing::debug!("Fetched {} rows from {}", rows.len(), range.name);
        Ok(rows)
    }

    async fn append_row(&self, range: &SheetRange, row: Row) -> Result<()> {
        let mut url = self.values_url(&format!("{}:append", range.name))?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let body = AppendBody {
            range: &range.name,
            major_dimension: "ROWS",
            values: vec![&row],
        };
        self.send(self.client.post(url).json(&body)).await?;
        tracing::info!("Appended row to {}", range.name);
        Ok(())
    }

    async fn delete_row(&self, range: &SheetRange, row_index: usize) -> Result<()> {
        let url = self.url(&[&format!("{}:batchUpdate", self.spreadsheet_id)])?;

        let absolute_row = range.first_row + row_index;
        let body = delete_dimension_request(range.sheet_id, absolute_row);
        self.send(self.client.post(url).json(&body)).await?;
        tracing::info!(
            "Deleted sheet row {} (range {} index {})",
            absolute_row,
            range.name,
            row_index
        );
        Ok(())
    }
}
