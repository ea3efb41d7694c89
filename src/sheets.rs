#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An error raised at the sheet boundary. Grading itself never fails; every
/// failure mode lives here.
#[derive(thiserror::Error, Debug)]
pub enum SheetsError {
    /// No API token was configured for a live run.
    #[error("no Sheets API token configured; set PAUTA_TOKEN or pass --token")]
    Auth,
    /// The HTTP request itself failed (connection, TLS, decoding).
    #[error("request to the Sheets API failed")]
    Http(#[from] reqwest::Error),
    /// The API answered with a non-success status.
    #[error("Sheets API returned {status}: {message}")]
    Api {
        /// HTTP status code of the response.
        status:  u16,
        /// Message extracted from the error body, or the raw body.
        message: String,
    },
}

/// A single cell address: column letter plus absolute (1-based) row number,
/// e.g. `G4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    /// Column letter.
    pub column: char,
    /// Absolute row number on the sheet.
    pub row:    u32,
}

impl CellRef {
    /// Creates a cell reference -
    /// * `column` - column letter, e.g. 'G'
    /// * `row` - absolute row number, 1-based
    pub fn new(column: char, row: u32) -> Self {
        Self { column, row }
    }
}

impl Display for CellRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

/// Wire model for the Sheets v4 `values` resource.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ValueRange {
    /// The range the values cover, as returned by the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range:           Option<String>,
    /// Row-major or column-major; this tool only ever uses row-major.
    #[serde(rename = "majorDimension", skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    /// Cell values, one inner vec per row. Absent when the range is empty.
    #[serde(default)]
    pub values:          Vec<Vec<Value>>,
}

/// Shape of the error body the Sheets API returns on failure.
#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    /// The nested error object.
    error: ApiErrorDetail,
}

/// The useful part of an API error body.
#[derive(Deserialize, Debug)]
struct ApiErrorDetail {
    /// Human-readable message.
    message: String,
}

/// Anything that can hand out rows for a range and accept single-cell writes.
/// The pipeline takes this as an injected dependency so tests can run against
/// an in-memory sheet.
#[async_trait]
pub trait SheetStore {
    /// Fetches the ordered rows of an A1 range. Cells arrive as text, exactly
    /// as the sheet renders them.
    async fn fetch_range(&self, range: &str) -> Result<Vec<Vec<String>>, SheetsError>;

    /// Writes one value to one cell, RAW (no formula interpretation).
    async fn write_cell(&self, cell: CellRef, value: Value) -> Result<(), SheetsError>;
}

/// Default endpoint for the Sheets v4 `spreadsheets` resource.
pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// A [`SheetStore`] backed by the Google Sheets v4 REST API.
pub struct GoogleSheets {
    /// Shared HTTP client.
    client:         reqwest::Client,
    /// Base URL of the `spreadsheets` resource, overridable for tests.
    api_base:       String,
    /// The spreadsheet being read and written.
    spreadsheet_id: String,
    /// OAuth bearer token for the `spreadsheets` scope.
    token:          String,
}

impl GoogleSheets {
    /// Creates a client for one spreadsheet -
    /// * `api_base` - endpoint of the `spreadsheets` resource
    /// * `spreadsheet_id` - the spreadsheet to operate on
    /// * `token` - bearer token with the `spreadsheets` scope
    pub fn new(api_base: String, spreadsheet_id: String, token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            spreadsheet_id,
            token,
        }
    }

    /// Builds the URL for a `values` sub-resource of this spreadsheet.
    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/{}/values/{}",
            self.api_base.trim_end_matches('/'),
            self.spreadsheet_id,
            range
        )
    }

    /// Turns a non-success response into a [`SheetsError::Api`], pulling the
    /// message out of the error body when it parses.
    async fn api_error(response: reqwest::Response) -> SheetsError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(parsed) => parsed.error.message,
            Err(_) => body,
        };
        SheetsError::Api { status, message }
    }

    /// Renders a cell value to the string the sheet would display. The API
    /// returns formatted values as JSON strings; anything else is rendered
    /// with its JSON text.
    fn cell_text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[async_trait]
impl SheetStore for GoogleSheets {
    async fn fetch_range(&self, range: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        let response = self
            .client
            .get(self.values_url(range))
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let value_range: ValueRange = response.json().await?;
        Ok(value_range
            .values
            .iter()
            .map(|row| row.iter().map(Self::cell_text).collect())
            .collect())
    }

    async fn write_cell(&self, cell: CellRef, value: Value) -> Result<(), SheetsError> {
        let body = ValueRange {
            range: None,
            major_dimension: None,
            values: vec![vec![value]],
        };

        let response = self
            .client
            .put(self.values_url(&cell.to_string()))
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_refs_render_as_a1() {
        assert_eq!(CellRef::new('G', 4).to_string(), "G4");
        assert_eq!(CellRef::new('H', 27).to_string(), "H27");
    }

    #[test]
    fn value_range_deserializes_formatted_cells() {
        let json = r#"{
            "range": "engenharia_de_software!A4:F5",
            "majorDimension": "ROWS",
            "values": [["Ana", "1", "10", "6", "6", "6"]]
        }"#;
        let parsed: ValueRange = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.values.len(), 1);
        assert_eq!(parsed.values[0][2], serde_json::json!("10"));
    }

    #[test]
    fn value_range_tolerates_an_empty_range() {
        let parsed: ValueRange = serde_json::from_str(r#"{"range": "x!A4:F4"}"#).unwrap();
        assert!(parsed.values.is_empty());
    }

    #[test]
    fn cell_text_keeps_strings_verbatim() {
        assert_eq!(GoogleSheets::cell_text(&serde_json::json!("10")), "10");
        assert_eq!(GoogleSheets::cell_text(&serde_json::json!(7)), "7");
    }
}
