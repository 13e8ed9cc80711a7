//! Normalized responses from listing endpoints.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::{Error, Result};

/// Status code the API uses for "no results matched the filter".
pub const NO_RESULTS_STATUS: u16 = 404;

/// Data key used by the normalized no-results page.
pub const DEFAULT_DATA_KEY: &str = "data";

/// A decoded response from a listing endpoint.
///
/// `code` carries the HTTP status; `body` the decoded JSON. A 404 never
/// reaches callers in its raw form: it is replaced by
/// [`ApiResponse::no_results`], an empty single-page result.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code of the response.
    pub code: u16,
    /// Decoded JSON body.
    pub body: Value,
}

impl ApiResponse {
    /// Create a response from a status code and decoded body.
    pub fn new(code: u16, body: Value) -> Self {
        Self { code, body }
    }

    /// The normalized form of a "no results" response.
    pub fn no_results() -> Self {
        Self {
            code: NO_RESULTS_STATUS,
            body: json!({
                "data": [],
                "totalItemsCount": 0,
                "lastPage": 1,
            }),
        }
    }

    /// Returns `true` for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// Returns `true` for the normalized no-results response.
    pub fn is_no_results(&self) -> bool {
        self.code == NO_RESULTS_STATUS
    }

    /// Total number of items across all pages; `0` when absent.
    pub fn total_items_count(&self) -> u64 {
        coerce_integer(self.body.get("totalItemsCount"))
    }

    /// Number of the last page; `0` when absent or malformed.
    pub fn last_page(&self) -> u32 {
        u32::try_from(coerce_integer(self.body.get("lastPage"))).unwrap_or(u32::MAX)
    }

    /// Decode the records stored under `data_key`.
    ///
    /// The no-results response has no records under any key.
    pub fn records<T: DeserializeOwned>(&self, data_key: &str) -> Result<Vec<T>> {
        if self.is_no_results() {
            return Ok(Vec::new());
        }

        match self.body.get(data_key) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| serde_json::from_value(item.clone()).map_err(Error::from))
                .collect(),
            Some(Value::Null) => Ok(Vec::new()),
            Some(other) => Err(Error::UnexpectedResponse(format!(
                "`{data_key}` is not a list: {other}"
            ))),
            None => Err(Error::UnexpectedResponse(format!(
                "missing `{data_key}` in response"
            ))),
        }
    }

    /// Turn anything other than a success or the no-results response into
    /// [`Error::Api`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() || self.is_no_results() {
            Ok(self)
        } else {
            Err(Error::from_api_response(self.code, self.body))
        }
    }
}

/// Read a count the way the API sends it: a JSON number or a numeric
/// string. Everything else is `0`.
fn coerce_integer(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let digits: String = s.trim().chars().take_while(char::is_ascii_digit).collect();
            digits.parse().unwrap_or(0)
        }
        _ => 0,
    }
}
