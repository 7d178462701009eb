//! Decoded open-api responses.
//!
//! The server normally answers `{"success": bool, "data": ...}`, but callers
//! must tolerate other shapes: an absent `data` key reads as an empty result.

use serde::de::DeserializeOwned;
use serde_json::Value;

static NULL: Value = Value::Null;

/// A 2xx response with a JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: http::StatusCode,
    body: Value,
}

impl ApiResponse {
    /// Wrap a decoded body.
    #[must_use]
    pub fn new(status: http::StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    /// The response status.
    #[must_use]
    pub fn status(&self) -> http::StatusCode {
        self.status
    }

    /// The `success` flag, if the body carries one.
    #[must_use]
    pub fn success(&self) -> Option<bool> {
        self.body.get("success").and_then(Value::as_bool)
    }

    /// The `data` member, or `Null` when absent.
    #[must_use]
    pub fn data(&self) -> &Value {
        self.body.get("data").unwrap_or(&NULL)
    }

    /// The `data` member as a list; empty when absent or not an array.
    ///
    /// # Examples
    ///
    /// ```
    /// use scp_client::ApiResponse;
    /// use serde_json::json;
    ///
    /// let ok = ApiResponse::new(http::StatusCode::OK, json!({"success": true, "data": [1, 2]}));
    /// assert_eq!(ok.items().len(), 2);
    ///
    /// let odd = ApiResponse::new(http::StatusCode::OK, json!({"message": "no data here"}));
    /// assert!(odd.items().is_empty());
    /// ```
    #[must_use]
    pub fn items(&self) -> &[Value] {
        self.data().as_array().map_or(&[], Vec::as_slice)
    }

    /// Deserialize the `data` member as a whole.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data().clone())
    }

    /// Deserialize every entry of [`ApiResponse::items`].
    pub fn items_as<T: DeserializeOwned>(&self) -> Result<Vec<T>, serde_json::Error> {
        self.items().iter().cloned().map(serde_json::from_value).collect()
    }

    /// The whole decoded body.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.body
    }

    /// Consume the response, returning the decoded body.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.body
    }
}
