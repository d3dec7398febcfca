//! # Response envelope — the only shapes the client trusts
//!
//! Every API response body is JSON of the form
//!
//! ```json
//! { "data": <payload>, "message": "optional human-readable text" }
//! ```
//!
//! Success bodies are decoded straight into [`Envelope<T>`] with the caller's
//! payload type, so a schema mismatch fails here with [`ApiError::Decode`]
//! instead of leaking a half-shaped value into the UI. Failure bodies are read
//! only for their `message`, and any body that is not JSON (an HTML error page
//! from a proxy, an empty 502) simply yields no message.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Success envelope.
///
/// A missing `data` field decodes as `None` when `T` is an `Option`, and is a
/// decode error otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
}

/// Failure envelope.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default, deserialize_with = "lenient_message")]
    pub message: Option<String>,
}

// Some endpoints send validation errors as a list of strings.
fn lenient_message<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Array(items) => {
            let parts: Vec<String> = items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    })
}

/// Decode a 2xx body and unwrap its payload.
pub fn decode_success<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let envelope: Envelope<T> = serde_json::from_slice(body)
        .map_err(|e| ApiError::Decode(format!("unexpected response shape: {e}")))?;
    Ok(envelope.data)
}

/// Build the error for a non-2xx response.
pub fn decode_failure(status: u16, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());
    ApiError::Status { status, message }
}
