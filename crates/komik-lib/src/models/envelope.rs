use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchError;

/// Wrapper the proxy puts around every upstream response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub result: Option<Value>,
}

impl Envelope {
    pub fn from_slice(body: &[u8]) -> Result<Self, FetchError> {
        serde_json::from_slice(body).map_err(|e| FetchError::Protocol(e.to_string()))
    }

    /// Unwraps the payload, preferring `result.content` when it is set.
    pub fn into_payload(self) -> Result<Value, FetchError> {
        if !self.success {
            return Err(FetchError::Protocol("proxy reported failure".to_string()));
        }

        match self.result {
            Some(Value::Object(mut map)) => match map.remove("content") {
                Some(content) if is_truthy(&content) => Ok(content),
                Some(content) => {
                    map.insert("content".to_string(), content);
                    Ok(Value::Object(map))
                }
                None => Ok(Value::Object(map)),
            },
            Some(Value::Null) | None => Err(FetchError::Protocol("empty result".to_string())),
            Some(other) => Ok(other),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
