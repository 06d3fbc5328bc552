use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

const JSONRPC_VERSION: &str = "2.0";

/// A single JSON-RPC call to the streamer.
///
/// Serializes to one JSON object with no framing of its own; the end of the request is
/// signalled by half-closing the connection it is written to.
#[derive(Debug, Clone, Serialize)]
pub struct Request<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: &'a [String],
    id: u64,
}

impl<'a> Request<'a> {
    pub fn new(method: &'a str, params: &'a [String]) -> Self {
        Request {
            jsonrpc: JSONRPC_VERSION,
            method,
            params,
            id: next_id(),
        }
    }

    pub fn method(&self) -> &str {
        self.method
    }

    pub fn to_vec(&self) -> crate::Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

// Ids are unix seconds, matching the device's own tooling. With one request per connection
// there is nothing to correlate against.
fn next_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Error payload returned by the streamer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcError {
    pub code: Option<i64>,
    pub message: String,
}

impl RpcError {
    fn from_value(error: &Value) -> Self {
        RpcError {
            code: error.get("code").and_then(Value::as_i64),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| error.to_string()),
        }
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "streamer error {}: {}", code, self.message),
            None => write!(f, "streamer error: {}", self.message),
        }
    }
}

impl std::error::Error for RpcError {}

/// A response carrying an `error` member is a failure; everything else is success.
pub fn is_error(response: &Value) -> bool {
    response.get("error").is_some()
}

pub(crate) fn parse_response(buf: &[u8]) -> crate::Result<Value> {
    let response: Value = serde_json::from_slice(buf)?;
    if let Some(error) = response.get("error") {
        return Err(RpcError::from_value(error).into());
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_envelope_fields() {
        let params = vec!["framerate".to_string(), "30".to_string()];
        let request = Request::new("setStreamerSettings", &params);
        let value: Value = serde_json::from_slice(&request.to_vec().unwrap()).unwrap();

        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["method"], "setStreamerSettings");
        assert_eq!(value["params"], json!(["framerate", "30"]));
        assert!(value["id"].is_u64());
    }

    #[test]
    fn error_member_is_failure() {
        let body = br#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"no such method"},"id":1}"#;
        let err = parse_response(body).unwrap_err();
        let rpc = err.rpc().expect("rpc error");
        assert_eq!(rpc.code, Some(-32601));
        assert_eq!(rpc.message, "no such method");
    }

    #[test]
    fn result_member_is_success() {
        let body = br#"{"jsonrpc":"2.0","result":"ok","id":1}"#;
        let response = parse_response(body).unwrap();
        assert!(!is_error(&response));
        assert_eq!(response["result"], "ok");
    }

    #[test]
    fn error_member_without_fields_still_fails() {
        let body = br#"{"error":"it broke","id":1}"#;
        let err = parse_response(body).unwrap_err();
        let rpc = err.rpc().expect("rpc error");
        assert_eq!(rpc.code, None);
        assert_eq!(rpc.message, r#""it broke""#);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = parse_response(b"not json at all").unwrap_err();
        assert!(err.rpc().is_none());
    }
}
