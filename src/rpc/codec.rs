//! JSON wire format.
//!
//! One frame per line: a JSON object terminated by `\n`.
//!
//! ```text
//! → {"id":1,"service":"TestRpc","method":"Add","params":1}
//! ← {"id":1,"result":2,"error":null}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rpc::error::{RpcError, RpcResult};

/// A call frame sent to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub id: u64,
    pub service: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// A reply frame received from the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub id: u64,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RpcResponse {
    /// Turn the reply into the call result, checking that it answers `expected_id`.
    pub fn into_result(self, expected_id: u64) -> RpcResult<Value> {
        if self.id != expected_id {
            return Err(RpcError::IdMismatch {
                expected: expected_id,
                got: self.id,
            });
        }
        match self.error {
            Some(error) => Err(RpcError::Remote(error)),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// Serialize a request into one newline-terminated frame.
pub fn encode_request(request: &RpcRequest) -> RpcResult<Vec<u8>> {
    let mut frame = serde_json::to_vec(request)?;
    frame.push(b'\n');
    Ok(frame)
}

/// Parse one frame (with or without the trailing newline).
pub fn decode_response(line: &str) -> RpcResult<RpcResponse> {
    Ok(serde_json::from_str(line.trim_end())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_is_single_line() {
        let frame = encode_request(&RpcRequest {
            id: 7,
            service: "TestRpc".into(),
            method: "Test".into(),
            params: json!({"A": "aaa", "B": "bbb", "C": "ccc"}),
        })
        .unwrap();

        assert_eq!(frame.last(), Some(&b'\n'));
        assert_eq!(frame.iter().filter(|b| **b == b'\n').count(), 1);
    }

    #[test]
    fn test_decode_result() {
        let response = decode_response("{\"id\":1,\"result\":2}\n").unwrap();
        assert_eq!(response.into_result(1).unwrap(), json!(2));
    }

    #[test]
    fn test_decode_remote_error() {
        let response = decode_response(r#"{"id":5,"result":null,"error":"bad"}"#).unwrap();
        assert!(matches!(response.into_result(5), Err(RpcError::Remote(e)) if e == "bad"));
    }

    #[test]
    fn test_id_mismatch() {
        let response = decode_response(r#"{"id":2}"#).unwrap();
        assert!(matches!(
            response.into_result(3),
            Err(RpcError::IdMismatch { expected: 3, got: 2 })
        ));
    }

    #[test]
    fn test_garbage_is_codec_error() {
        assert!(matches!(decode_response("not json"), Err(RpcError::Codec(_))));
    }
}
