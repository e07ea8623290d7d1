//! Demo traffic against the echo server.
//!
//! Issues `TestRpc::Test`, `TestRpc::Add` and `TestRpc::Err` in order. The
//! last call is expected to fail. The first failure is logged and ends the
//! routine; it never reaches the shutdown path.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::rpc::client::RpcClient;
use crate::rpc::error::RpcResult;

pub const SERVICE: &str = "TestRpc";

/// Argument of `TestRpc::Test`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestAbc {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
}

impl Default for TestAbc {
    fn default() -> Self {
        Self {
            a: "aaa".into(),
            b: "bbb".into(),
            c: "ccc".into(),
        }
    }
}

/// Run the demo calls once.
pub async fn run(client: &RpcClient, addr: SocketAddr) -> RpcResult<()> {
    let param = TestAbc::default();
    let test: String = match client.call(addr, SERVICE, "Test", &param).await {
        Ok(res) => res,
        Err(e) => {
            tracing::error!(error = %e, "client.Call(TestRpc::Test) failed");
            return Err(e);
        }
    };
    tracing::info!(param = ?param, res = %test, "TestRpc::Test");

    let add: i64 = match client.call(addr, SERVICE, "Add", 1).await {
        Ok(res) => res,
        Err(e) => {
            tracing::error!(error = %e, "client.Call(TestRpc::Add) failed");
            return Err(e);
        }
    };
    tracing::info!(res = add, "TestRpc::Add(1)");

    let err: i64 = match client.call(addr, SERVICE, "Err", 2).await {
        Ok(res) => res,
        Err(e) => {
            // The server rejects this call on purpose.
            tracing::error!(error = %e, "client.Call(TestRpc::Err) failed");
            return Err(e);
        }
    };
    tracing::info!(res = err, "TestRpc::Err(2)");

    Ok(())
}
