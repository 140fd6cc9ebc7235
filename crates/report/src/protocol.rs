//! KBase JSON-RPC 1.1 envelopes for the report service.
//!
//! Requests carry the method as `<Service>.<method>` and the parameters as
//! a positional list; responses carry a result list or an error object.

use kr_domain::config::Config;
use kr_domain::error::{Error, Result};
use kr_domain::trace::TraceEvent;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::params::CreateParams;
use crate::types::CreateExtendedReportParams;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Methods
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceMethod {
    Create,
    CreateExtendedReport,
    Status,
}

impl ServiceMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::CreateExtendedReport => "create_extended_report",
            Self::Status => "status",
        }
    }

    /// `<service>.<method>`, e.g. `KBaseReport.create`.
    pub fn qualified(self, service: &str) -> String {
        format!("{service}.{}", self.as_str())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Requests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcRequest {
    pub method: String,
    pub params: Vec<Value>,
    pub version: String,
    pub id: String,
}

impl RpcRequest {
    pub fn new(cfg: &Config, method: ServiceMethod, params: Vec<Value>) -> Self {
        let req = Self {
            method: method.qualified(&cfg.report.service_name),
            params,
            version: cfg.rpc.version.clone(),
            id: random_id(),
        };
        TraceEvent::RpcRequestBuilt {
            method: req.method.clone(),
            id: req.id.clone(),
        }
        .emit();
        req
    }

    pub fn create(cfg: &Config, params: &CreateParams) -> Result<Self> {
        Ok(Self::new(cfg, ServiceMethod::Create, vec![serde_json::to_value(params)?]))
    }

    pub fn create_extended_report(cfg: &Config, params: &CreateExtendedReportParams) -> Result<Self> {
        Ok(Self::new(
            cfg,
            ServiceMethod::CreateExtendedReport,
            vec![serde_json::to_value(params)?],
        ))
    }

    pub fn status(cfg: &Config) -> Self {
        Self::new(cfg, ServiceMethod::Status, Vec::new())
    }
}

/// Request ids are random decimal strings, as the generated KBase clients
/// send them.
fn random_id() -> String {
    let n = Uuid::new_v4().as_u128() % 10_u128.pow(16);
    n.to_string()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Responses
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcResponse {
    #[serde(default)]
    pub version: Option<String>,
    /// Echo of the request id; some servers send it as a number.
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Decode the first element of the result list, or map the error
    /// object to [`Error::Rpc`].
    pub fn into_first<T: DeserializeOwned>(self) -> Result<T> {
        TraceEvent::RpcResponseDecoded {
            id: self.id.as_ref().map(Value::to_string).unwrap_or_default(),
            is_error: self.is_error(),
        }
        .emit();

        if let Some(err) = self.error {
            return Err(err.into());
        }
        let first = self
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| Error::Other("RPC response carries no result".into()))?;
        Ok(serde_json::from_value(first)?)
    }
}

/// The error object of a failed call. `error` holds the server-side
/// traceback when there is one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcError {
    #[serde(default)]
    pub name: String,
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.name, self.code, self.message)
    }
}

impl std::error::Error for RpcError {}

impl From<RpcError> for Error {
    fn from(err: RpcError) -> Self {
        Error::Rpc {
            code: err.code,
            message: err.message,
        }
    }
}
