use serde::{Deserialize, Serialize};

/// JSON-RPC envelope settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Protocol version string carried in every request (`"1.1"`).
    #[serde(default = "d_version")]
    pub version: String,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            version: d_version(),
        }
    }
}

fn d_version() -> String {
    "1.1".into()
}
