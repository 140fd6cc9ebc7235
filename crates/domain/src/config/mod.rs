mod report;
mod rpc;

pub use report::*;
pub use rpc::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub rpc: RpcConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.report.service_name.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "report.service_name".into(),
                message: "service_name must not be empty".into(),
            });
        }

        // Workspace types are always `Module.Type`.
        match self.report.object_type.split_once('.') {
            Some((module, name)) if !module.is_empty() && !name.is_empty() => {}
            _ => errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "report.object_type".into(),
                message: format!(
                    "object_type must look like Module.Type, got {:?}",
                    self.report.object_type
                ),
            }),
        }

        if let Some(prefix) = &self.report.name_prefix {
            if prefix.is_empty() {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Warning,
                    field: "report.name_prefix".into(),
                    message: "empty name_prefix produces names starting with '.'".into(),
                });
            }
        }

        if self.rpc.version != "1.1" {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "rpc.version".into(),
                message: format!(
                    "KBase services speak JSON-RPC 1.1, got {:?}",
                    self.rpc.version
                ),
            });
        }

        errors
    }
}
