use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Saved report objects
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Service module name used to qualify RPC method names
    /// (`KBaseReport.create`).
    #[serde(default = "d_service_name")]
    pub service_name: String,
    /// Workspace type of the saved report object.
    #[serde(default = "d_object_type")]
    pub object_type: String,
    /// Save report objects hidden from the workspace listing.
    #[serde(default = "d_true")]
    pub hidden: bool,
    /// Prefix for generated report names (`<prefix>.report_<uuid>`).
    /// A `prefix` key in the call parameters takes precedence.
    #[serde(default)]
    pub name_prefix: Option<String>,
    /// Provenance placeholder used when the caller supplies none.
    #[serde(default = "d_service_name")]
    pub provenance_service: String,
    #[serde(default = "d_provenance_method")]
    pub provenance_method: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            service_name: d_service_name(),
            object_type: d_object_type(),
            hidden: true,
            name_prefix: None,
            provenance_service: d_service_name(),
            provenance_method: d_provenance_method(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_service_name() -> String {
    "KBaseReport".into()
}
fn d_object_type() -> String {
    "KBaseReport.Report".into()
}
fn d_true() -> bool {
    true
}
fn d_provenance_method() -> String {
    "create".into()
}
