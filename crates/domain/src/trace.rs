use serde::Serialize;

/// Structured trace events emitted across all report crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    ParamsDecoded {
        kind: String,
        declared_fields: usize,
        extension_count: usize,
    },
    ParamsValidated {
        kind: String,
        issues: usize,
    },
    ReportObjectBuilt {
        report_name: String,
        workspace: String,
        object_type: String,
        file_links: usize,
        html_links: usize,
    },
    LinkResolved {
        name: String,
        packed: bool,
        from_upload: bool,
    },
    RpcRequestBuilt {
        method: String,
        id: String,
    },
    RpcResponseDecoded {
        id: String,
        is_error: bool,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "kr_event");
    }
}
