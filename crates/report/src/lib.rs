//! `kr-report` — typed parameters and payloads for the KBase report
//! service.
//!
//! The centre of the crate is [`CreateParams`], the parameter record of
//! the `create` call: three declared fields plus an insertion-ordered map
//! of every key the schema does not declare, round-tripped losslessly
//! through JSON. Around it:
//!
//! | Module         | Provides                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`types`]      | `Report`, links, extended-report params, result DTOs      |
//! | [`validation`] | the service's parameter checks, collected as issues       |
//! | [`object`]     | the workspace `save_objects` payload for a report         |
//! | [`protocol`]   | JSON-RPC 1.1 request/response envelopes                   |
//!
//! No module performs I/O; transports are the caller's concern.
//!
//! # Quick start
//!
//! ```rust
//! use kr_report::{CreateParams, Report};
//!
//! let params = CreateParams::new()
//!     .with_report(Report::new("assembled 3 contigs"))
//!     .with_workspace_name("my_workspace")
//!     .with_extension("prefix", "megahit")
//!     .unwrap();
//!
//! let json = params.to_json().unwrap();
//! assert_eq!(
//!     json,
//!     r#"{"report":{"text_message":"assembled 3 contigs"},"workspace_name":"my_workspace","prefix":"megahit"}"#
//! );
//! assert_eq!(CreateParams::from_json(&json).unwrap(), params);
//! ```

pub mod object;
pub mod params;
pub mod protocol;
mod render;
pub mod types;
pub mod validation;

// ── Re-exports for ergonomic imports ─────────────────────────────────

pub use object::{
    LinkKind, LinkResolver, ObjectSaveData, ReportObjectBuilder, SaveObjectsParams, ShockHandle,
    WorkspaceTarget,
};
pub use params::CreateParams;
pub use protocol::{RpcError, RpcRequest, RpcResponse, ServiceMethod};
pub use types::{
    CreateExtendedReportParams, Extensions, File, LinkedFile, ObjectInfo, ProvenanceAction,
    Report, ReportInfo, StatusInfo, WorkspaceObject,
};
pub use validation::{
    ensure_valid_create_params, ensure_valid_extended_report_params, validate_create_params,
    validate_extended_report_params, ParamIssue,
};
