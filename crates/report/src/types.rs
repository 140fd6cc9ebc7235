//! Data Transfer Objects matching the KBaseReport type specification.
//!
//! Field names are `snake_case` on the wire, like the service's own type
//! definitions. Every structure keeps keys it does not declare in an
//! insertion-ordered `extensions` map so that a decode/encode cycle is
//! lossless.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::render::{Opt, OptList, Props};

/// Unknown JSON keys, in the order they were first inserted.
pub type Extensions = serde_json::Map<String, Value>;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Report
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A simple report of a method run: a plain-text summary, warnings, the
/// workspace objects the run created and links to files or HTML pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objects_created: Option<Vec<WorkspaceObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_links: Option<Vec<LinkedFile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_links: Option<Vec<LinkedFile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_html: Option<String>,
    /// Index into `html_links` of the page shown by default. Ignored when
    /// `direct_html` is present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_html_link_index: Option<i64>,
    /// Fixed height in pixels of the HTML window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_window_height: Option<f64>,
    /// Fixed height in pixels of the summary window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_window_height: Option<f64>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Report {
    pub fn new(text_message: impl Into<String>) -> Self {
        Self {
            text_message: Some(text_message.into()),
            ..Self::default()
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.get_or_insert_with(Vec::new).push(warning.into());
        self
    }

    pub fn with_object_created(mut self, object: WorkspaceObject) -> Self {
        self.objects_created.get_or_insert_with(Vec::new).push(object);
        self
    }

    /// Fill the fields the workspace expects on a saved report. Fields the
    /// caller already set are left alone.
    pub fn fill_defaults(&mut self) {
        self.objects_created.get_or_insert_with(Vec::new);
        self.warnings.get_or_insert_with(Vec::new);
        self.file_links.get_or_insert_with(Vec::new);
        self.html_links.get_or_insert_with(Vec::new);
        self.direct_html.get_or_insert_with(String::new);
        self.direct_html_link_index.get_or_insert(0);
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Report [textMessage={}, warnings={}, objectsCreated={}, fileLinks={}, \
             htmlLinks={}, directHtml={}, directHtmlLinkIndex={}, htmlWindowHeight={}, \
             summaryWindowHeight={}, additionalProperties={}]",
            Opt(&self.text_message),
            OptList(&self.warnings),
            OptList(&self.objects_created),
            OptList(&self.file_links),
            OptList(&self.html_links),
            Opt(&self.direct_html),
            Opt(&self.direct_html_link_index),
            Opt(&self.html_window_height),
            Opt(&self.summary_window_height),
            Props(&self.extensions),
        )
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Workspace objects & links
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A workspace object with a short description, linked from the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceObject {
    /// Workspace reference, e.g. `ws/id/ver`.
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub object_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl WorkspaceObject {
    pub fn new(object_ref: impl Into<String>) -> Self {
        Self {
            object_ref: Some(object_ref.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl fmt::Display for WorkspaceObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WorkspaceObject [ref={}, description={}, additionalProperties={}]",
            Opt(&self.object_ref),
            Opt(&self.description),
            Props(&self.extensions),
        )
    }
}

/// A file or HTML archive in the blob store that the report links to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedFile {
    /// Handle id of the stored blob.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Plain-text name shown to the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// `<blob store url>/node/<node id>`.
    #[serde(rename = "URL", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl fmt::Display for LinkedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LinkedFile [handle={}, description={}, name={}, label={}, URL={}, \
             additionalProperties={}]",
            Opt(&self.handle),
            Opt(&self.description),
            Opt(&self.name),
            Opt(&self.label),
            Opt(&self.url),
            Props(&self.extensions),
        )
    }
}

/// A file to link from an extended report, given either as a local path
/// (uploaded while building the report) or as an existing blob-store id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shock_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl File {
    pub fn from_path(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn from_shock_id(shock_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            shock_id: Some(shock_id.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Extended report parameters
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Parameters of `create_extended_report`. Every field is optional; the
/// workspace is given by name or by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateExtendedReportParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objects_created: Option<Vec<WorkspaceObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_links: Option<Vec<File>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_html_link_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_links: Option<Vec<File>>,
    /// Name of the saved report object; generated when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_object_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_window_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_window_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<i64>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Results
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Reference to a saved report; returned by both `create` and
/// `create_extended_report`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportInfo {
    #[serde(rename = "ref")]
    pub object_ref: String,
    pub name: String,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl ReportInfo {
    /// Build the result for a report the workspace just saved.
    pub fn from_saved(info: &ObjectInfo, name: impl Into<String>) -> Self {
        Self {
            object_ref: info.object_ref(),
            name: name.into(),
            extensions: Extensions::new(),
        }
    }
}

/// Service health, returned by `status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfo {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub git_url: String,
    #[serde(default)]
    pub git_commit_hash: String,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl StatusInfo {
    pub fn is_ok(&self) -> bool {
        self.state == "OK"
    }
}

/// The workspace's object information tuple:
/// `[objid, name, type, save_date, version, saved_by, wsid, workspace,
/// chsum, size, meta]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo(
    pub i64,
    pub String,
    pub String,
    pub String,
    pub i64,
    pub String,
    pub i64,
    pub String,
    pub String,
    pub i64,
    pub Option<BTreeMap<String, String>>,
);

impl ObjectInfo {
    pub fn object_id(&self) -> i64 {
        self.0
    }

    pub fn name(&self) -> &str {
        &self.1
    }

    pub fn version(&self) -> i64 {
        self.4
    }

    pub fn workspace_id(&self) -> i64 {
        self.6
    }

    /// `wsid/objid/version`.
    pub fn object_ref(&self) -> String {
        format!("{}/{}/{}", self.6, self.0, self.4)
    }
}

/// One step of an object's provenance, supplied by the caller's context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_ver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default)]
    pub method_params: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl ProvenanceAction {
    pub fn new(service: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            service: Some(service.into()),
            method: Some(method.into()),
            ..Self::default()
        }
    }
}
