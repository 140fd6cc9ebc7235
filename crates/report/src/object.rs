//! Turning report parameters into the workspace `save_objects` payload.
//!
//! Nothing here talks to the workspace or the blob store. Uploading files
//! for an extended report goes through the [`LinkResolver`] trait; the
//! caller owns the transport.

use kr_domain::config::ReportConfig;
use kr_domain::error::{Error, Result};
use kr_domain::trace::TraceEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::params::CreateParams;
use crate::types::{CreateExtendedReportParams, Extensions, File, LinkedFile, ProvenanceAction, Report};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Payload types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where the report object is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkspaceTarget {
    #[serde(rename = "id")]
    Id(i64),
    #[serde(rename = "workspace")]
    Name(String),
}

impl WorkspaceTarget {
    /// Pick the target from the two optional workspace fields. The numeric
    /// id wins when both are set since names can change.
    pub fn resolve(name: Option<&str>, id: Option<i64>) -> Result<Self> {
        match (id, name) {
            (Some(id), _) => Ok(Self::Id(id)),
            (None, Some(name)) => Ok(Self::Name(name.to_owned())),
            (None, None) => Err(Error::InvalidParams(
                "either `workspace_name` or `workspace_id` is required".into(),
            )),
        }
    }
}

impl std::fmt::Display for WorkspaceTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Body of the workspace `save_objects` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveObjectsParams {
    #[serde(flatten)]
    pub target: WorkspaceTarget,
    pub objects: Vec<ObjectSaveData>,
}

/// One object in a `save_objects` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSaveData {
    #[serde(rename = "type")]
    pub object_type: String,
    pub data: Report,
    pub name: String,
    pub meta: Extensions,
    pub hidden: u8,
    pub provenance: Vec<ProvenanceAction>,
}

/// A blob-store node with a handle, as returned by an upload or an
/// ownership transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShockHandle {
    /// Handle id.
    pub hid: String,
    /// Blob store base URL.
    pub url: String,
    /// Node id.
    pub id: String,
}

/// Which report section a file is linked from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    File,
    Html,
}

/// Makes a [`File`] available in the blob store.
///
/// Implementations upload `file.path` (zipped when `pack` is set or the
/// path is a directory) or take ownership of the existing `file.shock_id`
/// node, and return its handle.
pub trait LinkResolver {
    fn resolve(&self, file: &File, pack: bool) -> Result<ShockHandle>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Builder
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Assembles the saved report object from call parameters.
pub struct ReportObjectBuilder<'a> {
    cfg: &'a ReportConfig,
    provenance: Vec<ProvenanceAction>,
}

impl<'a> ReportObjectBuilder<'a> {
    pub fn new(cfg: &'a ReportConfig) -> Self {
        Self {
            cfg,
            provenance: Vec::new(),
        }
    }

    /// Provenance of the calling context, copied onto the saved object.
    pub fn with_provenance(mut self, provenance: Vec<ProvenanceAction>) -> Self {
        self.provenance = provenance;
        self
    }

    /// Generate a report name: `report_<uuid>`, prefixed by the `prefix`
    /// parameter or, failing that, the configured prefix.
    pub fn report_name(&self, prefix: Option<&Value>) -> String {
        let base = format!("report_{}", Uuid::new_v4());
        let prefix = match prefix {
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
            None => self.cfg.name_prefix.clone(),
        };
        match prefix {
            Some(p) => format!("{p}.{base}"),
            None => base,
        }
    }

    /// Payload for `create`: the caller's report with defaults filled in.
    /// Returns the payload and the generated report name.
    pub fn build_simple(&self, params: &CreateParams) -> Result<(SaveObjectsParams, String)> {
        let target = WorkspaceTarget::resolve(params.workspace_name(), params.workspace_id())?;
        let mut report = params
            .report()
            .cloned()
            .ok_or_else(|| Error::InvalidParams("required key not provided @ data['report']".into()))?;
        report.fill_defaults();

        let name = self.report_name(params.extension("prefix"));
        Ok((self.save_params(target, report, name.clone()), name))
    }

    /// Payload for `create_extended_report`. Every file and HTML link is
    /// passed through `resolver`; HTML links are always packed.
    pub fn build_extended(
        &self,
        params: &CreateExtendedReportParams,
        resolver: &dyn LinkResolver,
    ) -> Result<(SaveObjectsParams, String)> {
        let target =
            WorkspaceTarget::resolve(params.workspace_name.as_deref(), params.workspace_id)?;

        let file_links = resolve_all(resolver, params.file_links.as_deref(), LinkKind::File)?;
        let html_links = resolve_all(resolver, params.html_links.as_deref(), LinkKind::Html)?;

        let report = Report {
            text_message: Some(params.message.clone().unwrap_or_default()),
            warnings: Some(params.warnings.clone().unwrap_or_default()),
            objects_created: Some(params.objects_created.clone().unwrap_or_default()),
            file_links: Some(file_links),
            html_links: Some(html_links),
            direct_html: Some(params.direct_html.clone().unwrap_or_default()),
            direct_html_link_index: Some(params.direct_html_link_index.unwrap_or(0)),
            html_window_height: params.html_window_height,
            summary_window_height: params.summary_window_height,
            extensions: Extensions::new(),
        };

        let name = match &params.report_object_name {
            Some(name) => name.clone(),
            None => self.report_name(params.extensions.get("prefix")),
        };
        Ok((self.save_params(target, report, name.clone()), name))
    }

    fn save_params(&self, target: WorkspaceTarget, report: Report, name: String) -> SaveObjectsParams {
        TraceEvent::ReportObjectBuilt {
            report_name: name.clone(),
            workspace: target.to_string(),
            object_type: self.cfg.object_type.clone(),
            file_links: report.file_links.as_ref().map_or(0, Vec::len),
            html_links: report.html_links.as_ref().map_or(0, Vec::len),
        }
        .emit();

        SaveObjectsParams {
            target,
            objects: vec![ObjectSaveData {
                object_type: self.cfg.object_type.clone(),
                data: report,
                name,
                meta: Extensions::new(),
                hidden: u8::from(self.cfg.hidden),
                provenance: self.provenance.clone(),
            }],
        }
    }
}

fn resolve_all(
    resolver: &dyn LinkResolver,
    files: Option<&[File]>,
    kind: LinkKind,
) -> Result<Vec<LinkedFile>> {
    files
        .unwrap_or_default()
        .iter()
        .map(|file| link_file(resolver, file, kind))
        .collect()
}

fn link_file(resolver: &dyn LinkResolver, file: &File, kind: LinkKind) -> Result<LinkedFile> {
    let pack = kind == LinkKind::Html;
    let handle = resolver.resolve(file, pack)?;

    TraceEvent::LinkResolved {
        name: file.name.clone().unwrap_or_default(),
        packed: pack,
        from_upload: file.path.is_some(),
    }
    .emit();

    let label = file
        .extensions
        .get("label")
        .and_then(Value::as_str)
        .unwrap_or_default();

    Ok(LinkedFile {
        handle: Some(handle.hid),
        description: Some(file.description.clone().unwrap_or_default()),
        name: Some(file.name.clone().unwrap_or_default()),
        label: Some(label.to_owned()),
        url: Some(format!("{}/node/{}", handle.url, handle.id)),
        extensions: Extensions::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    /// Records every resolve call and hands out sequential node ids.
    #[derive(Default)]
    struct FakeBlobStore {
        calls: RefCell<Vec<(Option<String>, bool)>>,
    }

    impl LinkResolver for FakeBlobStore {
        fn resolve(&self, file: &File, pack: bool) -> Result<ShockHandle> {
            let mut calls = self.calls.borrow_mut();
            calls.push((file.name.clone(), pack));
            Ok(ShockHandle {
                hid: format!("KBH_{}", calls.len()),
                url: "https://blobs.example".into(),
                id: format!("node-{}", calls.len()),
            })
        }
    }

    struct FailingBlobStore;

    impl LinkResolver for FailingBlobStore {
        fn resolve(&self, _file: &File, _pack: bool) -> Result<ShockHandle> {
            Err(Error::LinkResolution("blob store unavailable".into()))
        }
    }

    #[test]
    fn id_wins_over_name() {
        assert_eq!(
            WorkspaceTarget::resolve(Some("ws"), Some(9)).unwrap(),
            WorkspaceTarget::Id(9)
        );
        assert_eq!(
            WorkspaceTarget::resolve(Some("ws"), None).unwrap(),
            WorkspaceTarget::Name("ws".into())
        );
        assert!(WorkspaceTarget::resolve(None, None).is_err());
    }

    #[test]
    fn simple_payload_fills_defaults_and_targets_workspace() {
        let cfg = ReportConfig::default();
        let params = CreateParams::new()
            .with_workspace_name("my_ws")
            .with_report(Report::new("assembled 3 contigs"));
        let (payload, name) = ReportObjectBuilder::new(&cfg)
            .with_provenance(vec![ProvenanceAction::new("MegaHit", "run")])
            .build_simple(&params)
            .unwrap();

        assert!(name.starts_with("report_"));
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["workspace"], "my_ws");
        assert!(json.get("id").is_none());

        let object = &json["objects"][0];
        assert_eq!(object["type"], "KBaseReport.Report");
        assert_eq!(object["hidden"], 1);
        assert_eq!(object["meta"], json!({}));
        assert_eq!(object["name"], name.as_str());
        assert_eq!(object["provenance"][0]["service"], "MegaHit");
        assert_eq!(
            object["data"],
            json!({
                "text_message": "assembled 3 contigs",
                "warnings": [],
                "objects_created": [],
                "file_links": [],
                "html_links": [],
                "direct_html": "",
                "direct_html_link_index": 0
            })
        );
    }

    #[test]
    fn prefix_parameter_prefixes_name() {
        let cfg = ReportConfig {
            name_prefix: Some("configured".into()),
            ..ReportConfig::default()
        };
        let params = CreateParams::new()
            .with_workspace_id(1)
            .with_report(Report::new("x"))
            .with_extension("prefix", "run7")
            .unwrap();
        let (payload, name) = ReportObjectBuilder::new(&cfg).build_simple(&params).unwrap();

        assert!(name.starts_with("run7.report_"));
        assert_eq!(payload.target, WorkspaceTarget::Id(1));
    }

    #[test]
    fn configured_prefix_applies_without_parameter() {
        let cfg = ReportConfig {
            name_prefix: Some("configured".into()),
            ..ReportConfig::default()
        };
        let builder = ReportObjectBuilder::new(&cfg);
        assert!(builder.report_name(None).starts_with("configured.report_"));
        assert!(builder.report_name(Some(&json!(12))).starts_with("12.report_"));
    }

    #[test]
    fn simple_payload_requires_report() {
        let cfg = ReportConfig::default();
        let params = CreateParams::new().with_workspace_id(1);
        let err = ReportObjectBuilder::new(&cfg).build_simple(&params).unwrap_err();
        assert!(matches!(err, Error::InvalidParams(_)));
    }

    #[test]
    fn extended_payload_links_files_through_resolver() {
        let cfg = ReportConfig {
            hidden: false,
            ..ReportConfig::default()
        };
        let params = CreateExtendedReportParams {
            workspace_id: Some(12),
            message: Some("see attached".into()),
            report_object_name: Some("my_report".into()),
            file_links: Some(vec![
                File::from_path("/kb/module/work/tmp/a.txt", "a"),
                File::from_shock_id("abc", "b"),
            ]),
            html_links: Some(vec![File::from_path("/kb/module/work/tmp/html", "index")]),
            ..CreateExtendedReportParams::default()
        };
        let store = FakeBlobStore::default();
        let (payload, name) = ReportObjectBuilder::new(&cfg)
            .build_extended(&params, &store)
            .unwrap();

        assert_eq!(name, "my_report");
        assert_eq!(
            *store.calls.borrow(),
            vec![
                (Some("a".to_string()), false),
                (Some("b".to_string()), false),
                (Some("index".to_string()), true),
            ]
        );

        let object = &payload.objects[0];
        assert_eq!(object.hidden, 0);
        let files = object.data.file_links.as_ref().unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].handle.as_deref(), Some("KBH_1"));
        assert_eq!(files[0].url.as_deref(), Some("https://blobs.example/node/node-1"));
        assert_eq!(files[1].name.as_deref(), Some("b"));
        assert_eq!(files[1].label.as_deref(), Some(""));
        let html = object.data.html_links.as_ref().unwrap();
        assert_eq!(html[0].url.as_deref(), Some("https://blobs.example/node/node-3"));
        assert_eq!(object.data.text_message.as_deref(), Some("see attached"));
        assert_eq!(object.data.direct_html_link_index, Some(0));
    }

    #[test]
    fn link_url_is_handle_url_plus_node_path() {
        struct SlashedStore;

        impl LinkResolver for SlashedStore {
            fn resolve(&self, _file: &File, _pack: bool) -> Result<ShockHandle> {
                Ok(ShockHandle {
                    hid: "KBH_9".into(),
                    url: "https://ci.kbase.us/services/shock-api/".into(),
                    id: "abc".into(),
                })
            }
        }

        let file = File::from_shock_id("abc", "reads.fq");
        let linked = link_file(&SlashedStore, &file, LinkKind::File).unwrap();
        assert_eq!(
            linked.url.as_deref(),
            Some("https://ci.kbase.us/services/shock-api//node/abc")
        );
    }

    #[test]
    fn extended_payload_generates_name_when_unset() {
        let cfg = ReportConfig::default();
        let params = CreateExtendedReportParams {
            workspace_name: Some("ws".into()),
            ..CreateExtendedReportParams::default()
        };
        let (_, name) = ReportObjectBuilder::new(&cfg)
            .build_extended(&params, &FakeBlobStore::default())
            .unwrap();
        assert!(name.starts_with("report_"));
    }

    #[test]
    fn resolver_failure_propagates() {
        let cfg = ReportConfig::default();
        let params = CreateExtendedReportParams {
            workspace_name: Some("ws".into()),
            file_links: Some(vec![File::from_shock_id("abc", "b")]),
            ..CreateExtendedReportParams::default()
        };
        let err = ReportObjectBuilder::new(&cfg)
            .build_extended(&params, &FailingBlobStore)
            .unwrap_err();
        assert!(matches!(err, Error::LinkResolution(_)));
    }
}
