//! Parameter checks applied by the report service before it saves a
//! report.
//!
//! The parameter types themselves accept anything structurally valid;
//! these functions collect every problem in one pass so a caller sees
//! the full list instead of the first failure.

use std::fmt;

use kr_domain::error::{Error, Result};
use kr_domain::trace::TraceEvent;

use crate::params::CreateParams;
use crate::types::{CreateExtendedReportParams, Extensions, File, LinkedFile, Report, WorkspaceObject};

/// A single parameter problem, located by a `data['key'][index]` path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamIssue {
    pub path: String,
    pub message: String,
}

impl fmt::Display for ParamIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.message, self.path)
    }
}

/// Builds issue paths while walking nested parameters.
#[derive(Debug, Default)]
struct Issues {
    items: Vec<ParamIssue>,
}

impl Issues {
    fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.items.push(ParamIssue {
            path: path.into(),
            message: message.into(),
        });
    }

    fn required(&mut self, path: String) {
        self.push(path, "required key not provided");
    }

    fn non_empty(&mut self, path: String, value: Option<&str>) {
        if value.is_some_and(str::is_empty) {
            self.push(path, "length of value must be at least 1");
        }
    }

    fn extra_keys(&mut self, base: &str, extensions: &Extensions) {
        for key in extensions.keys() {
            self.push(format!("{base}['{key}']"), "extra keys not allowed");
        }
    }

    fn workspace(&mut self, name: Option<&str>, id: Option<i64>) {
        if name.is_none() && id.is_none() {
            self.push("data", "either `workspace_name` or `workspace_id` is required");
        }
        self.non_empty("data['workspace_name']".into(), name);
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// create()
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Check the parameters of `create`. Setting both workspace fields is
/// accepted; setting neither is not.
pub fn validate_create_params(params: &CreateParams) -> Vec<ParamIssue> {
    let mut issues = Issues::default();

    issues.workspace(params.workspace_name(), params.workspace_id());
    match params.report() {
        Some(report) => check_report(&mut issues, report),
        None => issues.required("data['report']".into()),
    }
    issues.extra_keys("data", params.extensions());

    finish("create", issues)
}

/// [`validate_create_params`] as a `Result`.
pub fn ensure_valid_create_params(params: &CreateParams) -> Result<()> {
    into_result(validate_create_params(params))
}

fn check_report(issues: &mut Issues, report: &Report) {
    let base = "data['report']";
    for (i, object) in report.objects_created.iter().flatten().enumerate() {
        check_workspace_object(issues, &format!("{base}['objects_created'][{i}]"), object);
    }
    for (field, links) in [("file_links", &report.file_links), ("html_links", &report.html_links)] {
        for (i, link) in links.iter().flatten().enumerate() {
            check_linked_file(issues, &format!("{base}['{field}'][{i}]"), link);
        }
    }
    issues.extra_keys(base, &report.extensions);
}

fn check_workspace_object(issues: &mut Issues, base: &str, object: &WorkspaceObject) {
    match object.object_ref.as_deref() {
        Some(r) => issues.non_empty(format!("{base}['ref']"), Some(r)),
        None => issues.required(format!("{base}['ref']")),
    }
    issues.extra_keys(base, &object.extensions);
}

fn check_linked_file(issues: &mut Issues, base: &str, link: &LinkedFile) {
    if let Some(url) = link.url.as_deref() {
        if let Err(reason) = check_url(url) {
            issues.push(format!("{base}['URL']"), format!("expected a URL: {reason}"));
        }
    }
    issues.extra_keys(base, &link.extensions);
}

/// Accept `scheme://host[...]` with a non-empty host.
fn check_url(url: &str) -> std::result::Result<(), &'static str> {
    let (scheme, rest) = url.split_once("://").ok_or("missing scheme")?;

    let mut chars = scheme.chars();
    let scheme_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !scheme_ok {
        return Err("invalid scheme");
    }

    let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
    let host = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    if host.is_empty() || host.chars().any(char::is_whitespace) {
        return Err("missing host");
    }
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// create_extended_report()
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Check the parameters of `create_extended_report`.
pub fn validate_extended_report_params(params: &CreateExtendedReportParams) -> Vec<ParamIssue> {
    let mut issues = Issues::default();

    issues.workspace(params.workspace_name.as_deref(), params.workspace_id);
    for (i, object) in params.objects_created.iter().flatten().enumerate() {
        check_workspace_object(&mut issues, &format!("data['objects_created'][{i}]"), object);
    }
    for (field, files) in [("html_links", &params.html_links), ("file_links", &params.file_links)] {
        for (i, file) in files.iter().flatten().enumerate() {
            check_file(&mut issues, &format!("data['{field}'][{i}]"), file);
        }
    }
    issues.non_empty(
        "data['report_object_name']".into(),
        params.report_object_name.as_deref(),
    );
    issues.extra_keys("data", &params.extensions);

    finish("create_extended_report", issues)
}

/// [`validate_extended_report_params`] as a `Result`.
pub fn ensure_valid_extended_report_params(params: &CreateExtendedReportParams) -> Result<()> {
    into_result(validate_extended_report_params(params))
}

fn check_file(issues: &mut Issues, base: &str, file: &File) {
    if file.path.is_none() && file.shock_id.is_none() {
        issues.push(base, "invalid file object: either `path` or `shock_id` is required");
    }
    issues.non_empty(format!("{base}['name']"), file.name.as_deref());
    issues.extra_keys(base, &file.extensions);
}

// ── shared ──────────────────────────────────────────────────────────

fn finish(kind: &str, issues: Issues) -> Vec<ParamIssue> {
    TraceEvent::ParamsValidated {
        kind: kind.into(),
        issues: issues.items.len(),
    }
    .emit();
    issues.items
}

fn into_result(issues: Vec<ParamIssue>) -> Result<()> {
    if issues.is_empty() {
        return Ok(());
    }
    let joined = issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    Err(Error::InvalidParams(joined))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paths(issues: &[ParamIssue]) -> Vec<&str> {
        issues.iter().map(|i| i.path.as_str()).collect()
    }

    #[test]
    fn minimal_create_params_pass() {
        let params = CreateParams::new()
            .with_workspace_name("ws")
            .with_report(Report::new("done"));
        assert!(validate_create_params(&params).is_empty());
        assert!(ensure_valid_create_params(&params).is_ok());
    }

    #[test]
    fn both_workspace_fields_are_accepted() {
        let params = CreateParams::new()
            .with_workspace_name("ws")
            .with_workspace_id(3)
            .with_report(Report::new("done"));
        assert!(validate_create_params(&params).is_empty());
    }

    #[test]
    fn missing_report_and_workspace_are_both_reported() {
        let issues = validate_create_params(&CreateParams::new());
        assert_eq!(paths(&issues), vec!["data", "data['report']"]);
        assert_eq!(issues[1].to_string(), "required key not provided @ data['report']");
    }

    #[test]
    fn empty_workspace_name_is_rejected() {
        let params = CreateParams::new()
            .with_workspace_name("")
            .with_report(Report::new("x"));
        let issues = validate_create_params(&params);
        assert_eq!(paths(&issues), vec!["data['workspace_name']"]);
    }

    #[test]
    fn unknown_keys_are_extra() {
        let params = CreateParams::new()
            .with_workspace_id(1)
            .with_report(Report::new("x"))
            .with_extension("foo", 1)
            .unwrap();
        let err = ensure_valid_create_params(&params).unwrap_err();
        assert!(matches!(err, Error::InvalidParams(ref m) if m == "extra keys not allowed @ data['foo']"));
    }

    #[test]
    fn nested_report_problems_carry_paths() {
        let mut report = Report::new("x")
            .with_object_created(WorkspaceObject::new("1/2/3"))
            .with_object_created(WorkspaceObject::default());
        report.html_links = Some(vec![LinkedFile {
            url: Some("shock/node/1".into()),
            ..LinkedFile::default()
        }]);
        let params = CreateParams::new().with_workspace_id(1).with_report(report);

        let issues = validate_create_params(&params);
        assert_eq!(
            paths(&issues),
            vec![
                "data['report']['objects_created'][1]['ref']",
                "data['report']['html_links'][0]['URL']",
            ]
        );
    }

    #[test]
    fn full_report_fields_are_accepted() {
        let report: Report = serde_json::from_value(json!({
            "text_message": "x",
            "direct_html": "<p>hi</p>",
            "file_links": [{"URL": "https://ci.kbase.us/services/shock-api/node/a", "name": "a.txt"}],
            "html_links": [{"URL": "https://ci.kbase.us/services/shock-api/node/b", "name": "index.html"}],
            "direct_html_link_index": 0,
            "summary_window_height": 300.0
        }))
        .unwrap();
        let params = CreateParams::new().with_workspace_id(1).with_report(report);
        assert!(validate_create_params(&params).is_empty());
    }

    #[test]
    fn url_check() {
        assert!(check_url("https://ci.kbase.us/services/shock-api/node/abc").is_ok());
        assert!(check_url("http://user@host:8080").is_ok());
        assert_eq!(check_url("ci.kbase.us/node"), Err("missing scheme"));
        assert_eq!(check_url("1http://host"), Err("invalid scheme"));
        assert_eq!(check_url("https:///path"), Err("missing host"));
    }

    #[test]
    fn extended_params_need_path_or_shock_id() {
        let params: CreateExtendedReportParams = serde_json::from_value(json!({
            "workspace_name": "ws",
            "file_links": [
                {"name": "a", "path": "/kb/module/work/tmp/a.txt"},
                {"name": "b"},
                {"name": "", "shock_id": "abc"}
            ]
        }))
        .unwrap();

        let issues = validate_extended_report_params(&params);
        assert_eq!(
            paths(&issues),
            vec!["data['file_links'][1]", "data['file_links'][2]['name']"]
        );
    }

    #[test]
    fn extended_params_require_a_workspace() {
        let issues = validate_extended_report_params(&CreateExtendedReportParams::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].message,
            "either `workspace_name` or `workspace_id` is required"
        );
    }
}
