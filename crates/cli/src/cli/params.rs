//! Subcommands that read a parameter file and print something derived
//! from it. Each returns `Ok(false)` when the input is well-formed but
//! fails a check, so `main` can exit non-zero.

use anyhow::Context;
use kr_domain::config::Config;
use kr_report::{
    validate_create_params, validate_extended_report_params, CreateExtendedReportParams,
    CreateParams, ParamIssue, ProvenanceAction, ReportObjectBuilder, RpcRequest,
};

use super::{read_input, EnvelopeMethod};

fn parse_create(raw: &str, file: &str) -> anyhow::Result<CreateParams> {
    CreateParams::from_json(raw).with_context(|| format!("decoding create params from {file}"))
}

fn parse_extended(raw: &str, file: &str) -> anyhow::Result<CreateExtendedReportParams> {
    serde_json::from_str(raw)
        .with_context(|| format!("decoding create_extended_report params from {file}"))
}

/// Validation issues for raw JSON parameters.
pub fn issues_for(raw: &str, extended: bool) -> anyhow::Result<Vec<ParamIssue>> {
    if extended {
        Ok(validate_extended_report_params(&parse_extended(raw, "input")?))
    } else {
        Ok(validate_create_params(&parse_create(raw, "input")?))
    }
}

pub fn check(file: &str, extended: bool) -> anyhow::Result<bool> {
    let raw = read_input(file)?;
    let issues = issues_for(&raw, extended).with_context(|| format!("checking {file}"))?;

    if issues.is_empty() {
        println!("Params OK ({file})");
        return Ok(true);
    }
    for issue in &issues {
        println!("{issue}");
    }
    println!("\n{} issue(s) in {file}", issues.len());
    Ok(false)
}

pub fn show(file: &str) -> anyhow::Result<bool> {
    let params = parse_create(&read_input(file)?, file)?;
    println!("{params}");
    Ok(true)
}

/// Canonical form: declared keys first, nulls dropped, extensions after.
pub fn normalized(raw: &str, pretty: bool) -> anyhow::Result<String> {
    let params = parse_create(raw, "input")?;
    let out = if pretty {
        serde_json::to_string_pretty(&params)?
    } else {
        params.to_json()?
    };
    Ok(out)
}

pub fn normalize(file: &str, pretty: bool) -> anyhow::Result<bool> {
    let out = normalized(&read_input(file)?, pretty).with_context(|| format!("normalizing {file}"))?;
    println!("{out}");
    Ok(true)
}

pub fn envelope(config: &Config, file: &str, method: EnvelopeMethod) -> anyhow::Result<bool> {
    let raw = read_input(file)?;
    let request = match method {
        EnvelopeMethod::Create => RpcRequest::create(config, &parse_create(&raw, file)?)?,
        EnvelopeMethod::CreateExtendedReport => {
            RpcRequest::create_extended_report(config, &parse_extended(&raw, file)?)?
        }
    };
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(true)
}

pub fn save_object(config: &Config, file: &str) -> anyhow::Result<bool> {
    let params = parse_create(&read_input(file)?, file)?;
    let provenance = ProvenanceAction::new(
        config.report.provenance_service.clone(),
        config.report.provenance_method.clone(),
    );
    let (payload, name) = ReportObjectBuilder::new(&config.report)
        .with_provenance(vec![provenance])
        .build_simple(&params)?;

    tracing::info!(report_name = %name, "built save_objects payload");
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_drops_nulls_and_orders_keys() {
        let out = normalized(
            r#"{"foo": 1, "workspace_id": null, "workspace_name": "ws1"}"#,
            false,
        )
        .unwrap();
        assert_eq!(out, r#"{"workspace_name":"ws1","foo":1}"#);
    }

    #[test]
    fn issues_for_create_and_extended() {
        let create = issues_for(r#"{"workspace_name": "ws"}"#, false).unwrap();
        assert_eq!(create.len(), 1);
        assert_eq!(create[0].path, "data['report']");

        let extended = issues_for(r#"{"workspace_name": "ws"}"#, true).unwrap();
        assert!(extended.is_empty());
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(issues_for("{not json", false).is_err());
    }

    #[test]
    fn check_reads_file_and_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, r#"{"report": {"text_message": "hi"}}"#).unwrap();
        assert!(!check(path.to_str().unwrap(), false).unwrap());

        std::fs::write(&path, r#"{"report": {"text_message": "hi"}, "workspace_id": 3}"#).unwrap();
        assert!(check(path.to_str().unwrap(), false).unwrap());
    }

    #[test]
    fn save_object_needs_a_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, r#"{"report": {"text_message": "hi"}}"#).unwrap();
        assert!(save_object(&Config::default(), path.to_str().unwrap()).is_err());
    }
}
