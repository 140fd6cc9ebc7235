use kr_domain::config::{Config, ConfigSeverity};

/// One line naming what saved reports will look like under `config`.
pub fn summary(config: &Config) -> String {
    let report = &config.report;
    format!(
        "{} saves {} objects (hidden={}) as {}.{} via JSON-RPC {}, name prefix {}",
        report.service_name,
        report.object_type,
        report.hidden,
        report.provenance_service,
        report.provenance_method,
        config.rpc.version,
        report.name_prefix.as_deref().unwrap_or("<none>"),
    )
}

/// Validate the config and print the issues, followed by the summary.
///
/// Returns `false` when any issue is an error. Warnings are printed but
/// do not fail.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = config.validate();
    let errors = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();

    for issue in &issues {
        println!("{issue}");
    }

    if errors > 0 {
        println!(
            "\n{errors} error(s), {} warning(s) in {config_path}",
            issues.len() - errors
        );
        return false;
    }

    tracing::debug!(config_path, warnings = issues.len(), "config validated");
    println!("Config OK ({config_path}): {}", summary(config));
    true
}

/// Dump the resolved config (with all defaults filled in) as TOML.
pub fn show(config: &Config) -> anyhow::Result<bool> {
    let output = toml::to_string_pretty(config)
        .map_err(|e| anyhow::anyhow!("serializing config: {e}"))?;
    print!("{output}");
    Ok(true)
}
