use crate::cli::args::CliArgs;
use crate::output::OutputFormat;

fn validate_base_url(flag: &str, raw: &str) -> Result<(), String> {
    let url =
        reqwest::Url::parse(raw.trim()).map_err(|e| format!("invalid --{flag} '{raw}': {e}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!("invalid --{flag} '{raw}': expected http or https"));
    }
    Ok(())
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.output_format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!("invalid --output-format '{raw}', expected text or json"));
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive integer".to_string());
        }
    }
    if let Some(raw) = args.site_base.as_deref() {
        validate_base_url("site-base", raw)?;
    }
    if let Some(raw) = args.dashboard_base.as_deref() {
        validate_base_url("dashboard-base", raw)?;
    }
    if let Some(raw) = args.data.as_deref() {
        if raw.trim().is_empty() {
            return Err("invalid --data, expected a URL or file path".to_string());
        }
    }
    Ok(())
}
