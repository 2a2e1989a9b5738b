use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;

pub const STATE_FILE_NAME: &str = "convertedCompanies.json";

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    #[serde(alias = "data")]
    pub data_source: Option<String>,
    pub state_file: Option<String>,
    pub site_base: Option<String>,
    pub dashboard_base: Option<String>,
    pub timeout: Option<u64>,
    pub output_format: Option<String>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

fn app_dir() -> Option<PathBuf> {
    Some(home_dir()?.join(".bluedir"))
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(app_dir()?.join("config.yml"))
}

/// Falls back to the working directory when no home directory is known.
pub fn default_state_path() -> PathBuf {
    app_dir()
        .map(|dir| dir.join(STATE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(STATE_FILE_NAME))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(ConfigFile::default()),
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# bluedir config
#
# Location (default):
#   ~/.bluedir/config.yml

# Company data: an http(s) URL or a local JSON file.
# When unset the built-in sample catalog is used.
# data_source: https://raw.githubusercontent.com/<user>/<repo>/main/companies-data.json
# data_source: ./companies-data.json

# Converted marks (JSON array of company ids)
# state_file: ~/.bluedir/convertedCompanies.json

# Card links
site_base: https://bluepages.com.sa
dashboard_base: https://bluepages-dashboard.vercel.app

# HTTP
timeout: 10

# Output: text or json
output_format: text
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &Path) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_yaml_parses() {
        let cfg: ConfigFile = serde_yaml::from_str(&default_config_yaml()).unwrap();
        assert_eq!(cfg.timeout, Some(10));
        assert_eq!(cfg.output_format.as_deref(), Some("text"));
        assert!(cfg.data_source.is_none());
    }

    #[test]
    fn missing_config_is_allowed_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        assert!(load_config(&path, true).is_ok());
        assert!(load_config(&path, false).is_err());
    }

    #[test]
    fn ensure_default_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        ensure_default_config_file(&path).unwrap();
        std::fs::write(&path, "timeout: 3\n").unwrap();
        ensure_default_config_file(&path).unwrap();
        assert_eq!(load_config(&path, false).unwrap().timeout, Some(3));
    }

    #[test]
    fn data_alias_is_accepted() {
        let cfg: ConfigFile = serde_yaml::from_str("data: ./companies.json\n").unwrap();
        assert_eq!(cfg.data_source.as_deref(), Some("./companies.json"));
    }

    #[test]
    fn expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("./x.json"), PathBuf::from("./x.json"));
    }
}
