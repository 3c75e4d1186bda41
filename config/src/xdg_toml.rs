//! Load the `[env]` table from `$XDG_CONFIG_HOME/<app>/config.toml`.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::LoadError;

/// `$XDG_CONFIG_HOME`, else `~/.config`.
fn config_home() -> Result<PathBuf, LoadError> {
    match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => dirs::home_dir()
            .map(|home| home.join(".config"))
            .ok_or_else(|| LoadError::XdgPath("no home directory".to_string())),
    }
}

fn xdg_config_path(app_name: &str) -> Result<Option<PathBuf>, LoadError> {
    let path = config_home()?.join(app_name).join("config.toml");
    Ok(path.exists().then_some(path))
}

#[derive(serde::Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    env: HashMap<String, String>,
}

/// Returns the `[env]` pairs. A missing file or section yields an empty map.
pub fn load_env_map(app_name: &str) -> Result<HashMap<String, String>, LoadError> {
    let Some(path) = xdg_config_path(app_name)? else {
        return Ok(HashMap::new());
    };
    let content = std::fs::read_to_string(&path).map_err(LoadError::XdgRead)?;
    let config: ConfigFile = toml::from_str(&content)?;
    Ok(config.env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_env::{with_xdg_home, write_app_config};

    #[test]
    fn missing_config_returns_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        let map = with_xdg_home(dir.path(), || load_env_map("wayline-none")).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn reads_env_table() {
        let dir = tempfile::tempdir().unwrap();
        write_app_config(
            dir.path(),
            "wayline",
            "[env]\nWAYLINE_MAX_ITERATIONS = \"50\"\nRUST_LOG = \"debug\"\n",
        );
        let map = with_xdg_home(dir.path(), || load_env_map("wayline")).unwrap();
        assert_eq!(map.get("WAYLINE_MAX_ITERATIONS").map(String::as_str), Some("50"));
        assert_eq!(map.get("RUST_LOG").map(String::as_str), Some("debug"));
    }

    #[test]
    fn other_sections_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_app_config(dir.path(), "wayline", "[server]\naddr = \"ignored\"\n");
        let map = with_xdg_home(dir.path(), || load_env_map("wayline")).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_app_config(dir.path(), "wayline", "not valid toml [[[\n");
        let result = with_xdg_home(dir.path(), || load_env_map("wayline"));
        assert!(matches!(result, Err(LoadError::XdgParse(_))));
    }
}
