//! Configuration for Wayline binaries.
//!
//! [`load_and_apply`] merges the XDG `config.toml` `[env]` table and the project `.env`
//! into the process environment with priority **existing env > .env > XDG**.
//! [`Settings::from_env`] then reads the typed values the CLI and server use.
//! With the `tracing-init` feature, [`tracing_init`] installs the shared subscriber.

mod env_file;
mod settings;
#[cfg(feature = "tracing-init")]
pub mod tracing_init;
mod xdg_toml;

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

pub use settings::{
    Settings, DEFAULT_ADDR, DEFAULT_MAX_ITERATIONS, DEFAULT_QUALITY_THRESHOLD,
};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    DotenvRead(dotenv::Error),
}

/// Sets every key found in `.env` or `$XDG_CONFIG_HOME/<app_name>/config.toml` that is
/// not already in the environment.
///
/// * `app_name`: directory under the XDG config home, e.g. `"wayline"`.
/// * `override_dir`: look for `.env` here instead of the current directory.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<(), LoadError> {
    let xdg_map = xdg_toml::load_env_map(app_name)?;
    let dotenv_map = env_file::load_env_map(override_dir).map_err(LoadError::DotenvRead)?;

    let mut keys: HashSet<&String> = xdg_map.keys().collect();
    keys.extend(dotenv_map.keys());

    for key in keys {
        if std::env::var_os(key).is_some() {
            continue;
        }
        if let Some(value) = dotenv_map.get(key).or_else(|| xdg_map.get(key)) {
            std::env::set_var(key, value);
        }
    }
    Ok(())
}

/// Serializes tests that touch process-wide environment variables.
#[cfg(test)]
pub(crate) mod test_env {
    use std::path::Path;
    use std::sync::{Mutex, MutexGuard};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    pub fn lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Runs `f` with `XDG_CONFIG_HOME` pointing at `dir`, restoring the previous value.
    pub fn with_xdg_home<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
        let _guard = lock();
        let prev = std::env::var_os("XDG_CONFIG_HOME");
        std::env::set_var("XDG_CONFIG_HOME", dir);
        let out = f();
        match prev {
            Some(v) => std::env::set_var("XDG_CONFIG_HOME", v),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
        out
    }

    pub fn write_app_config(xdg_home: &Path, app: &str, content: &str) {
        let app_dir = xdg_home.join(app);
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(app_dir.join("config.toml"), content).unwrap();
    }
}
