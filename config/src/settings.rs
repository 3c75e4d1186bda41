//! Typed settings read from the environment after [`crate::load_and_apply`].

use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;
pub const DEFAULT_QUALITY_THRESHOLD: i64 = 70;

/// Values shared by the CLI and the HTTP server.
///
/// - `WAYLINE_ADDR`: server listen address (default `127.0.0.1:8080`)
/// - `WAYLINE_MAX_ITERATIONS`: step bound for the built-in code-review graph (default 1000)
/// - `WAYLINE_QUALITY_THRESHOLD`: code-review pass mark (default 70)
/// - `LOG_FILE`: append logs to this file instead of the default sink
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub addr: String,
    pub max_iterations: usize,
    pub quality_threshold: i64,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            quality_threshold: DEFAULT_QUALITY_THRESHOLD,
            log_file: None,
        }
    }
}

impl Settings {
    /// Reads settings from the process environment. Unset, empty or unparsable
    /// values fall back to [`Default`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            addr: get("WAYLINE_ADDR").unwrap_or(default.addr),
            max_iterations: get("WAYLINE_MAX_ITERATIONS")
                .and_then(|s| s.trim().parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(default.max_iterations),
            quality_threshold: get("WAYLINE_QUALITY_THRESHOLD")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default.quality_threshold),
            log_file: get("LOG_FILE").map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(from_pairs(&[]), Settings::default());
    }

    #[test]
    fn reads_every_key() {
        let s = from_pairs(&[
            ("WAYLINE_ADDR", "0.0.0.0:9000"),
            ("WAYLINE_MAX_ITERATIONS", "25"),
            ("WAYLINE_QUALITY_THRESHOLD", "85"),
            ("LOG_FILE", "/tmp/wayline.log"),
        ]);
        assert_eq!(s.addr, "0.0.0.0:9000");
        assert_eq!(s.max_iterations, 25);
        assert_eq!(s.quality_threshold, 85);
        assert_eq!(s.log_file, Some(PathBuf::from("/tmp/wayline.log")));
    }

    /// **Scenario**: Bad values are ignored rather than failing startup.
    #[test]
    fn invalid_values_fall_back() {
        let s = from_pairs(&[
            ("WAYLINE_MAX_ITERATIONS", "0"),
            ("WAYLINE_QUALITY_THRESHOLD", "high"),
            ("LOG_FILE", "  "),
        ]);
        assert_eq!(s.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert_eq!(s.quality_threshold, DEFAULT_QUALITY_THRESHOLD);
        assert_eq!(s.log_file, None);
    }
}
