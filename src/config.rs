use std::path::Path;

use crate::error::Error;

/// Default number of suggestions offered per broken reference.
const DEFAULT_SUGGESTION_LIMIT: usize = 3;

/// Project configuration loaded from `.linkcheck.toml` at the content root.
/// Include/exclude patterns are path prefixes applied to markdown files
/// relative to the root.
pub struct Config {
    exclude: Vec<String>,
    include: Vec<String>,
    /// Minimum similarity score a suggestion must reach to be shown.
    /// `0.0` disables filtering.
    pub min_score: f64,
    /// Maximum number of suggestions per broken reference.
    pub suggestion_limit: usize,
}

/// Raw TOML structure for `.linkcheck.toml`.
#[derive(serde::Deserialize)]
struct LinkcheckTomlConfig {
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    min_score: f64,
    #[serde(default = "default_suggestion_limit")]
    suggestion_limit: usize,
}

fn default_suggestion_limit() -> usize {
    return DEFAULT_SUGGESTION_LIMIT;
}

impl Config {
    /// Load config from `.linkcheck.toml` in the content root.
    /// Returns defaults if the file doesn't exist. Returns an error if the
    /// file exists but is malformed — never silently falls back to defaults
    /// when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(".linkcheck.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: LinkcheckTomlConfig = toml::from_str(&content)?;
        Ok(Self {
            exclude: raw.exclude,
            include: raw.include,
            min_score: raw.min_score,
            suggestion_limit: raw.suggestion_limit,
        })
    }

    /// Check whether a markdown file path should be indexed.
    ///
    /// A path is included if no include patterns are set (scan everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        !self.exclude.iter().any(|p| relative_path.starts_with(p.as_str()))
    }
}

impl Default for Config {
    /// Scan everything, offer three suggestions, no score floor.
    fn default() -> Self {
        return Self {
            exclude: Vec::new(),
            include: Vec::new(),
            min_score: 0.0,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        };
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn default_scans_everything() {
        let config = Config::default();
        assert!(config.should_scan("guide.md"));
        assert!(config.should_scan("deep/nested/page.md"));
        assert_eq!(config.suggestion_limit, 3);
    }

    #[test]
    fn exclude_prefix_wins_over_include() {
        let config = Config {
            exclude: vec!["docs/internal/".to_string()],
            include: vec!["docs/".to_string()],
            min_score: 0.0,
            suggestion_limit: 3,
        };
        assert!(config.should_scan("docs/guide.md"));
        assert!(!config.should_scan("docs/internal/notes.md"));
        assert!(!config.should_scan("README.md"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".linkcheck.toml"), "min_score = [").unwrap();
        assert!(matches!(Config::load(dir.path()), Err(Error::TomlDe(_))));
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".linkcheck.toml"), "min_score = 0.5\n").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!((config.min_score - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.suggestion_limit, 3);
    }
}
