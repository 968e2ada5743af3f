//! Configuration loading and discovery.
//!
//! This module provides configuration file discovery by:
//! 1. Walking up from the current directory to find project config
//! 2. Loading user config from XDG config directory
//! 3. Merging with sensible defaults
//!
//! # Supported formats
//!
//! - TOML (`.toml`)
//! - YAML (`.yaml`, `.yml`, and the extensionless `.wordusagerc`)
//! - JSON (`.json`, and the `wordusage` field of `package.json`)
//!
//! # Config file locations (in order of precedence, highest first):
//! - `wordusage.<ext>` in current directory or any parent
//! - `.wordusage.<ext>` in current directory or any parent
//! - `.wordusagerc` in current directory or any parent
//! - `package.json` with a `wordusage` field, same directories
//! - `~/.config/wordusage/config.<ext>` (user config)
//!
//! Where `<ext>` is one of: `toml`, `yaml`, `yml`, `json`
//!
//! Layers are combined with figment's `admerge`: scalar settings from a
//! higher layer replace lower ones, while `allow` lists concatenate, so
//! a project can only add to what the user config allows.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use wordusage_core::config::{Config, ConfigLoader};
//!
//! let cwd = std::env::current_dir().unwrap();
//! let cwd = Utf8PathBuf::try_from(cwd).expect("current directory is not valid UTF-8");
//! let config = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! ```

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::diagnostic::Severity;
use crate::error::{ConfigError, ConfigResult};
use crate::filter::SuppressionSet;
use crate::lint::LintOptions;

/// The configuration for wordusage.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL log files. No file logging when unset.
    pub log_dir: Option<Utf8PathBuf>,
    /// Rule ids or phrases that are never reported.
    pub allow: Vec<String>,
    /// Severity per rule id, replacing the bundled one.
    pub severity: BTreeMap<String, Severity>,
    /// Treat every input as plain text instead of markdown.
    pub text: bool,
    /// Extra file extensions to pick up when expanding directories.
    pub extensions: Vec<String>,
    /// Fail the run on warnings as well as errors. Default: `true`.
    pub frail: bool,
    /// Maximum input size in bytes (default: 5 MiB).
    ///
    /// Omit to use the default. Use `disable_input_limit` to remove the
    /// limit entirely.
    pub max_input_bytes: Option<usize>,
    /// Disable the input size limit entirely.
    ///
    /// When `true`, `max_input_bytes` is ignored and no size check is performed.
    pub disable_input_limit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            log_dir: None,
            allow: Vec::new(),
            severity: BTreeMap::new(),
            text: false,
            extensions: Vec::new(),
            frail: true,
            max_input_bytes: None,
            disable_input_limit: false,
        }
    }
}

impl Config {
    /// Lint options carried by this configuration.
    pub fn lint_options(&self) -> LintOptions {
        LintOptions {
            allow: self.allow.iter().map(String::as_str).collect(),
            severity_overrides: self
                .severity
                .iter()
                .map(|(id, severity)| (id.clone(), *severity))
                .collect(),
        }
    }

    /// Effective input size limit, `None` when disabled.
    pub fn input_limit(&self) -> Option<usize> {
        if self.disable_input_limit {
            None
        } else {
            self.max_input_bytes.or(Some(crate::DEFAULT_MAX_INPUT_BYTES))
        }
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Metadata about which configuration sources were loaded.
///
/// Returned alongside [`Config`] from [`ConfigLoader::load()`] so commands
/// can report the actual config files without re-discovering them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project config files found by walking up, ordered low→high precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// Directory holding the project config files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_root: Option<Utf8PathBuf>,
    /// User config file from XDG config directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Explicit config files loaded (e.g., from `--config` flag).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// Returns the highest-precedence config file that was loaded.
    ///
    /// Precedence: explicit files > project files > user file.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .map(Utf8PathBuf::as_path)
            .or_else(|| self.project_files.last().map(Utf8PathBuf::as_path))
            .or(self.user_file.as_deref())
    }
}

/// Supported configuration file extensions (in order of preference).
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Application name for XDG directory lookup and config file names.
const APP_NAME: &str = "wordusage";

/// Extensionless rc file, YAML or JSON.
const RC_FILE: &str = ".wordusagerc";

/// Field of `package.json` holding the configuration.
const PACKAGE_FIELD: &str = "wordusage";

/// Builder for loading configuration from multiple sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Starting directory for project config search.
    project_search_root: Option<Utf8PathBuf>,
    /// Whether to include user config from XDG directory.
    include_user_config: bool,
    /// Stop searching when we hit a directory containing this file/dir.
    boundary_marker: Option<String>,
    /// Explicit config files to load (for testing or programmatic use).
    explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default settings.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Set the starting directory for project config search.
    ///
    /// The loader will walk up from this directory looking for config files.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether to include user config from `~/.config/wordusage/`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Set a boundary marker to stop directory traversal.
    ///
    /// When walking up directories, stop if we find a directory containing
    /// this file or directory name. Default is `.git`.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Disable boundary marker (search all the way to filesystem root).
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Add an explicit config file to load.
    ///
    /// Files are loaded in order, with later files taking precedence.
    /// Explicit files are loaded after discovered files.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration, merging all discovered sources.
    ///
    /// Precedence (highest to lowest):
    /// 1. `WORDUSAGE_*` environment variables
    /// 2. Explicit files (in order added via `with_file`)
    /// 3. Project config (closest to search root)
    /// 4. User config (`~/.config/wordusage/config.<ext>`)
    /// 5. Default values
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let mut sources = ConfigSources::default();

        if self.include_user_config
            && let Some(user_config) = find_user_config()
        {
            figment = layer_file(figment, &user_config);
            sources.user_file = Some(user_config);
        }

        if let Some(ref root) = self.project_search_root
            && let Some((dir, project_configs)) = self.find_project_configs(root)
        {
            for pc in &project_configs {
                figment = layer_file(figment, pc);
            }
            sources.project_files = project_configs;
            sources.project_root = Some(dir);
        }

        for file in &self.explicit_files {
            figment = layer_file(figment, file);
        }
        sources.explicit_files = self.explicit_files;

        // WORDUSAGE_FRAIL=false, WORDUSAGE_LOG_LEVEL=debug, etc.
        figment = figment.merge(Env::prefixed("WORDUSAGE_").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::debug!(
            log_level = config.log_level.as_str(),
            allow = config.allow.len(),
            frail = config.frail,
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Load configuration, returning an error if no config file is found.
    pub fn load_or_error(self) -> ConfigResult<(Config, ConfigSources)> {
        let has_user = self.include_user_config && find_user_config().is_some();
        let has_project = self
            .project_search_root
            .as_ref()
            .is_some_and(|root| self.find_project_configs(root).is_some());
        let has_explicit = !self.explicit_files.is_empty();

        if !has_user && !has_project && !has_explicit {
            return Err(ConfigError::NotFound);
        }

        self.load()
    }

    /// Find project config files by walking up from the given directory.
    ///
    /// Returns the closest directory that has any config file, together
    /// with its files ordered low-to-high precedence.
    fn find_project_configs(&self, start: &Utf8Path) -> Option<(Utf8PathBuf, Vec<Utf8PathBuf>)> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            let found = configs_in(&dir);
            if !found.is_empty() {
                return Some((dir, found));
            }

            // Check for boundary marker AFTER checking config files,
            // so a config in the same directory as the marker is found.
            if let Some(ref marker) = self.boundary_marker
                && dir.join(marker).exists()
                && dir != start
            {
                break;
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        None
    }
}

/// Config files in one directory, ordered low→high precedence.
///
/// `package.json` only counts when it carries a `wordusage` field.
pub fn configs_in(dir: &Utf8Path) -> Vec<Utf8PathBuf> {
    let mut found = Vec::new();

    let package = dir.join("package.json");
    if package.is_file() && has_package_field(&package) {
        found.push(package);
    }

    let rc = dir.join(RC_FILE);
    if rc.is_file() {
        found.push(rc);
    }

    for ext in CONFIG_EXTENSIONS {
        let dotfile = dir.join(format!(".{APP_NAME}.{ext}"));
        if dotfile.is_file() {
            found.push(dotfile);
        }
    }
    for ext in CONFIG_EXTENSIONS {
        let regular = dir.join(format!("{APP_NAME}.{ext}"));
        if regular.is_file() {
            found.push(regular);
        }
    }

    found
}

/// Allow list that applies to files in `dir`.
///
/// Unions the `allow` entries of every config file from `dir` up to and
/// including `root`. Directories outside `root` contribute nothing.
///
/// # Errors
///
/// Returns [`ConfigError::Deserialize`] if a config file on the way is
/// malformed.
#[tracing::instrument]
pub fn directory_allow(dir: &Utf8Path, root: &Utf8Path) -> ConfigResult<SuppressionSet> {
    #[derive(Deserialize, Default)]
    #[serde(default)]
    struct AllowOnly {
        allow: Vec<String>,
    }

    let mut allow = SuppressionSet::new();
    if !dir.starts_with(root) {
        return Ok(allow);
    }

    let mut current = Some(dir);
    while let Some(here) = current {
        for file in configs_in(here) {
            let layer: AllowOnly = layer_file(Figment::new(), &file)
                .extract()
                .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
            allow = allow.merged(&layer.allow.into_iter().collect());
        }
        if here == root {
            break;
        }
        current = here.parent();
    }

    tracing::debug!(entries = allow.len(), "directory allow list");
    Ok(allow)
}

fn has_package_field(path: &Utf8Path) -> bool {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).ok())
        .is_some_and(|value| value.get(PACKAGE_FIELD).is_some())
}

/// Find user config in XDG config directory.
fn find_user_config() -> Option<Utf8PathBuf> {
    let config_dir = user_config_dir()?;
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| config_dir.join(format!("config.{ext}")))
        .find(|path| path.is_file())
}

/// Layer a config file onto the figment, detecting format from its name.
fn layer_file(figment: Figment, path: &Utf8Path) -> Figment {
    match (path.file_name(), path.extension()) {
        (Some("package.json"), _) => {
            figment.admerge(Figment::from(Json::file_exact(path.as_str())).focus(PACKAGE_FIELD))
        }
        (Some(RC_FILE), _) | (_, Some("yaml" | "yml")) => {
            figment.admerge(Yaml::file_exact(path.as_str()))
        }
        (_, Some("json")) => figment.admerge(Json::file_exact(path.as_str())),
        _ => figment.admerge(Toml::file_exact(path.as_str())),
    }
}

/// Get the user config directory path.
///
/// Returns `~/.config/wordusage/` on Linux, `~/Library/Application Support/wordusage/`
/// on macOS, and equivalent on other platforms.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
    Utf8PathBuf::from_path_buf(proj_dirs.config_dir().to_path_buf()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serializes tests that mutate environment variables via `set_var`/`remove_var`.
    static TEST_ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn utf8(path: std::path::PathBuf) -> Utf8PathBuf {
        Utf8PathBuf::try_from(path).unwrap()
    }

    fn loader() -> ConfigLoader {
        ConfigLoader::new().with_user_config(false)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.log_dir.is_none());
        assert!(config.allow.is_empty());
        assert!(config.frail);
        assert!(!config.text);
        assert_eq!(config.input_limit(), Some(crate::DEFAULT_MAX_INPUT_BYTES));
    }

    #[test]
    fn test_loader_builds_with_defaults() {
        let (config, sources) = loader().without_boundary_marker().load().unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(sources.primary_file().is_none());
    }

    #[test]
    fn test_single_file_overrides_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        fs::write(
            &config_path,
            r#"log_level = "debug"
log_dir = "/tmp/wordusage"
frail = false
allow = ["his"]

[severity]
whitelist = "error"
"#,
        )
        .unwrap();

        let (config, _sources) = loader().with_file(utf8(config_path)).load().unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.log_dir.as_ref().map(|dir| dir.as_str()), Some("/tmp/wordusage"));
        assert!(!config.frail);
        assert_eq!(config.allow, vec!["his"]);
        assert_eq!(config.severity.get("whitelist"), Some(&Severity::Error));
    }

    #[test]
    fn test_later_file_overrides_scalars_and_adds_allow() {
        let tmp = TempDir::new().unwrap();

        let base = tmp.path().join("base.toml");
        fs::write(&base, "log_level = \"warn\"\nallow = [\"his\"]\n").unwrap();
        let over = tmp.path().join("override.yaml");
        fs::write(&over, "log_level: error\nallow:\n  - her\n").unwrap();

        let (config, _sources) = loader()
            .with_file(utf8(base))
            .with_file(utf8(over))
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(config.allow, vec!["his", "her"]);
    }

    #[test]
    fn test_project_config_discovery() {
        let tmp = TempDir::new().unwrap();
        let project_dir = tmp.path().join("project");
        let sub_dir = project_dir.join("docs").join("deep");
        fs::create_dir_all(&sub_dir).unwrap();
        fs::write(project_dir.join(".wordusage.toml"), r#"log_level = "debug""#).unwrap();

        let (config, sources) = loader()
            .without_boundary_marker()
            .with_project_search(utf8(sub_dir))
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(sources.project_files.len(), 1);
        assert_eq!(sources.project_root, Some(utf8(project_dir)));
    }

    #[test]
    fn test_rc_file_accepts_yaml_and_json() {
        let tmp = TempDir::new().unwrap();
        let dir = utf8(tmp.path().to_path_buf());

        fs::write(dir.join(RC_FILE), "allow:\n  - his\n").unwrap();
        let (config, _) = loader().with_project_search(&dir).load().unwrap();
        assert_eq!(config.allow, vec!["his"]);

        fs::write(dir.join(RC_FILE), r#"{"allow": ["her"], "frail": false}"#).unwrap();
        let (config, _) = loader().with_project_search(&dir).load().unwrap();
        assert_eq!(config.allow, vec!["her"]);
        assert!(!config.frail);
    }

    #[test]
    fn test_package_json_field() {
        let tmp = TempDir::new().unwrap();
        let dir = utf8(tmp.path().to_path_buf());
        fs::write(
            dir.join("package.json"),
            r#"{"name": "docs", "wordusage": {"allow": ["whitelist"]}}"#,
        )
        .unwrap();

        let (config, sources) = loader().with_project_search(&dir).load().unwrap();
        assert_eq!(config.allow, vec!["whitelist"]);
        assert_eq!(sources.project_files.len(), 1);
    }

    #[test]
    fn test_package_json_without_field_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let dir = utf8(tmp.path().to_path_buf());
        fs::write(dir.join("package.json"), r#"{"name": "docs"}"#).unwrap();
        assert!(configs_in(&dir).is_empty());
    }

    #[test]
    fn test_boundary_marker_stops_search() {
        let tmp = TempDir::new().unwrap();
        let parent = tmp.path().join("parent");
        let child = parent.join("child");
        let work = child.join("work");
        fs::create_dir_all(&work).unwrap();

        fs::write(parent.join(".wordusage.toml"), r#"log_level = "warn""#).unwrap();
        fs::create_dir(child.join(".git")).unwrap();

        let (config, sources) = loader()
            .with_boundary_marker(".git")
            .with_project_search(utf8(work))
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Info);
        assert!(sources.project_files.is_empty());
    }

    #[test]
    fn test_explicit_file_overrides_project_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".wordusage.toml"), r#"log_level = "warn""#).unwrap();
        let override_config = tmp.path().join("override.toml");
        fs::write(&override_config, r#"log_level = "error""#).unwrap();

        let (config, sources) = loader()
            .without_boundary_marker()
            .with_project_search(utf8(tmp.path().to_path_buf()))
            .with_file(utf8(override_config))
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Error);
        assert!(!sources.project_files.is_empty());
        assert_eq!(sources.explicit_files.len(), 1);
    }

    #[test]
    fn test_load_or_error_fails_when_no_config() {
        let result = loader().without_boundary_marker().load_or_error();
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "frail = \"sometimes\"").unwrap();
        let result = loader().with_file(utf8(path)).load();
        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn test_directory_allow_unions_towards_root() {
        let tmp = TempDir::new().unwrap();
        let root = utf8(tmp.path().to_path_buf());
        let guide = root.join("docs").join("guide");
        fs::create_dir_all(&guide).unwrap();

        fs::write(root.join(".wordusagerc"), "allow: [his]\n").unwrap();
        fs::write(root.join("docs").join("wordusage.toml"), "allow = [\"her\"]\n").unwrap();
        fs::write(guide.join(".wordusage.json"), r#"{"allow": ["whitelist"]}"#).unwrap();

        let deep = directory_allow(&guide, &root).unwrap();
        let mut entries: Vec<_> = deep.iter().collect();
        entries.sort_unstable();
        assert_eq!(entries, vec!["her", "his", "whitelist"]);

        let shallow = directory_allow(&root, &root).unwrap();
        assert_eq!(shallow.iter().collect::<Vec<_>>(), vec!["his"]);
    }

    #[test]
    fn test_directory_allow_outside_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        let root = utf8(tmp.path().join("a"));
        let other = utf8(tmp.path().join("b"));
        fs::create_dir_all(&other).unwrap();
        fs::write(other.join(".wordusagerc"), "allow: [his]\n").unwrap();
        assert!(directory_allow(&other, &root).unwrap().is_empty());
    }

    #[test]
    fn test_lint_options_from_config() {
        let config = Config {
            allow: vec!["his".into(), "  ".into()],
            severity: BTreeMap::from([("her".to_string(), Severity::Error)]),
            ..Config::default()
        };
        let options = config.lint_options();
        assert_eq!(options.allow.len(), 1);
        assert_eq!(options.severity_overrides.get("her"), Some(&Severity::Error));
    }

    #[test]
    fn test_input_limit() {
        let config = Config {
            max_input_bytes: Some(10),
            ..Config::default()
        };
        assert_eq!(config.input_limit(), Some(10));
        let config = Config {
            disable_input_limit: true,
            ..config
        };
        assert_eq!(config.input_limit(), None);
    }

    #[test]
    fn test_user_config_dir() {
        if let Some(dir) = user_config_dir() {
            assert!(dir.as_str().contains("wordusage"));
        }
    }

    #[test]
    fn yaml_config_deserializes() {
        let yaml = "allow: [his, her]\nseverity:\n  master: error\ntext: true\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.allow, vec!["his", "her"]);
        assert!(config.text);
        assert!(config.frail);
        assert_eq!(config.severity.get("master"), Some(&Severity::Error));
    }

    #[test]
    #[allow(unsafe_code)]
    fn test_env_var_overrides_file_config() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        fs::write(&config_path, "frail = true\n").unwrap();

        // SAFETY: Test environment; mutex serializes env access across tests.
        unsafe {
            std::env::set_var("WORDUSAGE_FRAIL", "false");
        }

        let result = loader().with_file(utf8(config_path)).load();

        // SAFETY: Cleanup after test.
        unsafe {
            std::env::remove_var("WORDUSAGE_FRAIL");
        }

        let (config, _sources) = result.unwrap();
        assert!(!config.frail);
    }
}
