// Configuration loading and parsing (dashboard.toml).

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// File name of the dashboard configuration, both in `defaults/` and `config/`.
pub const CONFIG_FILE: &str = "dashboard.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },

    #[error("unknown profile `{name}` (available: {available})")]
    UnknownProfile { name: String, available: String },
}

// ---------------------------------------------------------------------------
// dashboard.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Profile loaded when no profile is named on the command line.
    pub active_profile: String,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub weights: WeightsConfig,
    pub profiles: Vec<ProfileConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig { timeout_secs: 30 }
    }
}

/// Slider bounds for the weight controls. The weight mapping itself is not
/// bounded; only user adjustments through the slider are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WeightsConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        WeightsConfig {
            min: -10.0,
            max: 10.0,
            step: 0.1,
        }
    }
}

/// One dashboard: where its CSV files live and how to read them.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileConfig {
    pub name: String,
    pub title: String,
    /// Either an `http(s)://` prefix or a local directory.
    pub base_url: String,
    pub files: Vec<String>,
    pub columns: ColumnsConfig,
    #[serde(default)]
    pub schema: SchemaKind,
    /// Only read when `schema = "custom"`.
    #[serde(default)]
    pub positions: Vec<PositionConfig>,
}

/// Header names of the identity columns in this profile's CSV files.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ColumnsConfig {
    pub player: String,
    pub team: String,
    pub position: String,
    #[serde(default)]
    pub nation: Option<String>,
    #[serde(default)]
    pub cluster: Option<String>,
}

impl ColumnsConfig {
    /// True if `header` names one of the identity columns.
    pub fn is_identity(&self, header: &str) -> bool {
        header == self.player
            || header == self.team
            || header == self.position
            || self.nation.as_deref() == Some(header)
            || self.cluster.as_deref() == Some(header)
    }
}

/// Where the position categories of a profile come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    /// The static category table compiled into the crate.
    #[default]
    Builtin,
    /// One category per distinct value of the position column.
    Derived,
    /// Categories listed under `[[profiles.positions]]`.
    Custom,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PositionConfig {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub position_values: Vec<String>,
}

impl Config {
    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&ProfileConfig, ConfigError> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                name: name.to_string(),
                available: self
                    .profiles
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// The profile named by `requested`, or `active_profile` when `None`.
    pub fn select_profile(&self, requested: Option<&str>) -> Result<&ProfileConfig, ConfigError> {
        self.profile(requested.unwrap_or(&self.active_profile))
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/dashboard.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` handles that.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    let config = parse_config(&text, &path)?;
    validate(&config)?;
    Ok(config)
}

fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Seed `config/dashboard.toml` from `defaults/dashboard.toml`.
///
/// An existing config file is never touched. Returns the path written, or
/// `None` when the user's file was already in place.
pub fn ensure_config_files(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let source = base_dir.join("defaults").join(CONFIG_FILE);
    let target = base_dir.join("config").join(CONFIG_FILE);
    let copy_err = |message: String| ConfigError::DefaultsCopyError { message };

    if target.exists() {
        return Ok(None);
    }
    if !source.exists() {
        return Err(copy_err(format!(
            "no {CONFIG_FILE} in {0}/config or {0}/defaults; run from the project root",
            base_dir.display()
        )));
    }

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| copy_err(format!("failed to create {}: {e}", parent.display())))?;
    }

    // create_new: a file created since the check above is left alone.
    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(dest) => dest,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => return Err(copy_err(format!("failed to create {}: {e}", target.display()))),
    };
    let content = std::fs::read(&source)
        .map_err(|e| copy_err(format!("failed to read {}: {e}", source.display())))?;
    std::io::Write::write_all(&mut dest, &content)
        .map_err(|e| copy_err(format!("failed to write {}: {e}", target.display())))?;

    info!("Seeded {} from defaults", target.display());
    Ok(Some(target))
}

/// Load config relative to the current working directory, seeding
/// `config/` from `defaults/` first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.http.timeout_secs == 0 {
        return Err(invalid("http.timeout_secs", "must be greater than 0"));
    }

    let w = &config.weights;
    if !(w.min.is_finite() && w.max.is_finite() && w.step.is_finite()) {
        return Err(invalid("weights", "min, max and step must be finite"));
    }
    if w.min >= w.max {
        return Err(invalid(
            "weights.min",
            format!("must be less than weights.max ({} >= {})", w.min, w.max),
        ));
    }
    if w.step <= 0.0 {
        return Err(invalid("weights.step", format!("must be > 0, got {}", w.step)));
    }
    if !(w.min..=w.max).contains(&crate::scoring::weights::DEFAULT_WEIGHT) {
        return Err(invalid(
            "weights",
            "slider range must include the default weight 1.0",
        ));
    }

    if config.profiles.is_empty() {
        return Err(invalid("profiles", "at least one profile is required"));
    }

    let mut seen = HashSet::new();
    for (i, profile) in config.profiles.iter().enumerate() {
        let field = |name: &str| format!("profiles[{i}].{name}");

        if profile.name.trim().is_empty() {
            return Err(invalid(field("name"), "must not be empty"));
        }
        if !seen.insert(profile.name.as_str()) {
            return Err(invalid(
                field("name"),
                format!("duplicate profile name `{}`", profile.name),
            ));
        }
        if profile.base_url.trim().is_empty() {
            return Err(invalid(field("base_url"), "must not be empty"));
        }
        if profile.files.is_empty() {
            return Err(invalid(field("files"), "must list at least one file"));
        }
        let cols = &profile.columns;
        for (name, value) in [
            ("columns.player", &cols.player),
            ("columns.team", &cols.team),
            ("columns.position", &cols.position),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(field(name), "must not be empty"));
            }
        }
        if profile.schema == SchemaKind::Custom {
            if profile.positions.is_empty() {
                return Err(invalid(
                    field("positions"),
                    "schema = \"custom\" requires at least one position",
                ));
            }
            for (j, pos) in profile.positions.iter().enumerate() {
                if pos.columns.is_empty() {
                    return Err(invalid(
                        field(&format!("positions[{j}].columns")),
                        format!("position `{}` lists no columns", pos.name),
                    ));
                }
            }
        }
    }

    if !seen.contains(config.active_profile.as_str()) {
        return Err(invalid(
            "active_profile",
            format!("no profile named `{}`", config.active_profile),
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Repository root, where `defaults/` lives.
    fn project_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
    }

    fn minimal_toml() -> String {
        r#"
active_profile = "test"

[[profiles]]
name = "test"
title = "Test"
base_url = "data/"
files = ["a.csv"]

[profiles.columns]
player = "Player"
team = "Squad"
position = "Pos"
"#
        .to_string()
    }

    fn parse_and_validate(text: &str) -> Result<Config, ConfigError> {
        let config = parse_config(text, Path::new("inline.toml"))?;
        validate(&config)?;
        Ok(config)
    }

    fn temp_base(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(format!("moneyball_config_{name}"));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        tmp
    }

    #[test]
    fn load_default_config_from_project_files() {
        let tmp = temp_base("defaults_copy");
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::copy(
            project_root().join("defaults").join(CONFIG_FILE),
            tmp.join("defaults").join(CONFIG_FILE),
        )
        .unwrap();

        let copied = ensure_config_files(&tmp).expect("should copy defaults");
        assert_eq!(copied, Some(tmp.join("config").join(CONFIG_FILE)));
        let config = load_config_from(&tmp).expect("default config should be valid");

        assert_eq!(config.active_profile, "brasileirao");
        assert_eq!(config.profiles.len(), 2);
        let br = config.profile("brasileirao").unwrap();
        assert_eq!(br.schema, SchemaKind::Builtin);
        assert_eq!(br.files.len(), 7);
        assert_eq!(br.columns.player, "jogador");
        let big5 = config.profile("big5").unwrap();
        assert_eq!(big5.schema, SchemaKind::Derived);
        assert_eq!(big5.columns.nation.as_deref(), Some("Nation"));
        assert_eq!(big5.columns.cluster.as_deref(), Some("Cluster"));
        assert!((config.weights.min + 10.0).abs() < f64::EPSILON);
        assert!((config.weights.max - 10.0).abs() < f64::EPSILON);
        assert!((config.weights.step - 0.1).abs() < f64::EPSILON);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_does_not_overwrite() {
        let tmp = temp_base("no_overwrite");
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), "default").unwrap();
        fs::write(tmp.join("defaults").join("notes.toml"), "x").unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), "user edited").unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert!(copied.is_none());
        assert!(!tmp.join("config").join("notes.toml").exists());
        let content = fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap();
        assert_eq!(content, "user edited");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_only_the_dashboard_file() {
        let tmp = temp_base("only_dashboard");
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), "seed").unwrap();
        fs::write(tmp.join("defaults").join("README.md"), "x").unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert_eq!(copied, Some(tmp.join("config").join(CONFIG_FILE)));
        assert!(!tmp.join("config").join("README.md").exists());
        assert_eq!(
            fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap(),
            "seed"
        );
        // Second run leaves the seeded file alone.
        assert!(ensure_config_files(&tmp).unwrap().is_none());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_without_any_directory() {
        let tmp = temp_base("no_dirs");
        let err = ensure_config_files(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::DefaultsCopyError { .. }));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_config_file_is_reported() {
        let tmp = temp_base("missing_file");
        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn minimal_config_uses_section_defaults() {
        let config = parse_and_validate(&minimal_toml()).unwrap();
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.weights, WeightsConfig::default());
        let profile = config.profile("test").unwrap();
        assert_eq!(profile.schema, SchemaKind::Builtin);
        assert!(profile.columns.nation.is_none());
        assert!(profile.positions.is_empty());
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = parse_and_validate("active_profile = ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn rejects_unknown_active_profile() {
        let text = minimal_toml().replace("active_profile = \"test\"", "active_profile = \"nope\"");
        let err = parse_and_validate(&text).unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "active_profile"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_empty_file_list() {
        let text = minimal_toml().replace("files = [\"a.csv\"]", "files = []");
        let err = parse_and_validate(&text).unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "profiles[0].files"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_inverted_weight_range() {
        let text = format!("{}\n[weights]\nmin = 5.0\nmax = -5.0\nstep = 0.1\n", minimal_toml());
        let err = parse_and_validate(&text).unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "weights.min"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_zero_step() {
        let text = format!("{}\n[weights]\nmin = -1.0\nmax = 2.0\nstep = 0.0\n", minimal_toml());
        assert!(parse_and_validate(&text).is_err());
    }

    #[test]
    fn rejects_range_excluding_default_weight() {
        let text = format!("{}\n[weights]\nmin = 2.0\nmax = 5.0\nstep = 0.5\n", minimal_toml());
        assert!(parse_and_validate(&text).is_err());
    }

    #[test]
    fn rejects_duplicate_profile_names() {
        let profile = minimal_toml().replace("active_profile = \"test\"", "");
        let text = format!("active_profile = \"test\"\n{profile}\n{profile}");
        let err = parse_and_validate(&text).unwrap_err();
        match err {
            ConfigError::ValidationError { message, .. } => {
                assert!(message.contains("duplicate"), "message: {message}")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn custom_schema_requires_positions() {
        let text = minimal_toml().replace("files = [\"a.csv\"]", "files = [\"a.csv\"]\nschema = \"custom\"");
        assert!(parse_and_validate(&text).is_err());

        let with_positions = format!(
            "{text}\n[[profiles.positions]]\nname = \"Keepers\"\ncolumns = [\"Saves\"]\nposition_values = [\"GK\"]\n"
        );
        let config = parse_and_validate(&with_positions).unwrap();
        let profile = config.profile("test").unwrap();
        assert_eq!(profile.schema, SchemaKind::Custom);
        assert_eq!(profile.positions[0].columns, vec!["Saves"]);
        assert_eq!(profile.positions[0].position_values, vec!["GK"]);
    }

    #[test]
    fn select_profile_prefers_requested_name() {
        let config = parse_and_validate(&minimal_toml()).unwrap();
        assert_eq!(config.select_profile(None).unwrap().name, "test");
        let err = config.select_profile(Some("big5")).unwrap_err();
        match err {
            ConfigError::UnknownProfile { name, available } => {
                assert_eq!(name, "big5");
                assert_eq!(available, "test");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn identity_columns_recognized() {
        let cols = ColumnsConfig {
            player: "Player".into(),
            team: "Squad".into(),
            position: "Pos".into(),
            nation: Some("Nation".into()),
            cluster: None,
        };
        assert!(cols.is_identity("Player"));
        assert!(cols.is_identity("Nation"));
        assert!(!cols.is_identity("Cluster"));
        assert!(!cols.is_identity("xG"));
    }
}
