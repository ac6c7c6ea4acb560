use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

/// Overrides `data_dir` when set.
pub const DATA_DIR_ENV: &str = "VIGIL_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VigilConfig {
    /// Schema version. Missing = 1, the first shipped shape.
    #[serde(default = "baseline_version")]
    pub config_version: u32,
    /// Directory holding `instruments/` and `sessions/`. `None` runs on the
    /// bundled instruments with in-memory session records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for VigilConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            data_dir: None,
            log_filter: default_log_filter(),
            json_logs: false,
        }
    }
}

fn baseline_version() -> u32 {
    1
}

fn default_log_filter() -> String {
    "info".to_string()
}

pub fn default_config_path() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("vigil").join("config.json"))
}

/// Load the config at `path` (or the default location). A missing file
/// yields [`VigilConfig::default`].
pub fn load_config(path: Option<&Path>) -> eyre::Result<VigilConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    if !path.exists() {
        return Ok(VigilConfig::default());
    }

    let contents = std::fs::read_to_string(&path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .map_or_else(baseline_version, |v| v as u32);

    let migrated = migrate(json, on_disk_version)?;
    let config: VigilConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
pub fn migrate(json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update vigil."
        ));
    }

    if !json.is_object() {
        return Err(eyre::eyre!("config is not a JSON object"));
    }

    // v1 is the baseline.
    // Future migrations go here:
    // if from_version < 2 { ... }

    Ok(json)
}

pub fn save_config(path: &Path, config: &VigilConfig) -> eyre::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

/// Apply environment overrides on top of the loaded config.
pub fn apply_env(config: &mut VigilConfig) {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        config.data_dir = Some(PathBuf::from(dir));
    }
}
