use crate::error::{Result, RosterError};
use crate::types::config::RosterMatchConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "rostermatch.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".rostermatch/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/rostermatch/config.toml";

/// Loads layered config for `root`. `None` means no repo file exists and defaults apply.
pub fn load_config(root: &Path) -> Result<Option<RosterMatchConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

/// Config sources, lowest precedence first. The repo file gates loading: without
/// `rostermatch.toml` the operator's global file is not consulted either.
#[derive(Debug, Clone, Copy)]
enum Layer {
    Global,
    Repo,
    Local,
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<Option<RosterMatchConfig>> {
    let repo_path = root.join(DEFAULT_CONFIG_FILE);
    if !repo_path.exists() {
        return Ok(None);
    }

    let layers = [
        (Layer::Global, global_path.map(Path::to_path_buf)),
        (Layer::Repo, Some(repo_path)),
        (Layer::Local, Some(root.join(DEFAULT_LOCAL_FILE))),
    ];

    let mut merged = Value::Table(Map::new());
    for (layer, path) in layers {
        let Some(path) = path.filter(|path| path.exists()) else {
            continue;
        };
        debug!(?layer, path = %path.display(), "applying config layer");
        overlay(&mut merged, read_layer(&path)?);
    }

    let cfg: RosterMatchConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| RosterError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    Ok(Some(cfg))
}

fn read_layer(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| RosterError::ConfigParse(format!("{}: {}", path.display(), e)))
}

/// Tables merge key by key; anything else, `tiers` included, is replaced whole.
fn overlay(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Table(section), Value::Table(incoming)) => {
            for (key, value) in incoming {
                if let Some(existing) = section.get_mut(&key) {
                    overlay(existing, value);
                } else {
                    section.insert(key, value);
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
