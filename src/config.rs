use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "outline-clip.toml";
pub const CONFIG_ENV_VAR: &str = "OUTLINE_CLIP_CONFIG";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub index: IndexSection,
    #[serde(default)]
    pub clipboard: ClipboardSection,
}

#[derive(Clone, Debug, Deserialize)]
pub struct IndexSection {
    /// Also index paragraphs inside top-level table cells (document order).
    #[serde(default = "default_true")]
    pub include_tables: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ClipboardSection {
    /// Write each copy pass to the system clipboard. When false the block is
    /// printed to stdout instead.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for IndexSection {
    fn default() -> Self {
        Self {
            include_tables: true,
        }
    }
}

impl Default for ClipboardSection {
    fn default() -> Self {
        Self { enabled: true }
    }
}

pub fn find_file_upwards(start_dir: &Path, filename: &str, max_levels: usize) -> Option<PathBuf> {
    let mut dir = start_dir;
    for _ in 0..=max_levels {
        let candidate = dir.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
    None
}

pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var(CONFIG_ENV_VAR) {
        let p = PathBuf::from(p);
        if p.exists() {
            return Some(p);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(p) = find_file_upwards(&cwd, CONFIG_FILE_NAME, 8) {
            return Some(p);
        }
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            if let Some(p) = find_file_upwards(dir, CONFIG_FILE_NAME, 8) {
                return Some(p);
            }
        }
    }
    None
}

pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: AppConfig = toml::from_str(&text).context("parse config toml")?;
    Ok(cfg)
}

/// Explicit path must parse; a discovered file must parse; no file at all is
/// fine and yields the defaults.
pub fn load_or_default(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    if let Some(p) = explicit {
        return load_config(p);
    }
    match resolve_config_path() {
        Some(p) => load_config(&p),
        None => Ok(AppConfig::default()),
    }
}
