use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub default_name: String,
    pub seed: Option<u64>,
    pub bind: String,
    pub page_path: PathBuf,
    pub enable_color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_name: "Spirit".to_string(),
            seed: None,
            bind: "127.0.0.1:8000".to_string(),
            page_path: default_page_path(),
            enable_color: true,
        }
    }
}

/// The bundled page: next to the executable when installed alongside it,
/// otherwise in the crate's own `assets/` directory.
pub fn default_page_path() -> PathBuf {
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("assets").join("game.html")));
    match beside_exe {
        Some(path) if path.is_file() => path,
        _ => Path::new(env!("CARGO_MANIFEST_DIR")).join("assets").join("game.html"),
    }
}

pub struct Paths {
    pub settings_path: PathBuf,
}

pub fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "spirithatch", "SpiritHatch")
        .context("could not resolve project directories")?;
    let dir = proj.config_dir().to_path_buf();
    fs::create_dir_all(&dir)
        .with_context(|| format!("could not create config dir {}", dir.display()))?;
    Ok(Paths {
        settings_path: dir.join("settings.json"),
    })
}

/// Reads settings, falling back to defaults when the file is missing or bad.
pub fn load_settings(path: &Path) -> Settings {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no settings file, using defaults");
            return Settings::default();
        }
    };
    match serde_json::from_str::<Settings>(&raw) {
        Ok(s) => s,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable settings file");
            Settings::default()
        }
    }
}

pub fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

pub fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // rename over an existing file fails on Windows
    if cfg!(windows) && to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to)
        .with_context(|| format!("renaming {} to {}", from.display(), to.display()))?;
    Ok(())
}

/// Loads settings from the usual location, writing the defaults out on
/// first run so there is a file to edit.
pub fn load_or_init() -> Result<Settings> {
    let paths = project_paths()?;
    if !paths.settings_path.exists() {
        let defaults = Settings::default();
        if let Err(e) = save_settings_atomic(&paths.settings_path, &defaults) {
            warn!(error = %e, "could not write default settings");
        }
        return Ok(defaults);
    }
    Ok(load_settings(&paths.settings_path))
}
