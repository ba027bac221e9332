use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;
use tracing::warn;

pub const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    /// Browser origins allowed to call the API. Empty disables CORS headers.
    pub allowed_origins: Vec<String>,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8000".into(),
            allowed_origins: vec!["https://cropupgrad-clientside.onrender.com".into()],
            max_body_bytes: 16 * 1024,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    allowed_origins: Option<Vec<String>>,
    max_body_bytes: Option<usize>,
}

pub fn load_settings() -> Settings {
    let file_cfg = read_file_settings(Path::new(SETTINGS_FILE));
    let env: HashMap<String, String> = std::env::vars().collect();
    resolve_settings(file_cfg, &env)
}

fn read_file_settings(path: &Path) -> FileSettings {
    let Ok(raw) = fs::read_to_string(path) else {
        return FileSettings::default();
    };
    match toml::from_str::<FileSettings>(&raw) {
        Ok(file_cfg) => file_cfg,
        Err(error) => {
            warn!(path = %path.display(), %error, "ignoring unreadable settings file");
            FileSettings::default()
        }
    }
}

fn resolve_settings(file_cfg: FileSettings, env: &HashMap<String, String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(v) = file_cfg.bind_addr {
        settings.server_bind = v;
    }
    if let Some(v) = file_cfg.allowed_origins {
        settings.allowed_origins = v;
    }
    if let Some(v) = file_cfg.max_body_bytes {
        settings.max_body_bytes = v;
    }

    if let Some(v) = env.get("SERVER_BIND") {
        settings.server_bind = v.clone();
    }
    if let Some(v) = env.get("APP__BIND_ADDR") {
        settings.server_bind = v.clone();
    }

    if let Some(v) = env.get("APP__ALLOWED_ORIGINS") {
        settings.allowed_origins = v
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();
    }

    if let Some(v) = env.get("APP__MAX_BODY_BYTES") {
        match v.parse::<usize>() {
            Ok(parsed) => settings.max_body_bytes = parsed,
            Err(_) => warn!(value = %v, "APP__MAX_BODY_BYTES is not a byte count; keeping default"),
        }
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
