use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::consts::{APP_NAME, DB_FILE_NAME};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    /// Timetable page URL
    #[serde(default)]
    pub(crate) url: Option<String>,
    /// `Cookie` header value of a logged-in browser session
    #[serde(default)]
    pub(crate) cookie: Option<String>,
    /// Directory the calendar file is written to
    #[serde(default)]
    pub(crate) output: Option<PathBuf>,
    #[serde(default)]
    pub(crate) db: Option<PathBuf>,
    #[serde(default)]
    pub(crate) offline: bool,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) timezone: Option<String>,

    /// File the values came from
    #[serde(skip)]
    pub(crate) source: Option<PathBuf>,
    /// Files that exist but could not be parsed
    #[serde(skip)]
    pub(crate) problems: Vec<String>,
}

impl Config {
    /// First readable config file, or defaults.
    ///
    /// Nothing is printed here: logging is configured from the result, so
    /// problems are collected and reported by the caller.
    pub(crate) fn load() -> Self {
        let mut problems = Vec::new();

        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(mut config) => {
                        config.source = Some(path);
                        config.problems = problems;
                        return config;
                    }
                    Err(e) => problems.push(format!("Failed to parse {}: {}", path.display(), e)),
                }
            }
        }

        Self {
            problems,
            ..Self::default()
        }
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/classcal/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join(APP_NAME).join("config.toml"));
        }

        // 2. Platform config dir (macOS Application Support, Windows AppData)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join(APP_NAME).join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.classcal.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(format!(".{APP_NAME}.toml")));
        }

        paths
    }

    /// Session database used when neither `--db` nor `db` is set
    pub(crate) fn default_db_path() -> PathBuf {
        dirs::data_local_dir()
            .map(|dir| dir.join(APP_NAME))
            .unwrap_or_else(|| PathBuf::from(format!(".{APP_NAME}")))
            .join(DB_FILE_NAME)
    }
}
