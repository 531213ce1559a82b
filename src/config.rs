use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Style header to embed when converting plain SRT cues to ASS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleProfile {
    #[default]
    Latin,
    Thai,
}

impl std::fmt::Display for StyleProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StyleProfile::Latin => write!(f, "latin"),
            StyleProfile::Thai => write!(f, "thai"),
        }
    }
}

impl std::str::FromStr for StyleProfile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latin" => Ok(StyleProfile::Latin),
            "thai" => Ok(StyleProfile::Thai),
            _ => Err(format!("Unknown style profile: {}. Use 'latin' or 'thai'", s)),
        }
    }
}

impl StyleProfile {
    /// Infer the profile from the originating identifier.
    ///
    /// Thai subtitle tracks carry a `.th.` language tag in their identifier
    /// on the platform this tool targets. This is a naming convention of the
    /// surrounding tooling, so it lives here as a convenience; the converter
    /// itself always takes the profile explicitly.
    pub fn for_source_id(id: &str) -> Self {
        if id.contains(".th.") {
            StyleProfile::Thai
        } else {
            StyleProfile::Latin
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Style profile used when none is given and none can be inferred.
    pub default_style: StyleProfile,
    /// Write the collected font names next to each subtitle output.
    pub write_font_list: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_style: StyleProfile::default(),
            write_font_list: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                if let Ok(file_config) = toml::from_str::<Config>(&contents) {
                    config = file_config;
                }
            }
        }

        // Override with environment variables
        if let Ok(style) = std::env::var("EPISUB_DEFAULT_STYLE") {
            if let Ok(s) = style.parse() {
                config.default_style = s;
            }
        }
        if let Ok(flag) = std::env::var("EPISUB_FONT_LIST") {
            if let Ok(f) = flag.parse() {
                config.write_font_list = f;
            }
        }

        Ok(config)
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("episub").join("config.toml"))
    }
}
