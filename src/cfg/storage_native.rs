use directories::ProjectDirs;
use std::{error::Error, fmt::Display, fs, io, path::PathBuf, sync::LazyLock};

use super::Settings;

pub(super) const LOCATION: &str = "settings.toml";

static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("io.github", "solar-system-demo", "solar_system_demo"));
static SETTINGS_PATH: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
    PROJECT_DIRS
        .as_ref()
        .map(|dir| dir.config_dir().join(LOCATION))
});

/// `Ok(None)` if there is no settings file.
pub(super) fn load() -> Result<Option<Settings>, LoadError> {
    let path = SETTINGS_PATH.as_ref().ok_or(LoadError::NoConfigDirectory)?;
    let string = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(LoadError::ReadFile(e)),
    };

    parse(&string).map(Some)
}

fn parse(string: &str) -> Result<Settings, LoadError> {
    toml::from_str(string).map_err(LoadError::Deserialize)
}

#[derive(Debug)]
pub(crate) enum LoadError {
    NoConfigDirectory,
    ReadFile(io::Error),
    Deserialize(toml::de::Error),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::NoConfigDirectory => write!(f, "No reasonable config directory was found"),
            LoadError::ReadFile(error) => write!(f, "ReadFile: {error}"),
            LoadError::Deserialize(error) => write!(f, "Deserialize: {error}"),
        }
    }
}

impl Error for LoadError {}
