//! YAML configuration naming the reference datasets.

use crate::error::{CollateError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "collator.yaml";

/// Paths to every reference dataset.
///
/// Relative paths are resolved against the directory holding the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollatorConfig {
    pub kanji_readings: PathBuf,
    pub pitch_accents: PathBuf,
    pub headword_images: PathBuf,
    pub radical_images: PathBuf,
    #[serde(default)]
    pub image_exceptions: Option<PathBuf>,
}

impl CollatorConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| CollateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: CollatorConfig =
            serde_yaml::from_str(&contents).map_err(|source| CollateError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolved_against(base))
    }

    fn resolved_against(self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };
        Self {
            kanji_readings: resolve(self.kanji_readings),
            pitch_accents: resolve(self.pitch_accents),
            headword_images: resolve(self.headword_images),
            radical_images: resolve(self.radical_images),
            image_exceptions: self.image_exceptions.map(resolve),
        }
    }
}

/// Use the explicit path if given, otherwise look in the usual places.
pub fn find_config_file(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let candidates = [
        PathBuf::from(CONFIG_FILE_NAME),
        PathBuf::from("supplementary").join(CONFIG_FILE_NAME),
    ];
    candidates
        .into_iter()
        .find(|p| p.exists())
        .ok_or_else(|| CollateError::ConfigNotFound(CONFIG_FILE_NAME.to_string()))
}
