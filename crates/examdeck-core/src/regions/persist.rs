use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ExamDeckError;
use crate::regions::{Rect, Region, RegionStore};

/// One region as stored in a region config file (display-pixel units).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub question_number: u32,
    #[serde(deserialize_with = "pixel")]
    pub x: u32,
    #[serde(deserialize_with = "pixel")]
    pub y: u32,
    #[serde(deserialize_with = "pixel")]
    pub width: u32,
    #[serde(deserialize_with = "pixel")]
    pub height: u32,
}

impl RegionRecord {
    pub fn new(question_number: u32, x: u32, y: u32, width: u32, height: u32) -> Self {
        RegionRecord {
            question_number,
            x,
            y,
            width,
            height,
        }
    }

    pub(crate) fn to_region(self, position: usize) -> Result<Region, ExamDeckError> {
        if self.question_number == 0 || self.question_number.checked_add(1).is_none() {
            return Err(ExamDeckError::ConfigInvalid(format!(
                "entry {position}: question_number must be between 1 and {}",
                u32::MAX - 1
            )));
        }
        if self.x.checked_add(self.width).is_none() || self.y.checked_add(self.height).is_none() {
            return Err(ExamDeckError::ConfigInvalid(format!(
                "entry {position}: region extends past the largest pixel coordinate"
            )));
        }
        Ok(Region {
            question_number: self.question_number,
            rect: Rect::new(self.x, self.y, self.width, self.height),
        })
    }
}

impl From<&Region> for RegionRecord {
    fn from(region: &Region) -> Self {
        RegionRecord::new(
            region.question_number,
            region.rect.x,
            region.rect.y,
            region.rect.width,
            region.rect.height,
        )
    }
}

/// Accept any non-negative JSON number, truncating fractions.
fn pixel<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
        return Err(D::Error::custom(format!(
            "invalid pixel coordinate {value}"
        )));
    }
    Ok(value.trunc() as u32)
}

/// Default region config path for an exam image: `<stem>_config.json`
/// next to the image.
pub fn default_config_path(image_path: &Path) -> PathBuf {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "regions".into());
    image_path.with_file_name(format!("{stem}_config.json"))
}

/// Serialize the store as a pretty-printed JSON array.
pub fn to_json(store: &RegionStore) -> Result<String, ExamDeckError> {
    Ok(serde_json::to_string_pretty(&store.serialize())?)
}

/// Parse region records from JSON. Any malformed entry fails the whole parse.
pub fn parse_records(json: &str) -> Result<Vec<RegionRecord>, ExamDeckError> {
    serde_json::from_str(json).map_err(|e| ExamDeckError::ConfigInvalid(e.to_string()))
}

/// Write the store to a region config file.
pub fn save(store: &RegionStore, path: &Path) -> Result<(), ExamDeckError> {
    std::fs::write(path, to_json(store)?)?;
    tracing::info!(path = %path.display(), regions = store.len(), "saved region config");
    Ok(())
}

/// Replace the store's contents from a region config file.
///
/// Unreadable or malformed files leave the store untouched.
pub fn load(store: &mut RegionStore, path: &Path) -> Result<(), ExamDeckError> {
    let config_error = |reason: String| ExamDeckError::Config {
        path: path.to_path_buf(),
        reason,
    };

    let content = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
    let records = parse_records(&content).map_err(|e| config_error(e.to_string()))?;
    store
        .deserialize(&records)
        .map_err(|e| config_error(e.to_string()))?;

    tracing::info!(path = %path.display(), regions = store.len(), "loaded region config");
    Ok(())
}
