use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{BouncerError, BouncerResult};

/// Largest frame count whose indices still fit the fixed three-digit file names.
pub const MAX_FRAMES: u64 = 1000;

/// Largest accepted `row_alignment` in bytes.
pub const MAX_ROW_ALIGNMENT: usize = 4096;

/// Largest accepted `accel_floor` and `hstep_floor`, in pixels per tick.
pub const MAX_FLOOR: i64 = 1 << 16;

/// Extensions accepted for the source still image by default (JPEG family).
pub const JPEG_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "jpe", "jfif", "jif"];

/// Sequence policy: frame budget and the ratios used to derive ball constants from the image.
///
/// Every derived constant is `dimension / divisor`, floored at the matching `*_floor` where one
/// exists. Loadable from JSON; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BounceConfig {
    /// Number of frames to synthesize.
    pub total_frames: u64,
    /// `radius = height / radius_divisor`.
    pub radius_divisor: u32,
    /// Initial `x = width / start_x_divisor`.
    pub start_x_divisor: u32,
    /// Initial `y = height / start_y_divisor`.
    pub start_y_divisor: u32,
    /// `accelerationY = max(accel_floor, height / accel_divisor)`.
    pub accel_divisor: u32,
    /// Lower bound on the vertical acceleration.
    pub accel_floor: i64,
    /// `horizontalStep = max(hstep_floor, width / hstep_divisor)`.
    pub hstep_divisor: u32,
    /// Lower bound on the horizontal step.
    pub hstep_floor: i64,
    /// Output file name prefix (`<stem>000.<ext>`).
    pub file_stem: String,
    /// Case-insensitive extensions accepted for the input image.
    pub accepted_extensions: Vec<String>,
    /// Row alignment in bytes for decoded frames.
    pub row_alignment: usize,
}

impl Default for BounceConfig {
    fn default() -> Self {
        Self {
            total_frames: 300,
            radius_divisor: 10,
            start_x_divisor: 4,
            start_y_divisor: 4,
            accel_divisor: 200,
            accel_floor: 1,
            hstep_divisor: 100,
            hstep_floor: 1,
            file_stem: "frame".to_string(),
            accepted_extensions: JPEG_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            row_alignment: 32,
        }
    }
}

impl BounceConfig {
    /// Reject configurations the pipeline cannot honor.
    pub fn validate(&self) -> BouncerResult<()> {
        if self.total_frames == 0 {
            return Err(BouncerError::validation("total_frames must be non-zero"));
        }
        if self.total_frames > MAX_FRAMES {
            return Err(BouncerError::validation(format!(
                "total_frames must be <= {MAX_FRAMES} (three-digit frame file names)"
            )));
        }
        if self.radius_divisor == 0
            || self.start_x_divisor == 0
            || self.start_y_divisor == 0
            || self.accel_divisor == 0
            || self.hstep_divisor == 0
        {
            return Err(BouncerError::validation("divisors must be non-zero"));
        }
        if !(1..=MAX_FLOOR).contains(&self.accel_floor)
            || !(1..=MAX_FLOOR).contains(&self.hstep_floor)
        {
            return Err(BouncerError::validation(format!(
                "accel_floor and hstep_floor must be in 1..={MAX_FLOOR}"
            )));
        }
        if self.file_stem.is_empty() {
            return Err(BouncerError::validation("file_stem must be non-empty"));
        }
        if self.file_stem.contains(['/', '\\']) {
            return Err(BouncerError::validation(
                "file_stem must not contain path separators",
            ));
        }
        if self.accepted_extensions.is_empty() {
            return Err(BouncerError::validation(
                "accepted_extensions must list at least one extension",
            ));
        }
        if self.row_alignment == 0 || self.row_alignment > MAX_ROW_ALIGNMENT {
            return Err(BouncerError::validation(format!(
                "row_alignment must be in 1..={MAX_ROW_ALIGNMENT}"
            )));
        }
        Ok(())
    }

    /// Parse a JSON configuration string.
    pub fn from_json_str(json: &str) -> BouncerResult<Self> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|e| BouncerError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_path(path: &Path) -> BouncerResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/config.rs"]
mod tests;
