//! Run configuration for the island generator.
//! Defaults reproduce the reference run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::dataset::SchemaVersion;
use crate::error::{DemError, DemResult};
use crate::overrides::Override;

/// Gaussian island window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Full width at half maximum, in cells.
    pub fwhm: f64,
    /// Window centre `[x, y]`; the grid centre when absent.
    #[serde(default)]
    pub center: Option<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemConfig {
    pub nx: usize,
    pub ny: usize,
    /// Noise layering depth.
    pub octaves: u32,
    /// Noise feature size in cells.
    pub frequency_scale: f64,
    /// Noise seed; drawn at random when absent.
    pub seed: Option<u32>,
    /// Island shaping; the raw noise surface is kept when absent.
    pub window: Option<WindowConfig>,
    /// Metres subtracted from every cell after windowing.
    pub baseline_offset: f32,
    /// Hand edits applied, in order, to the finished surface.
    pub overrides: Vec<Override>,
    pub melt_x: usize,
    pub melt_y: usize,
    /// Sea level for the ice-type mask; no mask when absent.
    pub mask_level: Option<f32>,
    pub schema: SchemaVersion,
    pub output: PathBuf,
}

impl Default for DemConfig {
    fn default() -> Self {
        let n = 256;
        Self {
            nx: n,
            ny: n,
            octaves: 5,
            frequency_scale: 16.0 * 5.0,
            seed: Some(0),
            window: Some(WindowConfig { fwhm: (n / 2) as f64, center: None }),
            baseline_offset: 0.0,
            overrides: Vec::new(),
            melt_x: n / 2,
            melt_y: n / 2,
            mask_level: Some(0.0),
            schema: SchemaVersion::V3,
            output: PathBuf::from("artidemisland.nc"),
        }
    }
}

impl DemConfig {
    /// Parse a JSON config; missing keys take their default values.
    pub fn from_json(json: &str) -> DemResult<Self> {
        let config: DemConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> DemResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> DemResult<()> {
        if self.nx == 0 || self.ny == 0 {
            return Err(DemError::InvalidShape(format!("grid must be non-empty, got {}x{}", self.nx, self.ny)));
        }
        if self.octaves == 0 {
            return Err(DemError::InvalidParameter("octaves must be positive".into()));
        }
        if !(self.frequency_scale > 0.0) {
            return Err(DemError::InvalidParameter(format!(
                "frequency_scale must be positive, got {}",
                self.frequency_scale
            )));
        }
        if let Some(window) = &self.window {
            if self.nx != self.ny {
                return Err(DemError::InvalidShape(format!(
                    "island window needs a square grid, got {}x{}",
                    self.nx, self.ny
                )));
            }
            if !(window.fwhm > 0.0) {
                return Err(DemError::InvalidParameter(format!("fwhm must be positive, got {}", window.fwhm)));
            }
        }
        if self.melt_x >= self.nx || self.melt_y >= self.ny {
            return Err(DemError::OutOfBounds { x: self.melt_x, y: self.melt_y, nx: self.nx, ny: self.ny });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_run() {
        let c = DemConfig::default();
        assert_eq!((c.nx, c.ny, c.octaves), (256, 256, 5));
        assert_eq!(c.frequency_scale, 80.0);
        assert_eq!(c.window.map(|w| w.fwhm), Some(128.0));
        assert_eq!((c.melt_x, c.melt_y), (128, 128));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c = DemConfig::from_json(r#"{ "nx": 64, "ny": 64, "melt_x": 3, "melt_y": 4, "schema": "v1" }"#).unwrap();
        assert_eq!(c.nx, 64);
        assert_eq!(c.octaves, 5);
        assert_eq!(c.schema, SchemaVersion::V1);
        assert_eq!((c.melt_x, c.melt_y), (3, 4));
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let melt_outside = DemConfig { nx: 8, ny: 8, melt_x: 8, window: None, ..DemConfig::default() };
        assert!(matches!(melt_outside.validate(), Err(DemError::OutOfBounds { .. })));

        let rect_island = DemConfig { nx: 8, ny: 6, melt_x: 1, melt_y: 1, ..DemConfig::default() };
        assert!(matches!(rect_island.validate(), Err(DemError::InvalidShape(_))));

        assert!(matches!(DemConfig::from_json(r#"{ "octaves": 0 }"#), Err(DemError::InvalidParameter(_))));
        assert!(matches!(DemConfig::from_json("{ nx: }"), Err(DemError::Config(_))));
    }
}
