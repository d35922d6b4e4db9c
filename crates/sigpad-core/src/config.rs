//! Pad construction parameters.

use serde::{Deserialize, Serialize};

use crate::style::PenStyle;

/// Configuration for a signature pad.
///
/// `display_*` is the on-screen (CSS) size; the backing store is that size
/// multiplied by `density_scale`, fixed at creation time. Resizing after
/// drawing does not rescale existing raster content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PadConfig {
    /// Displayed width in client pixels.
    pub display_width: f64,
    /// Displayed height in client pixels.
    pub display_height: f64,
    /// Backing-store multiplier (2 on high-density displays).
    pub density_scale: u32,
    /// Initial pen settings.
    pub pen: PenStyle,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            display_width: 800.0,
            display_height: 250.0,
            density_scale: 1,
            pen: PenStyle::default(),
        }
    }
}

impl PadConfig {
    /// Backing-store width in pixels.
    pub fn surface_width(&self) -> u32 {
        (self.display_width * self.density_scale as f64).round() as u32
    }

    /// Backing-store height in pixels.
    pub fn surface_height(&self) -> u32 {
        (self.display_height * self.density_scale as f64).round() as u32
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
