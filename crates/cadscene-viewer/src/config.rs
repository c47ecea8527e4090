// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Renderer configuration

use cadscene_model::{CadError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Viewer page settings
///
/// Every field is optional in JSON:
///
/// ```ignore
/// let config = RendererConfig::from_json_str(r#"{"display_axes_plane": false}"#)?;
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Where `index.html` and the scene file go; a fresh temp directory when unset
    pub output_dir: Option<PathBuf>,
    /// Show the ground plane and axes
    pub display_axes_plane: bool,
    pub axes_plane_zoom_factor: f64,
    /// Top color of the background gradient
    pub background_top: String,
    /// Bottom color of the background gradient
    pub background_bottom: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            display_axes_plane: true,
            axes_plane_zoom_factor: 1.0,
            background_top: "#ced7de".to_string(),
            background_bottom: "#808080".to_string(),
        }
    }
}

impl RendererConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_axes_plane(mut self, enabled: bool, zoom_factor: f64) -> Self {
        self.display_axes_plane = enabled;
        self.axes_plane_zoom_factor = zoom_factor;
        self
    }

    pub fn with_background(mut self, top: impl Into<String>, bottom: impl Into<String>) -> Self {
        self.background_top = top.into();
        self.background_bottom = bottom.into();
        self
    }

    /// Check the values spliced into the page
    ///
    /// Background colors go into a CSS gradient, so they may not carry
    /// quotes, markup or statement separators.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("background_top", &self.background_top),
            ("background_bottom", &self.background_bottom),
        ] {
            let well_formed = !value.trim().is_empty()
                && value.chars().all(|c| {
                    c.is_ascii_alphanumeric()
                        || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' ' | '-')
                });
            if !well_formed {
                return Err(CadError::invalid_input(format!(
                    "{} {:?} is not a CSS color",
                    field, value
                )));
            }
        }
        if !self.axes_plane_zoom_factor.is_finite() || self.axes_plane_zoom_factor <= 0.0 {
            return Err(CadError::invalid_input(format!(
                "axes plane zoom factor must be positive, got {}",
                self.axes_plane_zoom_factor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RendererConfig::default();
        assert!(config.output_dir.is_none());
        assert!(config.display_axes_plane);
        assert_eq!(config.background_top, "#ced7de");
        assert_eq!(config.background_bottom, "#808080");
    }

    #[test]
    fn test_background_colors_are_checked() {
        assert!(RendererConfig::default().validate().is_ok());
        let ok = RendererConfig::default().with_background("rgb(10, 20, 30)", "lightgray");
        assert!(ok.validate().is_ok());

        for bad in ["", "red); } body { x: y", "#fff</style>", "\"blue\""] {
            let config = RendererConfig::default().with_background(bad, "#808080");
            assert!(matches!(config.validate(), Err(CadError::InvalidInput(_))));
        }
        let zero_zoom = RendererConfig::default().with_axes_plane(true, 0.0);
        assert!(zero_zoom.validate().is_err());
    }

    #[test]
    fn test_partial_json() {
        let config = RendererConfig::from_json_str(r#"{"axes_plane_zoom_factor": 2.5}"#).unwrap();
        assert_eq!(config.axes_plane_zoom_factor, 2.5);
        assert!(config.display_axes_plane);
    }
}
