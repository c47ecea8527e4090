// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fragment appearance and tessellation settings

use crate::NumericPrecision;
use cadscene_model::{Color, MeshQuality, Result};
use serde::{Deserialize, Serialize};

/// GLSL vertex and fragment sources for a `ComposedShader`
///
/// Both stages are required; a shader replaces the material block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderProgram {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderProgram {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

/// How one shape is rendered
///
/// Loads from JSON with every field optional:
///
/// ```ignore
/// let style = FragmentStyle::from_json_str(r#"{"color": {"r": 1, "g": 0, "b": 0}}"#)?;
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentStyle {
    /// Diffuse color
    pub color: Color,
    pub specular_color: Color,
    pub shininess: f64,
    pub transparency: f64,
    /// Emissive color of edge overlays
    pub line_color: Color,
    /// Overlay mesh edges as an indexed line set
    pub export_edges: bool,
    /// Ask the tessellator for per-vertex normals
    pub compute_normals: bool,
    /// Replaces the material when set
    pub shader: Option<ShaderProgram>,
    pub quality: MeshQuality,
    pub precision: NumericPrecision,
}

impl Default for FragmentStyle {
    fn default() -> Self {
        Self {
            color: Color::DEFAULT_SHAPE,
            specular_color: Color::DEFAULT_SPECULAR,
            shininess: 0.9,
            transparency: 0.0,
            line_color: Color::BLACK,
            export_edges: true,
            compute_normals: false,
            shader: None,
            quality: MeshQuality::default(),
            precision: NumericPrecision::default(),
        }
    }
}

impl FragmentStyle {
    /// Parse a style from JSON, missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_specular_color(mut self, color: Color) -> Self {
        self.specular_color = color;
        self
    }

    pub fn with_shininess(mut self, shininess: f64) -> Self {
        self.shininess = shininess;
        self
    }

    pub fn with_transparency(mut self, transparency: f64) -> Self {
        self.transparency = transparency;
        self
    }

    pub fn with_edges(mut self, enabled: bool) -> Self {
        self.export_edges = enabled;
        self
    }

    pub fn with_normals(mut self, enabled: bool) -> Self {
        self.compute_normals = enabled;
        self
    }

    pub fn with_shader(mut self, shader: ShaderProgram) -> Self {
        self.shader = Some(shader);
        self
    }

    pub fn with_quality(mut self, quality: MeshQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_precision(mut self, precision: NumericPrecision) -> Self {
        self.precision = precision;
        self
    }

    /// Coarse tessellation, no edges
    pub fn fast() -> Self {
        Self {
            export_edges: false,
            quality: MeshQuality::default().scaled(4.0),
            ..Self::default()
        }
    }
}
