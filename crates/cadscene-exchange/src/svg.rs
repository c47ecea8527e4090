// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SVG drawing export
//!
//! Edges are projected along the view direction, mirrored in X, scaled by
//! the length unit and fitted into a `viewBox` padded by the margins.
//! Hidden edges are drawn dashed.

use crate::exchange::{check_overwrite, ensure_written};
use crate::{Exchange, ExchangeWarning};
use cadscene_model::{
    BoundingBox, CadError, EdgeProjector, GeometryKernel, LengthUnit, Polyline, ProjectionView,
    Result,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Dash pattern of hidden edges
const HIDDEN_DASHARRAY: &str = "5,5";

/// Drawing settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgOptions {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    pub margin_left: f64,
    pub margin_top: f64,
    /// Draw hidden edges dashed
    pub export_hidden_edges: bool,
    pub view: ProjectionView,
    /// Stroke color
    pub color: String,
    /// Stroke width, with unit
    pub line_width: String,
    pub unit: LengthUnit,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            margin_left: 10.0,
            margin_top: 30.0,
            export_hidden_edges: true,
            view: ProjectionView::default(),
            color: "black".to_string(),
            line_width: "1px".to_string(),
            unit: LengthUnit::Mm,
        }
    }
}

impl SvgOptions {
    /// Parse options from JSON, missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_margins(mut self, left: f64, top: f64) -> Self {
        self.margin_left = left;
        self.margin_top = top;
        self
    }

    pub fn with_hidden_edges(mut self, enabled: bool) -> Self {
        self.export_hidden_edges = enabled;
        self
    }

    pub fn with_view(mut self, view: ProjectionView) -> Self {
        self.view = view;
        self
    }

    pub fn with_stroke(mut self, color: impl Into<String>, line_width: impl Into<String>) -> Self {
        self.color = color.into();
        self.line_width = line_width.into();
        self
    }

    pub fn with_unit(mut self, unit: LengthUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Reject stroke values that would break out of their attribute
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("color", &self.color), ("line_width", &self.line_width)] {
            let well_formed = !value.trim().is_empty()
                && !value
                    .chars()
                    .any(|c| matches!(c, '"' | '\'' | '<' | '>' | '&') || c.is_control());
            if !well_formed {
                return Err(CadError::invalid_input(format!(
                    "SVG {} {:?} is not a valid attribute value",
                    field, value
                )));
            }
        }
        Ok(())
    }
}

/// Result of an SVG export
#[derive(Clone, Debug)]
pub struct SvgExport {
    /// Document text
    pub svg: String,
    /// File written, when one was requested
    pub path: Option<PathBuf>,
    pub warnings: Vec<ExchangeWarning>,
}

/// Drawing-plane polyline, mirrored and scaled
struct Polyline2d {
    points: Vec<[f64; 2]>,
    hidden: bool,
}

fn to_drawing(polyline: &Polyline, factor: f64, hidden: bool, bbox: &mut Option<BoundingBox>) -> Polyline2d {
    let points = polyline
        .iter()
        .map(|p| {
            let q = [-p[0] * factor, p[1] * factor];
            let q3 = [q[0], q[1], 0.0];
            match bbox.as_mut() {
                Some(b) => b.add_point(q3),
                None => *bbox = Some(BoundingBox { min: q3, max: q3 }),
            }
            q
        })
        .collect();
    Polyline2d { points, hidden }
}

fn render_svg(polylines: &[Polyline2d], bbox: Option<&BoundingBox>, options: &SvgOptions) -> String {
    let (min, size) = match bbox {
        Some(b) => ([b.min[0], b.min[1]], b.size()),
        None => ([0.0, 0.0], [0.0, 0.0, 0.0]),
    };

    let mut out = format!(
        "<svg baseProfile=\"full\" height=\"{}\" version=\"1.1\" viewBox=\"{},{},{},{}\" width=\"{}\" xmlns=\"http://www.w3.org/2000/svg\" xmlns:ev=\"http://www.w3.org/2001/xml-events\" xmlns:xlink=\"http://www.w3.org/1999/xlink\"><defs />",
        options.height,
        min[0] - options.margin_left,
        min[1] - options.margin_top,
        size[0] + 2.0 * options.margin_left,
        size[1] + 2.0 * options.margin_top,
        options.width
    );
    for polyline in polylines {
        let points: Vec<String> = polyline
            .points
            .iter()
            .map(|p| format!("{},{}", p[0], p[1]))
            .collect();
        out.push_str(&format!("<polyline fill=\"none\" points=\"{}\" stroke=\"{}\"", points.join(" "), options.color));
        if polyline.hidden {
            out.push_str(&format!(" stroke-dasharray=\"{}\"", HIDDEN_DASHARRAY));
        }
        out.push_str(&format!(
            " stroke-linecap=\"round\" stroke-width=\"{}\" />",
            options.line_width
        ));
    }
    out.push_str("</svg>");
    out
}

impl<'k, K: GeometryKernel> Exchange<'k, K> {
    /// Project a shape's edges into an SVG drawing
    ///
    /// Returns the SVG text. When `path` is given the document is also
    /// written there, with an XML declaration, and must exist afterwards.
    pub fn export_svg<P>(
        &self,
        projector: &P,
        shape: &K::Shape,
        options: &SvgOptions,
        path: Option<&Path>,
    ) -> Result<SvgExport>
    where
        P: EdgeProjector<Shape = K::Shape>,
    {
        self.require_shape(shape)?;
        options.validate()?;

        let edges = projector.project_edges(shape, &options.view, options.export_hidden_edges);
        let factor = options.unit.factor();
        let mut bbox = None;
        let mut polylines: Vec<Polyline2d> = edges
            .visible
            .iter()
            .map(|p| to_drawing(p, factor, false, &mut bbox))
            .collect();
        if options.export_hidden_edges {
            polylines.extend(edges.hidden.iter().map(|p| to_drawing(p, factor, true, &mut bbox)));
        }
        if polylines.is_empty() {
            log::warn!("no edge to draw, the SVG drawing is empty");
        }

        let svg = render_svg(&polylines, bbox.as_ref(), options);

        let mut warnings = Vec::new();
        let written = match path {
            Some(path) => {
                warnings = check_overwrite(path);
                fs::write(path, format!("<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n{}", svg))?;
                ensure_written(path)?;
                log::info!("shape successfully exported to {}", path.display());
                Some(path.to_path_buf())
            }
            None => None,
        };

        Ok(SvgExport {
            svg,
            path: written,
            warnings,
        })
    }
}
