// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene fragment builder
//!
//! A fragment is one shape rendered as
//! `<Transform>` / `<Group>` / `<Shape id DEF onclick>`, optionally followed
//! by an edge overlay that reuses the shape's coordinate node. Its id is a
//! fresh 128-bit random value, so repeated exports of one shape never
//! collide.

use crate::numeric::{encode_index_groups, encode_indices};
use crate::{format_general, FragmentStyle, NumericEncoder};
use cadscene_model::{
    BoundingBox, CadError, Color, GeometryKernel, Result, ShapeType, TessellationRequest,
    Tessellator, Transform,
};
use uuid::Uuid;

/// Digits used for material values (printf `%g` default)
const MATERIAL_DIGITS: usize = 6;

/// Export path chosen once per shape from its kind
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ExportStrategy {
    /// Triangulated solids, shells, faces and compounds
    Surface,
    /// Discretized edges and wires
    Curve,
}

impl ExportStrategy {
    pub fn for_shape_type(shape_type: ShapeType) -> Self {
        if shape_type.is_curve() {
            ExportStrategy::Curve
        } else {
            ExportStrategy::Surface
        }
    }
}

/// One shape's encoded geometry block
///
/// Only [`FragmentBuilder`] creates fragments. They cannot be cloned, so a
/// fragment ends up in at most one document.
#[derive(Debug)]
pub struct SceneFragment {
    id: String,
    def_name: String,
    body: String,
    has_edges: bool,
    strategy: ExportStrategy,
}

impl SceneFragment {
    /// Unique id, used by the viewer to address the shape
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn def_name(&self) -> &str {
        &self.def_name
    }

    /// X3D text
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Whether an edge overlay was emitted
    pub fn has_edges(&self) -> bool {
        self.has_edges
    }

    pub fn strategy(&self) -> ExportStrategy {
        self.strategy
    }
}

/// Fresh fragment id: 32 lowercase hex characters
pub fn new_fragment_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn fmt_color(color: &Color) -> String {
    format!(
        "{} {} {}",
        format_general(color.r, MATERIAL_DIGITS),
        format_general(color.g, MATERIAL_DIGITS),
        format_general(color.b, MATERIAL_DIGITS)
    )
}

fn open_transform(out: &mut String, placement: &Transform, bbox: Option<&BoundingBox>) {
    let [tx, ty, tz] = placement.translation();
    let ([rx, ry, rz], angle) = placement.axis_angle();
    out.push_str(&format!(
        "<Transform translation='{:.6} {:.6} {:.6}' rotation='{:.6} {:.6} {:.6} {:.6}' scale='1 1 1'>\n",
        tx, ty, tz, rx, ry, rz, angle
    ));
    match bbox {
        Some(bbox) => {
            let [sx, sy, sz] = bbox.size();
            let [cx, cy, cz] = bbox.center();
            out.push_str(&format!(
                "<Group bboxSize='{:.6} {:.6} {:.6}' bboxCenter='{:.6} {:.6} {:.6}'>\n",
                sx, sy, sz, cx, cy, cz
            ));
        }
        None => out.push_str("<Group>\n"),
    }
}

fn close_transform(out: &mut String) {
    out.push_str("</Group>\n</Transform>\n");
}

fn open_shape(out: &mut String, id: &str, def_name: &str) {
    out.push_str(&format!(
        "<Shape id='{}' DEF='{}' onclick='select(this);'><Appearance>\n",
        id, def_name
    ));
}

/// Material or shader block; the two are mutually exclusive
fn appearance(out: &mut String, style: &FragmentStyle) {
    match &style.shader {
        Some(shader) => {
            out.push_str("<ComposedShader><ShaderPart type=\"VERTEX\" style=\"display:none;\">\n");
            out.push_str(&shader.vertex);
            out.push_str("</ShaderPart>\n<ShaderPart type=\"FRAGMENT\" style=\"display:none;\">\n");
            out.push_str(&shader.fragment);
            out.push_str("</ShaderPart></ComposedShader>\n");
        }
        None => {
            out.push_str(&format!(
                "<Material diffuseColor='{}' shininess='{}' specularColor='{}' transparency='{}'>\n</Material>\n",
                fmt_color(&style.color),
                format_general(style.shininess, MATERIAL_DIGITS),
                fmt_color(&style.specular_color),
                format_general(style.transparency, MATERIAL_DIGITS)
            ));
        }
    }
    out.push_str("</Appearance>\n");
}

fn coords_def(id: &str) -> String {
    format!("COORDS:{}", id)
}

/// Reject DEF names that would break the surrounding attribute quoting
fn validate_def_name(def_name: &str) -> Result<()> {
    if def_name.is_empty()
        || def_name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '<' | '>' | '&'))
    {
        return Err(CadError::invalid_input(format!(
            "DEF name '{}' must be non-empty and contain no whitespace, quotes, '<', '>' or '&'",
            def_name
        )));
    }
    Ok(())
}

/// Builds fragments from shapes
///
/// `kernel` answers shape-kind and null queries; `tessellator` produces the
/// geometry. Both may be the same object.
pub struct FragmentBuilder<'a, K, T> {
    kernel: &'a K,
    tessellator: &'a T,
}

impl<'a, K, T> FragmentBuilder<'a, K, T>
where
    K: GeometryKernel,
    T: Tessellator<Shape = K::Shape>,
{
    pub fn new(kernel: &'a K, tessellator: &'a T) -> Self {
        Self {
            kernel,
            tessellator,
        }
    }

    /// Build a fragment whose DEF name is its id
    pub fn build(&self, shape: &K::Shape, style: &FragmentStyle) -> Result<SceneFragment> {
        let id = new_fragment_id();
        let def_name = id.clone();
        self.build_fragment(shape, style, id, def_name)
    }

    /// Build a fragment with a caller-chosen DEF name
    ///
    /// The id is still fresh; only the DEF name is fixed.
    pub fn build_with_def(
        &self,
        shape: &K::Shape,
        style: &FragmentStyle,
        def_name: &str,
    ) -> Result<SceneFragment> {
        validate_def_name(def_name)?;
        self.build_fragment(shape, style, new_fragment_id(), def_name.to_string())
    }

    fn build_fragment(
        &self,
        shape: &K::Shape,
        style: &FragmentStyle,
        id: String,
        def_name: String,
    ) -> Result<SceneFragment> {
        if self.kernel.is_null(shape) {
            return Err(CadError::invalid_input("cannot export a null shape"));
        }
        let points = style.precision.point_encoder()?;
        let strategy = ExportStrategy::for_shape_type(self.kernel.shape_type(shape));

        let (body, has_edges) = match strategy {
            ExportStrategy::Surface => {
                let normals = style.precision.normal_encoder()?;
                self.surface_body(shape, style, &id, &def_name, &points, &normals)
            }
            ExportStrategy::Curve => (self.curve_body(shape, style, &id, &def_name, &points), false),
        };

        Ok(SceneFragment {
            id,
            def_name,
            body,
            has_edges,
            strategy,
        })
    }

    fn surface_body(
        &self,
        shape: &K::Shape,
        style: &FragmentStyle,
        id: &str,
        def_name: &str,
        points: &NumericEncoder,
        normals: &NumericEncoder,
    ) -> (String, bool) {
        let request = TessellationRequest::new(style.quality)
            .with_normals(style.compute_normals)
            .with_edges(style.export_edges);
        let tess = self.tessellator.tessellate(shape, &request);
        if tess.is_empty() {
            log::warn!("fragment {} has an empty tessellation", id);
        }

        let mut out = String::new();
        open_transform(&mut out, &tess.placement, tess.bounding_box.as_ref());
        open_shape(&mut out, id, def_name);
        appearance(&mut out, style);

        let index = encode_indices(&tess.mesh.indices);
        let point = points.encode(&tess.mesh.positions);
        if tess.mesh.normals.is_empty() {
            out.push_str(&format!(
                "\n<IndexedTriangleSet creaseAngle='0.2' normalPerVertex='true' index='{}' solid='false'>\n  <Coordinate DEF='{}' point='{}'/>\n</IndexedTriangleSet>\n",
                index,
                coords_def(id),
                point
            ));
        } else {
            out.push_str(&format!(
                "\n<IndexedTriangleSet normalPerVertex='true' index='{}' solid='false'>\n  <Coordinate DEF='{}' point='{}'/>\n  <Normal vector='{}'/>\n</IndexedTriangleSet>\n",
                index,
                coords_def(id),
                point,
                normals.encode(&tess.mesh.normals)
            ));
        }
        out.push_str("</Shape>\n");

        let has_edges = style.export_edges && !tess.edges.is_empty();
        if has_edges {
            out.push_str(&format!(
                "<Shape>\n  <IndexedLineSet coordIndex='{}'>\n    <Coordinate USE='{}'></Coordinate>\n  </IndexedLineSet>\n  <Appearance>\n     <Material emissiveColor='{}'/>\n     <LineProperties applied='true' linetype='1' linewidthScaleFactor='1'>\n     </LineProperties>\n  </Appearance>\n</Shape>\n",
                encode_index_groups(&tess.edges),
                coords_def(id),
                fmt_color(&style.line_color)
            ));
        }

        close_transform(&mut out);
        (out, has_edges)
    }

    /// Edges and wires as one `LineSet`, points already in the global frame
    fn curve_body(
        &self,
        shape: &K::Shape,
        style: &FragmentStyle,
        id: &str,
        def_name: &str,
        points: &NumericEncoder,
    ) -> String {
        let polylines = self.tessellator.discretize_curves(shape, &style.quality);
        if polylines.iter().all(|p| p.is_empty()) {
            log::warn!("fragment {} has no curve points", id);
        }

        let mut coords = Vec::with_capacity(polylines.iter().map(|p| p.len() * 3).sum());
        let mut bbox: Option<BoundingBox> = None;
        for p in polylines.iter().flatten() {
            coords.extend_from_slice(p);
            match bbox.as_mut() {
                Some(b) => b.add_point(*p),
                None => bbox = Some(BoundingBox { min: *p, max: *p }),
            }
        }
        let counts: Vec<String> = polylines.iter().map(|p| p.len().to_string()).collect();

        let mut out = String::new();
        open_transform(&mut out, &Transform::identity(), bbox.as_ref());
        open_shape(&mut out, id, def_name);
        match &style.shader {
            Some(_) => appearance(&mut out, style),
            None => {
                let color = fmt_color(&style.color);
                out.push_str(&format!(
                    "<Material diffuseColor='{}' emissiveColor='{}'/>\n</Appearance>\n",
                    color, color
                ));
            }
        }
        out.push_str(&format!(
            "<LineSet vertexCount='{}'>\n  <Coordinate DEF='{}' point='{}'/>\n</LineSet>\n</Shape>\n",
            counts.join(" "),
            coords_def(id),
            points.encode(&coords)
        ));
        close_transform(&mut out);
        out
    }
}
