// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shape collection and page output

use crate::template::render_page;
use crate::RendererConfig;
use cadscene_assembly::FlattenedAssembly;
use cadscene_model::{GeometryKernel, Result, Tessellator};
use cadscene_x3d::{FragmentBuilder, FragmentStyle, SceneDocument, GENERATOR_VERSION};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// Files written by [`X3domRenderer::render`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedScene {
    /// Directory to serve
    pub dir: PathBuf,
    /// `index.html`
    pub html_path: PathBuf,
    /// Randomly named `.x3d` document next to the page
    pub scene_path: PathBuf,
}

/// Collects shapes and writes an x3dom page for them
///
/// Serving the output directory over HTTP is left to the caller.
pub struct X3domRenderer<'a, K, T> {
    builder: FragmentBuilder<'a, K, T>,
    config: RendererConfig,
    dir: PathBuf,
    scene: SceneDocument,
}

impl<'a, K, T> X3domRenderer<'a, K, T>
where
    K: GeometryKernel,
    T: Tessellator<Shape = K::Shape>,
{
    /// Create a renderer and its output directory
    pub fn new(kernel: &'a K, tessellator: &'a T, config: RendererConfig) -> Result<Self> {
        config.validate()?;
        let dir = match &config.output_dir {
            Some(dir) => dir.clone(),
            None => std::env::temp_dir().join(format!("cadscene-{}", Uuid::new_v4().simple())),
        };
        fs::create_dir_all(&dir)?;
        log::info!(
            "x3dom renderer in {} - axes/plane: {} - zoom factor: {}",
            dir.display(),
            config.display_axes_plane,
            config.axes_plane_zoom_factor
        );
        Ok(Self {
            builder: FragmentBuilder::new(kernel, tessellator),
            config,
            dir,
            scene: SceneDocument::new(),
        })
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Number of shapes added so far
    pub fn len(&self) -> usize {
        self.scene.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scene.is_empty()
    }

    /// Add one shape and return its fragment id
    pub fn display_shape(&mut self, shape: &K::Shape, style: &FragmentStyle) -> Result<String> {
        let fragment = self.builder.build(shape, style)?;
        let id = fragment.id().to_string();
        self.scene = std::mem::take(&mut self.scene).add(fragment);
        Ok(id)
    }

    /// Add every instance of a flattened assembly in its resolved color
    ///
    /// Returns the fragment ids in instance order.
    pub fn display_assembly(
        &mut self,
        assembly: &FlattenedAssembly<K::Shape>,
        style: &FragmentStyle,
    ) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(assembly.len());
        for instance in assembly {
            let instance_style = style.clone().with_color(instance.color);
            ids.push(self.display_shape(&instance.shape, &instance_style)?);
        }
        Ok(ids)
    }

    /// Write the scene document and `index.html`
    ///
    /// Each call writes a new scene file name so browsers never serve a
    /// cached scene.
    pub fn render(&self) -> Result<RenderedScene> {
        if self.scene.is_empty() {
            log::warn!("rendering an empty scene");
        }
        let scene_path = self.scene.serialize(&self.dir)?;
        let scene_file = scene_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let html_path = self.dir.join("index.html");
        fs::write(&html_path, render_page(&self.config, GENERATOR_VERSION, &scene_file))?;
        log::info!("viewer page written to {}", html_path.display());

        Ok(RenderedScene {
            dir: self.dir.clone(),
            html_path,
            scene_path,
        })
    }
}
