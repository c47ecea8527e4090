// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP assembly import with names and colors

use crate::exchange::ensure_exists;
use crate::Exchange;
use cadscene_assembly::{AssemblyFlattener, FlattenedAssembly};
use cadscene_model::{AssemblyDocument, CadError, Color, DocumentReader, GeometryKernel, Result};
use std::path::Path;

impl<'k, K: GeometryKernel> Exchange<'k, K> {
    /// Read a labelled STEP assembly and flatten it
    ///
    /// Every simple shape comes back placed in the global frame with its
    /// label name and resolved color.
    pub fn read_step_with_names_colors<R>(
        &self,
        reader: &R,
        path: impl AsRef<Path>,
    ) -> Result<FlattenedAssembly<K::Shape>>
    where
        R: DocumentReader,
        R::Document: AssemblyDocument<Shape = K::Shape>,
    {
        self.read_step_with_names_colors_or(reader, path, Color::DEFAULT_GRAY)
    }

    /// Same as [`read_step_with_names_colors`](Self::read_step_with_names_colors)
    /// with another fallback color
    pub fn read_step_with_names_colors_or<R>(
        &self,
        reader: &R,
        path: impl AsRef<Path>,
        default_color: Color,
    ) -> Result<FlattenedAssembly<K::Shape>>
    where
        R: DocumentReader,
        R::Document: AssemblyDocument<Shape = K::Shape>,
    {
        let path = path.as_ref();
        ensure_exists(path)?;

        let transfer = reader.read_document(path);
        let mut document = match (transfer.status.is_done(), transfer.document) {
            (true, Some(document)) => document,
            (_, _) => {
                return Err(CadError::collaborator(format!(
                    "cannot read assembly {}: reader status {}",
                    path.display(),
                    transfer.status
                )))
            }
        };

        let flat = AssemblyFlattener::new(self.kernel)
            .with_default_color(default_color)
            .flatten(&mut document);
        log::info!("{} flattened into {} shapes", path.display(), flat.len());
        Ok(flat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadscene_assembly::ColorSource;
    use cadscene_memkernel::{MemDocument, MemKernel, MemShape, NativeExchange};
    use cadscene_model::{ColorSlot, Transform};
    use std::fs;
    use std::path::PathBuf;

    const RED: Color = Color { r: 1.0, g: 0.0, b: 0.0 };

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cadscene-asm-{}", uuid::Uuid::new_v4().simple()));
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn test_named_colored_import() {
        let mut doc = MemDocument::new();
        let wheel = doc.add_shape("wheel", MemShape::make_cylinder(3.0, 1.0));
        let body = doc.add_shape("body", MemShape::make_box(10.0, 4.0, 2.0));
        doc.set_label_color(body, ColorSlot::Surface, RED);
        let car = doc.add_assembly("car");
        doc.add_component(car, body, Transform::identity()).unwrap();
        doc.add_component(car, wheel, Transform::from_translation(0.0, 0.0, 0.0)).unwrap();
        doc.add_component(car, wheel, Transform::from_translation(10.0, 0.0, 0.0)).unwrap();

        let step = NativeExchange::step();
        let path = scratch("car.stp");
        step.write_document(&doc, &path).unwrap();

        let kernel = MemKernel::new();
        let flat = Exchange::new(&kernel).read_step_with_names_colors(&step, &path).unwrap();
        assert_eq!(flat.len(), 3);

        let names: Vec<&str> = flat.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["body", "wheel", "wheel"]);
        assert_eq!(flat.get(0).unwrap().color, RED);
        assert_eq!(flat.get(0).unwrap().color_source, ColorSource::Definition);
        assert_eq!(flat.get(2).unwrap().color, Color::DEFAULT_GRAY);
    }

    #[test]
    fn test_fallback_color() {
        let mut doc = MemDocument::new();
        doc.add_shape("plain", MemShape::make_box(1.0, 1.0, 1.0));
        let step = NativeExchange::step();
        let path = scratch("plain.stp");
        step.write_document(&doc, &path).unwrap();

        let kernel = MemKernel::new();
        let flat = Exchange::new(&kernel)
            .read_step_with_names_colors_or(&step, &path, RED)
            .unwrap();
        assert_eq!(flat.get(0).unwrap().color, RED);
        assert_eq!(flat.get(0).unwrap().color_source, ColorSource::Default);
    }

    #[test]
    fn test_roots_only_file_is_collaborator_failure() {
        let step = NativeExchange::step();
        let path = scratch("roots.stp");
        step.write_roots(&[MemShape::make_box(1.0, 1.0, 1.0)], &path).unwrap();

        let kernel = MemKernel::new();
        let err = Exchange::new(&kernel)
            .read_step_with_names_colors(&step, &path)
            .unwrap_err();
        assert!(matches!(err, CadError::Collaborator(_)));
    }

    #[test]
    fn test_missing_file() {
        let kernel = MemKernel::new();
        let err = Exchange::new(&kernel)
            .read_step_with_names_colors(&NativeExchange::step(), scratch("none.stp"))
            .unwrap_err();
        assert!(matches!(err, CadError::NotFound(_)));
    }
}
